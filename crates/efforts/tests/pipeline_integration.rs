//! End-to-end tests: synthetic GPX files on disk through to the stored
//! leaderboard.

use std::path::{Path, PathBuf};

use efforts::{
    config::RunConfig,
    errors::AppError,
    leaderboard::Leaderboard,
    models::{NUMBER_EFFORTS, TrackBestEffort, TrackKey},
    pipeline::find_track_files,
    run,
    store::LeaderboardStore,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use test_data::prelude::*;
use time::{Duration, OffsetDateTime};

/// Scratch directory with a `gpx/` folder, removed on drop.
struct Workspace {
    root: PathBuf,
}

impl Workspace {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("efforts-it-{}-{name}", std::process::id()));
        std::fs::remove_dir_all(&root).ok();
        std::fs::create_dir_all(root.join("gpx")).expect("create gpx dir");
        Self { root }
    }

    fn gpx_dir(&self) -> PathBuf {
        self.root.join("gpx")
    }

    fn write(&self, file: &str, tracks: &[GeneratedTrack]) -> PathBuf {
        let path = self.gpx_dir().join(file);
        write_gpx_file(&path, tracks).expect("write gpx");
        path
    }

    fn config(&self) -> RunConfig {
        RunConfig {
            gpx_dir: self.gpx_dir(),
            efforts_file: self.root.join("best-efforts.json"),
            ..Default::default()
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.root).ok();
    }
}

fn start_time() -> OffsetDateTime {
    OffsetDateTime::UNIX_EPOCH + Duration::days(19_000)
}

fn manual_track(name: &str, points: &[(i64, f64, Option<f64>)]) -> GeneratedTrack {
    GeneratedTrack {
        name: Some(name.to_string()),
        segments: vec![
            points
                .iter()
                .map(|&(t, lon, speed)| GeneratedPoint {
                    lat: 0.0,
                    lon,
                    elevation: None,
                    time: start_time() + Duration::seconds(t),
                    speed,
                })
                .collect(),
        ],
    }
}

fn key_for(name: &str, path: &Path) -> TrackKey {
    TrackKey::new(Some(name), path)
}

#[test]
fn test_three_point_scenario_reports_whole_increment() {
    let ws = Workspace::new("three-point");
    let path = ws.write(
        "scenario.gpx",
        &[manual_track(
            "Scenario",
            &[(0, 0.0, None), (100, 0.01, None), (200, 0.02, None)],
        )],
    );

    let outcome = run(&ws.config()).unwrap();

    let entries = outcome.leaderboard.entries(1000);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].time_seconds, 100.0);
    assert_eq!(entries[0].track_key, key_for("Scenario", &path));
    assert_eq!(outcome.leaderboard.entries(2000)[0].time_seconds, 200.0);
    assert!(outcome.leaderboard.entries(5000).is_empty());
    assert_eq!(outcome.summary.points_considered, 2);
}

#[test]
fn test_constant_speed_matches_distance_over_speed() {
    let ws = Workspace::new("constant");
    ws.write(
        "steady.gpx",
        &[constant_speed_track("Steady", 4.0, 12_000.0, 1)],
    );

    let outcome = run(&ws.config()).unwrap();
    let best = |d: u32| outcome.leaderboard.entries(d)[0].time_seconds;

    assert!((best(1000) - 250.0).abs() <= 1.0, "1 km: {}", best(1000));
    assert!((best(5000) - 1250.0).abs() <= 1.0, "5 km: {}", best(5000));
    assert!((best(10_000) - 2500.0).abs() <= 1.0, "10 km: {}", best(10_000));
    assert!(best(1000) <= best(2000) && best(2000) <= best(5000));
    assert!(outcome.leaderboard.entries(20_000).is_empty());
}

#[test]
fn test_reprocessing_is_idempotent() {
    let ws = Workspace::new("idempotent");
    ws.write("a.gpx", &[constant_speed_track("A", 3.5, 6000.0, 2)]);
    ws.write("b.gpx", &[constant_speed_track("B", 3.0, 6000.0, 2)]);

    let first = run(&ws.config()).unwrap();
    let second = run(&ws.config()).unwrap();

    assert_eq!(first.leaderboard, second.leaderboard);
    assert_eq!(second.leaderboard.entries(5000).len(), 2);

    let stored = LeaderboardStore::new(ws.root.join("best-efforts.json"))
        .load(&Default::default())
        .unwrap();
    assert_eq!(stored, second.leaderboard);
}

#[test]
fn test_reprocessed_track_supersedes_old_entry() {
    let ws = Workspace::new("supersede");
    ws.write("run.gpx", &[constant_speed_track("Run", 5.0, 3000.0, 1)]);
    let fast = run(&ws.config()).unwrap();
    assert!((fast.leaderboard.entries(1000)[0].time_seconds - 200.0).abs() <= 1.0);

    // Same file name and track name, slower this time.
    ws.write("run.gpx", &[constant_speed_track("Run", 2.5, 3000.0, 1)]);
    let slow = run(&ws.config()).unwrap();

    let entries = slow.leaderboard.entries(1000);
    assert_eq!(entries.len(), 1);
    assert!((entries[0].time_seconds - 400.0).abs() <= 1.0);
}

#[test]
fn test_unnamed_track_replaces_existing_none_entry() {
    let ws = Workspace::new("unnamed");
    let mut track = constant_speed_track("", 4.0, 1500.0, 1);
    track.name = None;
    let path = ws.write("a.gpx", &[track]);

    // Leaderboard left behind by an earlier run, keyed with the literal `None`.
    let store = LeaderboardStore::new(ws.root.join("best-efforts.json"));
    let mut existing = Leaderboard::default();
    let old: TrackBestEffort = [(1000, 300.0)].into_iter().collect();
    existing.merge_track(&TrackKey::from(format!("None ({})", path.display())), &old);
    store.save(&existing).unwrap();

    let outcome = run(&ws.config()).unwrap();
    let entries = outcome.leaderboard.entries(1000);

    assert_eq!(entries.len(), 1, "entries: {entries:?}");
    assert_eq!(entries[0].track_key, TrackKey::new(None, &path));
    assert!((entries[0].time_seconds - 250.0).abs() <= 1.0);
}

#[test]
fn test_malformed_file_is_skipped() {
    let ws = Workspace::new("malformed");
    ws.write("good.gpx", &[constant_speed_track("Good", 4.0, 2500.0, 1)]);
    std::fs::write(ws.gpx_dir().join("broken.gpx"), b"<gpx><trk><trkseg><trkpt lat=")
        .unwrap();

    let outcome = run(&ws.config()).unwrap();

    assert_eq!(outcome.summary.files_found, 2);
    assert_eq!(outcome.summary.files_skipped, 1);
    assert_eq!(outcome.summary.tracks_merged, 1);
    assert_eq!(outcome.leaderboard.entries(1000).len(), 1);
}

#[test]
fn test_no_input_files_is_fatal() {
    let ws = Workspace::new("empty");
    match run(&ws.config()) {
        Err(AppError::NoInputFiles { filters, .. }) => {
            assert_eq!(filters, vec!["*.gpx".to_string()]);
        }
        other => panic!("expected NoInputFiles, got {other:?}"),
    }
    assert!(!ws.root.join("best-efforts.json").exists());
}

#[test]
fn test_display_only_reads_store_without_tracks() {
    let ws = Workspace::new("display-only");
    ws.write("a.gpx", &[constant_speed_track("A", 4.0, 2500.0, 1)]);
    let processed = run(&ws.config()).unwrap();

    std::fs::remove_dir_all(ws.gpx_dir()).unwrap();
    let config = RunConfig {
        display_only: true,
        ..ws.config()
    };
    let displayed = run(&config).unwrap();

    assert_eq!(displayed.leaderboard, processed.leaderboard);
    assert_eq!(displayed.summary.files_found, 0);
}

#[test]
fn test_device_speed_extension_drives_distance() {
    let ws = Workspace::new("device-speed");
    // Positions advance ~3 m per second but the device reports 5 m/s.
    let step = 3.0 / 111_195.08;
    let points: Vec<(i64, f64, Option<f64>)> = (0..=400)
        .map(|i| (i, i as f64 * step, Some(5.0)))
        .collect();
    ws.write("ride.gpx", &[manual_track("Ride", &points)]);

    let outcome = run(&ws.config()).unwrap();
    assert_eq!(outcome.leaderboard.entries(1000)[0].time_seconds, 200.0);
    assert_eq!(outcome.leaderboard.entries(2000)[0].time_seconds, 400.0);
}

#[test]
fn test_glitches_are_rejected_but_track_still_counts() {
    let ws = Workspace::new("glitches");
    let mut rng = StdRng::seed_from_u64(11);
    let track = ProceduralGenerator::new()
        .with_distance(6000.0)
        .with_glitches(0.02)
        .generate("Glitchy", &RunnerProfile::default(), &mut rng);
    ws.write("glitchy.gpx", &[track]);

    let outcome = run(&ws.config()).unwrap();

    assert!(outcome.summary.increments_rejected > 0);
    let best = outcome.leaderboard.entries(5000)[0].time_seconds;
    // A runner, not a teleport: well above 5 km at 120 km/h.
    assert!(best > 600.0, "5 km in {best} s");
}

#[test]
fn test_pauses_do_not_count_toward_time() {
    let ws = Workspace::new("pauses");
    let first = manual_track("Paused", &[(0, 0.0, None), (300, 0.0054, None)]);
    let mut track = first.clone();
    let resume = manual_track("Paused", &[(3600, 0.0054, None), (3900, 0.0108, None)]);
    track.segments.extend(resume.segments);
    ws.write("paused.gpx", &[track]);

    let outcome = run(&ws.config()).unwrap();
    // ~600 m per segment, 300 s each; the hour-long pause is excluded.
    assert_eq!(outcome.leaderboard.entries(1000)[0].time_seconds, 600.0);
}

#[test]
fn test_every_track_in_file_gets_its_own_key() {
    let ws = Workspace::new("multi-track");
    let path = ws.write(
        "double.gpx",
        &[
            constant_speed_track("Morning", 4.0, 1500.0, 1),
            constant_speed_track("Evening", 5.0, 1500.0, 1),
        ],
    );

    let outcome = run(&ws.config()).unwrap();
    let keys: Vec<&TrackKey> = outcome
        .leaderboard
        .entries(1000)
        .iter()
        .map(|e| &e.track_key)
        .collect();

    assert_eq!(keys, vec![&key_for("Evening", &path), &key_for("Morning", &path)]);
}

#[test]
fn test_leaderboard_keeps_top_n_fastest() {
    let ws = Workspace::new("top-n");
    for i in 0..12 {
        let speed = 3.0 + f64::from(i) * 0.25;
        ws.write(
            &format!("run-{i:02}.gpx"),
            &[constant_speed_track(&format!("Run {i}"), speed, 1200.0, 1)],
        );
    }

    let config = RunConfig {
        jobs: Some(2),
        ..ws.config()
    };
    let outcome = run(&config).unwrap();
    let entries = outcome.leaderboard.entries(1000);

    assert_eq!(entries.len(), NUMBER_EFFORTS);
    assert!(entries.windows(2).all(|w| w[0].time_seconds <= w[1].time_seconds));
    assert!(entries[0].track_key.as_str().starts_with("Run 11 ("));
    assert!(entries.iter().all(|e| !e.track_key.as_str().starts_with("Run 0 (")));
}

#[test]
fn test_filters_select_and_deduplicate() {
    let ws = Workspace::new("filters");
    ws.write("2024-a.gpx", &[constant_speed_track("A", 4.0, 1100.0, 1)]);
    ws.write("2023-b.gpx", &[constant_speed_track("B", 4.0, 1100.0, 1)]);
    std::fs::write(ws.gpx_dir().join("notes.txt"), "not a track").unwrap();

    let files = find_track_files(
        &ws.gpx_dir(),
        &["2024-*.gpx".to_string(), "*.gpx".to_string()],
    )
    .unwrap();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("2023-b.gpx"));

    let only_2024 = find_track_files(&ws.gpx_dir(), &["2024-*.gpx".to_string()]).unwrap();
    assert_eq!(only_2024.len(), 1);
}
