//! File discovery, per-file analysis and serial merging into the leaderboard.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{error, info, warn};

use crate::{
    config::RunConfig,
    distance::{DistanceEstimator, Geodesic},
    effort_tracker,
    errors::AppError,
    file_parsers::{self, ParseError},
    leaderboard::Leaderboard,
    models::{TargetDistances, TrackAnalysis, TrackKey},
    store::LeaderboardStore,
};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_found: usize,
    pub files_skipped: usize,
    pub tracks_merged: usize,
    pub points_considered: usize,
    pub increments_rejected: usize,
}

#[derive(Debug)]
pub struct RunOutcome {
    pub leaderboard: Leaderboard,
    pub summary: RunSummary,
}

/// Every track of one file, already scored.
#[derive(Debug)]
pub struct FileAnalysis {
    pub tracks: Vec<(TrackKey, TrackAnalysis)>,
}

/// Expand each filter inside `dir`. Results are sorted and de-duplicated.
pub fn find_track_files(dir: &Path, filters: &[String]) -> Result<Vec<PathBuf>, AppError> {
    let escaped_dir = glob::Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();

    for filter in filters {
        let pattern = format!("{escaped_dir}/{filter}");
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {e}"),
            }
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        return Err(AppError::NoInputFiles {
            dir: dir.to_path_buf(),
            filters: filters.to_vec(),
        });
    }
    Ok(files)
}

pub fn analyze_file<G: Geodesic>(
    path: &Path,
    distances: &TargetDistances,
    estimator: &DistanceEstimator<G>,
) -> Result<FileAnalysis, ParseError> {
    info!("reading {}", path.display());

    let tracks = file_parsers::parse_gpx_file(path)?
        .iter()
        .map(|track| {
            let key = TrackKey::new(track.name.as_deref(), path);
            let analysis = effort_tracker::score_track(track, distances, estimator);
            (key, analysis)
        })
        .collect();

    Ok(FileAnalysis { tracks })
}

/// Analyze `files` on a worker pool, then merge the results in file order.
/// A file that fails to parse leaves the leaderboard untouched.
pub fn process_files<G: Geodesic + Sync>(
    files: &[PathBuf],
    leaderboard: &mut Leaderboard,
    distances: &TargetDistances,
    estimator: &DistanceEstimator<G>,
    jobs: Option<usize>,
) -> Result<RunSummary, AppError> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build()?;

    let results: Vec<Result<FileAnalysis, ParseError>> = pool.install(|| {
        files
            .par_iter()
            .map(|path| analyze_file(path, distances, estimator))
            .collect()
    });

    let mut summary = RunSummary {
        files_found: files.len(),
        ..Default::default()
    };

    for (path, result) in files.iter().zip(results) {
        let analysis = match result {
            Ok(analysis) => analysis,
            Err(e) => {
                error!("trouble reading file, skipping {}: {e}", path.display());
                summary.files_skipped += 1;
                continue;
            }
        };

        for (key, track) in &analysis.tracks {
            summary.points_considered += track.points_considered;
            summary.increments_rejected += track.increments_rejected;
            leaderboard.merge_track(key, &track.best);
            summary.tracks_merged += 1;
        }
    }

    Ok(summary)
}

/// Load, optionally process new files, save.
pub fn run(config: &RunConfig) -> Result<RunOutcome, AppError> {
    let store = LeaderboardStore::new(&config.efforts_file);
    let mut leaderboard = store.load(&config.distances)?;

    if config.display_only {
        return Ok(RunOutcome {
            leaderboard,
            summary: RunSummary::default(),
        });
    }

    let files = find_track_files(&config.gpx_dir, &config.effective_filters())?;
    let estimator = DistanceEstimator::new(config.limits);
    let summary = process_files(
        &files,
        &mut leaderboard,
        &config.distances,
        &estimator,
        config.jobs,
    )?;

    store.save(&leaderboard)?;

    if summary.increments_rejected > 0 {
        info!(
            "{} point pairs rejected as implausible",
            summary.increments_rejected
        );
    }
    if summary.files_skipped > 0 {
        warn!("{} of {} files skipped", summary.files_skipped, summary.files_found);
    }

    Ok(RunOutcome {
        leaderboard,
        summary,
    })
}
