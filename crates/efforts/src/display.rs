//! Human-readable rendering of the leaderboard.
//!
//! Stored values are always meters and seconds; units only affect output.

use std::fmt::Write as _;

use crate::{leaderboard::Leaderboard, pipeline::RunSummary};

// Exact by definition (NIST).
pub const KM_PER_METER: f64 = 1.0 / 1000.0;
pub const MILE_PER_METER: f64 = 1.0 / 1609.344;

pub const KPH_PER_MPS: f64 = 3600.0 * KM_PER_METER;
pub const MPH_PER_MPS: f64 = 3600.0 * MILE_PER_METER;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn distance(self, meters: f64, digits: usize) -> String {
        match self {
            UnitSystem::Metric => format!("{:.digits$} km", meters * KM_PER_METER),
            UnitSystem::Imperial => format!("{:.digits$} miles", meters * MILE_PER_METER),
        }
    }

    pub fn speed(self, mps: f64, digits: usize) -> String {
        match self {
            UnitSystem::Metric => format!("{:.digits$} kph", mps * KPH_PER_MPS),
            UnitSystem::Imperial => format!("{:.digits$} mph", mps * MPH_PER_MPS),
        }
    }

    /// Digits used for the per-distance heading.
    fn heading_digits(self) -> usize {
        match self {
            UnitSystem::Metric => 0,
            UnitSystem::Imperial => 1,
        }
    }
}

/// Format seconds as `h:mm:ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// One heading per distance followed by its ranked entries.
pub fn render_leaderboard(leaderboard: &Leaderboard, units: UnitSystem) -> String {
    let mut out = String::new();

    for (distance, entries) in leaderboard.iter() {
        let meters = f64::from(distance);
        let _ = writeln!(out, "{}", units.distance(meters, units.heading_digits()));
        for entry in entries {
            let speed = if entry.time_seconds > 0.0 {
                units.speed(meters / entry.time_seconds, 1)
            } else {
                "-".to_string()
            };
            let _ = writeln!(
                out,
                "    {speed:>10}  {:>9}  {}",
                format_duration(entry.time_seconds),
                entry.track_key
            );
        }
        out.push('\n');
    }

    out
}

/// End-of-run line printed after new files were processed, quiet or not.
pub fn render_summary(summary: &RunSummary) -> String {
    format!("loaded {} trackpoints\n", summary.points_considered)
}
