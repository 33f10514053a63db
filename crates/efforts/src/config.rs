//! Run configuration.

use std::path::PathBuf;

use crate::{display::UnitSystem, models::TargetDistances};

/// Meters per second for 120 km/h. Reachable, but only in unusual situations.
pub const UNLIKELY_SPEED: f64 = 120.0 / 3.6;

/// Thresholds used to discard implausible point pairs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlausibilityLimits {
    /// Pairs implying a faster speed than this (m/s) are dropped.
    pub unlikely_speed_mps: f64,
    /// Max distance implied by device-reported speeds between two points.
    pub device_speed_distance_m: f64,
    /// Max raw great-circle distance between two points.
    pub point_distance_m: f64,
}

impl Default for PlausibilityLimits {
    fn default() -> Self {
        Self {
            unlikely_speed_mps: UNLIKELY_SPEED,
            device_speed_distance_m: UNLIKELY_SPEED * 360.0,
            point_distance_m: UNLIKELY_SPEED * 600.0,
        }
    }
}

/// Everything a single run needs, normally built from the command line.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory containing the GPX files.
    pub gpx_dir: PathBuf,

    /// Glob filters applied inside `gpx_dir`.
    pub gpx_filters: Vec<String>,

    /// Leaderboard JSON file.
    pub efforts_file: PathBuf,

    /// Only display the stored leaderboard, do not read any tracks.
    pub display_only: bool,

    pub units: UnitSystem,

    /// Suppress informational output. Warnings are still shown.
    pub quiet: bool,

    /// Worker threads for track analysis. `None` uses the rayon default.
    pub jobs: Option<usize>,

    pub distances: TargetDistances,

    pub limits: PlausibilityLimits,
}

impl RunConfig {
    pub const DEFAULT_FILTER: &'static str = "*.gpx";

    /// Filters to apply, falling back to `*.gpx` when none were given.
    pub fn effective_filters(&self) -> Vec<String> {
        if self.gpx_filters.is_empty() {
            vec![Self::DEFAULT_FILTER.to_string()]
        } else {
            self.gpx_filters.clone()
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            gpx_dir: PathBuf::from("gpx"),
            gpx_filters: Vec::new(),
            efforts_file: PathBuf::from("best-efforts.json"),
            display_only: false,
            units: UnitSystem::Metric,
            quiet: false,
            jobs: None,
            distances: TargetDistances::default(),
            limits: PlausibilityLimits::default(),
        }
    }
}
