//! Best efforts over fixed target distances, extracted from GPX tracks and
//! kept in a persisted top-N leaderboard.
//!
//! The pipeline per track is: [`distance::DistanceEstimator`] turns adjacent
//! points into increments, [`effort_tracker::BestEffortTracker`] slides one
//! window per target distance over them, and
//! [`leaderboard::Leaderboard::merge_track`] folds the result into the
//! leaderboard loaded by [`store::LeaderboardStore`].

pub mod config;
pub mod display;
pub mod distance;
pub mod effort_tracker;
pub mod errors;
pub mod file_parsers;
pub mod leaderboard;
pub mod models;
pub mod pipeline;
pub mod store;

pub use pipeline::{RunOutcome, RunSummary, run};
