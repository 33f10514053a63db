use std::{collections::BTreeMap, fmt, path::Path};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Maximum number of entries kept per distance on the leaderboard.
pub const NUMBER_EFFORTS: usize = 8;

/// A single recorded position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
    /// Carried through from the file but not used for distance.
    pub elevation: Option<f64>,
    pub timestamp: OffsetDateTime,
    /// Instantaneous speed reported by the device, meters/second.
    pub speed: Option<f64>,
}

/// Distance/time delta between two adjacent accepted points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Increment {
    pub distance_meters: f64,
    pub time_seconds: f64,
}

/// One `<trk>` worth of points, split into its recorded segments.
#[derive(Debug, Clone, Default)]
pub struct ParsedTrack {
    pub name: Option<String>,
    pub segments: Vec<Vec<TrackPoint>>,
}

impl ParsedTrack {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TargetDistanceError {
    #[error("at least one target distance is required")]
    Empty,
    #[error("target distances must be positive")]
    Zero,
}

/// Ordered, de-duplicated set of target distances in meters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDistances(Vec<u32>);

impl TargetDistances {
    pub const DEFAULT: [u32; 10] = [
        1_000, 2_000, 5_000, 10_000, 20_000, 50_000, 100_000, 160_934, 200_000, 500_000,
    ];

    pub fn new(distances: impl IntoIterator<Item = u32>) -> Result<Self, TargetDistanceError> {
        let mut distances: Vec<u32> = distances.into_iter().collect();
        if distances.is_empty() {
            return Err(TargetDistanceError::Empty);
        }
        if distances.contains(&0) {
            return Err(TargetDistanceError::Zero);
        }
        distances.sort_unstable();
        distances.dedup();
        Ok(Self(distances))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for TargetDistances {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

/// Best time per target distance achieved within one track.
/// Distances the track never covered continuously are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackBestEffort {
    best: BTreeMap<u32, f64>,
}

impl TrackBestEffort {
    pub fn get(&self, distance: u32) -> Option<f64> {
        self.best.get(&distance).copied()
    }

    /// Keeps `time_seconds` if it beats the current best for `distance`.
    pub fn record(&mut self, distance: u32, time_seconds: f64) {
        self.best
            .entry(distance)
            .and_modify(|best| {
                if time_seconds < *best {
                    *best = time_seconds;
                }
            })
            .or_insert(time_seconds);
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.best.iter().map(|(d, t)| (*d, *t))
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

impl FromIterator<(u32, f64)> for TrackBestEffort {
    fn from_iter<I: IntoIterator<Item = (u32, f64)>>(iter: I) -> Self {
        let mut efforts = Self::default();
        for (distance, time) in iter {
            efforts.record(distance, time);
        }
        efforts
    }
}

/// Result of scanning one track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackAnalysis {
    pub best: TrackBestEffort,
    /// Adjacent point pairs examined.
    pub points_considered: usize,
    pub increments_rejected: usize,
}

/// Identity of a track for leaderboard supersession.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackKey(String);

impl TrackKey {
    /// `"{name} ({path})"`. A track without a `<name>` is keyed as `None`,
    /// matching leaderboard files written by earlier versions of the tool.
    pub fn new(name: Option<&str>, source: &Path) -> Self {
        let name = name.unwrap_or("None");
        Self(format!("{name} ({})", source.display()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TrackKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TrackKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
