//! Per-distance top-N leaderboard across every processed track.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashSet},
};

use tracing::debug;

use crate::models::{NUMBER_EFFORTS, TargetDistances, TrackBestEffort, TrackKey};

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub time_seconds: f64,
    pub track_key: TrackKey,
}

impl LeaderboardEntry {
    pub fn new(time_seconds: f64, track_key: impl Into<TrackKey>) -> Self {
        Self {
            time_seconds,
            track_key: track_key.into(),
        }
    }

    /// Fastest first, ties broken by key.
    fn rank(&self, other: &Self) -> Ordering {
        self.time_seconds
            .total_cmp(&other.time_seconds)
            .then_with(|| self.track_key.cmp(&other.track_key))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Leaderboard {
    distances: BTreeMap<u32, Vec<LeaderboardEntry>>,
    capacity: usize,
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new(&TargetDistances::default())
    }
}

impl Leaderboard {
    /// An empty list for every target distance.
    pub fn new(distances: &TargetDistances) -> Self {
        Self {
            distances: distances.iter().map(|d| (d, Vec::new())).collect(),
            capacity: NUMBER_EFFORTS,
        }
    }

    /// Rebuilds a leaderboard from stored lists, enforcing ordering,
    /// uniqueness and the size bound.
    pub fn from_entries(
        distances: &TargetDistances,
        stored: BTreeMap<u32, Vec<LeaderboardEntry>>,
    ) -> Self {
        let mut leaderboard = Self::new(distances);
        for (distance, entries) in stored {
            let list = leaderboard.distances.entry(distance).or_default();
            list.extend(entries);
            list.sort_by(LeaderboardEntry::rank);
            let mut seen = HashSet::new();
            list.retain(|entry| seen.insert(entry.track_key.clone()));
            list.truncate(leaderboard.capacity);
        }
        leaderboard
    }

    pub fn entries(&self, distance: u32) -> &[LeaderboardEntry] {
        self.distances
            .get(&distance)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[LeaderboardEntry])> + '_ {
        self.distances.iter().map(|(d, e)| (*d, e.as_slice()))
    }

    /// Folds one track's results in, replacing any earlier entry for the
    /// same key, even when the new time is slower.
    pub fn merge_track(&mut self, key: &TrackKey, efforts: &TrackBestEffort) {
        for (distance, time_seconds) in efforts.iter() {
            let list = self.distances.entry(distance).or_default();
            list.retain(|entry| &entry.track_key != key);
            list.push(LeaderboardEntry::new(time_seconds, key.clone()));
            list.sort_by(LeaderboardEntry::rank);
            list.truncate(self.capacity);

            debug!(
                distance,
                time_seconds,
                rank = ?list.iter().position(|e| &e.track_key == key).map(|p| p + 1),
                "merged effort for {key}"
            );
        }
    }
}
