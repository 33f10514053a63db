//! JSON persistence for the leaderboard.
//!
//! File layout:
//!
//! ```json
//! {
//! 	"distances": {
//! 		"1000": [[245.0, "Morning Run (gpx/run.gpx)"]],
//! 		"2000": []
//! 	}
//! }
//! ```

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    leaderboard::{Leaderboard, LeaderboardEntry},
    models::{TargetDistances, TrackKey},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("malformed leaderboard file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to encode leaderboard: {0}")]
    Encode(#[from] serde_json::Error),
}

/// On-disk shape. Integer map keys are written as strings by serde_json and
/// parsed back into numbers on load; the BTreeMap keeps them in numeric order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredLeaderboard {
    #[serde(default)]
    distances: BTreeMap<u32, Vec<(f64, TrackKey)>>,
}

impl From<&Leaderboard> for StoredLeaderboard {
    fn from(leaderboard: &Leaderboard) -> Self {
        let distances = leaderboard
            .iter()
            .map(|(distance, entries)| {
                let entries = entries
                    .iter()
                    .map(|e| (e.time_seconds, e.track_key.clone()))
                    .collect();
                (distance, entries)
            })
            .collect();
        Self { distances }
    }
}

impl StoredLeaderboard {
    fn into_leaderboard(self, distances: &TargetDistances) -> Leaderboard {
        let stored = self
            .distances
            .into_iter()
            .map(|(distance, entries)| {
                let entries = entries
                    .into_iter()
                    .map(|(time, key)| LeaderboardEntry::new(time, key))
                    .collect();
                (distance, entries)
            })
            .collect();
        Leaderboard::from_entries(distances, stored)
    }
}

/// Decodes leaderboard JSON. Configured distances missing from the data get
/// an empty list.
pub fn decode(bytes: &[u8], distances: &TargetDistances) -> Result<Leaderboard, serde_json::Error> {
    let stored: StoredLeaderboard = serde_json::from_slice(bytes)?;
    Ok(stored.into_leaderboard(distances))
}

/// Encodes leaderboard JSON, tab indented with keys in numeric order.
pub fn encode(leaderboard: &Leaderboard) -> Result<Vec<u8>, serde_json::Error> {
    let stored = StoredLeaderboard::from(leaderboard);
    let mut out = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    stored.serialize(&mut serializer)?;
    out.push(b'\n');
    Ok(out)
}

#[derive(Debug, Clone)]
pub struct LeaderboardStore {
    path: PathBuf,
}

impl LeaderboardStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored leaderboard, or an empty one if the file does not
    /// exist yet.
    pub fn load(&self, distances: &TargetDistances) -> Result<Leaderboard, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No leaderboard at {}, starting fresh", self.path.display());
                return Ok(Leaderboard::new(distances));
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        decode(&bytes, distances).map_err(|source| StoreError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes to a sibling temp file first, then renames over the target.
    /// The temp file is removed again if any step fails.
    pub fn save(&self, leaderboard: &Leaderboard) -> Result<(), StoreError> {
        let bytes = encode(leaderboard)?;
        let tmp_path = self.tmp_path();

        let written = fs::File::create(&tmp_path)
            .and_then(|mut file| {
                file.write_all(&bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(&tmp_path, &self.path));

        if let Err(source) = written {
            fs::remove_file(&tmp_path).ok();
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }

        debug!("Saved leaderboard to {}", self.path.display());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
