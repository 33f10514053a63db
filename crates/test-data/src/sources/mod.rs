//! Track sources.
//!
//! - [`ProceduralGenerator`]: synthetic tracks driven by an athlete profile
//! - [`constant_speed_track`]: deterministic tracks with exact spacing

mod procedural;

pub use procedural::{ProceduralGenerator, TrackConfig, constant_speed_track};
