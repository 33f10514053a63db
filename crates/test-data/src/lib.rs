//! Synthetic GPS tracks for best-efforts tests.
//!
//! Tracks are generated procedurally with athlete profiles, optional pauses
//! (new segments) and GPS glitches, then written as GPX 1.1.
//!
//! ```rust,ignore
//! use test_data::prelude::*;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let track = ProceduralGenerator::new()
//!     .with_distance(10_000.0)
//!     .with_pauses(0.01, 30.0, 120.0)
//!     .generate("Evening Run", &RunnerProfile::default(), &mut rng);
//! write_gpx_file(dir.join("run.gpx"), &[track])?;
//! ```

pub mod gpx;
pub mod profiles;
pub mod sources;
pub mod track;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::gpx::{generate_gpx, write_gpx_file};
    pub use crate::profiles::{AthleteProfile, CyclistProfile, RunnerProfile, sample_variance};
    pub use crate::sources::{ProceduralGenerator, TrackConfig, constant_speed_track};
    pub use crate::track::{GeneratedPoint, GeneratedTrack};
}
