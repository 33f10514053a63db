//! Cyclist athletic profile.

use super::AthleteProfile;

/// Athletic profile for cycling activities.
///
/// Base speed ~28 km/h (7.8 m/s). Cyclists show more point-to-point speed
/// variation than runners.
#[derive(Debug, Clone)]
pub struct CyclistProfile {
    /// Base speed in m/s.
    base_speed: f64,
    /// Performance variance (coefficient of variation).
    variance: f64,
}

impl Default for CyclistProfile {
    fn default() -> Self {
        Self::with_speed(28.0)
    }
}

impl CyclistProfile {
    /// Creates a new cyclist profile with specified base speed.
    ///
    /// # Arguments
    /// * `speed_kmh` - Base speed in km/h
    pub fn with_speed(speed_kmh: f64) -> Self {
        Self {
            base_speed: speed_kmh / 3.6,
            variance: 0.10,
        }
    }
}

impl AthleteProfile for CyclistProfile {
    fn base_speed_mps(&self) -> f64 {
        self.base_speed
    }

    fn variance(&self) -> f64 {
        self.variance
    }

    fn pace_noise(&self) -> f64 {
        0.12
    }
}
