//! Generated track types.

use time::OffsetDateTime;

/// Mean earth radius used to turn meters into degrees.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratedPoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: Option<f64>,
    pub time: OffsetDateTime,
    /// Written as a Garmin TrackPointExtension speed when present.
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct GeneratedTrack {
    pub name: Option<String>,
    pub segments: Vec<Vec<GeneratedPoint>>,
}

impl GeneratedTrack {
    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }
}

/// Longitude offset in degrees for `meters` travelled east along `lat`.
pub fn meters_to_lon_degrees(meters: f64, lat: f64) -> f64 {
    (meters / (EARTH_RADIUS_M * lat.to_radians().cos())).to_degrees()
}
