//! Procedural track generation.
//!
//! Tracks run due east along the starting latitude, so distances between
//! points follow directly from the longitude step.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use time::{Duration, OffsetDateTime};

use crate::profiles::{self, AthleteProfile};
use crate::track::{GeneratedPoint, GeneratedTrack, meters_to_lon_degrees};

/// Configuration for procedural track generation.
#[derive(Debug, Clone)]
pub struct TrackConfig {
    /// Target distance in meters.
    pub distance_meters: f64,
    /// Starting point (lat, lon).
    pub start_point: (f64, f64),
    /// Time of the first point.
    pub start_time: OffsetDateTime,
    /// Seconds between recorded points.
    pub interval_seconds: i64,
    /// Probability of a recording pause after each point (0.0 - 1.0).
    /// A pause ends the current segment.
    pub pause_probability: f64,
    /// Duration range for pauses (min, max) in seconds.
    pub pause_duration_range: (f64, f64),
    /// Probability of a glitched point far off the route (0.0 - 1.0).
    pub glitch_probability: f64,
    /// Whether points carry a device speed.
    pub device_speed: bool,
}

impl Default for TrackConfig {
    fn default() -> Self {
        Self {
            distance_meters: 5000.0,
            start_point: (0.0, 0.0),
            start_time: OffsetDateTime::UNIX_EPOCH + Duration::days(19_000),
            interval_seconds: 1,
            pause_probability: 0.0,
            pause_duration_range: (30.0, 180.0),
            glitch_probability: 0.0,
            device_speed: false,
        }
    }
}

/// Generates synthetic GPS tracks with realistic characteristics.
#[derive(Debug, Clone, Default)]
pub struct ProceduralGenerator {
    config: TrackConfig,
}

impl ProceduralGenerator {
    /// Creates a new procedural generator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target distance.
    pub fn with_distance(mut self, meters: f64) -> Self {
        self.config.distance_meters = meters;
        self
    }

    /// Sets the recording interval.
    pub fn with_interval(mut self, seconds: i64) -> Self {
        self.config.interval_seconds = seconds.max(1);
        self
    }

    /// Sets pause parameters.
    pub fn with_pauses(mut self, probability: f64, min_sec: f64, max_sec: f64) -> Self {
        self.config.pause_probability = probability;
        self.config.pause_duration_range = (min_sec, max_sec);
        self
    }

    pub fn with_glitches(mut self, probability: f64) -> Self {
        self.config.glitch_probability = probability;
        self
    }

    pub fn with_device_speed(mut self, enabled: bool) -> Self {
        self.config.device_speed = enabled;
        self
    }

    /// Generates a track using the specified athletic profile.
    pub fn generate(
        &self,
        name: &str,
        profile: &dyn AthleteProfile,
        rng: &mut impl Rng,
    ) -> GeneratedTrack {
        let cfg = &self.config;
        let day_speed = profile.base_speed_mps() * profiles::sample_variance(profile, rng);
        let noise = Normal::new(1.0, profile.pace_noise()).ok();

        let (lat, start_lon) = cfg.start_point;
        let mut time = cfg.start_time;
        let mut travelled = 0.0;
        let mut segments = Vec::new();
        let mut segment = vec![point(lat, start_lon, time, cfg.device_speed.then_some(day_speed))];

        while travelled < cfg.distance_meters {
            let factor = noise
                .as_ref()
                .map_or(1.0, |n| n.sample(&mut *rng))
                .clamp(0.5, 1.5);
            let speed = day_speed * factor;
            travelled += speed * cfg.interval_seconds as f64;
            time += Duration::seconds(cfg.interval_seconds);

            let lon = start_lon + meters_to_lon_degrees(travelled, lat);
            segment.push(point(lat, lon, time, cfg.device_speed.then_some(speed)));

            if rng.gen_bool(cfg.glitch_probability.clamp(0.0, 1.0)) {
                // One bad fix half a degree north, then back on the route.
                time += Duration::seconds(cfg.interval_seconds);
                segment.push(point(lat + 0.5, lon, time, None));
            }

            if rng.gen_bool(cfg.pause_probability.clamp(0.0, 1.0)) {
                let (min, max) = cfg.pause_duration_range;
                let pause = if max > min { rng.gen_range(min..max) } else { min };
                time += Duration::seconds_f64(pause);
                segments.push(std::mem::take(&mut segment));
                segment.push(point(lat, lon, time, cfg.device_speed.then_some(0.0)));
            }
        }
        segments.push(segment);

        GeneratedTrack {
            name: Some(name.to_string()),
            segments,
        }
    }
}

/// A single-segment track at exactly `speed_mps`, one point every
/// `interval_seconds`, until `distance_meters` is covered.
pub fn constant_speed_track(
    name: &str,
    speed_mps: f64,
    distance_meters: f64,
    interval_seconds: i64,
) -> GeneratedTrack {
    let config = TrackConfig::default();
    let (lat, start_lon) = config.start_point;
    let step = speed_mps * interval_seconds as f64;
    let steps = (distance_meters / step).ceil() as i64;

    let points = (0..=steps)
        .map(|i| {
            let lon = start_lon + meters_to_lon_degrees(step * i as f64, lat);
            let time = config.start_time + Duration::seconds(i * interval_seconds);
            point(lat, lon, time, None)
        })
        .collect();

    GeneratedTrack {
        name: Some(name.to_string()),
        segments: vec![points],
    }
}

fn point(lat: f64, lon: f64, time: OffsetDateTime, speed: Option<f64>) -> GeneratedPoint {
    GeneratedPoint {
        lat,
        lon,
        elevation: None,
        time,
        speed,
    }
}
