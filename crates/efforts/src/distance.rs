//! Distance/time increments between adjacent track points.
//!
//! Device-reported speed is trusted over raw position when both points carry
//! it, since GPS position noise is larger than speed-sensor noise. Pairs that
//! imply physically implausible motion are rejected so they never reach a
//! sliding window.

use geo::{Distance as _, Haversine, Point};

use crate::{
    config::PlausibilityLimits,
    models::{Increment, TrackPoint},
};

/// Great-circle distance between two `(lat, lon)` pairs in meters.
pub trait Geodesic {
    fn distance_meters(&self, from: (f64, f64), to: (f64, f64)) -> f64;
}

/// Haversine distance on a spherical earth. Elevation is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle;

impl Geodesic for GreatCircle {
    fn distance_meters(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        Haversine.distance(Point::new(from.1, from.0), Point::new(to.1, to.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum Rejection {
    #[error("timestamps go backwards ({seconds:.0} s)")]
    TimeReversed { seconds: f64 },

    #[error("big distance between points: {distance_m:.0} m in {seconds:.0} s (distance using device speeds)")]
    DeviceSpeedDistance { distance_m: f64, seconds: f64 },

    #[error("big distance between points: {distance_m:.0} m in {seconds:.0} s (distance using gps points)")]
    PointDistance { distance_m: f64, seconds: f64 },

    #[error("unlikely speed: {} over {seconds:.0} s", format_kph(.speed_mps))]
    Speed { speed_mps: f64, seconds: f64 },
}

fn format_kph(speed_mps: &f64) -> String {
    if speed_mps.is_finite() {
        format!("{:.0} kph", speed_mps * 3.6)
    } else {
        "infinite".to_string()
    }
}

/// Turns adjacent point pairs into increments.
#[derive(Debug, Clone, Default)]
pub struct DistanceEstimator<G = GreatCircle> {
    geodesic: G,
    limits: PlausibilityLimits,
}

impl DistanceEstimator<GreatCircle> {
    pub fn new(limits: PlausibilityLimits) -> Self {
        Self::with_geodesic(GreatCircle, limits)
    }
}

impl<G: Geodesic> DistanceEstimator<G> {
    pub fn with_geodesic(geodesic: G, limits: PlausibilityLimits) -> Self {
        Self { geodesic, limits }
    }

    pub fn increment(
        &self,
        previous: &TrackPoint,
        current: &TrackPoint,
    ) -> Result<Increment, Rejection> {
        let seconds = (current.timestamp - previous.timestamp).as_seconds_f64();
        if seconds < 0.0 {
            return Err(Rejection::TimeReversed { seconds });
        }

        if let (Some(previous_speed), Some(current_speed)) = (previous.speed, current.speed) {
            let speed = (previous_speed + current_speed) / 2.0;
            let distance_m = speed * seconds;
            if distance_m > self.limits.device_speed_distance_m {
                return Err(Rejection::DeviceSpeedDistance {
                    distance_m,
                    seconds,
                });
            }
            return Ok(Increment {
                distance_meters: distance_m,
                time_seconds: seconds,
            });
        }

        let distance_m = self
            .geodesic
            .distance_meters((previous.lat, previous.lon), (current.lat, current.lon));
        if distance_m > self.limits.point_distance_m {
            return Err(Rejection::PointDistance {
                distance_m,
                seconds,
            });
        }

        let speed_mps = if seconds > 0.0 {
            distance_m / seconds
        } else if distance_m > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
        if speed_mps > self.limits.unlikely_speed_mps {
            return Err(Rejection::Speed { speed_mps, seconds });
        }

        Ok(Increment {
            distance_meters: distance_m,
            time_seconds: seconds,
        })
    }
}
