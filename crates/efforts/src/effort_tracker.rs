//! Sliding-window search for the fastest time over each target distance.

use std::collections::VecDeque;

use tracing::warn;

use crate::{
    distance::{DistanceEstimator, Geodesic},
    models::{Increment, ParsedTrack, TargetDistances, TrackAnalysis, TrackBestEffort, TrackPoint},
};

pub trait TrackMetric {
    type Score;
    fn next_point(&mut self, point: &TrackPoint);
    /// Called between segments. The next point has no predecessor.
    fn end_segment(&mut self) {}
    fn finish(self) -> Self::Score;
}

/// Scans every segment of `track` with a fresh tracker.
pub fn score_track<G: Geodesic>(
    track: &ParsedTrack,
    distances: &TargetDistances,
    estimator: &DistanceEstimator<G>,
) -> TrackAnalysis {
    let mut tracker = BestEffortTracker::new(distances, estimator);

    for segment in &track.segments {
        for point in segment {
            tracker.next_point(point);
        }
        tracker.end_segment();
    }

    tracker.finish()
}

/// Running window for one target distance.
#[derive(Debug, Clone)]
struct WindowState {
    target: u32,
    distance: f64,
    time: f64,
    queue: VecDeque<Increment>,
}

impl WindowState {
    fn new(target: u32) -> Self {
        Self {
            target,
            distance: 0.0,
            time: 0.0,
            queue: VecDeque::new(),
        }
    }

    /// Adds `increment` and reports the time of every window that reaches
    /// the target, shrinking from the front until it no longer does.
    fn push(&mut self, increment: Increment, best: &mut TrackBestEffort) {
        self.distance += increment.distance_meters;
        self.time += increment.time_seconds;
        self.queue.push_back(increment);

        let target = f64::from(self.target);
        while self.distance >= target {
            best.record(self.target, self.time);

            let Some(oldest) = self.queue.pop_front() else {
                break;
            };
            if self.queue.is_empty() {
                self.distance = 0.0;
                self.time = 0.0;
            } else {
                self.distance -= oldest.distance_meters;
                self.time -= oldest.time_seconds;
            }
        }
    }
}

/// Tracks all target distances at once over one track.
///
/// Windows stay open across segment boundaries, but the gap itself is never
/// turned into an increment.
pub struct BestEffortTracker<'a, G> {
    estimator: &'a DistanceEstimator<G>,
    windows: Vec<WindowState>,
    best: TrackBestEffort,
    last_point: Option<TrackPoint>,
    points_considered: usize,
    increments_rejected: usize,
}

impl<'a, G: Geodesic> BestEffortTracker<'a, G> {
    pub fn new(distances: &TargetDistances, estimator: &'a DistanceEstimator<G>) -> Self {
        Self {
            estimator,
            windows: distances.iter().map(WindowState::new).collect(),
            best: TrackBestEffort::default(),
            last_point: None,
            points_considered: 0,
            increments_rejected: 0,
        }
    }

    fn accept_pair(&mut self, previous: &TrackPoint, current: &TrackPoint) {
        self.points_considered += 1;

        let increment = match self.estimator.increment(previous, current) {
            Ok(increment) => increment,
            Err(rejection) => {
                self.increments_rejected += 1;
                warn!("{rejection}, skipping point");
                return;
            }
        };

        for window in &mut self.windows {
            window.push(increment, &mut self.best);
        }
    }
}

impl<G: Geodesic> TrackMetric for BestEffortTracker<'_, G> {
    type Score = TrackAnalysis;

    fn next_point(&mut self, point: &TrackPoint) {
        if let Some(previous) = self.last_point {
            self.accept_pair(&previous, point);
        }
        self.last_point = Some(*point);
    }

    fn end_segment(&mut self) {
        self.last_point = None;
    }

    fn finish(self) -> TrackAnalysis {
        TrackAnalysis {
            best: self.best,
            points_considered: self.points_considered,
            increments_rejected: self.increments_rejected,
        }
    }
}
