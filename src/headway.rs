//! Generation of vehicle arrival headways from a demand pattern.

use crate::demand::DemandPattern;
use rand::Rng;
use std::sync::Arc;

pub use distribution::HeadwayDistribution;

mod distribution;

/// Slopes below this magnitude, in veh/s<sup>2</sup>, are treated as constant demand.
const NEGLIGIBLE_SLOPE: f64 = 1e-12;

/// A source of the current simulation time.
pub trait Clock {
    /// The current time in s.
    fn now(&self) -> f64;
}

/// A bare time value acts as a clock frozen at that time.
impl Clock for f64 {
    fn now(&self) -> f64 {
        *self
    }
}

/// Draws the headways between successive arrivals at one demand source.
///
/// Each draw takes a random factor with a mean of 1 and finds the time at which the
/// demand integrated from now reaches it. Slices without demand can therefore never
/// contain an arrival, while with constant demand `f` the mean headway is `1 / f`.
#[derive(Clone, Debug)]
pub struct HeadwayGenerator<R> {
    /// The demand pattern, shared with other generators.
    pattern: Arc<DemandPattern>,
    /// The distribution of the integrated demand between arrivals.
    distribution: HeadwayDistribution,
    /// The random stream, owned by this generator alone.
    rng: R,
    /// Whether no headway has been drawn yet.
    first: bool,
}

impl<R: Rng> HeadwayGenerator<R> {
    /// Creates a new headway generator.
    pub fn new(pattern: Arc<DemandPattern>, distribution: HeadwayDistribution, rng: R) -> Self {
        Self {
            pattern,
            distribution,
            rng,
            first: true,
        }
    }

    /// The demand pattern the headways are drawn from.
    pub fn pattern(&self) -> &DemandPattern {
        &self.pattern
    }

    /// Draws the time in s from now until the next arrival, or `None` if the
    /// demand pattern ends before another arrival.
    ///
    /// The first draw is scaled by a uniform factor, as the time of the previous
    /// arrival is unknown.
    pub fn draw(&mut self, clock: &impl Clock) -> Option<f64> {
        let t0 = clock.now();
        let mut rem = self.distribution.draw(&mut self.rng);
        if self.first {
            rem *= self.rng.gen::<f64>();
            self.first = false;
        }

        let mut t1 = t0;
        let mut t2 = self.pattern.next_slice_start(t1)?;
        loop {
            // Recomputed per slice to pick up steps exactly at the boundaries
            let f1 = self.pattern.frequency(t1, true);
            let f2 = self.pattern.frequency(t2, false);
            let dt = t2 - t1;
            let t = time_to_integral(rem, f1, (f2 - f1) / dt);
            log::trace!("slice [{}, {}): f = {} -> {}, remaining {}, needs {}", t1, t2, f1, f2, rem, t);
            if t <= dt {
                return Some(t1 + t - t0);
            }
            rem -= 0.5 * dt * (f1 + f2);
            if rem <= 0.0 {
                // The slice integrates to `rem` up to rounding
                return Some(t2 - t0);
            }
            t1 = t2;
            t2 = self.pattern.next_slice_start(t1)?;
        }
    }
}

/// The time needed for a demand starting at `f1` and changing by `slope` per s
/// to integrate to `rem`, or infinity if it never does.
fn time_to_integral(rem: f64, f1: f64, slope: f64) -> f64 {
    if slope.abs() < NEGLIGIBLE_SLOPE {
        if f1 > 0.0 {
            rem / f1
        } else {
            f64::INFINITY
        }
    } else {
        // Smallest positive root of rem = t f1 + t^2 slope / 2
        let discr = f1 * f1 + 2.0 * slope * rem;
        if discr < 0.0 {
            f64::INFINITY
        } else {
            f64::max((-f1 + discr.sqrt()) / slope, 0.0)
        }
    }
}
