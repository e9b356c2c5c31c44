//! Time-varying arrival frequencies.

use crate::{Error, Result};
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How the frequency varies between two breakpoints.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Interpolation {
    /// The frequency of a breakpoint holds until the next breakpoint.
    /// The frequency of the last breakpoint is never used.
    #[default]
    Stepwise,
    /// The frequency varies linearly between breakpoints.
    Linear,
}

/// An arrival frequency curve defined by breakpoints.
///
/// Outside the first and last breakpoint the frequency is zero.
/// Two breakpoints may share a time to encode a jump in a linear pattern.
/// The pattern is immutable, and is typically shared between generators with an `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct DemandPattern {
    /// Breakpoint times in s, non-decreasing.
    times: Vec<f64>,
    /// Breakpoint frequencies in veh/s.
    frequencies: Vec<f64>,
    /// The interpolation between breakpoints.
    interpolation: Interpolation,
}

impl DemandPattern {
    /// Creates a demand pattern from breakpoint times (s) and frequencies (veh/s).
    pub fn new(times: Vec<f64>, frequencies: Vec<f64>, interpolation: Interpolation) -> Result<Self> {
        if times.len() != frequencies.len() {
            return Err(Error::InvalidDemand(format!(
                "{} times but {} frequencies",
                times.len(),
                frequencies.len()
            )));
        }
        if times.len() < 2 {
            return Err(Error::InvalidDemand(
                "at least two breakpoints are required".to_string(),
            ));
        }
        if let Some(t) = times.iter().find(|t| !t.is_finite()) {
            return Err(Error::InvalidDemand(format!("time {} is not finite", t)));
        }
        if let Some(f) = frequencies.iter().find(|f| !f.is_finite() || **f < 0.0) {
            return Err(Error::InvalidDemand(format!(
                "frequency {} is not a finite, non-negative number",
                f
            )));
        }
        if let Some((a, b)) = times.iter().tuple_windows().find(|(a, b)| b < a) {
            return Err(Error::InvalidDemand(format!(
                "times are not increasing ({} before {})",
                a, b
            )));
        }
        if let Some((a, _, _)) = times.iter().tuple_windows().find(|(a, b, c)| a == b && b == c) {
            return Err(Error::InvalidDemand(format!(
                "more than two breakpoints at time {}",
                a
            )));
        }
        if times[0] == times[times.len() - 1] {
            return Err(Error::InvalidDemand("the pattern has no duration".to_string()));
        }
        Ok(Self {
            times,
            frequencies,
            interpolation,
        })
    }

    /// Creates a demand pattern from breakpoint times (s) and frequencies in veh/h.
    pub fn from_per_hour(
        times: Vec<f64>,
        frequencies: Vec<f64>,
        interpolation: Interpolation,
    ) -> Result<Self> {
        let frequencies = frequencies.into_iter().map(|f| f / 3600.0).collect();
        Self::new(times, frequencies, interpolation)
    }

    /// Combines independent demand patterns into the pattern of their total demand.
    pub fn superpose(patterns: &[&DemandPattern]) -> Result<Self> {
        let interpolation = match patterns.iter().map(|p| p.interpolation).dedup().exactly_one() {
            Ok(interpolation) => interpolation,
            Err(_) => {
                return Err(Error::InvalidDemand(
                    "can only superpose patterns with one common interpolation".to_string(),
                ))
            }
        };
        let total = |t: f64, slice_start: bool| -> f64 {
            patterns.iter().map(|p| p.frequency(t, slice_start)).sum()
        };
        let union = patterns
            .iter()
            .flat_map(|p| p.times.iter().copied())
            .sorted_by(f64::total_cmp)
            .dedup()
            .collect::<Vec<_>>();

        let mut times = Vec::with_capacity(union.len());
        let mut frequencies = Vec::with_capacity(union.len());
        match interpolation {
            Interpolation::Stepwise => {
                for &t in &union {
                    times.push(t);
                    frequencies.push(total(t, true));
                }
            }
            Interpolation::Linear => {
                for (idx, &t) in union.iter().enumerate() {
                    let (before, after) = (total(t, false), total(t, true));
                    if idx > 0 && idx + 1 < union.len() && before != after {
                        times.push(t);
                        frequencies.push(before);
                    }
                    times.push(t);
                    frequencies.push(if idx + 1 < union.len() { after } else { before });
                }
            }
        }
        Self::new(times, frequencies, interpolation)
    }

    /// The interpolation between breakpoints.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// The breakpoint times in s.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// The arrival frequency in veh/s at the given time.
    ///
    /// Exactly at a breakpoint, `slice_start` selects the frequency just after
    /// the breakpoint (`true`) or just before it (`false`).
    pub fn frequency(&self, time: f64, slice_start: bool) -> f64 {
        let n = self.times.len();
        let idx = if slice_start {
            // Slice [t_i, t_i+1) with t_i <= time < t_i+1
            match self.times.partition_point(|t| *t <= time) {
                0 => return 0.0,
                i if i == n => return 0.0,
                i => i - 1,
            }
        } else {
            // Slice (t_i, t_i+1] with t_i < time <= t_i+1
            match self.times.partition_point(|t| *t < time) {
                0 => return 0.0,
                i if i == n => return 0.0,
                i => i - 1,
            }
        };
        self.interpolate(idx, time)
    }

    /// The first breakpoint time strictly after `time`, if there is one.
    pub fn next_slice_start(&self, time: f64) -> Option<f64> {
        let idx = self.times.partition_point(|t| *t <= time);
        self.times.get(idx).copied()
    }

    /// Evaluates slice `idx`, spanning breakpoints `idx` and `idx + 1`, at `time`.
    fn interpolate(&self, idx: usize, time: f64) -> f64 {
        let f0 = self.frequencies[idx];
        match self.interpolation {
            Interpolation::Stepwise => f0,
            Interpolation::Linear => {
                let (t0, t1) = (self.times[idx], self.times[idx + 1]);
                let f1 = self.frequencies[idx + 1];
                f0 + (time - t0) / (t1 - t0) * (f1 - f0)
            }
        }
    }
}
