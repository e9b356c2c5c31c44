//! Miscellaneous utility structs and functions.

use std::fmt::Debug;

/// An interval on the real number line.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd> Interval<T> {
    /// Returns true if the bounds are ordered, i.e. `min <= max`.
    pub fn is_ordered(&self) -> bool {
        self.min <= self.max
    }
}

impl<T: std::ops::Mul<T, Output = T> + Copy> std::ops::Mul<T> for Interval<T> {
    type Output = Interval<T>;

    /// Scales both bounds by `rhs`.
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            min: self.min * rhs,
            max: self.max * rhs,
        }
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

#[cfg(test)]
mod test {
    use super::Interval;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn scaled_interval() {
        let headways: Interval<f64> = Interval::new(0.56, 1.2) * 1.5;
        assert_approx_eq!(headways.min, 0.84);
        assert_approx_eq!(headways.max, 1.8);
        assert!(headways.is_ordered());
        assert!(!Interval::new(1.2, 0.56).is_ordered());
    }
}
