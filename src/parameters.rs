//! Per-vehicle parameter store with claim semantics.

use crate::{Error, Result};
use rustc_hash::FxHashMap;

pub mod types;

/// The identity of a component that writes into a [Parameters] store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Claimant(pub &'static str);

impl Claimant {
    /// Values installed from a parameter type's default.
    pub const DEFAULTS: Claimant = Claimant("defaults");
    /// Values supplied by a scenario or driver configuration.
    pub const CONFIG: Claimant = Claimant("config");
    /// The task saturation loop itself.
    pub const FULLER: Claimant = Claimant("fuller");
}

/// A constraint on the value of a single parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    /// Any finite value.
    None,
    /// Strictly greater than zero.
    Positive,
    /// Greater than or equal to zero.
    NonNegative,
    /// Within `[0, 1]`.
    Unit,
}

impl Constraint {
    /// Returns a description of the violation, if `value` breaks the constraint.
    fn check(&self, value: f64) -> Option<&'static str> {
        if !value.is_finite() {
            return Some("value must be finite");
        }
        match self {
            Constraint::None => None,
            Constraint::Positive if value <= 0.0 => Some("value must be positive"),
            Constraint::NonNegative if value < 0.0 => Some("value must not be negative"),
            Constraint::Unit if !(0.0..=1.0).contains(&value) => Some("value must be within [0, 1]"),
            _ => None,
        }
    }
}

/// An ordering between two parameters, checked whenever either is written.
#[derive(Copy, Clone, Debug)]
pub enum Relation {
    /// The value may not exceed the current value of the other parameter,
    /// or its default while it is not set.
    AtMost(&'static ParameterType),
    /// The value may not be less than the current value of the other parameter,
    /// or its default while it is not set.
    AtLeast(&'static ParameterType),
}

/// The identity and validation rules of a parameter.
#[derive(Debug)]
pub struct ParameterType {
    /// Unique identifier.
    pub id: &'static str,
    /// Human readable description, including the unit.
    pub description: &'static str,
    /// The value used when an optional parameter is absent.
    pub default: Option<f64>,
    /// Constraint on the value itself.
    pub constraint: Constraint,
    /// Constraint relative to another parameter.
    pub relation: Option<Relation>,
}

impl PartialEq for ParameterType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// A stored parameter value.
#[derive(Copy, Clone, Debug)]
struct Entry {
    value: f64,
    claimant: Claimant,
    /// The value and claimant before the last write, if there was one.
    previous: Option<(f64, Claimant)>,
}

/// The parameters of a single vehicle.
///
/// Each vehicle owns its store exclusively, so no synchronisation is needed.
/// Every write is validated, and records the [Claimant] that made it.
#[derive(Clone, Debug, Default)]
pub struct Parameters {
    entries: FxHashMap<&'static str, Entry>,
}

impl Parameters {
    /// Creates an empty parameter store.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets a parameter. When the value is rejected, the previous value is retained.
    pub fn set(&mut self, param: &'static ParameterType, value: f64, claimant: Claimant) -> Result<()> {
        self.validate(param, value)?;
        let previous = self.entries.get(param.id).map(|e| (e.value, e.claimant));
        self.entries.insert(
            param.id,
            Entry {
                value,
                claimant,
                previous,
            },
        );
        Ok(())
    }

    /// Gets a required parameter.
    pub fn get(&self, param: &ParameterType) -> Result<f64> {
        self.entries
            .get(param.id)
            .map(|e| e.value)
            .ok_or(Error::MissingParameter(param.id))
    }

    /// Gets an optional parameter, falling back to the default of its type.
    pub fn get_or_default(&self, param: &ParameterType) -> Result<f64> {
        match self.entries.get(param.id) {
            Some(entry) => Ok(entry.value),
            None => param.default.ok_or(Error::MissingParameter(param.id)),
        }
    }

    /// Whether the parameter has been set.
    pub fn contains(&self, param: &ParameterType) -> bool {
        self.entries.contains_key(param.id)
    }

    /// The component that last wrote the parameter.
    pub fn claimant(&self, param: &ParameterType) -> Option<Claimant> {
        self.entries.get(param.id).map(|e| e.claimant)
    }

    /// Installs the defaults of the given types, for those that are not set yet.
    pub fn set_defaults(&mut self, params: &[&'static ParameterType]) -> Result<()> {
        for param in params {
            if self.contains(param) {
                continue;
            }
            let value = param.default.ok_or(Error::MissingParameter(param.id))?;
            self.set(param, value, Claimant::DEFAULTS)?;
        }
        Ok(())
    }

    /// Restores the value from before the last write.
    /// A parameter that was only written once is removed, unless its default
    /// would break a relation.
    pub fn reset(&mut self, param: &'static ParameterType) -> Result<()> {
        let entry = *self
            .entries
            .get(param.id)
            .ok_or(Error::MissingParameter(param.id))?;
        match entry.previous {
            Some((value, claimant)) => {
                self.validate(param, value)?;
                self.entries.insert(
                    param.id,
                    Entry {
                        value,
                        claimant,
                        previous: None,
                    },
                );
            }
            None => {
                if let Some(default) = param.default {
                    self.validate(param, default)?;
                }
                self.entries.remove(param.id);
            }
        }
        Ok(())
    }

    /// Iterates over all set parameters as `(id, value, claimant)`, sorted by id.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64, Claimant)> + '_ {
        let mut ids = self.entries.keys().copied().collect::<Vec<_>>();
        ids.sort_unstable();
        ids.into_iter().map(move |id| {
            let entry = &self.entries[id];
            (id, entry.value, entry.claimant)
        })
    }

    /// Checks a would-be value against the type's constraint and relation.
    fn validate(&self, param: &ParameterType, value: f64) -> Result<()> {
        let violation = |reason: String| Error::ConstraintViolation {
            parameter: param.id,
            value,
            reason,
        };
        if let Some(reason) = param.constraint.check(value) {
            return Err(violation(reason.to_string()));
        }
        match param.relation {
            Some(Relation::AtMost(other)) => match self.effective(other) {
                Some(bound) if value > bound => Err(violation(format!(
                    "must not exceed `{}` ({})",
                    other.id, bound
                ))),
                _ => Ok(()),
            },
            Some(Relation::AtLeast(other)) => match self.effective(other) {
                Some(bound) if value < bound => Err(violation(format!(
                    "must not be less than `{}` ({})",
                    other.id, bound
                ))),
                _ => Ok(()),
            },
            None => Ok(()),
        }
    }

    /// The stored value, or else the default readers fall back to.
    fn effective(&self, param: &ParameterType) -> Option<f64> {
        self.entries.get(param.id).map(|e| e.value).or(param.default)
    }
}

#[cfg(test)]
mod test {
    use super::types::{TC, TMAX, TMIN, TS_CRIT, TS_MAX};
    use super::*;

    #[test]
    fn missing_parameter() {
        let params = Parameters::new();
        assert!(matches!(params.get(&TC), Err(Error::MissingParameter("TC"))));
        assert_eq!(params.get_or_default(&TC).unwrap(), 1.0);
    }

    #[test]
    fn rejected_write_keeps_value() {
        let mut params = Parameters::new();
        params.set(&TC, 1.5, Claimant::CONFIG).unwrap();
        let result = params.set(&TC, -1.0, Claimant::FULLER);
        assert!(matches!(
            result,
            Err(Error::ConstraintViolation { parameter: "TC", .. })
        ));
        assert_eq!(params.get(&TC).unwrap(), 1.5);
        assert_eq!(params.claimant(&TC), Some(Claimant::CONFIG));
        assert!(params.set(&TC, f64::NAN, Claimant::FULLER).is_err());
    }

    #[test]
    fn relations_are_checked_both_ways() {
        let mut params = Parameters::new();
        params.set(&TMIN, 1.0, Claimant::CONFIG).unwrap();
        assert!(params.set(&TMAX, 0.9, Claimant::CONFIG).is_err());
        params.set(&TMAX, 1.2, Claimant::CONFIG).unwrap();
        assert!(params.set(&TMIN, 1.3, Claimant::CONFIG).is_err());
        assert_eq!(params.get(&TMIN).unwrap(), 1.0);

        params.set(&TS_CRIT, 0.8, Claimant::CONFIG).unwrap();
        assert!(params.set(&TS_MAX, 0.7, Claimant::CONFIG).is_err());
    }

    #[test]
    fn defaults_and_reset() {
        let mut params = Parameters::new();
        params.set(&TS_CRIT, 0.9, Claimant::CONFIG).unwrap();
        params.set_defaults(&[&TS_CRIT, &TS_MAX]).unwrap();
        assert_eq!(params.get(&TS_CRIT).unwrap(), 0.9);
        assert_eq!(params.get(&TS_MAX).unwrap(), 2.0);
        assert_eq!(params.claimant(&TS_MAX), Some(Claimant::DEFAULTS));

        params.set(&TS_CRIT, 1.1, Claimant::FULLER).unwrap();
        params.reset(&TS_CRIT).unwrap();
        assert_eq!(params.get(&TS_CRIT).unwrap(), 0.9);
        assert_eq!(params.claimant(&TS_CRIT), Some(Claimant::CONFIG));
        params.reset(&TS_CRIT).unwrap();
        assert!(!params.contains(&TS_CRIT));

        let ids = params.iter().map(|(id, _, _)| id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["TS_MAX"]);
    }

    #[test]
    fn relations_use_defaults_of_unset_parameters() {
        let mut params = Parameters::new();
        let result = params.set(&TS_CRIT, 3.0, Claimant::CONFIG);
        assert!(matches!(
            result,
            Err(Error::ConstraintViolation { parameter: "TS_CRIT", .. })
        ));
        assert!(!params.contains(&TS_CRIT));
        assert!(params.set(&TS_MAX, 0.5, Claimant::CONFIG).is_err());
        assert!(params.set(&TMAX, 0.5, Claimant::CONFIG).is_err());

        // Raising the bound first makes room
        params.set(&TS_MAX, 4.0, Claimant::CONFIG).unwrap();
        params.set(&TS_CRIT, 3.0, Claimant::CONFIG).unwrap();

        // Removing TS_MAX would bring back its default of 2.0
        params.set(&TS_MAX, 3.5, Claimant::FULLER).unwrap();
        params.reset(&TS_MAX).unwrap();
        assert!(params.reset(&TS_MAX).is_err());
        assert_eq!(params.get(&TS_MAX).unwrap(), 4.0);
    }
}
