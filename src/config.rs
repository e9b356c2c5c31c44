//! Scenario and driver descriptions.

use crate::demand::{DemandPattern, Interpolation};
use crate::headway::HeadwayDistribution;
use crate::lane_change::{LateralDirection, Personality};
use crate::mental::AdaptationKind;
use crate::Result;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The description of a driver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct DriverConfig {
    /// How the driver weighs its follower in lane change decisions.
    pub personality: Personality,
    /// The side the driver keeps to.
    pub preferred: LateralDirection,
    /// The ids of the tasks that make up the driver's task demand.
    pub tasks: Vec<String>,
    /// The behavioural adaptations, in the order they are applied.
    pub adaptations: Vec<AdaptationKind>,
    /// Parameter values by id, overriding the defaults.
    pub parameters: BTreeMap<String, f64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            personality: Personality::Egoistic,
            preferred: LateralDirection::Right,
            tasks: vec![],
            adaptations: vec![],
            parameters: BTreeMap::new(),
        }
    }
}

/// A demand pattern with frequencies in veh/h.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct DemandConfig {
    /// Breakpoint times in s.
    pub times: Vec<f64>,
    /// Breakpoint frequencies in veh/h.
    pub frequencies: Vec<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interpolation: Interpolation,
}

impl DemandConfig {
    /// Creates the validated demand pattern.
    pub fn build(&self) -> Result<DemandPattern> {
        DemandPattern::from_per_hour(self.times.clone(), self.frequencies.clone(), self.interpolation)
    }
}

/// A location where vehicles are generated.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct SourceConfig {
    pub demand: DemandConfig,
    #[cfg_attr(feature = "serde", serde(default))]
    pub distribution: HeadwayDistribution,
    /// Seed of the source's random stream.
    pub seed: u64,
}

/// A complete scenario.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(deny_unknown_fields))]
pub struct ScenarioConfig {
    /// The simulated period in s.
    pub horizon: f64,
    /// The interval between planning steps in s.
    pub step: f64,
    pub sources: Vec<SourceConfig>,
    /// The description shared by all generated drivers.
    #[cfg_attr(feature = "serde", serde(default))]
    pub driver: DriverConfig,
}

#[cfg(feature = "serde")]
impl ScenarioConfig {
    /// Parses a scenario from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if !(config.step > 0.0) {
            return Err(crate::Error::Config(format!(
                "the planning step must be positive, not {}",
                config.step
            )));
        }
        Ok(config)
    }
}
