use crate::car_following::{CarFollowingModel, Idm};
use crate::config::DriverConfig;
use crate::lane_change::{LaneChangeModel, LaneChangeOutcome, LaneTopology, Situation};
use crate::mental::{Fuller, Perception, Task};
use crate::parameters::{types, Claimant, Parameters};
use crate::{DriverId, Error, Result};

/// A simulated driver.
pub struct Driver {
    /// The driver's ID.
    id: DriverId,
    /// The driver's parameters.
    parameters: Parameters,
    /// The task saturation loop.
    fuller: Fuller,
    /// The lane change model.
    lane_change: LaneChangeModel,
}

impl Driver {
    /// Creates a new driver.
    ///
    /// Configured parameter values take precedence over the defaults of the
    /// parameters the driver's components and the [Idm] read.
    pub fn new(id: DriverId, config: &DriverConfig) -> Result<Self> {
        let mut parameters = Parameters::new();
        let mut pending = config
            .parameters
            .iter()
            .map(|(param_id, value)| {
                types::by_id(param_id)
                    .map(|param| (param, *value))
                    .ok_or_else(|| Error::Config(format!("unknown parameter `{}`", param_id)))
            })
            .collect::<Result<Vec<_>>>()?;
        // Related parameters may only be accepted in a particular order
        while !pending.is_empty() {
            let before = pending.len();
            let mut rejected = None;
            pending.retain(|&(param, value)| match parameters.set(param, value, Claimant::CONFIG) {
                Ok(()) => false,
                Err(err) => {
                    rejected = Some(err);
                    true
                }
            });
            match rejected {
                Some(err) if pending.len() == before => return Err(err),
                _ => {}
            }
        }
        parameters.set_defaults(Fuller::default_parameters())?;
        for kind in &config.adaptations {
            parameters.set_defaults(kind.default_parameters())?;
        }
        parameters.set_defaults(Idm::default_parameters())?;

        let fuller = Fuller::new(
            config.tasks.iter().map(Task::new),
            config.adaptations.iter().map(|kind| kind.build()).collect(),
        );
        let lane_change = LaneChangeModel::new(config.personality, config.preferred)?;
        Ok(Self {
            id,
            parameters,
            fuller,
            lane_change,
        })
    }

    /// Gets the driver's ID.
    pub fn id(&self) -> DriverId {
        self.id
    }

    /// Gets the driver's parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Gets a mutable reference to the driver's parameters.
    pub fn parameters_mut(&mut self) -> &mut Parameters {
        &mut self.parameters
    }

    /// Gets the task saturation loop.
    pub fn fuller(&self) -> &Fuller {
        &self.fuller
    }

    /// Gets the lane change model.
    pub fn lane_change(&self) -> &LaneChangeModel {
        &self.lane_change
    }

    /// Runs one planning step: updates the task saturation and the adapted
    /// parameters, then decides on the acceleration and lane.
    pub fn plan<P, T, C>(
        &mut self,
        perception: &P,
        situation: &Situation<'_, T>,
        car_following: &C,
    ) -> Result<LaneChangeOutcome>
    where
        P: Perception + ?Sized,
        T: LaneTopology + ?Sized,
        C: CarFollowingModel + ?Sized,
    {
        self.fuller.apply(perception, &mut self.parameters)?;
        self.lane_change
            .decide(situation, car_following, &self.parameters)
    }
}
