//! Task saturation and behavioural adaptation, after Fuller's task-capability interface model.

use crate::parameters::types::{TC, TS, TS_CRIT};
use crate::parameters::{Claimant, ParameterType, Parameters};
use crate::Result;
use smallvec::SmallVec;

pub use adaptation::{
    AdaptationKind, HeadwayAdaptation, LaneChangeDesireAdaptation, SituationalAwarenessAdaptation,
    SpeedAdaptation,
};
pub use task::{car_following_demand, lane_change_demand};

mod adaptation;
mod task;

/// Computes the raw demand of tasks from what the driver perceives.
pub trait Perception {
    /// The current demand of the task with the given id, a non-negative number.
    fn task_demand(&self, task_id: &str, parameters: &Parameters) -> Result<f64>;
}

/// A task that requires the driver's attention.
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    id: String,
    demand: f64,
}

impl Task {
    /// Creates a new task without demand.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            demand: 0.0,
        }
    }

    /// The task's id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The demand computed in the last planning step.
    pub fn demand(&self) -> f64 {
        self.demand
    }
}

/// A strategy that changes parameters in response to the task saturation.
pub trait BehavioralAdaptation: Send {
    /// The identity recorded for the parameters this adaptation writes.
    fn claimant(&self) -> Claimant;

    /// Adapts the parameters to the current task saturation.
    fn adapt(&mut self, parameters: &mut Parameters) -> Result<()>;
}

static FULLER_PARAMETERS: [&ParameterType; 1] = [&TC];

/// The task saturation loop of a single driver.
pub struct Fuller {
    tasks: SmallVec<[Task; 4]>,
    adaptations: Vec<Box<dyn BehavioralAdaptation>>,
}

impl Fuller {
    /// Creates the loop. Adaptations are applied in the given order.
    pub fn new(
        tasks: impl IntoIterator<Item = Task>,
        adaptations: Vec<Box<dyn BehavioralAdaptation>>,
    ) -> Self {
        Self {
            tasks: tasks.into_iter().collect(),
            adaptations,
        }
    }

    /// The parameters this loop reads from its driver.
    pub fn default_parameters() -> &'static [&'static ParameterType] {
        &FULLER_PARAMETERS
    }

    /// The tasks, with the demand of the last step.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Updates the task demands and the task saturation, then runs every adaptation.
    pub fn apply<P: Perception + ?Sized>(
        &mut self,
        perception: &P,
        parameters: &mut Parameters,
    ) -> Result<()> {
        for task in &mut self.tasks {
            task.demand = f64::max(perception.task_demand(&task.id, parameters)?, 0.0);
        }
        let total_demand = self.tasks.iter().map(|task| task.demand).sum::<f64>();
        let ts = total_demand / parameters.get(&TC)?;
        parameters.set(&TS, ts, Claimant::FULLER)?;
        log::debug!("task demand {:.3}, saturation {:.3}", total_demand, ts);

        for adaptation in &mut self.adaptations {
            adaptation.adapt(parameters)?;
        }
        Ok(())
    }
}

/// The factor by which an adapted quantity grows at task saturation `ts`.
///
/// It is 1 up to `ts_crit` and increases linearly with slope `beta` above it.
pub fn saturation_factor(ts: f64, ts_crit: f64, beta: f64) -> f64 {
    if ts <= ts_crit {
        1.0
    } else {
        f64::max(0.0, 1.0 + beta * (ts - ts_crit))
    }
}

/// The [saturation_factor] for the driver's current task saturation,
/// using the given sensitivity parameter.
pub fn adaptation_factor(parameters: &Parameters, beta: &ParameterType) -> Result<f64> {
    let ts = parameters.get(&TS)?;
    let beta = parameters.get(beta)?;
    let ts_crit = parameters.get_or_default(&TS_CRIT)?;
    Ok(saturation_factor(ts, ts_crit, beta))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parameters::types::BETA_T;
    use crate::Error;
    use assert_approx_eq::assert_approx_eq;

    struct NoDemand;

    impl Perception for NoDemand {
        fn task_demand(&self, _task_id: &str, _parameters: &Parameters) -> Result<f64> {
            Ok(-0.5)
        }
    }

    #[test]
    fn factor_law() {
        assert_eq!(saturation_factor(0.3, 1.0, 2.0), 1.0);
        assert_eq!(saturation_factor(1.0, 1.0, 2.0), 1.0);
        assert_approx_eq!(saturation_factor(1.5, 1.0, 2.0), 2.0);
        assert_eq!(saturation_factor(1.5, 1.0, 0.0), 1.0);
    }

    #[test]
    fn requires_saturation_and_beta() {
        let mut params = Parameters::new();
        assert!(matches!(
            adaptation_factor(&params, &BETA_T),
            Err(Error::MissingParameter("TS"))
        ));
        params.set(&TS, 1.2, Claimant::FULLER).unwrap();
        assert!(matches!(
            adaptation_factor(&params, &BETA_T),
            Err(Error::MissingParameter("BETA_T"))
        ));
        params.set(&BETA_T, 1.0, Claimant::CONFIG).unwrap();
        assert_approx_eq!(adaptation_factor(&params, &BETA_T).unwrap(), 1.2);
    }

    #[test]
    fn negative_demand_is_clamped() {
        let mut fuller = Fuller::new([Task::new("a"), Task::new("b")], vec![]);
        let mut params = Parameters::new();
        params.set_defaults(Fuller::default_parameters()).unwrap();
        fuller.apply(&NoDemand, &mut params).unwrap();
        assert_eq!(fuller.tasks()[0].demand(), 0.0);
        assert_eq!(params.get(&TS).unwrap(), 0.0);
        assert_eq!(params.claimant(&TS), Some(Claimant::FULLER));
    }
}
