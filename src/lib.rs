pub use car_following::{AccelerationPair, CarFollowingModel, Ego, Idm, Neighbor, NeighborSet};
pub use config::{DemandConfig, DriverConfig, ScenarioConfig, SourceConfig};
pub use demand::{DemandPattern, Interpolation};
pub use driver::Driver;
pub use error::{Error, Result};
pub use headway::{Clock, HeadwayDistribution, HeadwayGenerator};
pub use lane_change::{
    LaneChangeModel, LaneChangeOutcome, LaneTopology, LateralDirection, Personality,
    RouteIncentives, Situation,
};
pub use mental::{BehavioralAdaptation, Fuller, Perception, Task};
pub use parameters::{Claimant, ParameterType, Parameters};
pub use simulation::Simulation;
use slotmap::new_key_type;
pub use slotmap::{Key, KeyData};
pub use util::Interval;

mod car_following;
mod config;
mod demand;
mod driver;
mod error;
mod headway;
mod lane_change;
pub mod mental;
pub mod parameters;
mod simulation;
mod util;

new_key_type! {
    /// Unique ID of a [Driver].
    pub struct DriverId;
    /// Unique ID of a demand source in a [Simulation].
    pub struct SourceId;
}
