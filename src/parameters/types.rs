//! The standard parameter types.

use super::{Constraint, ParameterType, Relation};

/// Task capability.
pub static TC: ParameterType = ParameterType {
    id: "TC",
    description: "Task capability (-)",
    default: Some(1.0),
    constraint: Constraint::Positive,
    relation: None,
};

/// Task saturation, written by the task saturation loop.
pub static TS: ParameterType = ParameterType {
    id: "TS",
    description: "Task saturation (-)",
    default: None,
    constraint: Constraint::NonNegative,
    relation: None,
};

/// Task saturation above which behavioural adaptation starts.
pub static TS_CRIT: ParameterType = ParameterType {
    id: "TS_CRIT",
    description: "Critical task saturation (-)",
    default: Some(1.0),
    constraint: Constraint::NonNegative,
    relation: Some(Relation::AtMost(&TS_MAX)),
};

/// Task saturation at which situational awareness is minimal.
pub static TS_MAX: ParameterType = ParameterType {
    id: "TS_MAX",
    description: "Maximum task saturation (-)",
    default: Some(2.0),
    constraint: Constraint::NonNegative,
    relation: Some(Relation::AtLeast(&TS_CRIT)),
};

/// Minimum desired time headway.
pub static TMIN: ParameterType = ParameterType {
    id: "TMIN",
    description: "Minimum desired time headway (s)",
    default: Some(0.56),
    constraint: Constraint::Positive,
    relation: Some(Relation::AtMost(&TMAX)),
};

/// Maximum desired time headway.
pub static TMAX: ParameterType = ParameterType {
    id: "TMAX",
    description: "Maximum desired time headway (s)",
    default: Some(1.2),
    constraint: Constraint::Positive,
    relation: Some(Relation::AtLeast(&TMIN)),
};

/// Sensitivity of the desired headway to task saturation.
pub static BETA_T: ParameterType = ParameterType {
    id: "BETA_T",
    description: "Headway adaptation sensitivity (-)",
    default: Some(1.0),
    constraint: Constraint::NonNegative,
    relation: None,
};

/// Sensitivity of the voluntary lane change desire to task saturation.
pub static BETA_LC: ParameterType = ParameterType {
    id: "BETA_LC",
    description: "Lane change desire adaptation sensitivity (-)",
    default: Some(1.0),
    constraint: Constraint::NonNegative,
    relation: None,
};

/// Sensitivity of the desired speed to task saturation.
pub static BETA_V0: ParameterType = ParameterType {
    id: "BETA_V0",
    description: "Speed adaptation sensitivity (-)",
    default: Some(1.0),
    constraint: Constraint::NonNegative,
    relation: None,
};

/// Scaling of the voluntary (speed gain) part of lane change utilities.
pub static VOLUNTARY_DESIRE: ParameterType = ParameterType {
    id: "VOLUNTARY_DESIRE",
    description: "Voluntary lane change desire factor (-)",
    default: Some(1.0),
    constraint: Constraint::Unit,
    relation: None,
};

/// Desired speed as a factor of the speed limit.
pub static FSPEED: ParameterType = ParameterType {
    id: "FSPEED",
    description: "Speed limit adherence factor (-)",
    default: Some(1.0),
    constraint: Constraint::Positive,
    relation: None,
};

/// Situational awareness.
pub static SA: ParameterType = ParameterType {
    id: "SA",
    description: "Situational awareness (-)",
    default: Some(1.0),
    constraint: Constraint::Unit,
    relation: None,
};

/// Situational awareness at maximum task saturation.
pub static SA_MIN: ParameterType = ParameterType {
    id: "SA_MIN",
    description: "Minimum situational awareness (-)",
    default: Some(0.5),
    constraint: Constraint::Unit,
    relation: Some(Relation::AtMost(&SA_MAX)),
};

/// Situational awareness below critical task saturation.
pub static SA_MAX: ParameterType = ParameterType {
    id: "SA_MAX",
    description: "Maximum situational awareness (-)",
    default: Some(1.0),
    constraint: Constraint::Unit,
    relation: Some(Relation::AtLeast(&SA_MIN)),
};

/// Reaction time.
pub static TR: ParameterType = ParameterType {
    id: "TR",
    description: "Reaction time (s)",
    default: Some(0.0),
    constraint: Constraint::NonNegative,
    relation: None,
};

/// Reaction time at zero situational awareness.
pub static TR_MAX: ParameterType = ParameterType {
    id: "TR_MAX",
    description: "Maximum reaction time (s)",
    default: Some(2.0),
    constraint: Constraint::NonNegative,
    relation: None,
};

/// Maximum acceleration.
pub static A: ParameterType = ParameterType {
    id: "A",
    description: "Maximum acceleration (m/s^2)",
    default: Some(1.25),
    constraint: Constraint::Positive,
    relation: None,
};

/// Comfortable deceleration.
pub static B: ParameterType = ParameterType {
    id: "B",
    description: "Comfortable deceleration (m/s^2)",
    default: Some(2.09),
    constraint: Constraint::Positive,
    relation: None,
};

/// Stopping distance.
pub static S0: ParameterType = ParameterType {
    id: "S0",
    description: "Stopping distance (m)",
    default: Some(3.0),
    constraint: Constraint::Positive,
    relation: None,
};

/// Utility bonus for staying in the current lane.
pub static LC_THRESHOLD: ParameterType = ParameterType {
    id: "LC_THRESHOLD",
    description: "Lane change threshold (m/s^2)",
    default: Some(0.1),
    constraint: Constraint::None,
    relation: None,
};

/// Deceleration a new follower may be forced into by a lane change.
pub static B_SAFE: ParameterType = ParameterType {
    id: "B_SAFE",
    description: "Maximum safe deceleration (m/s^2)",
    default: Some(4.0),
    constraint: Constraint::Positive,
    relation: None,
};

/// Headway scale of the car-following task demand.
pub static H_EXP: ParameterType = ParameterType {
    id: "H_EXP",
    description: "Car-following task demand headway scale (s)",
    default: Some(4.0),
    constraint: Constraint::Positive,
    relation: None,
};

/// All standard parameter types.
pub static ALL: [&ParameterType; 22] = [
    &TC,
    &TS,
    &TS_CRIT,
    &TS_MAX,
    &TMIN,
    &TMAX,
    &BETA_T,
    &BETA_LC,
    &BETA_V0,
    &VOLUNTARY_DESIRE,
    &FSPEED,
    &SA,
    &SA_MIN,
    &SA_MAX,
    &TR,
    &TR_MAX,
    &A,
    &B,
    &S0,
    &LC_THRESHOLD,
    &B_SAFE,
    &H_EXP,
];

/// Looks up a standard parameter type by its id.
pub fn by_id(id: &str) -> Option<&'static ParameterType> {
    ALL.iter().copied().find(|param| param.id == id)
}
