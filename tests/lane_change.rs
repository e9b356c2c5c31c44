//! Tests of lane change decisions against stubbed car-following results.

use traffic_behaviour::parameters::types::{B_SAFE, LC_THRESHOLD, VOLUNTARY_DESIRE};
use traffic_behaviour::{
    AccelerationPair, Claimant, DriverConfig, DriverId, Ego, Idm, KeyData, LaneChangeModel,
    LaneTopology, LateralDirection, Neighbor, NeighborSet, Parameters, Personality, Result,
    RouteIncentives, Simulation, Situation,
};

fn follower_id() -> DriverId {
    KeyData::from_ffi(7).into()
}

/// Adjacent lanes, each tagged with the accelerations a stubbed model reports for it.
struct Lanes {
    left: Option<AccelerationPair>,
    right: Option<AccelerationPair>,
}

/// The gap of the leader identifies the lane to the stubbed model.
fn tag(direction: LateralDirection) -> f64 {
    match direction {
        LateralDirection::None => 1.0,
        LateralDirection::Left => 2.0,
        LateralDirection::Right => 3.0,
    }
}

impl LaneTopology for Lanes {
    fn is_accessible(&self, direction: LateralDirection) -> bool {
        match direction {
            LateralDirection::None => true,
            LateralDirection::Left => self.left.is_some(),
            LateralDirection::Right => self.right.is_some(),
        }
    }

    fn neighbors(&self, direction: LateralDirection) -> NeighborSet {
        NeighborSet {
            leader: Some(Neighbor {
                id: follower_id(),
                gap: tag(direction),
                speed: 0.0,
            }),
            follower: None,
        }
    }
}

fn pair(ego: f64, follower: f64) -> AccelerationPair {
    AccelerationPair {
        ego,
        follower,
        follower_id: Some(follower_id()),
    }
}

/// Decides with `straight` in the current lane and the given adjacent lanes.
fn decide(
    personality: Personality,
    straight: AccelerationPair,
    lanes: &Lanes,
    parameters: &Parameters,
    incentives: RouteIncentives,
) -> Result<(LateralDirection, f64)> {
    let model = |_: &Ego, neighbors: &NeighborSet, _: f64, _: &Parameters| -> Result<AccelerationPair> {
        let gap = neighbors.leader.map(|l| l.gap).unwrap_or_default();
        Ok(if gap == tag(LateralDirection::Left) {
            lanes.left.unwrap_or(straight)
        } else if gap == tag(LateralDirection::Right) {
            lanes.right.unwrap_or(straight)
        } else {
            straight
        })
    };
    let situation = Situation {
        ego: Ego { speed: 20.0 },
        speed_limit: 30.0,
        topology: lanes,
        incentives,
    };
    let lc = LaneChangeModel::new(personality, LateralDirection::Right)?;
    let outcome = lc.decide(&situation, &model, parameters)?;
    Ok((outcome.direction, outcome.acceleration))
}

fn parameters(threshold: f64) -> Parameters {
    let mut params = Parameters::new();
    params.set(&LC_THRESHOLD, threshold, Claimant::CONFIG).unwrap();
    params
}

/// Test that a lane where the new follower must brake too hard is never chosen.
#[test]
fn safety_veto() {
    let mut params = parameters(0.1);
    params.set(&B_SAFE, 3.0, Claimant::CONFIG).unwrap();
    for gain in [0.5, 1.0, 2.0, 5.0, 50.0] {
        for preferred in [None, Some(pair(0.0, 0.0)), Some(pair(0.3, 0.0))] {
            let lanes = Lanes {
                left: Some(pair(gain, -5.0)),
                right: preferred,
            };
            for personality in [Personality::Egoistic, Personality::Altruistic] {
                let (direction, _) =
                    decide(personality, pair(0.0, 0.0), &lanes, &params, Default::default()).unwrap();
                assert_ne!(direction, LateralDirection::Left);
            }
        }
    }

    // A lenient safe deceleration accepts the same lane
    params.set(&B_SAFE, 6.0, Claimant::CONFIG).unwrap();
    let lanes = Lanes {
        left: Some(pair(1.0, -5.0)),
        right: None,
    };
    let (direction, acceleration) =
        decide(Personality::Egoistic, pair(0.0, 0.0), &lanes, &params, Default::default()).unwrap();
    assert_eq!(direction, LateralDirection::Left);
    assert_eq!(acceleration, 1.0);
}

/// Test that only an egoistic driver takes a lane that slows its follower down.
#[test]
fn egoistic_and_altruistic() {
    let params = parameters(0.0);
    let lanes = Lanes {
        left: Some(pair(1.0, -2.0)),
        right: None,
    };
    let straight = pair(0.0, 0.0);
    let (direction, acceleration) =
        decide(Personality::Egoistic, straight, &lanes, &params, Default::default()).unwrap();
    assert_eq!(direction, LateralDirection::Left);
    assert_eq!(acceleration, 1.0);

    let (direction, acceleration) =
        decide(Personality::Altruistic, straight, &lanes, &params, Default::default()).unwrap();
    assert_eq!(direction, LateralDirection::None);
    assert_eq!(acceleration, 0.0);
}

/// Test that inaccessible lanes are not considered, however attractive.
#[test]
fn no_adjacent_lanes() {
    let params = parameters(0.1);
    let lanes = Lanes {
        left: None,
        right: None,
    };
    let incentives = RouteIncentives {
        preferred: 10.0,
        non_preferred: 10.0,
    };
    let (direction, acceleration) =
        decide(Personality::Egoistic, pair(-1.0, 0.0), &lanes, &params, incentives).unwrap();
    assert_eq!(direction, LateralDirection::None);
    assert_eq!(acceleration, -1.0);
}

/// Test that the threshold must be strictly exceeded.
#[test]
fn threshold() {
    let params = parameters(0.5);
    let lanes = Lanes {
        left: None,
        right: Some(pair(0.5, 0.0)),
    };
    let (direction, _) =
        decide(Personality::Egoistic, pair(0.0, 0.0), &lanes, &params, Default::default()).unwrap();
    assert_eq!(direction, LateralDirection::None);

    let lanes = Lanes {
        left: None,
        right: Some(pair(0.51, 0.0)),
    };
    let (direction, acceleration) =
        decide(Personality::Egoistic, pair(0.0, 0.0), &lanes, &params, Default::default()).unwrap();
    assert_eq!(direction, LateralDirection::Right);
    assert_eq!(acceleration, 0.51);
}

/// Test that a low desire for voluntary lane changes suppresses speed-driven changes,
/// but not route-driven ones.
#[test]
fn voluntary_desire() {
    let mut params = parameters(0.3);
    params.set(&VOLUNTARY_DESIRE, 0.2, Claimant::CONFIG).unwrap();
    let lanes = Lanes {
        left: Some(pair(1.0, 0.0)),
        right: Some(pair(0.0, 0.0)),
    };
    let (direction, _) =
        decide(Personality::Egoistic, pair(0.0, 0.0), &lanes, &params, Default::default()).unwrap();
    assert_eq!(direction, LateralDirection::None);

    let incentives = RouteIncentives {
        preferred: 0.5,
        non_preferred: 0.0,
    };
    let (direction, acceleration) =
        decide(Personality::Egoistic, pair(0.0, 0.0), &lanes, &params, incentives).unwrap();
    assert_eq!(direction, LateralDirection::Right);
    assert_eq!(acceleration, 0.0);

    params.set(&VOLUNTARY_DESIRE, 1.0, Claimant::CONFIG).unwrap();
    let (direction, _) =
        decide(Personality::Egoistic, pair(0.0, 0.0), &lanes, &params, Default::default()).unwrap();
    assert_eq!(direction, LateralDirection::Left);
}

/// An empty road, apart from a slow leader in the current lane.
struct SlowLeader;

impl LaneTopology for SlowLeader {
    fn is_accessible(&self, direction: LateralDirection) -> bool {
        direction == LateralDirection::Left
    }

    fn neighbors(&self, direction: LateralDirection) -> NeighborSet {
        match direction {
            LateralDirection::None => NeighborSet {
                leader: Some(Neighbor {
                    id: follower_id(),
                    gap: 20.0,
                    speed: 10.0,
                }),
                follower: None,
            },
            _ => NeighborSet::default(),
        }
    }
}

/// Test a full planning step with the intelligent driver model.
#[test]
fn overtake_slow_leader() {
    let mut sim = Simulation::new();
    let id = sim.add_driver(&DriverConfig::default()).unwrap();
    let situation = Situation {
        ego: Ego { speed: 20.0 },
        speed_limit: 30.0,
        topology: &SlowLeader,
        incentives: RouteIncentives::default(),
    };
    let perception = |_: &str, _: &Parameters| -> Result<f64> { Ok(0.0) };
    let outcome = sim.plan(id, &Perceived(perception), &situation, &Idm).unwrap();
    assert_eq!(outcome.direction, LateralDirection::Left);
    assert!(outcome.acceleration > 0.0);

    sim.remove_driver(id);
    assert!(sim.plan(id, &Perceived(perception), &situation, &Idm).is_err());
}

/// Adapts a closure to a perception.
struct Perceived<F>(F);

impl<F: Fn(&str, &Parameters) -> Result<f64>> traffic_behaviour::Perception for Perceived<F> {
    fn task_demand(&self, task_id: &str, parameters: &Parameters) -> Result<f64> {
        (self.0)(task_id, parameters)
    }
}
