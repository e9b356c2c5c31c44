use std::sync::Arc;
use std::time::Instant;

use traffic_behaviour::mental::{car_following_demand, lane_change_demand};
use traffic_behaviour::parameters::types::H_EXP;
use traffic_behaviour::{
    DriverId, Ego, Idm, Key, LaneTopology, LateralDirection, Neighbor, NeighborSet, Parameters,
    Perception, RouteIncentives, ScenarioConfig, Simulation, Situation,
};

/// How long each generated driver stays in the simulation in s.
const DRIVER_LIFETIME: f64 = 60.0;

/// Two lanes with fixed surroundings: a slower leader ahead and a faster
/// follower approaching in the left lane.
struct TwoLanes;

impl LaneTopology for TwoLanes {
    fn is_accessible(&self, direction: LateralDirection) -> bool {
        direction != LateralDirection::Right
    }

    fn neighbors(&self, direction: LateralDirection) -> NeighborSet {
        match direction {
            LateralDirection::None => NeighborSet {
                leader: Some(Neighbor {
                    id: DriverId::null(),
                    gap: 25.0,
                    speed: 18.0,
                }),
                follower: None,
            },
            LateralDirection::Left => NeighborSet {
                leader: None,
                follower: Some(Neighbor {
                    id: DriverId::null(),
                    gap: 40.0,
                    speed: 30.0,
                }),
            },
            LateralDirection::Right => NeighborSet::default(),
        }
    }
}

/// Task demand for trailing a leader at a fixed time headway.
struct Trailing {
    headway: f64,
}

impl Perception for Trailing {
    fn task_demand(&self, task_id: &str, parameters: &Parameters) -> traffic_behaviour::Result<f64> {
        Ok(match task_id {
            "car-following" => car_following_demand(Some(self.headway), parameters.get_or_default(&H_EXP)?),
            "lane-changing" => lane_change_demand(0.6, 0.0),
            _ => 0.0,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let json = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => include_str!("../demos/two_lanes.json").to_string(),
    };
    let scenario = ScenarioConfig::from_json(&json)?;

    let mut sim = Simulation::new();
    for source in &scenario.sources {
        sim.add_source(Arc::new(source.demand.build()?), source.distribution, source.seed);
    }

    println!("Simulating...");
    let start = Instant::now();
    let mut spawned = vec![];
    let mut lane_changes = 0;
    while sim.time() < scenario.horizon {
        for (_, time) in sim.step(scenario.step) {
            spawned.push((sim.add_driver(&scenario.driver)?, time));
        }
        let now = sim.time();
        spawned.retain(|(id, time)| {
            let alive = now - time < DRIVER_LIFETIME;
            if !alive {
                sim.remove_driver(*id);
            }
            alive
        });

        let situation = Situation {
            ego: Ego { speed: 22.0 },
            speed_limit: 27.8,
            topology: &TwoLanes,
            incentives: RouteIncentives::default(),
        };
        for (id, _) in &spawned {
            let outcome = sim.plan(*id, &Trailing { headway: 25.0 / 22.0 }, &situation, &Idm)?;
            if outcome.direction != LateralDirection::None {
                lane_changes += 1;
            }
        }
    }
    println!(
        "Simulated {:.0} s in {:?}: {} drivers active, {} lane change decisions",
        sim.time(),
        start.elapsed(),
        sim.iter_drivers().count(),
        lane_changes,
    );
    Ok(())
}
