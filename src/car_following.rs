//! Car-following models, evaluated for the ego vehicle and its follower.

use crate::parameters::types::{A, B, FSPEED, S0, TMAX};
use crate::parameters::{ParameterType, Parameters};
use crate::{DriverId, Result};

/// The maximum deceleration of all vehicles in m/s<sup>2</sup>.
const MAX_DECEL: f64 = -6.0; // m/s^2

/// The ego vehicle's own state.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ego {
    /// The velocity in m/s.
    pub speed: f64,
}

/// A vehicle near the ego vehicle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Neighbor {
    /// The neighbor's ID.
    pub id: DriverId,
    /// The net distance between the two vehicles in m.
    pub gap: f64,
    /// The neighbor's velocity in m/s.
    pub speed: f64,
}

/// The leader and follower the ego vehicle has, or would have, in one lane.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct NeighborSet {
    /// The vehicle ahead.
    pub leader: Option<Neighbor>,
    /// The vehicle behind.
    pub follower: Option<Neighbor>,
}

/// The accelerations of the ego vehicle and its follower in one lane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AccelerationPair {
    /// The acceleration of the ego vehicle in m/s<sup>2</sup>.
    pub ego: f64,
    /// The acceleration of the follower in m/s<sup>2</sup>, 0 without a follower.
    pub follower: f64,
    /// The follower's ID.
    pub follower_id: Option<DriverId>,
}

impl AccelerationPair {
    /// An acceleration pair without a follower.
    pub fn alone(ego: f64) -> Self {
        Self {
            ego,
            follower: 0.0,
            follower_id: None,
        }
    }
}

/// Computes accelerations for the ego vehicle in a lane with the given neighbors.
pub trait CarFollowingModel {
    /// The accelerations of the ego vehicle following the leader, and of
    /// the follower following the ego vehicle.
    fn accelerate(
        &self,
        ego: &Ego,
        neighbors: &NeighborSet,
        speed_limit: f64,
        parameters: &Parameters,
    ) -> Result<AccelerationPair>;
}

impl<F> CarFollowingModel for F
where
    F: Fn(&Ego, &NeighborSet, f64, &Parameters) -> Result<AccelerationPair>,
{
    fn accelerate(
        &self,
        ego: &Ego,
        neighbors: &NeighborSet,
        speed_limit: f64,
        parameters: &Parameters,
    ) -> Result<AccelerationPair> {
        self(ego, neighbors, speed_limit, parameters)
    }
}

/// The intelligent driver model.
///
/// The ego vehicle's parameters are also used to estimate the follower's reaction.
#[derive(Copy, Clone, Debug, Default)]
pub struct Idm;

static IDM_PARAMETERS: [&ParameterType; 4] = [&A, &B, &S0, &TMAX];

impl Idm {
    /// The parameters the model requires.
    pub fn default_parameters() -> &'static [&'static ParameterType] {
        &IDM_PARAMETERS
    }
}

/// The parameters of the intelligent driver model.
struct ModelParams {
    /// The desired gap between this and the vehicle ahead in seconds.
    time_headway: f64,
    /// The vehicle's maximum acceleration in m/s<sup>2</sup>.
    max_acceleration: f64,
    /// The comfortable decelleration in m/s<sup>2</sup>.
    comf_deceleration: f64,
    /// The gap that remains when stopped behind a vehicle in m.
    min_gap: f64,
    /// The desired velocity in m/s.
    desired_speed: f64,
}

impl ModelParams {
    fn from_parameters(parameters: &Parameters, speed_limit: f64) -> Result<Self> {
        Ok(Self {
            time_headway: parameters.get(&TMAX)?,
            max_acceleration: parameters.get(&A)?,
            comf_deceleration: parameters.get(&B)?,
            min_gap: parameters.get(&S0)?,
            desired_speed: parameters.get_or_default(&FSPEED)? * speed_limit,
        })
    }

    /// Computes an acceleration using the intelligent driver model.
    ///
    /// # Arguments
    /// * `my_vel` - The velocity of the simulated vehicle (m/s).
    /// * `leader` - The net distance to the vehicle ahead (m) and its velocity (m/s).
    fn idm(&self, my_vel: f64, leader: Option<(f64, f64)>) -> f64 {
        let max_acc = self.max_acceleration; // m.s^-2
        let free = 1. - (my_vel / self.desired_speed).powi(4);
        let interaction = match leader {
            Some((net_dist, _)) if net_dist <= 0.0 => return MAX_DECEL,
            Some((net_dist, their_vel)) => {
                let appr = my_vel - their_vel;
                let factor = 1. / (2. * (max_acc * self.comf_deceleration).sqrt());
                let ss = self.min_gap + f64::max(0.0, my_vel * self.time_headway + my_vel * appr * factor);
                let term = ss / net_dist;
                term * term
            }
            None => 0.0,
        };
        f64::max(max_acc * (free - interaction), MAX_DECEL)
    }
}

impl CarFollowingModel for Idm {
    fn accelerate(
        &self,
        ego: &Ego,
        neighbors: &NeighborSet,
        speed_limit: f64,
        parameters: &Parameters,
    ) -> Result<AccelerationPair> {
        let params = ModelParams::from_parameters(parameters, speed_limit)?;
        let ego_acc = params.idm(ego.speed, neighbors.leader.map(|l| (l.gap, l.speed)));
        Ok(match neighbors.follower {
            Some(follower) => AccelerationPair {
                ego: ego_acc,
                follower: params.idm(follower.speed, Some((follower.gap, ego.speed))),
                follower_id: Some(follower.id),
            },
            None => AccelerationPair::alone(ego_acc),
        })
    }
}
