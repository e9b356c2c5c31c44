//! Lane change decisions, comparing the utility of staying with that of moving
//! to either adjacent lane.

use crate::car_following::{AccelerationPair, CarFollowingModel, Ego, NeighborSet};
use crate::parameters::types::{B_SAFE, LC_THRESHOLD, VOLUNTARY_DESIRE};
use crate::parameters::Parameters;
use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A lateral direction relative to the current lane.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LateralDirection {
    /// The current lane.
    #[default]
    None,
    Left,
    Right,
}

impl LateralDirection {
    /// The opposite direction.
    pub fn opposite(self) -> Self {
        match self {
            LateralDirection::None => LateralDirection::None,
            LateralDirection::Left => LateralDirection::Right,
            LateralDirection::Right => LateralDirection::Left,
        }
    }
}

/// How a driver weighs its own acceleration against that of its follower.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Personality {
    /// Only its own acceleration counts.
    #[default]
    Egoistic,
    /// Its own and its follower's accelerations count equally.
    Altruistic,
}

impl Personality {
    /// The utility of a lane with the given accelerations.
    pub fn utility(&self, pair: &AccelerationPair) -> f64 {
        match self {
            Personality::Egoistic => pair.ego,
            Personality::Altruistic => pair.ego + pair.follower,
        }
    }
}

/// The lanes around the ego vehicle.
pub trait LaneTopology {
    /// Whether the adjacent lane in the given direction can be entered.
    fn is_accessible(&self, direction: LateralDirection) -> bool;

    /// The neighbors in the lane in the given direction, with
    /// [LateralDirection::None] being the current lane.
    fn neighbors(&self, direction: LateralDirection) -> NeighborSet;
}

/// Route-driven willingness to be in either adjacent lane, in m/s<sup>2</sup>.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct RouteIncentives {
    pub preferred: f64,
    pub non_preferred: f64,
}

/// What the ego vehicle sees at the start of a planning step.
pub struct Situation<'a, T: ?Sized> {
    pub ego: Ego,
    /// The speed limit in m/s.
    pub speed_limit: f64,
    pub topology: &'a T,
    pub incentives: RouteIncentives,
}

/// The result of a lane change decision.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LaneChangeOutcome {
    /// The acceleration to apply in m/s<sup>2</sup>.
    pub acceleration: f64,
    /// The lane to move towards, if any.
    pub direction: LateralDirection,
}

/// An evaluated adjacent lane.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    pair: AccelerationPair,
    utility: f64,
}

/// Decides lane changes for one driver.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LaneChangeModel {
    personality: Personality,
    /// The side drivers keep to when there is no reason to overtake.
    preferred: LateralDirection,
}

impl LaneChangeModel {
    /// Creates a model with the given personality, keeping to the `preferred` side.
    pub fn new(personality: Personality, preferred: LateralDirection) -> Result<Self> {
        if preferred == LateralDirection::None {
            return Err(Error::Config(
                "the preferred side must be left or right".to_string(),
            ));
        }
        Ok(Self {
            personality,
            preferred,
        })
    }

    /// The model's personality.
    pub fn personality(&self) -> Personality {
        self.personality
    }

    /// The side drivers keep to.
    pub fn preferred(&self) -> LateralDirection {
        self.preferred
    }

    /// Decides whether to stay in the current lane or move to an adjacent one,
    /// and the acceleration that goes with it.
    ///
    /// A lane change is only made if its utility exceeds that of staying by the
    /// lane change threshold. Lanes where the new follower would have to brake
    /// harder than the maximum safe deceleration are not considered.
    pub fn decide<T, C>(
        &self,
        situation: &Situation<'_, T>,
        car_following: &C,
        parameters: &Parameters,
    ) -> Result<LaneChangeOutcome>
    where
        T: LaneTopology + ?Sized,
        C: CarFollowingModel + ?Sized,
    {
        let threshold = parameters.get_or_default(&LC_THRESHOLD)?;
        let b_safe = parameters.get_or_default(&B_SAFE)?;
        let desire = parameters.get_or_default(&VOLUNTARY_DESIRE)?;

        let neighbors = situation.topology.neighbors(LateralDirection::None);
        let straight = car_following.accelerate(&situation.ego, &neighbors, situation.speed_limit, parameters)?;
        let straight_gain = self.personality.utility(&straight);
        let straight_utility = straight_gain + threshold;

        let evaluate = |direction: LateralDirection, incentive: f64| -> Result<Option<Candidate>> {
            if !situation.topology.is_accessible(direction) {
                return Ok(None);
            }
            let neighbors = situation.topology.neighbors(direction);
            let pair = car_following.accelerate(&situation.ego, &neighbors, situation.speed_limit, parameters)?;
            if pair.follower < -b_safe {
                log::debug!(
                    "unsafe to move {:?}: follower {:?} would decelerate at {:.2}",
                    direction,
                    pair.follower_id,
                    pair.follower
                );
                return Ok(None);
            }
            let gain = self.personality.utility(&pair);
            Ok(Some(Candidate {
                pair,
                utility: straight_gain + desire * (gain - straight_gain) + incentive,
            }))
        };
        let preferred = evaluate(self.preferred, situation.incentives.preferred)?;
        let non_preferred = evaluate(self.preferred.opposite(), situation.incentives.non_preferred)?;

        let choice = choose(
            straight_utility,
            preferred.map(|c| c.utility),
            non_preferred.map(|c| c.utility),
        )?;
        let (pair, direction) = match choice {
            Choice::Stay => (straight, LateralDirection::None),
            Choice::Preferred => (chosen(preferred)?.pair, self.preferred),
            Choice::NonPreferred => (chosen(non_preferred)?.pair, self.preferred.opposite()),
        };
        log::debug!(
            "decided {:?} at {:.2} m/s^2 (stay {:.2}, preferred {:?}, non-preferred {:?})",
            direction,
            pair.ego,
            straight_utility,
            preferred.map(|c| c.utility),
            non_preferred.map(|c| c.utility),
        );
        Ok(LaneChangeOutcome {
            acceleration: pair.ego,
            direction,
        })
    }
}

/// The option chosen by [choose].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Choice {
    Stay,
    Preferred,
    NonPreferred,
}

/// Picks the option with the strictly largest utility, where a lane change
/// must also strictly beat staying. Ties stay.
fn choose(straight: f64, preferred: Option<f64>, non_preferred: Option<f64>) -> Result<Choice> {
    let all = [Some(straight), preferred, non_preferred];
    if all.iter().flatten().any(|u| u.is_nan()) {
        return Err(unreachable(format!(
            "lane change utilities cannot be compared: stay {}, preferred {:?}, non-preferred {:?}",
            straight, preferred, non_preferred
        )));
    }
    Ok(match (preferred, non_preferred) {
        (None, None) => Choice::Stay,
        (Some(p), None) if p > straight => Choice::Preferred,
        (None, Some(n)) if n > straight => Choice::NonPreferred,
        (Some(p), Some(n)) if p > n && p > straight => Choice::Preferred,
        (Some(p), Some(n)) if n > p && n > straight => Choice::NonPreferred,
        _ => Choice::Stay,
    })
}

/// The candidate of a chosen lane, which must have been evaluated.
fn chosen(candidate: Option<Candidate>) -> Result<Candidate> {
    candidate.ok_or_else(|| unreachable("chose a lane that was not available".to_string()))
}

fn unreachable(message: String) -> Error {
    log::warn!("{}", message);
    Error::UnreachableInvariant(message)
}
