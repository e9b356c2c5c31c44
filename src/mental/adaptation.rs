//! The behavioural adaptations.

use super::{adaptation_factor, BehavioralAdaptation};
use crate::parameters::types::{
    BETA_LC, BETA_T, BETA_V0, FSPEED, SA, SA_MAX, SA_MIN, TMAX, TMIN, TR, TR_MAX, TS, TS_CRIT,
    TS_MAX, VOLUNTARY_DESIRE,
};
use crate::parameters::{Claimant, ParameterType, Parameters};
use crate::util::Interval;
use crate::{Error, Result};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The available behavioural adaptations.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdaptationKind {
    Headway,
    LaneChangeDesire,
    Speed,
    SituationalAwareness,
}

impl AdaptationKind {
    /// Creates a fresh adaptation of this kind, for a single driver.
    pub fn build(&self) -> Box<dyn BehavioralAdaptation> {
        match self {
            AdaptationKind::Headway => Box::new(HeadwayAdaptation::new()),
            AdaptationKind::LaneChangeDesire => Box::new(LaneChangeDesireAdaptation),
            AdaptationKind::Speed => Box::new(SpeedAdaptation::new()),
            AdaptationKind::SituationalAwareness => Box::new(SituationalAwarenessAdaptation),
        }
    }

    /// The parameters the adaptation reads, which must be set before it is first applied.
    pub fn default_parameters(&self) -> &'static [&'static ParameterType] {
        match self {
            AdaptationKind::Headway => &HEADWAY_PARAMETERS,
            AdaptationKind::LaneChangeDesire => &LANE_CHANGE_DESIRE_PARAMETERS,
            AdaptationKind::Speed => &SPEED_PARAMETERS,
            AdaptationKind::SituationalAwareness => &SITUATIONAL_AWARENESS_PARAMETERS,
        }
    }
}

static HEADWAY_PARAMETERS: [&ParameterType; 3] = [&BETA_T, &TMIN, &TMAX];
static LANE_CHANGE_DESIRE_PARAMETERS: [&ParameterType; 1] = [&BETA_LC];
static SPEED_PARAMETERS: [&ParameterType; 2] = [&BETA_V0, &FSPEED];
static SITUATIONAL_AWARENESS_PARAMETERS: [&ParameterType; 3] = [&SA_MIN, &SA_MAX, &TR_MAX];

/// Increases the minimum and maximum desired headway with task saturation.
#[derive(Clone, Debug, Default)]
pub struct HeadwayAdaptation {
    /// The unadapted headways, taken on the first adaptation.
    base: Option<Interval<f64>>,
}

impl HeadwayAdaptation {
    pub const CLAIMANT: Claimant = Claimant("headway_adaptation");

    /// Creates a new headway adaptation.
    pub fn new() -> Self {
        Default::default()
    }
}

impl BehavioralAdaptation for HeadwayAdaptation {
    fn claimant(&self) -> Claimant {
        Self::CLAIMANT
    }

    fn adapt(&mut self, parameters: &mut Parameters) -> Result<()> {
        let base = match self.base {
            Some(base) => base,
            None => *self
                .base
                .insert(Interval::new(parameters.get(&TMIN)?, parameters.get(&TMAX)?)),
        };
        let adapted = base * adaptation_factor(parameters, &BETA_T)?;
        debug_assert!(adapted.is_ordered(), "inverted headways {:?}", adapted);

        // Write in an order that never inverts the interval
        if adapted.max <= parameters.get(&TMIN)? {
            parameters.set(&TMIN, adapted.min, Self::CLAIMANT)?;
            parameters.set(&TMAX, adapted.max, Self::CLAIMANT)
        } else {
            parameters.set(&TMAX, adapted.max, Self::CLAIMANT)?;
            parameters.set(&TMIN, adapted.min, Self::CLAIMANT)
        }
    }
}

/// Reduces the desire for voluntary lane changes with task saturation.
#[derive(Copy, Clone, Debug, Default)]
pub struct LaneChangeDesireAdaptation;

impl LaneChangeDesireAdaptation {
    pub const CLAIMANT: Claimant = Claimant("lane_change_desire_adaptation");
}

impl BehavioralAdaptation for LaneChangeDesireAdaptation {
    fn claimant(&self) -> Claimant {
        Self::CLAIMANT
    }

    fn adapt(&mut self, parameters: &mut Parameters) -> Result<()> {
        let factor = adaptation_factor(parameters, &BETA_LC)?;
        parameters.set(&VOLUNTARY_DESIRE, 1.0 / factor, Self::CLAIMANT)
    }
}

/// Reduces the desired speed with task saturation.
#[derive(Clone, Debug, Default)]
pub struct SpeedAdaptation {
    /// The unadapted speed limit adherence factor, taken on the first adaptation.
    base: Option<f64>,
}

impl SpeedAdaptation {
    pub const CLAIMANT: Claimant = Claimant("speed_adaptation");

    /// Creates a new speed adaptation.
    pub fn new() -> Self {
        Default::default()
    }
}

impl BehavioralAdaptation for SpeedAdaptation {
    fn claimant(&self) -> Claimant {
        Self::CLAIMANT
    }

    fn adapt(&mut self, parameters: &mut Parameters) -> Result<()> {
        let base = match self.base {
            Some(base) => base,
            None => *self.base.insert(parameters.get_or_default(&FSPEED)?),
        };
        let factor = adaptation_factor(parameters, &BETA_V0)?;
        parameters.set(&FSPEED, base / factor, Self::CLAIMANT)
    }
}

/// Lowers situational awareness between the critical and maximum task
/// saturation, which lengthens the reaction time.
#[derive(Copy, Clone, Debug, Default)]
pub struct SituationalAwarenessAdaptation;

impl SituationalAwarenessAdaptation {
    pub const CLAIMANT: Claimant = Claimant("situational_awareness_adaptation");
}

impl BehavioralAdaptation for SituationalAwarenessAdaptation {
    fn claimant(&self) -> Claimant {
        Self::CLAIMANT
    }

    fn adapt(&mut self, parameters: &mut Parameters) -> Result<()> {
        let ts = parameters.get(&TS)?;
        let ts_crit = parameters.get_or_default(&TS_CRIT)?;
        let ts_max = parameters.get_or_default(&TS_MAX)?;
        if ts_max < ts_crit {
            return Err(Error::ConstraintViolation {
                parameter: TS_MAX.id,
                value: ts_max,
                reason: format!("must not be less than `{}` ({})", TS_CRIT.id, ts_crit),
            });
        }
        let sa_min = parameters.get_or_default(&SA_MIN)?;
        let sa_max = parameters.get_or_default(&SA_MAX)?;
        let sa = if ts <= ts_crit {
            sa_max
        } else if ts >= ts_max {
            sa_min
        } else {
            sa_max - (sa_max - sa_min) * (ts - ts_crit) / (ts_max - ts_crit)
        };
        parameters.set(&SA, sa, Self::CLAIMANT)?;
        let tr_max = parameters.get_or_default(&TR_MAX)?;
        parameters.set(&TR, (sa_max - sa) * tr_max, Self::CLAIMANT)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn saturated(ts: f64) -> Parameters {
        let mut params = Parameters::new();
        params.set(&TS, ts, Claimant::FULLER).unwrap();
        params
    }

    #[test]
    fn headway_adaptation_scales_base_headways() {
        let mut params = saturated(1.5);
        params.set_defaults(&HEADWAY_PARAMETERS).unwrap();
        let mut adaptation = HeadwayAdaptation::new();
        adaptation.adapt(&mut params).unwrap();
        assert_approx_eq!(params.get(&TMIN).unwrap(), 0.56 * 1.5);
        assert_approx_eq!(params.get(&TMAX).unwrap(), 1.2 * 1.5);
        assert_eq!(params.claimant(&TMAX), Some(HeadwayAdaptation::CLAIMANT));

        // Adapts relative to the snapshot, not the previously adapted values
        params.set(&TS, 0.5, Claimant::FULLER).unwrap();
        adaptation.adapt(&mut params).unwrap();
        assert_approx_eq!(params.get(&TMIN).unwrap(), 0.56);
        assert_approx_eq!(params.get(&TMAX).unwrap(), 1.2);
    }

    #[test]
    fn headways_shrink_past_current_minimum() {
        // With TMAX 1.1, the doubled TMIN 1.2 exceeds the base TMAX
        let mut params = saturated(2.0);
        params.set(&TMIN, 0.6, Claimant::CONFIG).unwrap();
        params.set(&TMAX, 1.1, Claimant::CONFIG).unwrap();
        params.set(&BETA_T, 1.0, Claimant::CONFIG).unwrap();
        let mut adaptation = HeadwayAdaptation::new();
        adaptation.adapt(&mut params).unwrap();
        assert_approx_eq!(params.get(&TMIN).unwrap(), 1.2);
        assert_approx_eq!(params.get(&TMAX).unwrap(), 2.2);

        params.set(&TS, 0.0, Claimant::FULLER).unwrap();
        adaptation.adapt(&mut params).unwrap();
        assert_approx_eq!(params.get(&TMIN).unwrap(), 0.6);
        assert_approx_eq!(params.get(&TMAX).unwrap(), 1.1);
    }

    #[test]
    fn lane_change_desire_is_reduced() {
        let mut params = saturated(1.5);
        params.set(&BETA_LC, 2.0, Claimant::CONFIG).unwrap();
        LaneChangeDesireAdaptation.adapt(&mut params).unwrap();
        assert_approx_eq!(params.get(&VOLUNTARY_DESIRE).unwrap(), 0.5);

        params.set(&TS, 0.9, Claimant::FULLER).unwrap();
        LaneChangeDesireAdaptation.adapt(&mut params).unwrap();
        assert_eq!(params.get(&VOLUNTARY_DESIRE).unwrap(), 1.0);
    }

    #[test]
    fn speed_is_reduced() {
        let mut params = saturated(1.25);
        params.set(&FSPEED, 1.1, Claimant::CONFIG).unwrap();
        params.set(&BETA_V0, 4.0, Claimant::CONFIG).unwrap();
        let mut adaptation = SpeedAdaptation::new();
        adaptation.adapt(&mut params).unwrap();
        assert_approx_eq!(params.get(&FSPEED).unwrap(), 0.55);
        adaptation.adapt(&mut params).unwrap();
        assert_approx_eq!(params.get(&FSPEED).unwrap(), 0.55);
    }

    #[test]
    fn situational_awareness() {
        let cases = [(0.5, 1.0, 0.0), (1.5, 0.75, 0.5), (2.0, 0.5, 1.0), (3.0, 0.5, 1.0)];
        for (ts, sa, tr) in cases {
            let mut params = saturated(ts);
            SituationalAwarenessAdaptation.adapt(&mut params).unwrap();
            assert_approx_eq!(params.get(&SA).unwrap(), sa);
            assert_approx_eq!(params.get(&TR).unwrap(), tr);
        }
    }
}
