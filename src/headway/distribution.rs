use rand::distributions::Open01;
use rand::Rng;
use rand_distr::StandardNormal;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mode of the triangular flank of [HeadwayDistribution::TriExp].
const TRI_EXP_MODE: f64 = 0.5;

/// Random factors applied to the integrated demand, each with a mean of 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HeadwayDistribution {
    /// Always 1, giving evenly spaced arrivals.
    Constant,
    /// Exponential, giving Poisson arrivals.
    #[default]
    Exponential,
    /// Uniform on `[0, 2]`.
    Uniform,
    /// Triangular on `[0, 2]` with a mode of 1.
    Triangular,
    /// A triangular left flank joined to an exponential right flank.
    TriExp,
    /// Log-normal with a variance of 1.
    LogNormal,
}

impl HeadwayDistribution {
    /// Draws a random factor.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match self {
            HeadwayDistribution::Constant => 1.0,
            HeadwayDistribution::Exponential => {
                let u: f64 = rng.sample(Open01);
                -u.ln()
            }
            HeadwayDistribution::Uniform => rng.gen_range(0.0..2.0),
            HeadwayDistribution::Triangular => {
                let u: f64 = rng.gen();
                if u < 0.5 {
                    (2.0 * u).sqrt()
                } else {
                    2.0 - (2.0 * (1.0 - u)).sqrt()
                }
            }
            HeadwayDistribution::TriExp => {
                let (scale, left_mass) = tri_exp_shape();
                let u: f64 = rng.sample(Open01);
                if u < left_mass {
                    TRI_EXP_MODE * (u / left_mass).sqrt()
                } else {
                    TRI_EXP_MODE - scale * ((1.0 - u) / (1.0 - left_mass)).ln()
                }
            }
            HeadwayDistribution::LogNormal => {
                // Mean 1 and variance 1: sigma^2 = ln(2), mu = -sigma^2 / 2
                let sigma2 = std::f64::consts::LN_2;
                let z: f64 = rng.sample(StandardNormal);
                (-0.5 * sigma2 + sigma2.sqrt() * z).exp()
            }
        }
    }
}

/// The exponential scale and the probability mass of the triangular flank
/// for which the tri-exp distribution has a mean of 1.
///
/// The density rises linearly to `p` at the mode `m`, then decays as `p exp(-(x - m) / s)`.
/// Unit mass gives `p (m / 2 + s) = 1` and unit mean gives `m^2 / 3 + m s + s^2 = m / 2 + s`.
fn tri_exp_shape() -> (f64, f64) {
    let m = TRI_EXP_MODE;
    let (b, c) = (m - 1.0, m * m / 3.0 - m / 2.0);
    let scale = 0.5 * (-b + (b * b - 4.0 * c).sqrt());
    let peak = 1.0 / (0.5 * m + scale);
    (scale, 0.5 * peak * m)
}
