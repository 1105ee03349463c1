use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::coupled_wave::CoupledWaveParams;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ParamError {
    #[error("expected {name} to be an ordered [low, high] interval, got [{low}, {high}]")]
    ReversedBounds {
        name: &'static str,
        low: f64,
        high: f64,
    },
    #[error("expected {name} to be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("expected {name} to be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
}

/// Sign constraint attached to a parameter when its spec is validated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Constraint {
    Any,
    NonNegative,
    Positive,
}

/// A parameter given either as a fixed scalar or as a `[low, high]` interval
/// to draw from once per episode. Deserializes from a bare number or a
/// 2-element array, so config files can use either form directly.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamSpec {
    Fixed(f64),
    Range(f64, f64),
}

impl ParamSpec {
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            ParamSpec::Fixed(value) => (value, value),
            ParamSpec::Range(low, high) => (low, high),
        }
    }

    /// Checks interval ordering and the parameter's sign constraint.
    /// Runs before any random draw, so a bad spec never consumes the RNG.
    pub fn validated(self, name: &'static str, constraint: Constraint) -> Result<Self, ParamError> {
        let (low, high) = self.bounds();
        if low > high {
            return Err(ParamError::ReversedBounds { name, low, high });
        }
        match constraint {
            Constraint::Any => {}
            Constraint::NonNegative => {
                if low < 0.0 {
                    return Err(ParamError::Negative { name, value: low });
                }
            }
            Constraint::Positive => {
                if low <= 0.0 {
                    return Err(ParamError::NonPositive { name, value: low });
                }
            }
        }
        Ok(self)
    }

    /// Draws uniformly over the interval; a fixed spec returns its value as is.
    pub fn sample_uniform(&self, rng: &mut impl Rng) -> f64 {
        let (low, high) = self.bounds();
        if low == high {
            low
        } else {
            rng.gen_range(low..=high)
        }
    }

    /// Draws uniformly in log-space and exponentiates, biasing toward small
    /// magnitudes. Requires a `Positive`-validated spec.
    pub fn sample_log_uniform(&self, rng: &mut impl Rng) -> f64 {
        let (low, high) = self.bounds();
        if low == high {
            low
        } else {
            rng.gen_range(low.ln()..=high.ln()).exp()
        }
    }
}

impl From<f64> for ParamSpec {
    fn from(value: f64) -> Self {
        ParamSpec::Fixed(value)
    }
}

impl From<[f64; 2]> for ParamSpec {
    fn from([low, high]: [f64; 2]) -> Self {
        ParamSpec::Range(low, high)
    }
}

/// Wiener process configuration: each field a fixed value or an interval.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct WienerSpec {
    pub delta: ParamSpec,
    pub x0: ParamSpec,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct WienerParams {
    pub delta: f64,
    pub x0: f64,
}

impl WienerSpec {
    pub fn sample(&self, rng: &mut impl Rng) -> Result<WienerParams, ParamError> {
        let delta = self
            .delta
            .validated("wiener delta", Constraint::NonNegative)?
            .sample_uniform(rng);
        let x0 = self
            .x0
            .validated("wiener x0", Constraint::NonNegative)?
            .sample_uniform(rng);
        let params = WienerParams { delta, x0 };
        debug!("sampled wiener parameters: {:?}", params);
        Ok(params)
    }
}

/// Ornstein-Uhlenbeck process configuration. A `None` starting point
/// defaults to the sampled long-term mean.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct OrnsteinUhlenbeckSpec {
    pub mu: ParamSpec,
    pub lambda: ParamSpec,
    pub sigma: ParamSpec,
    pub x0: Option<ParamSpec>,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrnsteinUhlenbeckParams {
    pub mu: f64,
    pub lambda: f64,
    pub sigma: f64,
    pub x0: f64,
}

impl OrnsteinUhlenbeckSpec {
    /// Samples every parameter uniformly over its interval.
    pub fn sample(&self, rng: &mut impl Rng) -> Result<OrnsteinUhlenbeckParams, ParamError> {
        let lambda = self
            .lambda
            .validated("ou lambda", Constraint::Positive)?
            .sample_uniform(rng);
        self.resolve(rng, lambda)
    }

    /// Same as [`sample`](Self::sample) but draws the mean-reversion rate
    /// log-uniformly, so small-lambda regimes are explored as often as
    /// large ones.
    pub fn sample_log_lambda(&self, rng: &mut impl Rng) -> Result<OrnsteinUhlenbeckParams, ParamError> {
        let lambda = self
            .lambda
            .validated("ou lambda", Constraint::Positive)?
            .sample_log_uniform(rng);
        self.resolve(rng, lambda)
    }

    fn resolve(&self, rng: &mut impl Rng, lambda: f64) -> Result<OrnsteinUhlenbeckParams, ParamError> {
        let sigma = self
            .sigma
            .validated("ou sigma", Constraint::NonNegative)?
            .sample_uniform(rng);
        let mu = self.mu.validated("ou mu", Constraint::Any)?.sample_uniform(rng);
        let x0 = match self.x0 {
            Some(spec) => spec.validated("ou x0", Constraint::Any)?.sample_uniform(rng),
            None => mu,
        };
        let params = OrnsteinUhlenbeckParams { mu, lambda, sigma, x0 };
        debug!("sampled OU parameters: {:?}", params);
        Ok(params)
    }
}

/// Coupled-wave pair generator configuration, one spec per named parameter.
/// `ou_lambda` is drawn log-uniformly, everything else uniformly.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
pub struct CoupledWaveSpec {
    pub drift_sigma: ParamSpec,
    pub ou_sigma: ParamSpec,
    pub ou_lambda: ParamSpec,
    pub ou_mu: ParamSpec,
    pub spread_sigma_1: ParamSpec,
    pub spread_sigma_2: ParamSpec,
    pub spread_mean_1: ParamSpec,
    pub spread_mean_2: ParamSpec,
    pub bias: ParamSpec,
    pub keep_decimals: u32,
}

impl CoupledWaveSpec {
    pub fn sample(&self, rng: &mut impl Rng) -> Result<CoupledWaveParams, ParamError> {
        let drift_sigma = self
            .drift_sigma
            .validated("drift sigma", Constraint::NonNegative)?
            .sample_uniform(rng);
        let ou_sigma = self
            .ou_sigma
            .validated("ou sigma", Constraint::NonNegative)?
            .sample_uniform(rng);
        let ou_lambda = self
            .ou_lambda
            .validated("ou lambda", Constraint::Positive)?
            .sample_log_uniform(rng);
        let ou_mu = self.ou_mu.validated("ou mu", Constraint::Any)?.sample_uniform(rng);
        let spread_sigma_1 = self
            .spread_sigma_1
            .validated("spread sigma 1", Constraint::NonNegative)?
            .sample_uniform(rng);
        let spread_sigma_2 = self
            .spread_sigma_2
            .validated("spread sigma 2", Constraint::NonNegative)?
            .sample_uniform(rng);
        let spread_mean_1 = self
            .spread_mean_1
            .validated("spread mean 1", Constraint::NonNegative)?
            .sample_uniform(rng);
        let spread_mean_2 = self
            .spread_mean_2
            .validated("spread mean 2", Constraint::NonNegative)?
            .sample_uniform(rng);
        let bias = self
            .bias
            .validated("bias", Constraint::NonNegative)?
            .sample_uniform(rng);
        let params = CoupledWaveParams {
            drift_sigma,
            ou_sigma,
            ou_lambda,
            ou_mu,
            spread_sigma_1,
            spread_sigma_2,
            spread_mean_1,
            spread_mean_2,
            bias,
            keep_decimals: self.keep_decimals,
        };
        debug!("sampled coupled-wave parameters: {:?}", params);
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn uniform_sample_stays_within_interval() {
        let mut rng = StdRng::seed_from_u64(11);
        let spec = ParamSpec::Range(0.5, 2.5);
        for _ in 0..1_000 {
            let v = spec.sample_uniform(&mut rng);
            assert!((0.5..=2.5).contains(&v));
        }
    }

    #[test]
    fn log_uniform_sample_stays_within_interval() {
        let mut rng = StdRng::seed_from_u64(12);
        let spec = ParamSpec::Range(0.001, 1.0);
        for _ in 0..1_000 {
            let v = spec.sample_log_uniform(&mut rng);
            assert!((0.001..=1.0).contains(&v));
        }
    }

    #[test]
    fn fixed_spec_samples_to_its_value() {
        let mut rng = StdRng::seed_from_u64(13);
        let spec = ParamSpec::Fixed(3.25);
        assert_eq!(spec.sample_uniform(&mut rng), 3.25);
        assert_eq!(spec.sample_log_uniform(&mut rng), 3.25);
    }

    #[test]
    fn reversed_interval_is_rejected() {
        let err = ParamSpec::Range(5.0, 2.0)
            .validated("delta", Constraint::Any)
            .unwrap_err();
        assert_eq!(
            err,
            ParamError::ReversedBounds {
                name: "delta",
                low: 5.0,
                high: 2.0
            }
        );
    }

    #[test]
    fn mean_reversion_rate_must_be_strictly_positive() {
        let err = ParamSpec::Range(0.0, 1.0)
            .validated("ou lambda", Constraint::Positive)
            .unwrap_err();
        assert!(matches!(err, ParamError::NonPositive { .. }));
    }

    #[test]
    fn negative_volatility_is_rejected() {
        let err = ParamSpec::Fixed(-0.1)
            .validated("ou sigma", Constraint::NonNegative)
            .unwrap_err();
        assert!(matches!(err, ParamError::Negative { .. }));
    }

    #[test]
    fn wiener_spec_resolves_within_bounds() {
        let mut rng = StdRng::seed_from_u64(16);
        let spec = WienerSpec {
            delta: ParamSpec::Range(0.1, 0.5),
            x0: ParamSpec::Fixed(100.0),
        };
        for _ in 0..100 {
            let params = spec.sample(&mut rng).unwrap();
            assert!((0.1..=0.5).contains(&params.delta));
            assert_eq!(params.x0, 100.0);
        }
    }

    #[test]
    fn coupled_wave_spec_resolves_and_keeps_decimals() {
        let mut rng = StdRng::seed_from_u64(17);
        let spec = CoupledWaveSpec {
            drift_sigma: ParamSpec::Range(0.0005, 0.002),
            ou_sigma: ParamSpec::Fixed(0.1),
            ou_lambda: ParamSpec::Range(0.01, 1.0),
            ou_mu: ParamSpec::Fixed(1.0),
            spread_sigma_1: ParamSpec::Fixed(0.05),
            spread_sigma_2: ParamSpec::Fixed(0.1),
            spread_mean_1: ParamSpec::Fixed(0.1),
            spread_mean_2: ParamSpec::Fixed(0.2),
            bias: ParamSpec::Range(90.0, 110.0),
            keep_decimals: 4,
        };
        let params = spec.sample(&mut rng).unwrap();
        assert!((0.01..=1.0).contains(&params.ou_lambda));
        assert!((90.0..=110.0).contains(&params.bias));
        assert_eq!(params.keep_decimals, 4);
    }

    #[test]
    fn ou_spec_defaults_starting_point_to_sampled_mean() {
        let mut rng = StdRng::seed_from_u64(14);
        let spec = OrnsteinUhlenbeckSpec {
            mu: ParamSpec::Range(1.0, 4.0),
            lambda: ParamSpec::Fixed(0.5),
            sigma: ParamSpec::Fixed(0.1),
            x0: None,
        };
        let params = spec.sample(&mut rng).unwrap();
        assert_eq!(params.x0, params.mu);
    }

    #[test]
    fn bad_spec_fails_before_any_draw() {
        let mut rng_a = StdRng::seed_from_u64(15);
        let mut rng_b = StdRng::seed_from_u64(15);
        let spec = OrnsteinUhlenbeckSpec {
            mu: ParamSpec::Fixed(0.0),
            lambda: ParamSpec::Fixed(-1.0),
            sigma: ParamSpec::Fixed(0.1),
            x0: None,
        };
        assert!(spec.sample(&mut rng_a).is_err());
        // The failed call must not have consumed the RNG.
        assert_eq!(rng_a.gen::<u64>(), rng_b.gen::<u64>());
    }

    #[test]
    fn param_spec_deserializes_from_scalar_or_pair() {
        let fixed: ParamSpec = serde_json::from_str("2.5").unwrap();
        assert_eq!(fixed, ParamSpec::Fixed(2.5));
        let range: ParamSpec = serde_json::from_str("[0.1, 0.9]").unwrap();
        assert_eq!(range, ParamSpec::Range(0.1, 0.9));
    }
}
