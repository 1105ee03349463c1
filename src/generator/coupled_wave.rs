use ndarray::Array3;
use rand::Rng;
use rand_distr::{Distribution, Normal, StandardNormal};
use serde::{Deserialize, Serialize};

use crate::generator::GenError;

/// Field index along the second axis of the generated `[2, 4, num_points]`
/// array.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BarField {
    Mid = 0,
    High = 1,
    Low = 2,
    Last = 3,
}

/// Concrete inputs of one coupled-wave generation run, usually resolved from
/// a [`CoupledWaveSpec`](crate::params::CoupledWaveSpec).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupledWaveParams {
    /// Sigma of the multiplicative drift shared by both series each step.
    pub drift_sigma: f64,
    /// Sigma of the mean-reverting term coupling the two series.
    pub ou_sigma: f64,
    /// Mean-reversion rate of the coupling term, strictly positive.
    pub ou_lambda: f64,
    /// Long-term mean of the gap between the two series.
    pub ou_mu: f64,
    /// Hi-Lo spread generating sigma 1.
    pub spread_sigma_1: f64,
    /// Hi-Lo spread generating sigma 2.
    pub spread_sigma_2: f64,
    /// Hi-Lo spread generating mean 1, also the spread floor.
    pub spread_mean_1: f64,
    /// Hi-Lo spread generating mean 2.
    pub spread_mean_2: f64,
    /// Starting level of both series.
    pub bias: f64,
    /// Decimal places kept in the generated data.
    pub keep_decimals: u32,
}

/// Generate two integrated trajectories of OHLC-like prices.
///
/// Mid-prices follow a shared multiplicative drift plus a mean-reverting
/// half-spread driven by the gap between the previous last values, so the
/// two series diverge and converge in lockstep. High-Low spreads for each
/// series are drawn independently from the coupled-wave model, formulae
/// (18a-c) - (20), pp. 10-11 in:
/// Jack Sarkissian, "Spread, volatility, and volume relationship in
/// financial markets and market maker's profit optimization",
/// <https://arxiv.org/pdf/1606.07381.pdf>
///
/// Returns a `[2, 4, num_points]` array, axes: series, field in
/// [`BarField`] order `{mid, high, low, last}`, time. The seed column is
/// dropped; values are rounded to `keep_decimals` places.
pub fn coupled_wave_pair(
    rng: &mut impl Rng,
    num_points: usize,
    p: &CoupledWaveParams,
) -> Result<Array3<f64>, GenError> {
    if num_points == 0 {
        return Err(GenError::EmptyTrajectory);
    }
    if p.ou_lambda <= 0.0 {
        return Err(GenError::NonPositiveLambda(p.ou_lambda));
    }

    let drift = Normal::new(0.0, p.drift_sigma)?;
    let spread_1 = Normal::new(p.spread_mean_1, p.spread_sigma_1)?;
    let spread_2 = Normal::new(p.spread_mean_2, p.spread_sigma_2)?;

    let decay = (-p.ou_lambda).exp();
    let diffusion = p.ou_sigma * ((1.0 - (-2.0 * p.ou_lambda).exp()) / (2.0 * p.ou_lambda)).sqrt();

    // History buffers, seeded at index 0; the seed column is not emitted.
    let n = num_points + 1;
    let mut mid1 = vec![0.0; n];
    let mut high1 = vec![0.0; n];
    let mut low1 = vec![0.0; n];
    let mut last1 = vec![0.0; n];
    let mut mid2 = vec![0.0; n];
    let mut high2 = vec![0.0; n];
    let mut low2 = vec![0.0; n];
    let mut last2 = vec![0.0; n];

    mid1[0] = p.bias;
    high1[0] = p.bias;
    low1[0] = p.bias;
    last1[0] = p.bias + p.ou_mu / 2.0;
    mid2[0] = p.bias;
    high2[0] = p.bias;
    low2[0] = p.bias;
    last2[0] = p.bias - p.ou_mu / 2.0;

    // Euclidean combination of two normals, floored at spread_mean_1.
    let draw_spread = |rng: &mut dyn rand::RngCore| {
        let a: f64 = spread_1.sample(rng);
        let b: f64 = spread_2.sample(rng);
        (a * a + b * b).sqrt().max(p.spread_mean_1)
    };

    for i in 1..n {
        let gap = last1[i - 1] - last2[i - 1];
        let z: f64 = rng.sample(StandardNormal);
        let d_s = (p.ou_mu - gap) * (1.0 - decay) + diffusion * z;

        // One drift draw applied to both series: this shared term, not
        // independent per-series drift, is what couples their magnitudes.
        let drift1 = drift.sample(rng);

        mid1[i] = last1[i - 1] * (1.0 + drift1) + d_s / 2.0;
        mid2[i] = last2[i - 1] * (1.0 + drift1) - d_s / 2.0;

        let h1 = draw_spread(rng);
        let h2 = draw_spread(rng);

        low1[i] = mid1[i] - h1 / 2.0;
        high1[i] = mid1[i] + h1 / 2.0;
        last1[i] = rng.gen_range(low1[i]..=high1[i]);

        low2[i] = mid2[i] - h2 / 2.0;
        high2[i] = mid2[i] + h2 / 2.0;
        last2[i] = rng.gen_range(low2[i]..=high2[i]);
    }

    let mut out = Array3::zeros((2, 4, num_points));
    let series = [
        [&mid1, &high1, &low1, &last1],
        [&mid2, &high2, &low2, &last2],
    ];
    for (s, fields) in series.iter().enumerate() {
        for (f, values) in fields.iter().enumerate() {
            for t in 0..num_points {
                out[[s, f, t]] = round_to(values[t + 1], p.keep_decimals);
            }
        }
    }
    Ok(out)
}

fn round_to(x: f64, decimals: u32) -> f64 {
    let scale = 10_u64.pow(decimals) as f64;
    (x * scale).round() / scale
}
