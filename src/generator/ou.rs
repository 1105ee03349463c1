use rand::Rng;
use rand_distr::StandardNormal;

use crate::generator::GenError;
use crate::params::OrnsteinUhlenbeckParams;

/// Generate one Ornstein-Uhlenbeck trajectory using the exact discretisation
///
/// ```text
/// x[i] = x[i-1]*exp(-l*dt) + mu*(1 - exp(-l*dt))
///        + sigma*sqrt((1 - exp(-2*l*dt)) / (2*l)) * N(0, 1)
/// ```
///
/// with `x[0] = x0`. Requires `lambda > 0`.
pub fn ou_path(
    rng: &mut impl Rng,
    num_points: usize,
    mu: f64,
    lambda: f64,
    sigma: f64,
    x0: f64,
    dt: f64,
) -> Result<Vec<f64>, GenError> {
    if num_points == 0 {
        return Err(GenError::EmptyTrajectory);
    }
    if lambda <= 0.0 {
        return Err(GenError::NonPositiveLambda(lambda));
    }
    let decay = (-lambda * dt).exp();
    let diffusion = sigma * ((1.0 - (-2.0 * lambda * dt).exp()) / (2.0 * lambda)).sqrt();

    let mut x = vec![0.0; num_points];
    x[0] = x0;
    for i in 1..num_points {
        let z: f64 = rng.sample(StandardNormal);
        x[i] = x[i - 1] * decay + mu * (1.0 - decay) + diffusion * z;
    }
    Ok(x)
}

/// Convenience wrapper over sampled parameters.
pub fn ou_path_from_params(
    rng: &mut impl Rng,
    num_points: usize,
    params: &OrnsteinUhlenbeckParams,
    dt: f64,
) -> Result<Vec<f64>, GenError> {
    ou_path(
        rng,
        num_points,
        params.mu,
        params.lambda,
        params.sigma,
        params.x0,
        dt,
    )
}
