use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::generator::GenError;

/// Generate one Wiener process trajectory: `num_points` normal increments
/// with standard deviation `delta * sqrt(dt)`, cumulatively summed on top
/// of the starting point `x0`. The starting point itself is not emitted.
pub fn wiener_path(
    rng: &mut impl Rng,
    num_points: usize,
    delta: f64,
    x0: f64,
    dt: f64,
) -> Result<Vec<f64>, GenError> {
    if num_points == 0 {
        return Err(GenError::EmptyTrajectory);
    }
    let increment = Normal::new(0.0, delta * dt.sqrt())?;
    let mut x = Vec::with_capacity(num_points);
    let mut level = x0;
    for _ in 0..num_points {
        level += increment.sample(rng);
        x.push(level);
    }
    Ok(x)
}

/// Batched variant: one trajectory per starting point, stacked as an
/// `[x0.len(), num_points]` array.
pub fn wiener_paths(
    rng: &mut impl Rng,
    num_points: usize,
    delta: f64,
    x0: &[f64],
    dt: f64,
) -> Result<Array2<f64>, GenError> {
    let mut out = Array2::zeros((x0.len(), num_points));
    for (row, &start) in x0.iter().enumerate() {
        let path = wiener_path(rng, num_points, delta, start, dt)?;
        for (t, value) in path.into_iter().enumerate() {
            out[[row, t]] = value;
        }
    }
    Ok(out)
}
