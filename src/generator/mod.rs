pub mod coupled_wave;
pub mod ou;
pub mod wiener;

use thiserror::Error;

use crate::params::ParamError;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GenError {
    #[error("trajectory length must be at least 1")]
    EmptyTrajectory,
    #[error("mean reversion rate must be positive, got {0}")]
    NonPositiveLambda(f64),
    #[error("rejected distribution parameters: {0}")]
    BadDistribution(#[from] rand_distr::NormalError),
    #[error(transparent)]
    Param(#[from] ParamError),
}
