pub mod generator;
pub mod params;

use chrono::{DateTime, Duration, Utc};
use ndarray::Array3;
use serde::Serialize;

pub use generator::coupled_wave::{coupled_wave_pair, BarField, CoupledWaveParams};
pub use generator::ou::{ou_path, ou_path_from_params};
pub use generator::wiener::{wiener_path, wiener_paths};
pub use generator::GenError;
pub use params::{
    Constraint, CoupledWaveSpec, OrnsteinUhlenbeckParams, OrnsteinUhlenbeckSpec, ParamError,
    ParamSpec, WienerParams, WienerSpec,
};

/// One time-indexed synthetic bar, ready for serialization by the
/// consuming feed layer.
#[derive(Debug, Clone, Serialize)]
pub struct OhlcBar {
    pub instrument: String,
    pub time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Frame a generated `[2, 4, num_points]` array as two timestamped bar
/// streams, one per instrument name, starting at `start` and advancing by
/// `step` per bar. Mid maps to open and last to close.
pub fn frame_bars(
    x: &Array3<f64>,
    instruments: [&str; 2],
    start: DateTime<Utc>,
    step: Duration,
) -> Vec<OhlcBar> {
    let num_points = x.shape()[2];
    let mut bars = Vec::with_capacity(2 * num_points);
    for t in 0..num_points {
        let time = start + step * t as i32;
        for (s, instrument) in instruments.iter().enumerate() {
            bars.push(OhlcBar {
                instrument: instrument.to_string(),
                time,
                open: x[[s, BarField::Mid as usize, t]],
                high: x[[s, BarField::High as usize, t]],
                low: x[[s, BarField::Low as usize, t]],
                close: x[[s, BarField::Last as usize, t]],
            });
        }
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn framed_bars_interleave_both_instruments_in_time_order() {
        let mut rng = StdRng::seed_from_u64(31);
        let params = CoupledWaveParams {
            drift_sigma: 0.001,
            ou_sigma: 0.1,
            ou_lambda: 0.5,
            ou_mu: 1.0,
            spread_sigma_1: 0.05,
            spread_sigma_2: 0.1,
            spread_mean_1: 0.2,
            spread_mean_2: 0.3,
            bias: 100.0,
            keep_decimals: 6,
        };
        let x = coupled_wave_pair(&mut rng, 10, &params).unwrap();
        let start = Utc::now();
        let bars = frame_bars(&x, ["SYN1", "SYN2"], start, Duration::minutes(1));
        assert_eq!(bars.len(), 20);
        assert_eq!(bars[0].instrument, "SYN1");
        assert_eq!(bars[1].instrument, "SYN2");
        assert_eq!(bars[0].time, bars[1].time);
        assert_eq!(bars[2].time, start + Duration::minutes(1));
        for bar in &bars {
            assert!(bar.low <= bar.close && bar.close <= bar.high);
        }
    }
}
