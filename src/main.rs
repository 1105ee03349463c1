use anyhow::Result;
use chrono::{Duration, Utc};
use csv::Writer;
use pricegen::{coupled_wave_pair, frame_bars, CoupledWaveParams};
use std::fs;

fn main() -> Result<()> {
    // dev defaults, see bin/generate_bars for the configurable run
    let params = CoupledWaveParams {
        drift_sigma: 0.001,
        ou_sigma: 0.1,
        ou_lambda: 0.1,
        ou_mu: 1.0,
        spread_sigma_1: 0.05,
        spread_sigma_2: 0.1,
        spread_mean_1: 0.1,
        spread_mean_2: 0.2,
        bias: 100.0,
        keep_decimals: 6,
    };

    let mut rng = rand::thread_rng();
    let x = coupled_wave_pair(&mut rng, 1_000, &params)?;
    let bars = frame_bars(&x, ["SYN1", "SYN2"], Utc::now(), Duration::minutes(1));

    fs::create_dir_all("./synthetic_bars")?;
    let mut wtr = Writer::from_path("./synthetic_bars/bars.csv")?;
    for bar in bars {
        wtr.serialize(bar)?;
    }
    wtr.flush()?;
    Ok(())
}
