use anyhow::Result;
use chrono::{Duration, Utc};
use csv::Writer;
use indicatif::ProgressBar;
use log::{info, LevelFilter};
use pricegen::{coupled_wave_pair, frame_bars, CoupledWaveSpec, ParamSpec};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;

fn main() -> Result<()> {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .init();

    fs::create_dir_all("./synthetic_bars")?;

    let n_episodes = 100;
    let num_points = 500;
    let seed = 1_u64;
    let bar_period = Duration::minutes(1);

    // Interval-valued entries are re-sampled once per episode.
    let spec = CoupledWaveSpec {
        drift_sigma: ParamSpec::Range(0.0005, 0.002),
        ou_sigma: ParamSpec::Range(0.05, 0.2),
        ou_lambda: ParamSpec::Range(0.01, 1.0),
        ou_mu: ParamSpec::Fixed(1.0),
        spread_sigma_1: ParamSpec::Fixed(0.05),
        spread_sigma_2: ParamSpec::Fixed(0.1),
        spread_mean_1: ParamSpec::Fixed(0.1),
        spread_mean_2: ParamSpec::Fixed(0.2),
        bias: ParamSpec::Range(90.0, 110.0),
        keep_decimals: 6,
    };

    let mut rng = StdRng::seed_from_u64(seed);

    let path = "./synthetic_bars/bars.csv";
    let mut wtr = Writer::from_path(path)?;
    info!("Generating {n_episodes} episodes of {num_points} bars into {path}");
    let bar = ProgressBar::new(n_episodes);
    let mut start = Utc::now();
    for _ in 0..n_episodes {
        let params = spec.sample(&mut rng)?;
        let x = coupled_wave_pair(&mut rng, num_points, &params)?;
        for record in frame_bars(&x, ["SYN1", "SYN2"], start, bar_period) {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        start = start + bar_period * num_points as i32;
        bar.inc(1);
    }
    bar.finish();
    info!("Done");
    Ok(())
}
