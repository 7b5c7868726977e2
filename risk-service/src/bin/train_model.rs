//! SentinelGov model trainer
//!
//! Generates synthetic flood telemetry, fits the regression forest and
//! writes the artifact the inference server loads at startup.

use sentinel_risk::init_tracing;
use sentinel_risk::training::{train_and_export, TrainConfig};

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(false);

    let config = TrainConfig::from_env();
    tracing::info!("Trainer configuration: {:?}", config);

    let report = train_and_export(&config)?;

    println!();
    println!("{}", report);
    println!("The inference server will load this model at startup.");
    Ok(())
}
