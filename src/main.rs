//! vodsig: structured telemetry extraction from game interface
//! recordings

mod cli;
mod decode;
mod pipeline;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    let output = pipeline::run(&args)?;

    log::info!(
        "done: {} supply samples, {} events",
        output.signals.supply_series.len(),
        output.events.len()
    );
    Ok(())
}
