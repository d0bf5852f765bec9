//! One-shot clustering of a local noise dataset.
//!
//! Reads `station_month.csv`, clusters it with the default parameters and
//! writes `noise_clusters.csv` plus a rendered `noise_clusters.png`.

use anyhow::Context;
use clap::Parser;
use noise_clusters::{pipeline, ClusterParams, NoiseDataset, PlotOptions, EXPORT_FILENAME};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version, about = "Cluster a local day/night noise dataset")]
struct CliArgs {
    /// Dataset to read.
    #[arg(long, default_value = "station_month.csv")]
    input: PathBuf,

    /// Where to write the labeled CSV.
    #[arg(long, default_value = EXPORT_FILENAME)]
    output: PathBuf,

    /// Where to write the scatter plot.
    #[arg(long, default_value = "noise_clusters.png")]
    plot: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "noise_clusters=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let dataset = NoiseDataset::from_path(&args.input)
        .with_context(|| format!("Reading {}", args.input.display()))?;
    let outcome = pipeline::run(dataset, &ClusterParams::default())?;

    let png = outcome.render_png(&PlotOptions::script())?;
    std::fs::write(&args.plot, png)
        .with_context(|| format!("Writing {}", args.plot.display()))?;
    tracing::info!("Plot saved as {}", args.plot.display());

    outcome
        .labeled
        .write_csv(&args.output)
        .with_context(|| format!("Writing {}", args.output.display()))?;
    println!("Clustered data saved as {}", args.output.display());

    Ok(())
}
