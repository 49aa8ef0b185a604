use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cpi_chart::{ChartConfig, ChartState, ViewMode};

#[derive(Parser)]
#[command(name = "cpi-chart")]
#[command(about = "Print the CPI chart payload (labels, dataset, annotations) as JSON")]
struct Args {
    /// JSON chart config; built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Series to plot: raw or average
    #[arg(short, long, default_value = "raw")]
    mode: ViewMode,

    /// Data file (.csv or .json); overrides the config's source
    source: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ChartConfig::load(path)?,
        None => ChartConfig::default(),
    };
    if let Some(source) = args.source {
        config.source = source;
    }

    let mut state = ChartState::new(&config);
    state
        .load(&config.source)
        .with_context(|| format!("no chart data from {}", config.source.display()))?;
    state.set_mode(args.mode);

    if let Some(msg) = &state.status_message {
        log::warn!("{msg}");
    }
    let chart = state.chart().context("no chart data")?;
    if chart.is_empty() {
        log::warn!("{} has no plottable rows", config.source.display());
    }
    println!("{}", chart.to_json_pretty()?);
    Ok(())
}
