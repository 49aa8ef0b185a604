use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use serde::Serialize;

use cpi_chart::{load_file, Observation};

/// One record in the JSON export.
#[derive(Serialize)]
struct Record {
    date: String,
    #[serde(rename = "CPI")]
    cpi: String,
}

impl From<&Observation> for Record {
    fn from(obs: &Observation) -> Self {
        Record {
            date: obs.date.format("%d-%m-%Y").to_string(),
            cpi: obs.value.to_string(),
        }
    }
}

/// Rewrite a CSV export as the JSON record format
/// (`[{"date": "dd-MM-yyyy", "CPI": "<number>"}]`). Malformed rows are dropped.
#[derive(Parser)]
#[command(name = "convert")]
struct Args {
    /// CSV export to read
    input: PathBuf,

    /// JSON file to write
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let Args { input, output } = Args::parse();

    let parsed = load_file(&input).with_context(|| format!("loading {}", input.display()))?;
    let records: Vec<Record> = parsed.observations.iter().map(Record::from).collect();

    let file = std::fs::File::create(&output)
        .with_context(|| format!("creating {}", output.display()))?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), &records)
        .context("writing JSON")?;

    info!("{} row(s) skipped", parsed.skipped);
    println!(
        "CSV file has been converted to JSON and saved to {} ({} records)",
        output.display(),
        records.len()
    );
    Ok(())
}
