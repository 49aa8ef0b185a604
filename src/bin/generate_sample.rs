use std::f64::consts::TAU;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use clap::Parser;

/// Write a deterministic synthetic daily CPI export (`date,hhi,cpi`).
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output CSV
    #[arg(default_value = cpi_chart::config::DEFAULT_SOURCE)]
    output: PathBuf,

    /// First date in the series
    #[arg(long, default_value = "2022-11-01")]
    start: NaiveDate,

    /// Number of daily rows
    #[arg(long, default_value_t = 730)]
    days: u64,

    /// Seed for the noise
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// splitmix64; uniform jitter is all the sample needs.
struct Jitter(u64);

impl Jitter {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[-amplitude, amplitude)`.
    fn sample(&mut self, amplitude: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        (unit * 2.0 - 1.0) * amplitude
    }
}

/// Daily CPI: slow drift, a weekly wobble and noise.
fn cpi_at(day: u64, jitter: &mut Jitter) -> f64 {
    let drift = 100.0 + 0.012 * day as f64;
    let weekly = 0.35 * (TAU * day as f64 / 7.0).sin();
    drift + weekly + jitter.sample(0.3)
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let mut jitter = Jitter(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(["date", "hhi", "cpi"])?;
    for day in 0..args.days {
        let date = args.start + Days::new(day);
        let hhi = 0.18 + jitter.sample(0.015);
        let cpi = cpi_at(day, &mut jitter);
        writer.write_record([
            date.format("%Y-%m-%d").to_string(),
            format!("{hhi:.4}"),
            format!("{cpi:.3}"),
        ])?;
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {} daily observations starting {} to {}",
        args.days,
        args.start,
        args.output.display()
    );
    Ok(())
}
