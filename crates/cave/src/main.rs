//! cave - district planner CLI
//!
//! Reads a city description, groups its houses into districts and writes the
//! minimum evil of visiting them.
//!
//! Usage:
//!   cave input.txt output.txt              Write the evil score to output.txt
//!   cave input.txt output.txt --json       Also print a district summary
//!   cave input.txt output.txt --no-plot    Skip the PNG plot

use anyhow::{Context, Result};
use cave_core::{parse_city, schedule, solve, Bounds, Canvas, City, Outcome};
use clap::Parser;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;

use config::{default_config_path, load_config, Config};

#[derive(Parser)]
#[command(name = "cave")]
#[command(about = "Cave district planner - minimum evil over clustered districts")]
#[command(version)]
struct Cli {
    /// City description file
    input: PathBuf,

    /// File that receives the evil score
    output: PathBuf,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the plot here instead of the configured path
    #[arg(long, conflicts_with = "no_plot")]
    plot: Option<PathBuf>,

    /// Do not write a plot
    #[arg(long)]
    no_plot: bool,

    /// Print a JSON summary of the districts to stdout
    #[arg(long)]
    json: bool,
}

/// JSON summary of an outcome
#[derive(Debug, Serialize)]
struct Summary {
    evil: u64,
    house_count: usize,
    removed_duplicates: usize,
    /// Districts in visiting order
    districts: Vec<DistrictSummary>,
}

#[derive(Debug, Serialize)]
struct DistrictSummary {
    id: usize,
    house_count: usize,
    tavern_count: usize,
    weight: f64,
    /// [left, right, down, up]
    bounds: [i64; 4],
}

impl From<&Outcome> for Summary {
    fn from(outcome: &Outcome) -> Self {
        let districts = schedule(&outcome.districts)
            .into_iter()
            .map(|district| {
                let b = Bounds::of(district);
                DistrictSummary {
                    id: district.id(),
                    house_count: district.house_count(),
                    tavern_count: district.tavern_count(),
                    weight: district.weight(),
                    bounds: [b.left, b.right, b.down, b.up],
                }
            })
            .collect();

        Self {
            evil: outcome.evil,
            house_count: outcome.house_count,
            removed_duplicates: outcome.removed_duplicates,
            districts,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_default_config(),
    };

    // Initialize tracing: RUST_LOG wins over the config filter
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter().unwrap_or("warn")))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(&cli, &config)
}

fn load_default_config() -> Config {
    let loaded = default_config_path().and_then(|path| {
        load_config(&path).with_context(|| format!("config {}", path.display()))
    });

    match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load config: {err:#}. Using defaults.");
            Config::default()
        }
    }
}

fn run(cli: &Cli, config: &Config) -> Result<()> {
    let input = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("Failed to read input file: {}", cli.input.display()))?;
    let city = parse_city(&input)
        .with_context(|| format!("Failed to parse city: {}", cli.input.display()))?;

    let outcome = solve(&city).context("Failed to plan districts")?;
    tracing::info!(
        "{} districts over {} houses, evil = {}",
        outcome.districts.len(),
        outcome.house_count,
        outcome.evil
    );

    std::fs::write(&cli.output, outcome.evil.to_string())
        .with_context(|| format!("Failed to write output file: {}", cli.output.display()))?;

    if let Some(path) = plot_target(cli, config) {
        write_plot(&path, &city, &outcome, config)?;
    }

    if cli.json {
        let summary = Summary::from(&outcome);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}

/// Where to write the plot, if anywhere
fn plot_target(cli: &Cli, config: &Config) -> Option<PathBuf> {
    if cli.no_plot {
        None
    } else if let Some(path) = &cli.plot {
        Some(path.clone())
    } else if config.render_enabled() {
        Some(config.plot_path())
    } else {
        None
    }
}

fn write_plot(path: &Path, city: &City, outcome: &Outcome, config: &Config) -> Result<()> {
    let mut canvas = Canvas::new();
    canvas.plot_city(city);
    canvas.plot_districts(&outcome.districts);

    let (width, height) = config.plot_size();
    canvas
        .save(path, width, height)
        .with_context(|| format!("Failed to save plot: {}", path.display()))?;

    tracing::info!("Plot written to {}", path.display());
    Ok(())
}
