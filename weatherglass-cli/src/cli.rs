use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select};
use tracing::debug;
use weatherglass_core::{Config, QueryInput, QueryMode, Units, provider_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherglass", version, about = "Current, historical & marine weather")]
pub struct Cli {
    /// Print the normalized result as JSON instead of a summary.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// City, ZIP, coordinates, or IP.
    pub location: String,

    /// Unit system: m (metric), f (imperial) or s (scientific).
    #[arg(short, long)]
    pub units: Option<Units>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weatherstack API key and default units.
    Configure,

    /// Show current conditions.
    Current {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show the historical summary for a single day.
    Historical {
        #[command(flatten)]
        query: QueryArgs,

        /// Day to look up, YYYY-MM-DD.
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show marine conditions (historical data plus tides, when the plan has them).
    Marine {
        #[command(flatten)]
        query: QueryArgs,

        /// Day to look up, YYYY-MM-DD.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let json = self.json;

        match self.command {
            Command::Configure => configure(),
            Command::Current { query } => show(QueryMode::Current, query, None, json).await,
            Command::Historical { query, date } => {
                show(QueryMode::Historical, query, date, json).await
            }
            Command::Marine { query, date } => show(QueryMode::Marine, query, date, json).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut cfg = Config::load_from_path(&path)?;

    let api_key = Password::new("weatherstack API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let units = Select::new("Default units:", Units::all().to_vec())
        .prompt()
        .context("Failed to read default units")?;

    cfg.set_api_key(api_key.trim().to_string());
    cfg.default_units = Some(units);

    let saved = cfg.save()?;
    println!("Saved configuration to {}", saved.display());

    Ok(())
}

async fn show(
    mode: QueryMode,
    query: QueryArgs,
    date: Option<NaiveDate>,
    json: bool,
) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let units = query.units.unwrap_or_else(|| cfg.units());

    let provider = provider_from_config(&cfg).map_err(|e| anyhow!(render::error_line(&e)))?;

    let input = query_input(mode, query.location, units, date);
    debug!(%mode, ?input, "running query");

    let result = provider
        .get_weather(mode, &input)
        .await
        .map_err(|e| anyhow!(render::error_line(&e)))?;

    if json {
        let out = serde_json::to_string_pretty(&result).context("Failed to serialize result")?;
        println!("{out}");
    } else {
        print!("{}", render::render(&result, units));
    }

    Ok(())
}

fn query_input(
    mode: QueryMode,
    location: String,
    units: Units,
    date: Option<NaiveDate>,
) -> QueryInput {
    let input = QueryInput::new(location, units);
    let Some(date) = date.map(|d| d.format("%Y-%m-%d").to_string()) else {
        return input;
    };

    match mode {
        QueryMode::Current => input,
        QueryMode::Historical => input.with_historical_date(date),
        QueryMode::Marine => input.with_marine_date(date),
    }
}
