pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{AppConfig, OutputFormat};
use crate::core::rates::Report;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Inputs of a single run, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub days: Option<String>,
    pub currencies: Vec<String>,
    pub config_path: Option<String>,
    pub format: Option<OutputFormat>,
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Validates the input and fetches the report. Validation failures are
/// returned as [`crate::core::QueryError`] before any request is made.
pub async fn build_report(
    days: Option<&str>,
    currencies: &[String],
    config: &AppConfig,
) -> Result<Report> {
    let currencies: Vec<String> = config
        .currencies
        .iter()
        .chain(currencies)
        .cloned()
        .collect();
    let query = crate::core::parse_input(days, &currencies)?;
    info!(
        days = query.dates().len(),
        currencies = ?query.currencies(),
        "Fetching exchange rates"
    );

    let provider = providers::PrivatBankProvider::new(&config.provider);
    let pb = cli::ui::new_progress_bar(query.dates().len() as u64, "Fetching rates...");
    let report = crate::core::query_rates(Some(query), &provider, &|| pb.inc(1)).await;
    pb.finish_and_clear();

    if report.is_empty() {
        warn!("No rates could be fetched for the requested days");
    }
    Ok(report)
}

pub async fn run(options: &RunOptions) -> Result<()> {
    info!("exrates starting...");

    // Bad input is reported before the config file is read
    crate::core::parse_input(options.days.as_deref(), &options.currencies)?;

    let config = load_config(options.config_path.as_deref())?;
    let report = build_report(options.days.as_deref(), &options.currencies, &config).await?;

    let format = options.format.unwrap_or(config.format);
    let output = cli::report::render(&report, format)?;
    print!("{output}");
    if format != OutputFormat::Banner && !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
