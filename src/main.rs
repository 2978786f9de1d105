use clap::Parser;
use exrates::core::QueryError;
use exrates::core::config::OutputFormat;
use exrates::core::log::init_logging;
use std::path::Path;
use std::process::ExitCode;

/// Show PrivatBank exchange rates for the last few days.
///
/// USD and EUR are always shown; extra currency codes may follow the number
/// of days, e.g. `exrates 3 pln gbp`.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long)]
    config_path: Option<String>,

    /// Output format, overrides the configuration file
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write an example configuration file (to --config-path if given) and exit
    #[arg(long)]
    setup: bool,

    /// Number of days to show, from 1 to 10, ending today
    #[arg(value_name = "NUMBER_OF_DAYS", allow_negative_numbers = true)]
    days: Option<String>,

    /// Extra currency codes to show
    #[arg(value_name = "CURRENCY")]
    currencies: Vec<String>,
}

impl From<Cli> for exrates::RunOptions {
    fn from(cli: Cli) -> exrates::RunOptions {
        exrates::RunOptions {
            days: cli.days,
            currencies: cli.currencies,
            config_path: cli.config_path,
            format: cli.format,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = if cli.setup {
        exrates::cli::setup::write_example_config(cli.config_path.as_deref().map(Path::new))
            .map(|path| println!("Example configuration written to {}", path.display()))
    } else {
        exrates::run(&cli.into()).await
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(query_error) = e.downcast_ref::<QueryError>() {
                println!("{query_error}");
            } else {
                tracing::debug!(error = ?e, "Application failed");
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
