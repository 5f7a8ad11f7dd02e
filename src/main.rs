use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use portfolio_lens::core::HistoricalPeriod;
use portfolio_lens::core::log::init_logging;
use portfolio_lens::core::projection::MAX_PROJECTION_YEARS;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Estimate CAGR for a ticker and project future prices
    Analyze {
        /// Stock ticker, e.g. HDFCBANK or INFY.NS
        ticker: String,

        /// Amount invested today
        #[arg(short, long)]
        amount: Option<f64>,

        /// Number of years to project (1-100)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=MAX_PROJECTION_YEARS as i64))]
        years: Option<u32>,

        /// Lookback window for the CAGR (1Y, 2Y, 5Y, 10Y, MAX)
        #[arg(short, long)]
        period: Option<HistoricalPeriod>,

        /// Print the report, including the chart series, as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => portfolio_lens::cli::setup::setup(),
        Some(Commands::Analyze {
            ticker,
            amount,
            years,
            period,
            json,
        }) => {
            let options = portfolio_lens::AnalyzeOptions {
                ticker,
                amount,
                years,
                period,
                json,
            };
            portfolio_lens::run_command(
                portfolio_lens::AppCommand::Analyze(options),
                cli.config_path.as_deref(),
            )
            .await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
