pub mod cli;
pub mod core;
pub mod providers;

use crate::core::analysis::AnalysisRequest;
use crate::core::config::AppConfig;
use crate::core::price::HistoricalPeriod;
use crate::providers::yahoo_finance::YahooFinanceProvider;
use anyhow::Result;
use tracing::{debug, info};

/// Options for a single `analyze` run. Unset values fall back to the config.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub ticker: String,
    pub amount: Option<f64>,
    pub years: Option<u32>,
    pub period: Option<HistoricalPeriod>,
    pub json: bool,
}

pub enum AppCommand {
    Analyze(AnalyzeOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Portfolio lens starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = YahooFinanceProvider::new(config.providers.yahoo_base_url());

    match command {
        AppCommand::Analyze(options) => {
            let request = AnalysisRequest {
                ticker: options.ticker,
                invested_amount: options.amount.unwrap_or(config.analysis.default_amount),
                projection_years: options.years.unwrap_or(config.analysis.default_years),
                period: options.period.unwrap_or(config.analysis.lookback),
            };
            cli::analyze::run(
                &request,
                &config.analysis.settings(),
                &provider,
                &provider,
                options.json,
            )
            .await
        }
    }
}
