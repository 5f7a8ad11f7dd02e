use crate::core::analysis::AnalysisSettings;
use crate::core::price::HistoricalPeriod;
use crate::core::projection::DEFAULT_WARNING_CAP;
use crate::core::resolver::CandidatePolicy;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: DEFAULT_YAHOO_BASE_URL.to_string(),
            }),
        }
    }
}

impl ProvidersConfig {
    pub fn yahoo_base_url(&self) -> &str {
        self.yahoo
            .as_ref()
            .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Fractional CAGR above which projections carry a warning.
    pub warning_cap: f64,
    pub lookback: HistoricalPeriod,
    pub default_amount: f64,
    pub default_years: u32,
    pub exchange_suffixes: Vec<String>,
    pub include_bare_symbol: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let candidates = CandidatePolicy::default();
        AnalysisConfig {
            warning_cap: DEFAULT_WARNING_CAP,
            lookback: HistoricalPeriod::FiveYears,
            default_amount: 100_000.0,
            default_years: 5,
            exchange_suffixes: candidates.exchange_suffixes,
            include_bare_symbol: candidates.include_bare_symbol,
        }
    }
}

impl AnalysisConfig {
    pub fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            warning_cap: self.warning_cap,
            candidates: CandidatePolicy {
                exchange_suffixes: self.exchange_suffixes.clone(),
                include_bare_symbol: self.include_bare_symbol,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    /// Loads the config from the default location, falling back to built-in
    /// defaults when no file exists there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "portfoliolens", "portfolio-lens")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
