//! Pricing abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Lookback window used when fetching price history.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
pub enum HistoricalPeriod {
    #[serde(rename = "1Y", alias = "1y")]
    OneYear,
    #[serde(rename = "2Y", alias = "2y")]
    TwoYears,
    #[default]
    #[serde(rename = "5Y", alias = "5y")]
    FiveYears,
    #[serde(rename = "10Y", alias = "10y")]
    TenYears,
    #[serde(rename = "MAX", alias = "max")]
    Max,
}

impl Display for HistoricalPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                HistoricalPeriod::OneYear => "1Y",
                HistoricalPeriod::TwoYears => "2Y",
                HistoricalPeriod::FiveYears => "5Y",
                HistoricalPeriod::TenYears => "10Y",
                HistoricalPeriod::Max => "MAX",
            }
        )
    }
}

impl HistoricalPeriod {
    /// Value of the `range` query parameter on the Yahoo chart endpoint.
    pub fn as_range(&self) -> &'static str {
        match self {
            HistoricalPeriod::OneYear => "1y",
            HistoricalPeriod::TwoYears => "2y",
            HistoricalPeriod::FiveYears => "5y",
            HistoricalPeriod::TenYears => "10y",
            HistoricalPeriod::Max => "max",
        }
    }
}

impl FromStr for HistoricalPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1Y" => Ok(HistoricalPeriod::OneYear),
            "2Y" => Ok(HistoricalPeriod::TwoYears),
            "5Y" => Ok(HistoricalPeriod::FiveYears),
            "10Y" => Ok(HistoricalPeriod::TenYears),
            "MAX" => Ok(HistoricalPeriod::Max),
            _ => Err(anyhow::anyhow!("Invalid historical period: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Daily close prices in ascending date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }
}

/// Best-effort descriptive data for a listed symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolMetadata {
    pub short_name: Option<String>,
    pub sector: Option<String>,
    pub currency: Option<String>,
    pub previous_close: Option<f64>,
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Returns the adjusted close series for `symbol`. An unknown symbol may yield
    /// either an error or an empty series.
    async fn fetch_history(&self, symbol: &str, period: HistoricalPeriod) -> Result<PriceSeries>;
}

#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch_metadata(&self, symbol: &str) -> Result<SymbolMetadata>;
}
