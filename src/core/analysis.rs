//! Ties history resolution, metadata lookup and projections into a single report.
use crate::core::error::{AnalysisError, AnalysisResult};
use crate::core::price::{
    HistoricalPeriod, MetadataProvider, PriceHistoryProvider, PriceSeries, SymbolMetadata,
};
use crate::core::projection::{self, ProjectionEntry};
use crate::core::resolver::{self, CandidatePolicy};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Placeholder shown when best-effort metadata is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub ticker: String,
    pub invested_amount: f64,
    pub projection_years: u32,
    pub period: HistoricalPeriod,
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub warning_cap: f64,
    pub candidates: CandidatePolicy,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            warning_cap: projection::DEFAULT_WARNING_CAP,
            candidates: CandidatePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Historical,
    Projected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub kind: PointKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub requested_ticker: String,
    pub ticker: String,
    pub short_name: Option<String>,
    pub sector: String,
    pub currency: String,
    pub previous_close: Option<f64>,
    pub period: HistoricalPeriod,
    pub cagr_pct: f64,
    pub buy_price: f64,
    pub invested_amount: f64,
    pub projections: Vec<ProjectionEntry>,
    pub warning: Option<String>,
    pub chart: Vec<ChartPoint>,
}

fn validate(request: &AnalysisRequest) -> AnalysisResult<()> {
    if !request.invested_amount.is_finite() || request.invested_amount <= 0.0 {
        return Err(AnalysisError::InvalidInput(format!(
            "investment amount must be positive, got {}",
            request.invested_amount
        )));
    }
    if request.projection_years == 0
        || request.projection_years > projection::MAX_PROJECTION_YEARS
    {
        return Err(AnalysisError::InvalidInput(format!(
            "projection years must be between 1 and {}, got {}",
            projection::MAX_PROJECTION_YEARS,
            request.projection_years
        )));
    }
    Ok(())
}

/// Historical closes followed by one projected point per year, each placed
/// 365 days after the previous one.
pub fn chart_series(prices: &PriceSeries, projections: &[ProjectionEntry]) -> Vec<ChartPoint> {
    let mut chart: Vec<ChartPoint> = prices
        .points()
        .iter()
        .map(|p| ChartPoint {
            date: p.date,
            price: p.price,
            kind: PointKind::Historical,
        })
        .collect();

    if let Some(last) = prices.last() {
        chart.extend(projections.iter().map(|entry| ChartPoint {
            date: last.date + Duration::days(365 * i64::from(entry.year)),
            price: entry.projected_price,
            kind: PointKind::Projected,
        }));
    }
    chart
}

/// Runs a full analysis for one ticker.
///
/// History resolution failures surface as [`AnalysisError::NoData`]; metadata
/// failures are logged and replaced by [`NOT_AVAILABLE`] placeholders.
pub async fn analyze_stock(
    history_provider: &(dyn PriceHistoryProvider + Send + Sync),
    metadata_provider: &(dyn MetadataProvider + Send + Sync),
    request: &AnalysisRequest,
    settings: &AnalysisSettings,
) -> AnalysisResult<AnalysisReport> {
    validate(request)?;
    info!(ticker = %request.ticker, period = %request.period, "Analyzing stock");

    let resolved = resolver::resolve_history(
        history_provider,
        &request.ticker,
        request.period,
        &settings.candidates,
    )
    .await?;

    let metadata = match metadata_provider.fetch_metadata(&resolved.symbol).await {
        Ok(metadata) => metadata,
        Err(e) => {
            warn!(symbol = %resolved.symbol, error = %e, "Metadata unavailable");
            SymbolMetadata::default()
        }
    };
    debug!(?metadata, "Symbol metadata");

    let cagr = projection::compute_cagr(&resolved.prices)?;
    let current_price = resolved
        .prices
        .last()
        .map(|p| p.price)
        .ok_or_else(|| AnalysisError::InsufficientData("price series is empty".to_string()))?;

    let projections = projection::project(
        current_price,
        cagr,
        request.invested_amount,
        request.projection_years,
    );
    let chart = chart_series(&resolved.prices, &projections);

    Ok(AnalysisReport {
        requested_ticker: request.ticker.trim().to_string(),
        ticker: resolved.symbol,
        short_name: metadata.short_name,
        sector: metadata
            .sector
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        currency: metadata
            .currency
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        previous_close: metadata.previous_close,
        period: request.period,
        cagr_pct: projection::round2(cagr * 100.0),
        buy_price: projection::round2(current_price),
        invested_amount: request.invested_amount,
        projections,
        warning: projection::cagr_warning(cagr, settings.warning_cap),
        chart,
    })
}
