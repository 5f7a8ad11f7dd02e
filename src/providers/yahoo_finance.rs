use crate::core::price::{
    HistoricalPeriod, MetadataProvider, PriceHistoryProvider, PricePoint, PriceSeries,
    SymbolMetadata,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use tracing::{debug, instrument};

const USER_AGENT: &str = "portfolio-lens/0.1";

/// Converts a bar timestamp to the exchange-local trading date.
fn trading_date(ts: i64, gmt_offset: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(ts.checked_add(gmt_offset)?, 0)
        .single()
        .map(|dt| dt.date_naive())
}

fn extract_price_series(item: &ChartItem) -> PriceSeries {
    let Some(timestamps) = item.timestamp.as_ref() else {
        return PriceSeries::default();
    };
    let closes = item.indicators.as_ref().and_then(|inds| {
        inds.adjclose
            .as_ref()
            .and_then(|adj| adj.first())
            .and_then(|a| a.adjclose.as_ref())
            .or_else(|| inds.quote.first().and_then(|q| q.close.as_ref()))
    });
    let Some(closes) = closes else {
        return PriceSeries::default();
    };

    let gmt_offset = item.meta.gmt_offset.unwrap_or(0);
    let points = timestamps
        .iter()
        .zip(closes.iter())
        .filter_map(|(ts, close)| {
            let price = (*close)?;
            let date = trading_date(*ts, gmt_offset)?;
            Some(PricePoint { date, price })
        })
        .collect();

    PriceSeries::new(points)
}

pub struct YahooFinanceProvider {
    base_url: String,
}

impl YahooFinanceProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFinanceProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn client() -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
    }

    async fn fetch_chart(&self, symbol: &str, range: &str) -> Result<Option<ChartItem>> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range={}&events=div%2Csplit",
            self.base_url, symbol, range
        );
        debug!("Requesting chart data from {}", url);

        let response = Self::client()?
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for symbol: {} URL: {}", e, symbol, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for symbol: {}",
                response.status(),
                symbol
            ));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", symbol, e))?;

        if let Some(err) = data.chart.error {
            return Err(anyhow!(
                "Yahoo error for {}: {} ({})",
                symbol,
                err.description.unwrap_or_default(),
                err.code.unwrap_or_default()
            ));
        }

        Ok(data.chart.result.and_then(|r| r.into_iter().next()))
    }

    async fn fetch_sector(&self, symbol: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile",
            self.base_url, symbol
        );
        debug!("Requesting asset profile from {}", url);

        let response = Self::client()?
            .get(&url)
            .send()
            .await
            .context("Asset profile request failed")?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for asset profile: {}",
                response.status(),
                symbol
            ));
        }

        let data = response
            .json::<QuoteSummaryResponse>()
            .await
            .context("Failed to parse asset profile response")?;

        Ok(data
            .quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .and_then(|item| item.asset_profile)
            .and_then(|profile| profile.sector)
            .filter(|sector| !sector.is_empty()))
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Option<Vec<ChartItem>>,
    error: Option<YahooError>,
}

#[derive(Deserialize, Debug)]
struct YahooError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct ChartMeta {
    currency: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "chartPreviousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "gmtoffset")]
    gmt_offset: Option<i64>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct AdjClose {
    adjclose: Option<Vec<Option<f64>>>,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryResult,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryResult {
    result: Option<Vec<QuoteSummaryItem>>,
}

#[derive(Deserialize, Debug)]
struct QuoteSummaryItem {
    #[serde(rename = "assetProfile")]
    asset_profile: Option<AssetProfile>,
}

#[derive(Deserialize, Debug)]
struct AssetProfile {
    sector: Option<String>,
}

#[async_trait]
impl PriceHistoryProvider for YahooFinanceProvider {
    #[instrument(
        name = "YahooHistoryFetch",
        skip(self),
        fields(symbol = %symbol, period = %period)
    )]
    async fn fetch_history(&self, symbol: &str, period: HistoricalPeriod) -> Result<PriceSeries> {
        let series = match self.fetch_chart(symbol, period.as_range()).await? {
            Some(item) => extract_price_series(&item),
            None => PriceSeries::default(),
        };
        debug!(points = series.len(), "Received Yahoo history");
        Ok(series)
    }
}

#[async_trait]
impl MetadataProvider for YahooFinanceProvider {
    #[instrument(name = "YahooMetadataFetch", skip(self), fields(symbol = %symbol))]
    async fn fetch_metadata(&self, symbol: &str) -> Result<SymbolMetadata> {
        let item = self
            .fetch_chart(symbol, "1d")
            .await?
            .ok_or_else(|| anyhow!("No quote data found for symbol: {}", symbol))?;

        let sector = match self.fetch_sector(symbol).await {
            Ok(sector) => sector,
            Err(e) => {
                debug!(error = %e, "Sector lookup failed");
                None
            }
        };

        Ok(SymbolMetadata {
            short_name: item.meta.short_name,
            sector,
            currency: item.meta.currency,
            previous_close: item.meta.previous_close,
        })
    }
}
