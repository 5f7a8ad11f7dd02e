//! Resolves a user supplied ticker to a listed symbol with price history.

use crate::core::error::{AnalysisError, AnalysisResult};
use crate::core::price::{HistoricalPeriod, PriceHistoryProvider, PriceSeries};
use tracing::{debug, info};

/// Order in which symbol spellings are tried.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePolicy {
    pub exchange_suffixes: Vec<String>,
    pub include_bare_symbol: bool,
}

impl Default for CandidatePolicy {
    fn default() -> Self {
        Self {
            exchange_suffixes: vec![".NS".to_string(), ".BO".to_string()],
            include_bare_symbol: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedHistory {
    pub symbol: String,
    pub prices: PriceSeries,
}

/// Expands `ticker` into the symbols to try, exchange suffixed forms first.
pub fn candidate_symbols(ticker: &str, policy: &CandidatePolicy) -> AnalysisResult<Vec<String>> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AnalysisError::InvalidInput("ticker is empty".to_string()));
    }

    let mut candidates: Vec<String> = policy
        .exchange_suffixes
        .iter()
        .map(|suffix| format!("{ticker}{}", suffix.trim().to_uppercase()))
        .collect();
    if policy.include_bare_symbol {
        candidates.push(ticker);
    }

    let mut seen = std::collections::HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));

    if candidates.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "no candidate symbols configured".to_string(),
        ));
    }
    Ok(candidates)
}

/// Returns the first candidate with a non-empty history. Provider errors are
/// treated as "try the next candidate".
pub async fn resolve_history(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    ticker: &str,
    period: HistoricalPeriod,
    policy: &CandidatePolicy,
) -> AnalysisResult<ResolvedHistory> {
    for symbol in candidate_symbols(ticker, policy)? {
        match provider.fetch_history(&symbol, period).await {
            Ok(prices) if !prices.is_empty() => {
                info!(%symbol, points = prices.len(), "Resolved price history");
                return Ok(ResolvedHistory { symbol, prices });
            }
            Ok(_) => debug!(%symbol, "Empty price history, trying next candidate"),
            Err(e) => debug!(%symbol, error = %e, "History fetch failed, trying next candidate"),
        }
    }

    Err(AnalysisError::NoData {
        ticker: ticker.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::price::PricePoint;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Canned {
        Data(f64),
        Empty,
        Fail,
    }

    struct MockHistoryProvider {
        responses: HashMap<String, Canned>,
        calls: Mutex<Vec<String>>,
    }

    impl MockHistoryProvider {
        fn new(responses: Vec<(&str, Canned)>) -> Self {
            Self {
                responses: responses
                    .into_iter()
                    .map(|(s, c)| (s.to_string(), c))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceHistoryProvider for MockHistoryProvider {
        async fn fetch_history(&self, symbol: &str, _: HistoricalPeriod) -> Result<PriceSeries> {
            self.calls.lock().unwrap().push(symbol.to_string());
            match self.responses.get(symbol) {
                Some(Canned::Data(price)) => Ok(PriceSeries::new(vec![PricePoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                    price: *price,
                }])),
                Some(Canned::Empty) | None => Ok(PriceSeries::default()),
                Some(Canned::Fail) => Err(anyhow!("HTTP error: 404 Not Found")),
            }
        }
    }

    #[test]
    fn candidates_prefer_exchange_suffixes() {
        let candidates = candidate_symbols("  infy ", &CandidatePolicy::default()).unwrap();
        assert_eq!(candidates, vec!["INFY.NS", "INFY.BO", "INFY"]);
    }

    #[test]
    fn candidates_without_bare_symbol() {
        let policy = CandidatePolicy {
            exchange_suffixes: vec![".ns".to_string(), ".NS".to_string()],
            include_bare_symbol: false,
        };
        assert_eq!(candidate_symbols("tcs", &policy).unwrap(), vec!["TCS.NS"]);
    }

    #[test]
    fn empty_ticker_is_rejected() {
        let result = candidate_symbols("   ", &CandidatePolicy::default());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn skips_empty_candidate() {
        let provider = MockHistoryProvider::new(vec![
            ("HDFCBANK.NS", Canned::Empty),
            ("HDFCBANK.BO", Canned::Data(1500.0)),
            ("HDFCBANK", Canned::Data(20.0)),
        ]);

        let resolved = resolve_history(
            &provider,
            "hdfcbank",
            HistoricalPeriod::FiveYears,
            &CandidatePolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(resolved.symbol, "HDFCBANK.BO");
        assert_eq!(resolved.prices.last().unwrap().price, 1500.0);
        assert_eq!(provider.calls(), vec!["HDFCBANK.NS", "HDFCBANK.BO"]);
    }

    #[tokio::test]
    async fn swallows_provider_errors() {
        let provider = MockHistoryProvider::new(vec![
            ("AAPL.NS", Canned::Fail),
            ("AAPL.BO", Canned::Fail),
            ("AAPL", Canned::Data(190.0)),
        ]);

        let resolved = resolve_history(
            &provider,
            "AAPL",
            HistoricalPeriod::OneYear,
            &CandidatePolicy::default(),
        )
        .await
        .unwrap();

        assert_eq!(resolved.symbol, "AAPL");
    }

    #[tokio::test]
    async fn reports_no_data_with_requested_ticker() {
        let provider = MockHistoryProvider::new(vec![
            ("NOPE.NS", Canned::Fail),
            ("NOPE.BO", Canned::Empty),
        ]);

        let err = resolve_history(
            &provider,
            " nope",
            HistoricalPeriod::FiveYears,
            &CandidatePolicy::default(),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::NoData {
                ticker: "nope".to_string()
            }
        );
        assert_eq!(err.to_string(), "No price data available for nope");
        assert_eq!(provider.calls().len(), 3);
    }
}
