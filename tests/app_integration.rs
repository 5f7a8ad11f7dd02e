use portfolio_lens::cli::analyze::render_report;
use portfolio_lens::core::analysis::{AnalysisRequest, analyze_stock};
use portfolio_lens::providers::yahoo_finance::YahooFinanceProvider;
use std::fs;
use tracing::{error, info};

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn mount_chart(server: &MockServer, symbol: &str, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/v8/finance/chart/{symbol}")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server)
            .await;
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        providers:
          yahoo:
            base_url: {base_url}
        analysis:
          warning_cap: 0.15
          default_years: 3
    "#
        );
        std::fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

fn history_response(ts_start: i64, ts_end: i64, first: f64, last: f64) -> String {
    format!(
        r#"{{
            "chart": {{
                "result": [{{
                    "meta": {{"currency": "INR", "chartPreviousClose": {last}}},
                    "timestamp": [{ts_start}, {ts_end}],
                    "indicators": {{
                        "quote": [{{"close": [{first}, {last}]}}],
                        "adjclose": [{{"adjclose": [{first}, {last}]}}]
                    }}
                }}],
                "error": null
            }}
        }}"#
    )
}

#[test_log::test(tokio::test)]
async fn test_analysis_falls_through_to_bse_listing() {
    use portfolio_lens::core::HistoricalPeriod;
    use portfolio_lens::core::analysis::AnalysisSettings;

    let mock_server = wiremock::MockServer::start().await;
    test_utils::mount_chart(&mock_server, "SOMEBSE.NS", 404, r#"{"chart": {"result": null}}"#)
        .await;
    let body = history_response(1_577_849_400, 1_577_849_400 + 730 * 86_400, 100.0, 144.0);
    test_utils::mount_chart(&mock_server, "SOMEBSE.BO", 200, &body).await;

    let provider = YahooFinanceProvider::new(&mock_server.uri());
    let request = AnalysisRequest {
        ticker: "somebse".to_string(),
        invested_amount: 10_000.0,
        projection_years: 4,
        period: HistoricalPeriod::FiveYears,
    };

    let report = analyze_stock(&provider, &provider, &request, &AnalysisSettings::default())
        .await
        .expect("analysis should succeed");
    info!(?report, "Analysis report");

    assert_eq!(report.ticker, "SOMEBSE.BO");
    assert_eq!(report.currency, "INR");
    assert_eq!(report.sector, "N/A");
    assert_eq!(report.cagr_pct, 20.0);
    assert_eq!(report.buy_price, 144.0);
    assert_eq!(
        report.projections.iter().map(|p| p.year).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert_eq!(report.projections[0].profit_amount, 2000.0);
    assert_eq!(report.warning.as_deref(), Some("CAGR 20.00% > 15% cap"));
    assert_eq!(report.chart.len(), 6);
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let mock_server = wiremock::MockServer::start().await;
    let body = history_response(1_577_849_400, 1_577_849_400 + 1825 * 86_400, 500.0, 1000.0);
    test_utils::mount_chart(&mock_server, "HDFCBANK.NS", 200, &body).await;

    let config_file = test_utils::write_config(&mock_server.uri());

    for json in [false, true] {
        let result = portfolio_lens::run_command(
            portfolio_lens::AppCommand::Analyze(portfolio_lens::AnalyzeOptions {
                ticker: "HDFCBANK".to_string(),
                amount: Some(100_000.0),
                json,
                ..Default::default()
            }),
            Some(config_file.path().to_str().unwrap()),
        )
        .await;
        assert!(
            result.is_ok(),
            "Main function failed with: {:?}",
            result.err()
        );
    }

    // Same request and settings the command resolved from the config file.
    let config =
        portfolio_lens::core::config::AppConfig::load_from_path(config_file.path()).unwrap();
    let provider = YahooFinanceProvider::new(config.providers.yahoo_base_url());
    let request = AnalysisRequest {
        ticker: "HDFCBANK".to_string(),
        invested_amount: 100_000.0,
        projection_years: config.analysis.default_years,
        period: config.analysis.lookback,
    };
    let report = analyze_stock(&provider, &provider, &request, &config.analysis.settings())
        .await
        .expect("analysis should succeed");

    let json = render_report(&report, true).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["ticker"], "HDFCBANK.NS");
    assert_eq!(value["requested_ticker"], "HDFCBANK");
    assert_eq!(value["projections"].as_array().unwrap().len(), 3);
    let cagr_pct = value["cagr_pct"].as_f64().unwrap();
    assert!((cagr_pct - 14.87).abs() < 0.01, "got {cagr_pct}");
    assert!(value["warning"].is_null());
    assert_eq!(value["chart"].as_array().unwrap().len(), 2 + 3);

    console::set_colors_enabled(false);
    let text = render_report(&report, false).unwrap();
    assert!(text.contains("Analysis for HDFCBANK.NS"));
    assert!(text.contains("14.87%"));
    assert!(text.contains("Future Year-by-Year Projections"));
    assert!(!text.contains("Warning"));
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_reports_missing_ticker() {
    let mock_server = wiremock::MockServer::start().await;
    for symbol in ["NOSUCH.NS", "NOSUCH.BO", "NOSUCH"] {
        test_utils::mount_chart(&mock_server, symbol, 200, r#"{"chart": {"result": []}}"#).await;
    }

    let config_file = test_utils::write_config(&mock_server.uri());

    let result = portfolio_lens::run_command(
        portfolio_lens::AppCommand::Analyze(portfolio_lens::AnalyzeOptions {
            ticker: "NOSUCH".to_string(),
            ..Default::default()
        }),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("analysis should fail without data");
    error!("Expected failure: {err}");
    assert_eq!(err.to_string(), "No price data available for NOSUCH");
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let missing = dir.path().join("absent.yaml");
    fs::metadata(&missing).expect_err("config should not exist");

    let result = portfolio_lens::run_command(
        portfolio_lens::AppCommand::Analyze(portfolio_lens::AnalyzeOptions {
            ticker: "INFY".to_string(),
            ..Default::default()
        }),
        Some(missing.to_str().unwrap()),
    )
    .await;

    assert!(result.is_err());
}
