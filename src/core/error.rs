//! Errors raised by the analysis core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("No price data available for {ticker}")]
    NoData { ticker: String },

    #[error("Elapsed time between first and last price is zero")]
    ZeroElapsed,

    #[error("Non-positive price {price} in CAGR calculation")]
    NonPositivePrice { price: f64 },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    Calculation(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
