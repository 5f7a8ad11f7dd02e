//! Core business logic abstractions

pub mod analysis;
pub mod config;
pub mod error;
pub mod log;
pub mod price;
pub mod projection;
pub mod resolver;

// Re-export main types for cleaner imports
pub use analysis::{AnalysisReport, AnalysisRequest, AnalysisSettings, analyze_stock};
pub use error::AnalysisError;
pub use price::{HistoricalPeriod, MetadataProvider, PriceHistoryProvider, PriceSeries};
