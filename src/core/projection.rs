//! CAGR estimation and compounding projections.
//!
//! The growth rate is computed once from the first and last close of a
//! [`PriceSeries`] and then applied unchanged to every projected year:
//! `price * (1 + cagr) ^ year`.

use crate::core::error::{AnalysisError, AnalysisResult};
use crate::core::price::PriceSeries;
use rust_decimal::{Decimal, MathematicalOps, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Growth rate above which a projection is flagged as optimistic.
pub const DEFAULT_WARNING_CAP: f64 = 0.15;

/// Longest supported projection horizon in years.
pub const MAX_PROJECTION_YEARS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionEntry {
    pub year: u32,
    pub projected_price: f64,
    pub profit_pct: f64,
    pub profit_amount: f64,
}

/// Rounds half away from zero to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fractional CAGR for a move from `first_price` to `last_price` over
/// `elapsed_days` calendar days.
pub fn cagr_from_span(first_price: f64, last_price: f64, elapsed_days: f64) -> AnalysisResult<f64> {
    for price in [first_price, last_price] {
        if !price.is_finite() || price <= 0.0 {
            return Err(AnalysisError::NonPositivePrice { price });
        }
    }
    if !elapsed_days.is_finite() || elapsed_days <= 0.0 {
        return Err(AnalysisError::ZeroElapsed);
    }

    let to_decimal = |value: f64, what: &str| {
        Decimal::from_f64(value)
            .ok_or_else(|| AnalysisError::Calculation(format!("Invalid {what}: {value}")))
    };
    let begin_bal = to_decimal(first_price, "first price")?;
    let end_bal = to_decimal(last_price, "last price")?;
    let n_years = to_decimal(elapsed_days / DAYS_PER_YEAR, "duration")?;
    if n_years.is_zero() {
        return Err(AnalysisError::ZeroElapsed);
    }

    // Short spans push the exponent far from 1, which can leave Decimal's range.
    let rate = (end_bal / begin_bal)
        .checked_powd(Decimal::ONE / n_years)
        .map(|growth| growth - Decimal::ONE)
        .ok_or_else(|| {
            AnalysisError::Calculation(format!(
                "CAGR out of range for {first_price} -> {last_price} over {elapsed_days} days"
            ))
        })?;
    debug!("cagr: {begin_bal}, {end_bal}, {n_years} = {rate}");
    rate.to_f64()
        .ok_or_else(|| AnalysisError::Calculation("CAGR conversion failed".to_string()))
}

/// CAGR implied by the first and last close of `prices`.
pub fn compute_cagr(prices: &PriceSeries) -> AnalysisResult<f64> {
    let (first, last) = match (prices.first(), prices.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            return Err(AnalysisError::InsufficientData(
                "price series is empty".to_string(),
            ));
        }
    };

    let elapsed_days = (last.date - first.date).num_days();
    cagr_from_span(first.price, last.price, elapsed_days as f64)
}

/// Year by year compounding projection for `projection_years` years, capped at
/// [`MAX_PROJECTION_YEARS`].
pub fn project(
    current_price: f64,
    cagr: f64,
    invested_amount: f64,
    projection_years: u32,
) -> Vec<ProjectionEntry> {
    (1..=projection_years.min(MAX_PROJECTION_YEARS))
        .map(|year| {
            let growth_factor = (1.0 + cagr).powi(year as i32);
            ProjectionEntry {
                year,
                projected_price: round2(current_price * growth_factor),
                profit_pct: round2((growth_factor - 1.0) * 100.0),
                profit_amount: round2(invested_amount * (growth_factor - 1.0)),
            }
        })
        .collect()
}

/// Message shown when `cagr` is strictly above `cap`.
pub fn cagr_warning(cagr: f64, cap: f64) -> Option<String> {
    (cagr > cap).then(|| format!("CAGR {:.2}% > {:.0}% cap", cagr * 100.0, cap * 100.0))
}
