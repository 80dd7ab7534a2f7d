//! Forward analyst estimates, one row per fiscal year.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::Payload;

/// The fiscal year field could not be read as an integer year.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fiscal year {0} is not an integer")]
pub struct FiscalYearError(pub String);

/// One forward-estimate row as delivered by the provider.
///
/// The fiscal year is kept raw: providers send it as a number or a string,
/// and coercion is a per-row validation step (see [`coerce_fiscal_year`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateRow {
    /// Raw fiscal year (`2024`, `2024.0`, `"2024"`).
    pub fiscal_year: Value,
    /// Projected metrics, fiscal year excluded.
    pub values: Payload,
}

impl EstimateRow {
    /// Row with an integer fiscal year.
    pub fn new(fiscal_year: i32, values: Payload) -> Self {
        Self {
            fiscal_year: Value::from(fiscal_year),
            values,
        }
    }

    /// The fiscal year coerced to an integer.
    pub fn fiscal_year(&self) -> Result<i32, FiscalYearError> {
        coerce_fiscal_year(&self.fiscal_year)
    }
}

/// Coerce a raw JSON value into a fiscal year.
///
/// Accepts integers, floats without a fractional part and strings holding
/// either. Anything else, including out-of-range numbers, is rejected.
pub fn coerce_fiscal_year(raw: &Value) -> Result<i32, FiscalYearError> {
    let err = || FiscalYearError(raw.to_string());
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i32::try_from(i).map_err(|_| err())
            } else {
                n.as_f64().and_then(integral_f64).ok_or_else(err)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral_f64))
                .ok_or_else(err)
        }
        _ => Err(err()),
    }
}

fn integral_f64(f: f64) -> Option<i32> {
    if f.is_finite() && f.fract() == 0.0 && f >= i32::MIN as f64 && f <= i32::MAX as f64 {
        Some(f as i32)
    } else {
        None
    }
}
