//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`] for use with Diesel’s Queryable/Insertable APIs:
//! - [`crate::schema::symbols`]: one row per ticker, root of everything else
//! - [`crate::schema::financial_periods`]: (symbol, period type, period end) dimension
//! - [`crate::schema::financial_metrics`]: append-only metric facts per period
//! - [`crate::schema::analyst_estimates`]: write-once forward estimates per fiscal year
//! - [`crate::schema::peer_operating`] / [`crate::schema::peer_trading`]: write-once peer payloads
//! - [`crate::schema::price_targets`]: append-only broker observations
//!
//! Payload columns hold a JSON object of metric code to nullable number.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

/// A row in [`crate::schema::symbols`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Selectable)]
#[diesel(table_name = symbols, check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
pub struct Symbol {
    /// Database primary key.
    pub id: i32,
    /// Upper-case ticker, globally unique.
    pub ticker: String,
    /// Optional company name; the only column ever backfilled.
    pub name: Option<String>,
}

/// Insertable form of [`Symbol`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = symbols)]
pub struct NewSymbol<'a> {
    /// Upper-case ticker.
    pub ticker: &'a str,
    /// Optional company name.
    pub name: Option<&'a str>,
}

/// A row in [`crate::schema::financial_periods`]. Never updated once created.
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = financial_periods, check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
#[diesel(belongs_to(Symbol, foreign_key = symbol_id))]
pub struct Period {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Symbol::id`].
    pub symbol_id: i32,
    /// `"annual"` or `"quarter"`.
    pub period_type: String,
    /// Period end date.
    pub period_end: NaiveDate,
}

/// Insertable form of [`Period`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = financial_periods)]
pub struct NewPeriod<'a> {
    /// FK to [`Symbol::id`].
    pub symbol_id: i32,
    /// `"annual"` or `"quarter"`.
    pub period_type: &'a str,
    /// Period end date.
    pub period_end: NaiveDate,
}

/// A row in [`crate::schema::financial_metrics`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = financial_metrics, check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
#[diesel(belongs_to(Period, foreign_key = period_id))]
pub struct Metric {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Period::id`].
    pub period_id: i32,
    /// Metric code, e.g. `"revenue"`.
    pub metric_code: String,
    /// Value; `None` when the batch column was present but null.
    pub value: Option<f64>,
}

/// Insertable form of [`Metric`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = financial_metrics)]
pub struct NewMetric<'a> {
    /// FK to [`Period::id`].
    pub period_id: i32,
    /// Metric code.
    pub metric_code: &'a str,
    /// Nullable value.
    pub value: Option<f64>,
}

/// A row in [`crate::schema::analyst_estimates`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = analyst_estimates, check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
#[diesel(belongs_to(Symbol, foreign_key = symbol_id))]
pub struct Estimate {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Symbol::id`].
    pub symbol_id: i32,
    /// Fiscal year the projection is for.
    pub fiscal_year: i32,
    /// JSON payload.
    pub payload: String,
}

/// Insertable form of [`Estimate`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = analyst_estimates)]
pub struct NewEstimate<'a> {
    /// FK to [`Symbol::id`].
    pub symbol_id: i32,
    /// Fiscal year.
    pub fiscal_year: i32,
    /// JSON payload.
    pub payload: &'a str,
}

/// A row of [`crate::schema::price_targets`].
#[derive(Debug, Clone, PartialEq, Queryable, Identifiable, Associations, Selectable)]
#[diesel(table_name = price_targets, check_for_backend(diesel::sqlite::Sqlite, diesel::pg::Pg))]
#[diesel(belongs_to(Symbol, foreign_key = symbol_id))]
pub struct PriceTarget {
    /// Database primary key.
    pub id: i32,
    /// FK to [`Symbol::id`].
    pub symbol_id: i32,
    /// Research house.
    pub broker: Option<String>,
    /// Analyst name.
    pub analyst: Option<String>,
    /// Publication date.
    pub research_date: Option<NaiveDate>,
    /// Target price.
    pub target_px: f64,
    /// `"up"`, `"down"` or `"same"`.
    pub direction: String,
}

/// Insertable form of [`PriceTarget`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = price_targets)]
pub struct NewPriceTarget<'a> {
    /// FK to [`Symbol::id`].
    pub symbol_id: i32,
    /// Research house.
    pub broker: Option<&'a str>,
    /// Analyst name.
    pub analyst: Option<&'a str>,
    /// Publication date.
    pub research_date: Option<NaiveDate>,
    /// Target price.
    pub target_px: f64,
    /// Normalized direction code.
    pub direction: &'a str,
}

/// Closed set of price-target directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Target raised.
    Up,
    /// Target lowered.
    Down,
    /// Unchanged, or anything the provider sent that is not `up`/`down`.
    Same,
}

impl Direction {
    /// Map a raw provider token: literal `"up"` and `"down"` keep their
    /// meaning, everything else (including missing) is `Same`.
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some("up") => Direction::Up,
            Some("down") => Direction::Down,
            _ => Direction::Same,
        }
    }

    /// Database code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Same => "same",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    /// Strict parse of a stored code; use [`Direction::normalize`] for provider input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "same" => Ok(Direction::Same),
            other => Err(format!("unknown direction code {other:?}")),
        }
    }
}
