//! Read side: what consumers of the store query.
//!
//! Metrics are read by `(ticker, period type, metric codes)`, peer relations
//! by `(ticker, kind)` with decoded payloads.

use std::fmt;

use chrono::NaiveDate;
use diesel::prelude::*;
use fundamentals_ingestor::models::{Payload, peer::PeerKind, period::PeriodType};

use crate::{
    db::connection::DbConnection,
    error::StoreResult,
    models::Symbol,
    resolve::normalize_ticker,
    schema::{
        analyst_estimates, financial_metrics, financial_periods, peer_operating, peer_trading, price_targets,
        symbols,
    },
};

/// One metric value of one period.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricObservation {
    /// End of the period the value belongs to.
    pub period_end: NaiveDate,
    /// Metric code.
    pub metric_code: String,
    /// Value, `None` when stored as NULL.
    pub value: Option<f64>,
}

/// A stored peer relation with its payload decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct PeerRelation {
    /// Peer ticker.
    pub peer_ticker: String,
    /// Decoded payload.
    pub payload: Payload,
}

/// The symbol row for `ticker`, if it was ever ingested.
pub fn find_symbol(conn: &mut DbConnection, ticker: &str) -> StoreResult<Option<Symbol>> {
    let ticker = normalize_ticker(ticker)?;
    Ok(symbols::table
        .filter(symbols::ticker.eq(&ticker))
        .select(Symbol::as_select())
        .first(conn)
        .optional()?)
}

/// Metric rows of `ticker` for one period type, newest period first.
///
/// `codes` restricts the metric codes returned (filtered in SQL); an empty
/// slice returns all.
/// Within a period, rows keep insertion order, so repeated runs show up as
/// repeated codes.
pub fn metrics_for(
    conn: &mut DbConnection,
    ticker: &str,
    period_type: PeriodType,
    codes: &[&str],
) -> StoreResult<Vec<MetricObservation>> {
    let ticker = normalize_ticker(ticker)?;
    let mut query = financial_metrics::table
        .inner_join(financial_periods::table.inner_join(symbols::table))
        .filter(symbols::ticker.eq(&ticker))
        .filter(financial_periods::period_type.eq(period_type.as_str()))
        .order((financial_periods::period_end.desc(), financial_metrics::id.asc()))
        .select((
            financial_periods::period_end,
            financial_metrics::metric_code,
            financial_metrics::value,
        ))
        .into_boxed::<<DbConnection as Connection>::Backend>();
    if !codes.is_empty() {
        query = query.filter(financial_metrics::metric_code.eq_any(codes.iter().copied()));
    }
    let rows: Vec<(NaiveDate, String, Option<f64>)> = query.load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(period_end, metric_code, value)| MetricObservation {
            period_end,
            metric_code,
            value,
        })
        .collect())
}

/// Peer relations of `ticker` of one kind, in insertion order.
pub fn peers_for(conn: &mut DbConnection, ticker: &str, kind: PeerKind) -> StoreResult<Vec<PeerRelation>> {
    let ticker = normalize_ticker(ticker)?;
    let rows: Vec<(String, String)> = match kind {
        PeerKind::Operating => peer_operating::table
            .inner_join(symbols::table)
            .filter(symbols::ticker.eq(&ticker))
            .order(peer_operating::id.asc())
            .select((peer_operating::peer_ticker, peer_operating::payload))
            .load(conn)?,
        PeerKind::Trading => peer_trading::table
            .inner_join(symbols::table)
            .filter(symbols::ticker.eq(&ticker))
            .order(peer_trading::id.asc())
            .select((peer_trading::peer_ticker, peer_trading::payload))
            .load(conn)?,
    };

    rows.into_iter()
        .map(|(peer_ticker, payload)| -> StoreResult<PeerRelation> {
            Ok(PeerRelation {
                peer_ticker,
                payload: serde_json::from_str(&payload)?,
            })
        })
        .collect()
}

/// Tables of the store, for row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    /// `symbols`
    Symbols,
    /// `financial_periods`
    Periods,
    /// `financial_metrics`
    Metrics,
    /// `analyst_estimates`
    Estimates,
    /// `peer_operating`
    PeerOperating,
    /// `peer_trading`
    PeerTrading,
    /// `price_targets`
    PriceTargets,
}

impl Table {
    /// Every table, dimensions first.
    pub const ALL: [Table; 7] = [
        Table::Symbols,
        Table::Periods,
        Table::Metrics,
        Table::Estimates,
        Table::PeerOperating,
        Table::PeerTrading,
        Table::PriceTargets,
    ];

    /// SQL table name.
    pub const fn name(self) -> &'static str {
        match self {
            Table::Symbols => "symbols",
            Table::Periods => "financial_periods",
            Table::Metrics => "financial_metrics",
            Table::Estimates => "analyst_estimates",
            Table::PeerOperating => "peer_operating",
            Table::PeerTrading => "peer_trading",
            Table::PriceTargets => "price_targets",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of rows in `table`.
pub fn count_rows(conn: &mut DbConnection, table: Table) -> StoreResult<i64> {
    let count = match table {
        Table::Symbols => symbols::table.count().get_result(conn)?,
        Table::Periods => financial_periods::table.count().get_result(conn)?,
        Table::Metrics => financial_metrics::table.count().get_result(conn)?,
        Table::Estimates => analyst_estimates::table.count().get_result(conn)?,
        Table::PeerOperating => peer_operating::table.count().get_result(conn)?,
        Table::PeerTrading => peer_trading::table.count().get_result(conn)?,
        Table::PriceTargets => price_targets::table.count().get_result(conn)?,
    };
    Ok(count)
}
