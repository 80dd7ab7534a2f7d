//! Dimension resolvers: lookup-or-create for symbols and periods.
//!
//! Both resolvers query the natural key first and only insert when the row is
//! absent, so a re-run over the same dimensions inserts nothing. The generated
//! id of a new row comes from [`InsertReturningId`].

use chrono::NaiveDate;
use diesel::prelude::*;
use fundamentals_ingestor::models::period::PeriodType;
use tracing::debug;

use crate::{
    db::store::{InsertReturningId, Session},
    error::{StoreResult, ValidationError},
    models::{NewPeriod, NewSymbol},
    schema::{financial_periods, symbols},
};

/// Trim and upper-case a ticker; reject it when nothing is left.
pub fn normalize_ticker(raw: &str) -> Result<String, ValidationError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(ValidationError::EmptyTicker);
    }
    Ok(ticker)
}

/// Parse textual period-type input (`"annual"`, `"quarter"`).
pub fn parse_period_type(raw: &str) -> Result<PeriodType, ValidationError> {
    Ok(raw.parse::<PeriodType>()?)
}

/// Id of the symbol for `ticker`, creating the row when it does not exist.
pub fn resolve_symbol(session: &mut Session<'_>, ticker: &str) -> StoreResult<i32> {
    let ticker = normalize_ticker(ticker)?;

    let existing = symbols::table
        .filter(symbols::ticker.eq(&ticker))
        .select(symbols::id)
        .first::<i32>(session.conn())
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = NewSymbol { ticker: &ticker, name: None }.insert_and_get_id(session)?;
    debug!(%ticker, id, "created symbol");
    Ok(id)
}

/// Set the company name of a symbol whose name is still unknown.
///
/// Returns `true` when a row was updated. An existing name is never replaced.
pub fn backfill_symbol_name(session: &mut Session<'_>, symbol_id: i32, name: &str) -> StoreResult<bool> {
    let name = name.trim();
    if name.is_empty() {
        return Ok(false);
    }
    let updated = diesel::update(
        symbols::table
            .filter(symbols::id.eq(symbol_id))
            .filter(symbols::name.is_null()),
    )
    .set(symbols::name.eq(name))
    .execute(session.conn())?;
    Ok(updated > 0)
}

/// Id of the `(symbol, period type, period end)` period, creating it when absent.
pub fn resolve_period(
    session: &mut Session<'_>,
    symbol_id: i32,
    period_type: PeriodType,
    period_end: NaiveDate,
) -> StoreResult<i32> {
    let existing = financial_periods::table
        .filter(financial_periods::symbol_id.eq(symbol_id))
        .filter(financial_periods::period_type.eq(period_type.as_str()))
        .filter(financial_periods::period_end.eq(period_end))
        .select(financial_periods::id)
        .first::<i32>(session.conn())
        .optional()?;
    if let Some(id) = existing {
        return Ok(id);
    }

    let id = NewPeriod {
        symbol_id,
        period_type: period_type.as_str(),
        period_end,
    }
    .insert_and_get_id(session)?;
    debug!(symbol_id, %period_type, %period_end, id, "created period");
    Ok(id)
}
