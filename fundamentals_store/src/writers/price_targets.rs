//! Append-only broker price targets.

use diesel::prelude::*;
use fundamentals_ingestor::models::price_target::PriceTargetRow;
use tracing::{debug, warn};

use crate::{
    db::store::Session,
    error::{StoreResult, ValidationError},
    models::{Direction, NewPriceTarget},
    schema::price_targets,
    writers::{Batch, RowRejection},
};

/// Counters of one price-target batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTargetSummary {
    /// Rows inserted.
    pub inserted: usize,
    /// Aggregate rows (analyst `SUMMARY`) dropped.
    pub summaries_filtered: usize,
    /// Rows rejected by validation.
    pub rejected: Vec<RowRejection>,
}

/// Insert every non-aggregate row of `rows` for `symbol_id`.
///
/// Direction is normalized with [`Direction::normalize`]; a row without a
/// target price is rejected and the batch continues.
pub fn write_price_targets(
    session: &mut Session<'_>,
    symbol_id: i32,
    rows: &[PriceTargetRow],
) -> StoreResult<PriceTargetSummary> {
    let mut summary = PriceTargetSummary::default();
    for (index, row) in rows.iter().enumerate() {
        if row.is_summary() {
            summary.summaries_filtered += 1;
            continue;
        }
        let Some(target_px) = row.price_target else {
            warn!(symbol_id, index, broker = ?row.broker, "rejected price target without target price");
            summary.rejected.push(RowRejection {
                batch: Batch::PriceTargets,
                index,
                reason: ValidationError::MissingTargetPrice,
            });
            continue;
        };

        let direction = Direction::normalize(row.direction.as_deref());
        summary.inserted += diesel::insert_into(price_targets::table)
            .values(NewPriceTarget {
                symbol_id,
                broker: row.broker.as_deref(),
                analyst: row.analyst.as_deref(),
                research_date: row.published_date,
                target_px,
                direction: direction.as_str(),
            })
            .execute(session.conn())?;
    }
    debug!(symbol_id, inserted = summary.inserted, filtered = summary.summaries_filtered, "price targets written");
    Ok(summary)
}
