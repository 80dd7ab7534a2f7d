//! Write-once analyst estimates.

use diesel::prelude::*;
use fundamentals_ingestor::models::{Payload, estimate::EstimateRow};
use tracing::warn;

use crate::{
    db::store::Session,
    error::{StoreResult, ValidationError},
    models::NewEstimate,
    schema::analyst_estimates,
    writers::{Batch, MergeOutcome, MergeSummary, RowRejection},
};

/// Insert the estimate for `(symbol_id, fiscal_year)` unless one already exists.
///
/// An existing row keeps its original payload.
pub fn merge_estimate(
    session: &mut Session<'_>,
    symbol_id: i32,
    fiscal_year: i32,
    payload: &Payload,
) -> StoreResult<MergeOutcome> {
    let exists = diesel::select(diesel::dsl::exists(
        analyst_estimates::table
            .filter(analyst_estimates::symbol_id.eq(symbol_id))
            .filter(analyst_estimates::fiscal_year.eq(fiscal_year)),
    ))
    .get_result::<bool>(session.conn())?;
    if exists {
        return Ok(MergeOutcome::Skipped);
    }

    let payload = serde_json::to_string(payload)?;
    diesel::insert_into(analyst_estimates::table)
        .values(NewEstimate {
            symbol_id,
            fiscal_year,
            payload: &payload,
        })
        .execute(session.conn())?;
    Ok(MergeOutcome::Inserted)
}

/// Merge a batch of estimate rows, skipping rows whose fiscal year is unusable.
pub fn merge_estimates(session: &mut Session<'_>, symbol_id: i32, rows: &[EstimateRow]) -> StoreResult<MergeSummary> {
    let mut summary = MergeSummary::default();
    for (index, row) in rows.iter().enumerate() {
        let fiscal_year = match row.fiscal_year() {
            Ok(year) => year,
            Err(err) => {
                warn!(symbol_id, index, error = %err, "rejected estimate row");
                summary.rejected.push(RowRejection {
                    batch: Batch::Estimates,
                    index,
                    reason: ValidationError::from(err),
                });
                continue;
            }
        };
        summary.record(merge_estimate(session, symbol_id, fiscal_year, &row.values)?);
    }
    Ok(summary)
}
