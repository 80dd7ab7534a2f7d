//! Append-only metric facts.

use diesel::prelude::*;
use fundamentals_ingestor::models::Payload;

use crate::{db::store::Session, error::StoreResult, models::NewMetric, schema::financial_metrics};

/// Insert one `financial_metrics` row per entry of `metrics`.
///
/// No existence check: writing the same period twice doubles its rows. A
/// `None` value becomes a NULL-valued row. Returns the number of rows written.
pub fn write_metrics(session: &mut Session<'_>, period_id: i32, metrics: &Payload) -> StoreResult<usize> {
    let mut written = 0;
    for (code, value) in metrics {
        written += diesel::insert_into(financial_metrics::table)
            .values(NewMetric {
                period_id,
                metric_code: code,
                value: *value,
            })
            .execute(session.conn())?;
    }
    Ok(written)
}
