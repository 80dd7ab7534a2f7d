//! Historical statement batches (one row per reported period).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Payload, period::PeriodType};

/// One reported period: its end date and its metric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    /// Period end date.
    pub date: NaiveDate,
    /// Metric code to value, in provider order.
    pub values: Payload,
}

/// All statement rows of one period type for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementBatch {
    /// Annual or quarterly.
    pub period_type: PeriodType,
    /// Rows, newest first as delivered by the provider.
    #[serde(default)]
    pub rows: Vec<StatementRow>,
}

impl StatementBatch {
    /// A batch with no rows. Valid input: it resolves zero periods.
    pub fn empty(period_type: PeriodType) -> Self {
        Self {
            period_type,
            rows: Vec::new(),
        }
    }

    /// True when the batch carries no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse `YYYY-MM-DD`, tolerating a trailing time component
/// (`2023-10-12T10:45:00.000Z`, `2023-10-12 10:45:00`).
pub fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let head = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}
