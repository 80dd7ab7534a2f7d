//! Broker price-target observations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Analyst value marking a provider-computed aggregate rather than an
/// individual broker observation.
pub const SUMMARY_ANALYST: &str = "SUMMARY";

/// One broker price target as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceTargetRow {
    /// Research house.
    pub broker: Option<String>,
    /// Analyst name, or [`SUMMARY_ANALYST`] for aggregate rows.
    pub analyst: Option<String>,
    /// Publication date of the research note.
    pub published_date: Option<NaiveDate>,
    /// Target price.
    pub price_target: Option<f64>,
    /// Raw direction token (`"up"`, `"down"`, anything else).
    pub direction: Option<String>,
}

impl PriceTargetRow {
    /// True for provider aggregate rows that must not be stored.
    pub fn is_summary(&self) -> bool {
        self.analyst.as_deref() == Some(SUMMARY_ANALYST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_detection_is_exact() {
        let mut row = PriceTargetRow {
            analyst: Some("SUMMARY".into()),
            ..Default::default()
        };
        assert!(row.is_summary());
        row.analyst = Some("Summary".into());
        assert!(!row.is_summary());
        row.analyst = None;
        assert!(!row.is_summary());
    }
}
