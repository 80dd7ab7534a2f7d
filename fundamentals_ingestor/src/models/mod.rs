//! Vendor-agnostic batches produced by a [`crate::providers::FundamentalsProvider`].

pub mod dataset;
pub mod estimate;
pub mod peer;
pub mod period;
pub mod price_target;
pub mod statement;

use indexmap::IndexMap;

/// Open, ordered map of metric code to numeric value.
///
/// A key mapped to `None` is a column that was present but null; a missing key
/// is a column that was never part of the batch. Writers keep the two apart.
pub type Payload = IndexMap<String, Option<f64>>;
