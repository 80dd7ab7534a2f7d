//! Provider boundary for company fundamentals.
//!
//! - [`models`] holds the vendor-agnostic batches handed to the store: statement
//!   rows, forward estimates, peer metrics and broker price targets.
//! - [`providers`] defines the [`providers::FundamentalsProvider`] trait and the
//!   concrete REST provider(s).

pub mod models;
pub mod providers;
