//! Provider abstraction for company fundamentals.
//!
//! This module defines the [`FundamentalsProvider`] trait, the unified interface
//! for fetching statements, forward estimates, peer metrics and broker price
//! targets from any fundamentals vendor.
//!
//! Each concrete provider (such as [`fmp_rest::FmpProvider`]) handles the
//! vendor-specific endpoints and response shapes and hands back the
//! vendor-agnostic batches from [`crate::models`]. Providers never retry; a
//! failed request surfaces as [`ProviderError`] and the caller decides.
//!
//! The trait is designed for async usage and supports dynamic dispatch
//! (`dyn FundamentalsProvider`) for runtime selection of providers.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use fundamentals_ingestor::models::{
//!     estimate::EstimateRow,
//!     peer::PeerSnapshot,
//!     period::PeriodType,
//!     price_target::PriceTargetRow,
//!     statement::StatementBatch,
//! };
//! use fundamentals_ingestor::providers::{FundamentalsProvider, ProviderError};
//!
//! struct Offline;
//!
//! #[async_trait]
//! impl FundamentalsProvider for Offline {
//!     async fn fetch_statements(
//!         &self,
//!         _ticker: &str,
//!         period_type: PeriodType,
//!         _limit: u32,
//!     ) -> Result<StatementBatch, ProviderError> {
//!         Ok(StatementBatch::empty(period_type))
//!     }
//!     async fn fetch_peer_list(&self, _ticker: &str) -> Result<Vec<String>, ProviderError> {
//!         Ok(vec![])
//!     }
//!     async fn fetch_estimates(&self, _ticker: &str) -> Result<Vec<EstimateRow>, ProviderError> {
//!         Ok(vec![])
//!     }
//!     async fn fetch_peer_snapshot(&self, _peer: &str) -> Result<Option<PeerSnapshot>, ProviderError> {
//!         Ok(None)
//!     }
//!     async fn fetch_price_targets(&self, _ticker: &str) -> Result<Vec<PriceTargetRow>, ProviderError> {
//!         Ok(vec![])
//!     }
//! }
//! ```

pub mod fmp_rest;

use async_trait::async_trait;
use shared_utils::env::MissingEnvVarError;
use snafu::{Backtrace, Snafu};

use crate::models::{
    estimate::EstimateRow, peer::PeerSnapshot, period::PeriodType, price_target::PriceTargetRow,
    statement::StatementBatch,
};

/// Trait for fetching fundamentals from a data vendor.
#[async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// Historical statements of one period type, newest first, at most `limit` rows.
    async fn fetch_statements(
        &self,
        ticker: &str,
        period_type: PeriodType,
        limit: u32,
    ) -> Result<StatementBatch, ProviderError>;

    /// Tickers the vendor lists as comparables for `ticker`.
    async fn fetch_peer_list(&self, ticker: &str) -> Result<Vec<String>, ProviderError>;

    /// Forward estimates for the fiscal years the vendor projects.
    async fn fetch_estimates(&self, ticker: &str) -> Result<Vec<EstimateRow>, ProviderError>;

    /// Operating and trading metrics for one peer. `None` when the vendor has nothing.
    async fn fetch_peer_snapshot(&self, peer: &str) -> Result<Option<PeerSnapshot>, ProviderError>;

    /// Broker price targets, aggregate rows included.
    async fn fetch_price_targets(&self, ticker: &str) -> Result<Vec<PriceTargetRow>, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// missed environment variable.
    #[snafu(display("Missing environment variable: {source}"))]
    MissingEnvVar {
        source: MissingEnvVarError,
        backtrace: Backtrace,
    },

    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `FundamentalsProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    ///
    /// The request URL is stripped before wrapping because it carries the API key.
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API answered with a non-success status.
    #[snafu(display("API error on {endpoint}: {status}: {message}"))]
    Api {
        endpoint: String,
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The request parameters were invalid for this specific provider.
    #[snafu(display("Invalid parameters for provider: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}
