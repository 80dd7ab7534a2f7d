//! Financial Modeling Prep REST provider.

pub mod params;
pub mod provider;
pub mod response;

pub use provider::FmpProvider;
