//! Endpoint paths and query parameters for the FMP v3 API.

use crate::models::period::PeriodType;

pub const DEFAULT_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Shares outstanding assumed when the vendor omits the field.
pub const DEFAULT_SHARES_OUTSTANDING: f64 = 1_000_000.0;

pub fn income_statement_path(ticker: &str) -> String {
    format!("income-statement/{ticker}")
}

pub fn analyst_estimates_path(ticker: &str) -> String {
    format!("analyst-estimates/{ticker}")
}

pub fn key_metrics_ttm_path(ticker: &str) -> String {
    format!("key-metrics-ttm/{ticker}")
}

pub const STOCK_PEERS_PATH: &str = "stock_peers";
pub const PRICE_TARGET_PATH: &str = "price-target";

/// FMP spells the quarterly period `quarter`, same as our code.
pub fn statement_query(period_type: PeriodType, limit: u32) -> Vec<(String, String)> {
    vec![
        ("period".to_string(), period_type.as_str().to_string()),
        ("limit".to_string(), limit.to_string()),
    ]
}

pub fn symbol_query(ticker: &str) -> Vec<(String, String)> {
    vec![("symbol".to_string(), ticker.to_string())]
}
