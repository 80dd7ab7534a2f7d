use std::num::NonZeroU32;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use shared_utils::env::get_env_var;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{
        Payload,
        estimate::{EstimateRow, coerce_fiscal_year},
        peer::PeerSnapshot,
        period::PeriodType,
        price_target::PriceTargetRow,
        statement::{StatementBatch, StatementRow, parse_date_prefix},
    },
    providers::{
        ApiSnafu, ClientBuildSnafu, FundamentalsProvider, MissingEnvVarSnafu, ProviderError,
        ProviderInitError, ReqwestSnafu,
        fmp_rest::{
            params::{
                DEFAULT_BASE_URL, DEFAULT_SHARES_OUTSTANDING, PRICE_TARGET_PATH, STOCK_PEERS_PATH,
                analyst_estimates_path, income_statement_path, key_metrics_ttm_path,
                statement_query, symbol_query,
            },
            response::{
                FmpAnalystEstimate, FmpIncomeStatement, FmpKeyMetricsTtm, FmpPriceTarget,
                FmpStockPeers,
            },
        },
    },
};

/// Environment variable holding the FMP API key.
pub const API_KEY_ENV: &str = "FMP_KEY";

/// Free-tier friendly default request budget.
pub fn default_requests_per_minute() -> NonZeroU32 {
    nonzero!(250u32)
}

/// Placeholder used by the vendor shaping when a broker or analyst is missing.
const UNKNOWN: &str = "Unknown";

/// Financial Modeling Prep REST client, rate limited.
pub struct FmpProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    limiter: DefaultDirectRateLimiter,
}

impl FmpProvider {
    /// Creates a new FMP provider against the public API.
    ///
    /// Reads the API key from the `FMP_KEY` environment variable.
    pub fn new() -> Result<Self, ProviderInitError> {
        let api_key = SecretString::new(get_env_var(API_KEY_ENV).context(MissingEnvVarSnafu)?.into());
        Self::with_key(api_key, DEFAULT_BASE_URL, default_requests_per_minute())
    }

    /// Creates a provider with an explicit key, base URL and request budget.
    pub fn with_key(
        api_key: SecretString,
        base_url: impl Into<String>,
        requests_per_minute: NonZeroU32,
    ) -> Result<Self, ProviderInitError> {
        let client = Client::builder().build().context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: RateLimiter::direct(Quota::per_minute(requests_per_minute)),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        mut query: Vec<(String, String)>,
    ) -> Result<T, ProviderError> {
        self.limiter.until_ready().await;

        query.push(("apikey".to_string(), self.api_key.expose_secret().to_string()));
        let url = format!("{}/{}", self.base_url, path);
        debug!(endpoint = path, "fmp request");

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(reqwest::Error::without_url)
            .context(ReqwestSnafu)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                endpoint: path,
                status: status.as_u16(),
                message,
            }
            .fail();
        }

        response
            .json::<T>()
            .await
            .map_err(reqwest::Error::without_url)
            .context(ReqwestSnafu)
    }
}

#[async_trait]
impl FundamentalsProvider for FmpProvider {
    async fn fetch_statements(
        &self,
        ticker: &str,
        period_type: PeriodType,
        limit: u32,
    ) -> Result<StatementBatch, ProviderError> {
        let raw: Vec<FmpIncomeStatement> = self
            .get_json(&income_statement_path(ticker), statement_query(period_type, limit))
            .await?;
        Ok(shape_statements(period_type, raw))
    }

    async fn fetch_peer_list(&self, ticker: &str) -> Result<Vec<String>, ProviderError> {
        let raw: Vec<FmpStockPeers> = self.get_json(STOCK_PEERS_PATH, symbol_query(ticker)).await?;
        Ok(raw.into_iter().next().map(|p| p.peers_list).unwrap_or_default())
    }

    async fn fetch_estimates(&self, ticker: &str) -> Result<Vec<EstimateRow>, ProviderError> {
        let raw: Vec<FmpAnalystEstimate> =
            self.get_json(&analyst_estimates_path(ticker), Vec::new()).await?;
        Ok(shape_estimates(raw, Utc::now().year()))
    }

    async fn fetch_peer_snapshot(&self, peer: &str) -> Result<Option<PeerSnapshot>, ProviderError> {
        let raw: Vec<FmpKeyMetricsTtm> = self.get_json(&key_metrics_ttm_path(peer), Vec::new()).await?;
        Ok(raw.into_iter().next().map(shape_peer_snapshot))
    }

    async fn fetch_price_targets(&self, ticker: &str) -> Result<Vec<PriceTargetRow>, ProviderError> {
        let raw: Vec<FmpPriceTarget> = self.get_json(PRICE_TARGET_PATH, symbol_query(ticker)).await?;
        Ok(shape_price_targets(raw, Utc::now().date_naive()))
    }
}

/// Keep the fixed statement columns. A field the vendor left out becomes a
/// null cell, so every row of the batch has the same columns.
pub fn shape_statements(period_type: PeriodType, raw: Vec<FmpIncomeStatement>) -> StatementBatch {
    let rows = raw
        .into_iter()
        .filter_map(|s| {
            let Some(date) = parse_date_prefix(&s.date) else {
                debug!(date = %s.date, "dropping statement with unparseable date");
                return None;
            };
            let values: Payload = [
                ("revenue", s.revenue),
                ("netIncome", s.net_income),
                ("grossProfit", s.gross_profit),
                ("operatingIncome", s.operating_income),
                ("ebitda", s.ebitda),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
            Some(StatementRow { date, values })
        })
        .collect();

    StatementBatch { period_type, rows }
}

/// Keep the current and next fiscal year only.
pub fn shape_estimates(raw: Vec<FmpAnalystEstimate>, current_year: i32) -> Vec<EstimateRow> {
    raw.into_iter()
        .filter_map(|e| {
            let year = e
                .year
                .as_ref()
                .and_then(|y| coerce_fiscal_year(y).ok())
                .or_else(|| e.date.as_deref().and_then(parse_date_prefix).map(|d| d.year()))?;
            if year != current_year && year != current_year + 1 {
                return None;
            }
            let values: Payload = [
                ("revenue", e.revenue),
                ("netIncome", e.net_income),
                ("ebitda", e.ebitda),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
            Some(EstimateRow::new(year, values))
        })
        .collect()
}

/// Split TTM key metrics into the operating and trading payloads.
pub fn shape_peer_snapshot(m: FmpKeyMetricsTtm) -> PeerSnapshot {
    let shares = m.weighted_average_shs_out.unwrap_or(DEFAULT_SHARES_OUTSTANDING);
    let mut operating = Payload::new();
    operating.insert("revenue".into(), m.revenue_per_share.map(|rps| rps * shares));
    operating.insert("margin".into(), m.net_profit_margin);

    let mut trading = Payload::new();
    trading.insert("pe".into(), m.pe_ratio);
    trading.insert("pb".into(), m.pb_ratio);

    PeerSnapshot { operating, trading }
}

/// Fill missing broker/analyst with `"Unknown"` and missing dates with `today`.
pub fn shape_price_targets(raw: Vec<FmpPriceTarget>, today: NaiveDate) -> Vec<PriceTargetRow> {
    raw.into_iter()
        .map(|pt| PriceTargetRow {
            broker: Some(pt.analyst_company.unwrap_or_else(|| UNKNOWN.to_string())),
            analyst: Some(pt.analyst_name.unwrap_or_else(|| UNKNOWN.to_string())),
            published_date: Some(
                pt.published_date
                    .as_deref()
                    .and_then(parse_date_prefix)
                    .unwrap_or(today),
            ),
            price_target: pt.price_target,
            direction: pt.change,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse<T: DeserializeOwned>(v: serde_json::Value) -> T {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn statements_keep_fixed_columns_with_nulls() {
        let raw: Vec<FmpIncomeStatement> = parse(json!([
            {"date": "2023-12-31", "revenue": 100.0, "netIncome": 20.0, "grossProfit": 40.0,
             "operatingIncome": 30.0, "ebitda": 35.0, "eps": 1.2},
            {"date": "2022-12-31", "revenue": 90.0},
            {"date": "garbage"}
        ]));
        let batch = shape_statements(PeriodType::Annual, raw);
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.rows[0].values.len(), 5);
        assert!(!batch.rows[0].values.contains_key("eps"));
        assert_eq!(batch.rows[1].values["revenue"], Some(90.0));
        assert_eq!(batch.rows[1].values.get("ebitda"), Some(&None));
    }

    #[test]
    fn estimates_window_is_current_and_next_year() {
        let raw: Vec<FmpAnalystEstimate> = parse(json!([
            {"year": "2024", "estimatedRevenue": 1.0},
            {"date": "2025-12-31", "estimatedRevenueAvg": 2.0, "estimatedEbitdaAvg": 3.0},
            {"year": 2026, "estimatedRevenue": 9.0},
            {"year": "n/a"}
        ]));
        let rows = shape_estimates(raw, 2024);
        let years: Vec<i32> = rows.iter().map(|r| r.fiscal_year().unwrap()).collect();
        assert_eq!(years, vec![2024, 2025]);
        assert_eq!(rows[1].values["ebitda"], Some(3.0));
    }

    #[test]
    fn peer_snapshot_multiplies_revenue_per_share() {
        let m: FmpKeyMetricsTtm = parse(json!({
            "revenuePerShareTTM": 2.0, "netProfitMarginTTM": 0.2, "peRatioTTM": 15.0
        }));
        let snap = shape_peer_snapshot(m);
        assert_eq!(snap.operating["revenue"], Some(2_000_000.0));
        assert_eq!(snap.operating["margin"], Some(0.2));
        assert_eq!(snap.trading["pe"], Some(15.0));
        assert_eq!(snap.trading["pb"], None);
    }

    #[test]
    fn price_targets_fill_defaults() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let raw: Vec<FmpPriceTarget> = parse(json!([
            {"analystCompany": "Goldman", "analystName": "Jane", "publishedDate": "2024-04-02T10:45:00.000Z",
             "priceTarget": 150.0, "change": "up"},
            {"priceTarget": 160.0}
        ]));
        let rows = shape_price_targets(raw, today);
        assert_eq!(rows[0].published_date, NaiveDate::from_ymd_opt(2024, 4, 2));
        assert_eq!(rows[0].direction.as_deref(), Some("up"));
        assert_eq!(rows[1].broker.as_deref(), Some("Unknown"));
        assert_eq!(rows[1].analyst.as_deref(), Some("Unknown"));
        assert_eq!(rows[1].published_date, Some(today));
        assert_eq!(rows[1].direction, None);
    }
}
