//! Raw FMP response shapes. Only the fields the shaping step reads are modeled.

use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FmpIncomeStatement {
    pub date: String,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub ebitda: Option<f64>,
}

#[derive(Deserialize, Debug)]
pub struct FmpAnalystEstimate {
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "estimatedRevenue", alias = "estimatedRevenueAvg", default)]
    pub revenue: Option<f64>,
    #[serde(rename = "estimatedNetIncome", alias = "estimatedNetIncomeAvg", default)]
    pub net_income: Option<f64>,
    #[serde(rename = "estimatedEBITDA", alias = "estimatedEbitdaAvg", default)]
    pub ebitda: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FmpStockPeers {
    #[serde(default)]
    pub peers_list: Vec<String>,
}

#[derive(Deserialize, Debug)]
pub struct FmpKeyMetricsTtm {
    #[serde(rename = "revenuePerShare", alias = "revenuePerShareTTM", default)]
    pub revenue_per_share: Option<f64>,
    #[serde(rename = "weightedAverageShsOut", default)]
    pub weighted_average_shs_out: Option<f64>,
    #[serde(rename = "netProfitMargin", alias = "netProfitMarginTTM", default)]
    pub net_profit_margin: Option<f64>,
    #[serde(rename = "peRatioTTM", default)]
    pub pe_ratio: Option<f64>,
    #[serde(rename = "pbRatioTTM", default)]
    pub pb_ratio: Option<f64>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FmpPriceTarget {
    #[serde(default)]
    pub analyst_company: Option<String>,
    #[serde(default)]
    pub analyst_name: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub price_target: Option<f64>,
    #[serde(default)]
    pub change: Option<String>,
}
