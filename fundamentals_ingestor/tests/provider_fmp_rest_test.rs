use chrono::{Datelike, Utc};
use fundamentals_ingestor::{
    models::period::PeriodType,
    providers::{FundamentalsProvider, ProviderError, fmp_rest::FmpProvider},
};
use nonzero_ext::nonzero;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn provider_for(server: &MockServer) -> FmpProvider {
    FmpProvider::with_key(
        SecretString::from("test-key".to_string()),
        format!("{}/api/v3", server.uri()),
        nonzero!(6000u32),
    )
    .expect("provider")
}

#[tokio::test]
async fn fetch_statements_sends_period_and_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/income-statement/ABC"))
        .and(query_param("period", "quarter"))
        .and(query_param("limit", "2"))
        .and(query_param("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"date": "2023-03-31", "revenue": 25.0, "netIncome": 5.0, "grossProfit": 10.0,
             "operatingIncome": 7.5, "ebitda": 8.75},
            {"date": "2022-12-31", "revenue": 24.0, "netIncome": null}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let batch = provider
        .fetch_statements("ABC", PeriodType::Quarter, 2)
        .await
        .expect("statements");

    assert_eq!(batch.period_type, PeriodType::Quarter);
    assert_eq!(batch.rows.len(), 2);
    assert_eq!(batch.rows[0].values["ebitda"], Some(8.75));
    assert_eq!(batch.rows[1].values["netIncome"], None);
}

#[tokio::test]
async fn non_success_status_is_an_api_error_without_the_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/price-target"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Invalid API KEY"))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let err = provider.fetch_price_targets("ABC").await.unwrap_err();
    match &err {
        ProviderError::Api {
            endpoint, status, ..
        } => {
            assert_eq!(endpoint, "price-target");
            assert_eq!(*status, 403);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.to_string().contains("test-key"));
}

#[tokio::test]
async fn peers_and_snapshots() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/stock_peers"))
        .and(query_param("symbol", "ABC"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"symbol": "ABC", "peersList": ["XYZ", "QRS"]}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/key-metrics-ttm/XYZ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"revenuePerShareTTM": 3.0, "weightedAverageShsOut": 10.0, "netProfitMarginTTM": 0.1,
             "peRatioTTM": 20.0, "pbRatioTTM": 3.0}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/key-metrics-ttm/QRS"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    assert_eq!(provider.fetch_peer_list("ABC").await.unwrap(), vec!["XYZ", "QRS"]);

    let xyz = provider.fetch_peer_snapshot("XYZ").await.unwrap().expect("xyz metrics");
    assert_eq!(xyz.operating["revenue"], Some(30.0));
    assert_eq!(xyz.trading["pb"], Some(3.0));

    assert!(provider.fetch_peer_snapshot("QRS").await.unwrap().is_none());
}

#[tokio::test]
async fn estimates_are_limited_to_current_and_next_year() {
    let year = Utc::now().year();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/analyst-estimates/ABC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"year": (year - 1).to_string(), "estimatedRevenue": 1.0},
            {"year": year.to_string(), "estimatedRevenue": 2.0},
            {"year": (year + 1).to_string(), "estimatedRevenue": 3.0}
        ])))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let rows = provider.fetch_estimates("ABC").await.unwrap();
    let years: Vec<i32> = rows.iter().map(|r| r.fiscal_year().unwrap()).collect();
    assert_eq!(years, vec![year, year + 1]);
}
