//! Integration tests for the FinStocks HTTP API against an in-memory store.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use finstocks_api::cache::ManualClock;
use finstocks_api::model::{Etf, EtfHolding, Fundamentals, PriceBar, Sector, Stock, TechnicalIndicator};
use finstocks_api::store::{MarketStore, RowBatch, SqliteStore};
use finstocks_api::{build_router, ApiService, ApiState};
use finstocks_common::Config;

// ============================================================================
// Fixtures
// ============================================================================

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn bar(symbol: &str, day: &str, close: f64) -> PriceBar {
    PriceBar {
        id: None,
        symbol: symbol.to_string(),
        date: date(day),
        open_price: Some(close),
        high_price: Some(close + 1.0),
        low_price: Some(close - 1.0),
        close_price: Some(close),
        volume: Some(5_000_000),
    }
}

fn sector(name: &str, d1: f64, w1: f64) -> Sector {
    Sector {
        id: None,
        name: name.to_string(),
        performance_1d: Some(d1),
        performance_1w: Some(w1),
        performance_1m: Some(0.0),
        performance_ytd: Some(0.0),
        updated_at: None,
    }
}

fn fundamentals(symbol: &str, pe: f64, roe: f64) -> Fundamentals {
    Fundamentals {
        id: None,
        symbol: symbol.to_string(),
        pe_ratio: Some(pe),
        pb_ratio: Some(3.0),
        debt_to_equity: Some(0.5),
        roe: Some(roe),
        revenue: Some(1.0e11),
        net_income: Some(1.0e10),
        eps: Some(4.2),
        dividend_yield: Some(1.1),
        quarter: Some("Q4".into()),
        year: Some(2023),
    }
}

fn etf(symbol: &str, category: &str, aum: f64, leverage: f64) -> Etf {
    Etf {
        id: None,
        symbol: symbol.to_string(),
        name: format!("{} Trust", symbol),
        category: category.to_string(),
        expense_ratio: Some(0.095),
        aum: Some(aum),
        inception_date: Some(date("1999-03-10")),
        benchmark: Some("Index".into()),
        leverage_ratio: Some(leverage),
        created_at: None,
        updated_at: None,
    }
}

fn holding(etf: &str, stock: &str, weight: f64) -> EtfHolding {
    EtfHolding {
        id: None,
        etf_symbol: etf.to_string(),
        stock_symbol: stock.to_string(),
        weight_percentage: weight,
        shares_held: Some(1_000_000),
        market_value: Some(2.0e9),
    }
}

async fn seeded_store() -> Arc<SqliteStore> {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let batches = vec![
        RowBatch::Stocks(vec![
            Stock::new("AAA", "Alpha Corp").with_sector("Technology").with_market_cap(3.0e12),
            Stock::new("BBB", "Beta Energy").with_sector("Energy").with_market_cap(2.0e11),
            Stock::new("CCC", "Gamma Soft").with_sector("Technology").with_market_cap(5.0e10),
            Stock::new("DDD", "Delta Health").with_sector("Healthcare").with_market_cap(1.0e11),
        ]),
        RowBatch::StockPrices(vec![
            bar("AAA", "2024-01-01", 100.0),
            bar("AAA", "2024-01-02", 105.0),
            bar("AAA", "2024-01-03", 110.0),
            bar("BBB", "2024-01-02", 50.0),
            bar("BBB", "2024-01-03", 45.0),
            bar("CCC", "2024-01-02", 20.0),
            bar("CCC", "2024-01-03", 21.0),
            bar("DDD", "2024-01-03", 80.0),
        ]),
        RowBatch::Sectors(vec![
            sector("Technology", 1.5, 3.0),
            sector("Energy", -0.5, 4.0),
            sector("Healthcare", 0.3, -1.0),
        ]),
        RowBatch::Fundamentals(vec![
            fundamentals("AAA", 30.0, 25.0),
            fundamentals("BBB", 12.0, 8.0),
            fundamentals("CCC", 18.0, 15.0),
        ]),
        RowBatch::Etfs(vec![
            etf("SPY", "Broad Market", 4.0e11, 1.0),
            etf("QQQ", "Technology", 2.0e11, 1.0),
            etf("TQQQ", "Leveraged", 2.0e10, 3.0),
        ]),
        RowBatch::EtfPrices(vec![
            bar("SPY", "2024-01-02", 470.0),
            bar("SPY", "2024-01-03", 472.5),
        ]),
        RowBatch::EtfHoldings(vec![
            holding("SPY", "AAA", 7.1),
            holding("SPY", "BBB", 1.2),
            holding("SPY", "CCC", 0.4),
            holding("QQQ", "AAA", 9.0),
        ]),
    ];
    for batch in &batches {
        store.insert_batch(batch).await.unwrap();
    }
    store
}

fn app_with_clock(store: Arc<SqliteStore>, clock: Arc<ManualClock>) -> Router {
    let state = ApiState::with_clock(Config::default(), store, clock);
    build_router(Arc::new(state))
}

async fn test_app() -> Router {
    app_with_clock(seeded_store().await, Arc::new(ManualClock::new(1_700_000_000)))
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    read(response).await
}

async fn post_json(app: &Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    read(response).await
}

async fn read(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn symbols(rows: &Value) -> Vec<String> {
    rows.as_array()
        .unwrap()
        .iter()
        .map(|r| r["symbol"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// Health and stocks
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, json) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "OK");
    assert_eq!(json["message"], "FinStocks API is running");
}

#[tokio::test]
async fn test_stock_detail_uses_latest_price() {
    let app = test_app().await;
    let (status, json) = get(&app, "/api/stocks/aaa").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["symbol"], "AAA");
    assert_eq!(json["sector"], "Technology");
    assert_eq!(json["latest_price"]["date"], "2024-01-03");
    assert_eq!(json["latest_price"]["close_price"], 110.0);
    assert_eq!(json["fundamentals"]["pe_ratio"], 30.0);
    assert_eq!(json["fundamentals"]["quarter"], "Q4");
}

#[tokio::test]
async fn test_stock_without_prices_has_null_latest_price() {
    let store = seeded_store().await;
    store
        .insert_batch(&RowBatch::Stocks(vec![Stock::new("EEE", "Epsilon")]))
        .await
        .unwrap();
    let app = app_with_clock(store, Arc::new(ManualClock::new(0)));

    let (status, json) = get(&app, "/api/stocks/EEE").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["latest_price"].is_null());
    assert!(json["fundamentals"].is_null());
    assert!(json["market_cap"].is_null());
}

#[tokio::test]
async fn test_absent_symbols_are_not_found() {
    let app = test_app().await;

    let (status, json) = get(&app, "/api/stocks/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "detail": "Stock not found" }));

    let (status, json) = get(&app, "/api/etfs/NOPE").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "detail": "ETF not found" }));
}

#[tokio::test]
async fn test_stock_prices_newest_first() {
    let app = test_app().await;

    let (status, json) = get(&app, "/api/stocks/AAA/prices").await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["date"].as_str().unwrap())
        .collect();
    assert_eq!(dates, vec!["2024-01-03", "2024-01-02", "2024-01-01"]);

    let (_, json) = get(&app, "/api/stocks/AAA/prices?days=1").await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (status, json) = get(&app, "/api/stocks/AAA/prices?days=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_technical_latest_or_empty_object() {
    let store = seeded_store().await;
    store
        .insert_batch(&RowBatch::TechnicalIndicators(vec![
            TechnicalIndicator {
                id: None,
                symbol: "AAA".into(),
                date: date("2024-01-02"),
                sma_20: Some(101.0),
                sma_50: Some(99.0),
                sma_200: Some(90.0),
                rsi: Some(55.0),
                macd: Some(1.25),
                bollinger_upper: Some(111.1),
                bollinger_lower: Some(90.9),
            },
            TechnicalIndicator {
                id: None,
                symbol: "AAA".into(),
                date: date("2024-01-03"),
                sma_20: Some(102.0),
                sma_50: None,
                sma_200: None,
                rsi: Some(61.0),
                macd: None,
                bollinger_upper: None,
                bollinger_lower: None,
            },
        ]))
        .await
        .unwrap();
    let app = app_with_clock(store, Arc::new(ManualClock::new(0)));

    let (status, json) = get(&app, "/api/stocks/AAA/technical").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["date"], "2024-01-03");
    assert_eq!(json["rsi"], 61.0);

    let (status, json) = get(&app, "/api/stocks/BBB/technical").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({}));
}

#[tokio::test]
async fn test_create_stock_normalizes_symbol() {
    let app = test_app().await;

    let (status, json) = post_json(
        &app,
        "/api/stocks",
        r#"{"symbol": "newco", "name": "New Co", "sector": "Technology", "market_cap": 1000000}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["symbol"], "NEWCO");
    assert!(json["id"].as_i64().is_some());

    let (status, json) = get(&app, "/api/stocks/NEWCO").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "New Co");
    assert_eq!(json["market_cap"], 1000000.0);
}

#[tokio::test]
async fn test_create_stock_rejects_bad_input() {
    let app = test_app().await;

    let (status, _) = post_json(&app, "/api/stocks", r#"{"symbol": "X"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&app, "/api/stocks", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = post_json(&app, "/api/stocks", r#"{"symbol": "  ", "name": "Blank"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["detail"], "symbol must not be empty");
}

#[tokio::test]
async fn test_create_duplicate_stock_is_server_error() {
    let app = test_app().await;
    let (status, json) = post_json(&app, "/api/stocks", r#"{"symbol": "aaa", "name": "Again"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"].as_str().unwrap().contains("Duplicate"));
}

#[tokio::test]
async fn test_stock_etfs_embed_etf_columns() {
    let app = test_app().await;
    let (status, json) = get(&app, "/api/stocks/aaa/etfs").await;
    assert_eq!(status, StatusCode::OK);

    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["etf_symbol"], "QQQ");
    assert_eq!(rows[0]["etfs"]["category"], "Technology");
    assert_eq!(rows[1]["etfs"]["name"], "SPY Trust");
}

// ============================================================================
// Sectors
// ============================================================================

#[tokio::test]
async fn test_sectors_ordered_by_daily_performance() {
    let app = test_app().await;
    let (status, json) = get(&app, "/api/sectors").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Technology", "Healthcare", "Energy"]);
}

#[tokio::test]
async fn test_top_performers_period_and_fallback() {
    let app = test_app().await;

    let (_, json) = get(&app, "/api/sectors/top-performers?period=1w&limit=2").await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["name"], "Energy");
    assert_eq!(rows[1]["name"], "Technology");

    let (status, json) = get(&app, "/api/sectors/top-performers?period=10y").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json[0]["name"], "Technology");
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_sector_stocks_with_latest_close() {
    let app = test_app().await;
    let (status, json) = get(&app, "/api/sectors/Technology/stocks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(symbols(&json), vec!["AAA", "CCC"]);
    assert_eq!(json[1]["close_price"], 21.0);
    assert_eq!(json[1]["price_date"], "2024-01-03");
}

#[tokio::test]
async fn test_sector_list_is_stale_within_window() {
    let store = seeded_store().await;
    let clock = Arc::new(ManualClock::new(1_700_000_010));
    let app = app_with_clock(store.clone(), clock.clone());

    let (_, first) = get(&app, "/api/sectors").await;
    assert_eq!(first.as_array().unwrap().len(), 3);

    store
        .insert_batch(&RowBatch::Sectors(vec![sector("Utilities", 9.9, 0.0)]))
        .await
        .unwrap();

    clock.advance(5);
    let (_, cached) = get(&app, "/api/sectors").await;
    assert_eq!(cached, first);

    clock.advance(30);
    let (_, fresh) = get(&app, "/api/sectors").await;
    assert_eq!(fresh.as_array().unwrap().len(), 4);
    assert_eq!(fresh[0]["name"], "Utilities");
}

// ============================================================================
// Screener
// ============================================================================

#[tokio::test]
async fn test_screener_conjunctive_filters() {
    let app = test_app().await;

    let (status, json) = post_json(&app, "/api/screener", "{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(symbols(&json), vec!["AAA", "BBB", "DDD", "CCC"]);

    let (_, json) = post_json(
        &app,
        "/api/screener",
        r#"{"sectors": ["Technology"], "min_roe": 10, "max_pe_ratio": 20}"#,
    )
    .await;
    assert_eq!(symbols(&json), vec!["CCC"]);
    assert_eq!(json[0]["pe_ratio"], 18.0);
    assert_eq!(json[0]["close_price"], 21.0);
    assert_eq!(json[0]["eps"], 4.2);

    let (_, json) = post_json(
        &app,
        "/api/screener",
        r#"{"min_market_cap": 1e11, "min_price": 50, "limit": 2}"#,
    )
    .await;
    assert_eq!(symbols(&json), vec!["AAA", "DDD"]);
}

#[tokio::test]
async fn test_screener_large_cap_technology() {
    let store = seeded_store().await;
    store
        .insert_batch(&RowBatch::Stocks(vec![Stock::new("EEE", "Epsilon Chips")
            .with_sector("Technology")
            .with_market_cap(1.5e12)]))
        .await
        .unwrap();
    store
        .insert_batch(&RowBatch::StockPrices(vec![bar("EEE", "2024-01-03", 300.0)]))
        .await
        .unwrap();
    let app = app_with_clock(store, Arc::new(ManualClock::new(1_700_000_000)));

    let (status, json) = post_json(
        &app,
        "/api/screener",
        r#"{"min_market_cap": 1e12, "sectors": ["Technology"]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(symbols(&json), vec!["AAA", "EEE"]);

    let rows = json.as_array().unwrap();
    for row in rows {
        assert_eq!(row["sector"], "Technology");
        assert!(row["market_cap"].as_f64().unwrap() >= 1e12);
    }
    let caps: Vec<f64> = rows.iter().map(|r| r["market_cap"].as_f64().unwrap()).collect();
    assert!(caps.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_screener_results_stale_within_window() {
    let store = seeded_store().await;
    let clock = Arc::new(ManualClock::new(1_700_000_010));
    let app = app_with_clock(store.clone(), clock.clone());
    let body = r#"{"sectors": ["Technology"]}"#;

    let (_, first) = post_json(&app, "/api/screener", body).await;
    assert_eq!(symbols(&first), vec!["AAA", "CCC"]);

    store
        .insert_batch(&RowBatch::Stocks(vec![Stock::new("EEE", "Epsilon Chips")
            .with_sector("Technology")
            .with_market_cap(1.0e11)]))
        .await
        .unwrap();

    clock.advance(5);
    let (_, cached) = post_json(&app, "/api/screener", body).await;
    assert_eq!(cached, first);

    clock.advance(30);
    let (_, fresh) = post_json(&app, "/api/screener", body).await;
    assert_eq!(symbols(&fresh), vec!["AAA", "EEE", "CCC"]);
}

#[tokio::test]
async fn test_screener_equivalent_filters_share_entry() {
    let store = seeded_store().await;
    let clock = Arc::new(ManualClock::new(1_700_000_010));
    let app = app_with_clock(store.clone(), clock);

    let (_, first) = post_json(
        &app,
        "/api/screener",
        r#"{"sectors": ["Technology", "Energy"], "min_roe": 5}"#,
    )
    .await;
    assert_eq!(symbols(&first), vec!["AAA", "BBB", "CCC"]);

    store
        .insert_batch(&RowBatch::Stocks(vec![Stock::new("EEE", "Epsilon Oil")
            .with_sector("Energy")
            .with_market_cap(9.0e11)]))
        .await
        .unwrap();
    store
        .insert_batch(&RowBatch::Fundamentals(vec![fundamentals("EEE", 10.0, 20.0)]))
        .await
        .unwrap();

    let (_, reordered) = post_json(
        &app,
        "/api/screener",
        r#"{"min_roe": 5, "sectors": ["Energy", "Technology"], "limit": 50}"#,
    )
    .await;
    assert_eq!(reordered, first);
}

#[tokio::test]
async fn test_screener_rejects_malformed_body() {
    let app = test_app().await;
    let (status, json) = post_json(&app, "/api/screener", r#"{"limit": -1}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn test_gainers_and_losers() {
    let app = test_app().await;

    let (status, json) = get(&app, "/api/screener/gainers").await;
    assert_eq!(status, StatusCode::OK);
    // DDD has a single price row and is excluded
    assert_eq!(symbols(&json), vec!["CCC", "AAA", "BBB"]);
    assert_eq!(json[0]["change_percent"], 5.0);
    assert_eq!(json[1]["change_percent"], 4.76);
    assert_eq!(json[1]["current_price"], 110.0);
    assert_eq!(json[1]["previous_price"], 105.0);

    let changes: Vec<f64> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["change_percent"].as_f64().unwrap())
        .collect();
    assert!(changes.windows(2).all(|w| w[0] >= w[1]));

    let (_, json) = get(&app, "/api/screener/losers?limit=1").await;
    assert_eq!(symbols(&json), vec!["BBB"]);
    assert_eq!(json[0]["change_percent"], -10.0);
}

// ============================================================================
// ETFs
// ============================================================================

#[tokio::test]
async fn test_etf_listing_endpoints() {
    let app = test_app().await;

    let (_, json) = get(&app, "/api/etfs").await;
    assert_eq!(symbols(&json), vec!["SPY", "QQQ", "TQQQ"]);

    let (_, json) = get(&app, "/api/etfs/leveraged").await;
    assert_eq!(symbols(&json), vec!["TQQQ"]);
    assert_eq!(json[0]["leverage_ratio"], 3.0);

    let (_, json) = get(&app, "/api/etfs/category/Broad%20Market").await;
    assert_eq!(symbols(&json), vec!["SPY"]);

    let (_, json) = get(&app, "/api/etfs/category/Commodities").await;
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn test_etf_list_stale_within_window() {
    let store = seeded_store().await;
    let clock = Arc::new(ManualClock::new(1_700_000_010));
    let app = app_with_clock(store.clone(), clock.clone());

    let (_, first) = get(&app, "/api/etfs").await;
    assert_eq!(symbols(&first), vec!["SPY", "QQQ", "TQQQ"]);

    store
        .insert_batch(&RowBatch::Etfs(vec![etf("VTI", "Broad Market", 5.0e11, 1.0)]))
        .await
        .unwrap();

    clock.advance(5);
    let (_, cached) = get(&app, "/api/etfs").await;
    assert_eq!(cached, first);

    clock.advance(30);
    let (_, fresh) = get(&app, "/api/etfs").await;
    assert_eq!(symbols(&fresh), vec!["VTI", "SPY", "QQQ", "TQQQ"]);
}

#[tokio::test]
async fn test_etf_detail_and_holdings() {
    let app = test_app().await;

    let (status, json) = get(&app, "/api/etfs/spy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["category"], "Broad Market");
    assert_eq!(json["inception_date"], "1999-03-10");
    assert_eq!(json["latest_price"]["close_price"], 472.5);

    let (_, json) = get(&app, "/api/etfs/SPY/holdings").await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["stock_symbol"], "AAA");
    assert_eq!(rows[0]["stocks"]["name"], "Alpha Corp");
    assert_eq!(rows[0]["stocks"]["sector"], "Technology");

    let (_, json) = get(&app, "/api/etfs/SPY/top-holdings?limit=2").await;
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["stock_symbol"], "BBB");
    assert_eq!(rows[1]["stocks"]["market_cap"], 2.0e11);
}

#[tokio::test]
async fn test_etf_prices_cached_per_arguments() {
    let store = seeded_store().await;
    let clock = Arc::new(ManualClock::new(300));
    let app = app_with_clock(store.clone(), clock.clone());

    let (_, first) = get(&app, "/api/etfs/SPY/prices").await;
    assert_eq!(first.as_array().unwrap().len(), 2);

    store
        .insert_batch(&RowBatch::EtfPrices(vec![bar("SPY", "2024-01-04", 475.0)]))
        .await
        .unwrap();

    let (_, cached) = get(&app, "/api/etfs/SPY/prices").await;
    assert_eq!(cached, first);

    // Different arguments are a different key
    let (_, other) = get(&app, "/api/etfs/SPY/prices?days=10").await;
    assert_eq!(other.as_array().unwrap().len(), 3);

    clock.advance(30);
    let (_, fresh) = get(&app, "/api/etfs/SPY/prices").await;
    assert_eq!(fresh[0]["date"], "2024-01-04");
}

#[tokio::test]
async fn test_service_router_allows_any_origin() {
    let store = seeded_store().await;
    let service = ApiService::new(Config::default(), store);

    let response = service
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");
}
