//! HTTP API routes.
//!
//! Handlers normalize path symbols, coerce query parameters, and delegate to
//! the store. The sector list, ETF list, ETF price history and screener go
//! through the windowed caches.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::model::{
    normalize_symbol, CreateStockRequest, Etf, EtfDetail, EtfHoldingDetail, MoverDirection,
    PriceBar, PriceMover, ScreenedStock, Sector, SectorPeriod, SectorStock, StockDetail,
    StockEtfHolding,
};
use crate::screener::ScreenerFilter;
use crate::store::StoreError;
use crate::ApiState;

/// Default number of price rows.
pub const DEFAULT_PRICE_DAYS: u32 = 30;
/// Default number of sectors in the top-performers list.
pub const DEFAULT_TOP_SECTORS: u32 = 5;
/// Default number of gainers or losers.
pub const DEFAULT_MOVERS_LIMIT: u32 = 10;
/// Default number of ETF holdings.
pub const DEFAULT_HOLDINGS_LIMIT: u32 = 50;
/// Default number of top ETF holdings.
pub const DEFAULT_TOP_HOLDINGS_LIMIT: u32 = 10;

type SharedState = State<Arc<ApiState>>;

/// Build the application router.
pub fn build_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        // Stocks
        .route("/api/stocks", post(create_stock))
        .route("/api/stocks/:symbol", get(get_stock))
        .route("/api/stocks/:symbol/prices", get(get_stock_prices))
        .route("/api/stocks/:symbol/technical", get(get_technical))
        .route("/api/stocks/:symbol/etfs", get(get_stock_etfs))
        // Sectors
        .route("/api/sectors", get(list_sectors))
        .route("/api/sectors/top-performers", get(top_performers))
        .route("/api/sectors/:name/stocks", get(get_sector_stocks))
        // Screener
        .route("/api/screener", post(screen_stocks))
        .route("/api/screener/gainers", get(top_gainers))
        .route("/api/screener/losers", get(top_losers))
        // ETFs
        .route("/api/etfs", get(list_etfs))
        .route("/api/etfs/leveraged", get(leveraged_etfs))
        .route("/api/etfs/category/:category", get(etfs_by_category))
        .route("/api/etfs/:symbol", get(get_etf))
        .route("/api/etfs/:symbol/prices", get(get_etf_prices))
        .route("/api/etfs/:symbol/holdings", get(get_etf_holdings))
        .route("/api/etfs/:symbol/top-holdings", get(get_etf_top_holdings))
        .with_state(state)
}

// ============================================================================
// Request helpers
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopPerformersQuery {
    pub period: Option<String>,
    pub limit: Option<u32>,
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query
        .map(|Query(params)| params)
        .map_err(|e| ApiError::InvalidRequest(e.body_text()))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::InvalidRequest(e.body_text()))
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        message: "FinStocks API is running",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Stocks
// ============================================================================

#[derive(Debug, Serialize)]
pub struct CreateStockResponse {
    pub id: Option<i64>,
    pub symbol: String,
}

async fn create_stock(
    State(state): SharedState,
    body: Result<Json<CreateStockRequest>, JsonRejection>,
) -> ApiResult<Json<CreateStockResponse>> {
    let request = json_body(body)?;
    if request.symbol.trim().is_empty() {
        return Err(ApiError::InvalidRequest("symbol must not be empty".into()));
    }
    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest("name must not be empty".into()));
    }

    let created = state.store.insert_stock(&request.into_stock()).await?;
    tracing::info!(symbol = %created.symbol, "Created stock");

    Ok(Json(CreateStockResponse {
        id: created.id,
        symbol: created.symbol,
    }))
}

async fn get_stock(
    State(state): SharedState,
    Path(symbol): Path<String>,
) -> ApiResult<Json<StockDetail>> {
    let symbol = normalize_symbol(&symbol);
    let stock = state
        .store
        .get_stock(&symbol)
        .await?
        .ok_or_else(|| ApiError::NotFound("Stock not found".into()))?;

    let latest_price = state.store.latest_price(&symbol).await?;
    let fundamentals = state.store.latest_fundamentals(&symbol).await?;

    Ok(Json(StockDetail {
        stock,
        latest_price,
        fundamentals,
    }))
}

async fn get_stock_prices(
    State(state): SharedState,
    Path(symbol): Path<String>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PriceBar>>> {
    let days = query_params(query)?.days.unwrap_or(DEFAULT_PRICE_DAYS);
    let prices = state
        .store
        .price_history(&normalize_symbol(&symbol), days)
        .await?;
    Ok(Json(prices))
}

async fn get_technical(
    State(state): SharedState,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Value>> {
    let latest = state
        .store
        .latest_technical(&normalize_symbol(&symbol))
        .await?;
    let body = match latest {
        Some(row) => serde_json::to_value(row).map_err(StoreError::from)?,
        None => Value::Object(serde_json::Map::new()),
    };
    Ok(Json(body))
}

async fn get_stock_etfs(
    State(state): SharedState,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Vec<StockEtfHolding>>> {
    let holdings = state
        .store
        .etfs_holding(&normalize_symbol(&symbol))
        .await?;
    Ok(Json(holdings))
}

// ============================================================================
// Sectors
// ============================================================================

async fn list_sectors(State(state): SharedState) -> ApiResult<Json<Vec<Sector>>> {
    let sectors = state
        .caches
        .sectors
        .get_or_try_fetch((), || state.store.list_sectors())
        .await?;
    Ok(Json(sectors))
}

async fn top_performers(
    State(state): SharedState,
    query: Result<Query<TopPerformersQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Sector>>> {
    let params = query_params(query)?;
    let period = params
        .period
        .as_deref()
        .map(SectorPeriod::from_param)
        .unwrap_or_default();
    let limit = params.limit.unwrap_or(DEFAULT_TOP_SECTORS);

    let sectors = state.store.top_sectors(period, limit).await?;
    Ok(Json(sectors))
}

async fn get_sector_stocks(
    State(state): SharedState,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<SectorStock>>> {
    let stocks = state.store.sector_stocks(&name).await?;
    Ok(Json(stocks))
}

// ============================================================================
// Screener
// ============================================================================

async fn screen_stocks(
    State(state): SharedState,
    body: Result<Json<ScreenerFilter>, JsonRejection>,
) -> ApiResult<Json<Vec<ScreenedStock>>> {
    let filter = json_body(body)?;
    let rows = state
        .caches
        .screener
        .get_or_try_fetch(filter.cache_key(), || state.store.screen(&filter))
        .await?;
    Ok(Json(rows))
}

async fn top_gainers(
    State(state): SharedState,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PriceMover>>> {
    movers(&state, MoverDirection::Gainers, query).await
}

async fn top_losers(
    State(state): SharedState,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PriceMover>>> {
    movers(&state, MoverDirection::Losers, query).await
}

async fn movers(
    state: &ApiState,
    direction: MoverDirection,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PriceMover>>> {
    let limit = query_params(query)?.limit.unwrap_or(DEFAULT_MOVERS_LIMIT);
    let rows = state.store.movers(direction, limit).await?;
    Ok(Json(rows))
}

// ============================================================================
// ETFs
// ============================================================================

async fn list_etfs(State(state): SharedState) -> ApiResult<Json<Vec<Etf>>> {
    let etfs = state
        .caches
        .etfs
        .get_or_try_fetch((), || state.store.list_etfs())
        .await?;
    Ok(Json(etfs))
}

async fn get_etf(
    State(state): SharedState,
    Path(symbol): Path<String>,
) -> ApiResult<Json<EtfDetail>> {
    let symbol = normalize_symbol(&symbol);
    let etf = state
        .store
        .get_etf(&symbol)
        .await?
        .ok_or_else(|| ApiError::NotFound("ETF not found".into()))?;
    let latest_price = state.store.latest_etf_price(&symbol).await?;

    Ok(Json(EtfDetail { etf, latest_price }))
}

async fn get_etf_prices(
    State(state): SharedState,
    Path(symbol): Path<String>,
    query: Result<Query<DaysQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PriceBar>>> {
    let days = query_params(query)?.days.unwrap_or(DEFAULT_PRICE_DAYS);
    let symbol = normalize_symbol(&symbol);

    let prices = state
        .caches
        .etf_prices
        .get_or_try_fetch((symbol.clone(), days), || {
            state.store.etf_price_history(&symbol, days)
        })
        .await?;
    Ok(Json(prices))
}

async fn get_etf_holdings(
    State(state): SharedState,
    Path(symbol): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<EtfHoldingDetail>>> {
    let limit = query_params(query)?.limit.unwrap_or(DEFAULT_HOLDINGS_LIMIT);
    let holdings = state
        .store
        .etf_holdings(&normalize_symbol(&symbol), limit)
        .await?;
    Ok(Json(holdings))
}

async fn get_etf_top_holdings(
    State(state): SharedState,
    Path(symbol): Path<String>,
    query: Result<Query<LimitQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<EtfHoldingDetail>>> {
    let limit = query_params(query)?
        .limit
        .unwrap_or(DEFAULT_TOP_HOLDINGS_LIMIT);
    let holdings = state
        .store
        .etf_holdings(&normalize_symbol(&symbol), limit)
        .await?;
    Ok(Json(holdings))
}

async fn etfs_by_category(
    State(state): SharedState,
    Path(category): Path<String>,
) -> ApiResult<Json<Vec<Etf>>> {
    let etfs = state.store.etfs_by_category(&category).await?;
    Ok(Json(etfs))
}

async fn leveraged_etfs(State(state): SharedState) -> ApiResult<Json<Vec<Etf>>> {
    let etfs = state.store.leveraged_etfs().await?;
    Ok(Json(etfs))
}
