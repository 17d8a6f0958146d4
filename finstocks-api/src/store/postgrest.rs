//! Hosted market store over a PostgREST API (Supabase).
//!
//! Plain table reads map to `GET /rest/v1/{table}` with PostgREST filter
//! parameters. Joined reads use resource embedding. Reads that need window
//! functions or lateral joins call the SQL functions from
//! [`POSTGRES_SCHEMA`](super::schema::POSTGRES_SCHEMA) via `/rest/v1/rpc`.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::{MarketStore, RowBatch, StoreError, StoreResult, Table, ETF_INSERT_COLUMNS};
use crate::model::{
    Etf, EtfHoldingDetail, Fundamentals, MoverDirection, PriceBar, PriceMover, ScreenedStock,
    Sector, SectorPeriod, SectorStock, Stock, StockEtfHolding, TechnicalIndicator,
};
use crate::screener::ScreenerFilter;

/// Postgres unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

// ============================================================================
// Query builder
// ============================================================================

/// PostgREST read on one table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    table: String,
    select: String,
    filters: Vec<(String, String)>,
    order: Vec<String>,
    limit: Option<u32>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            select: "*".to_string(),
            filters: Vec::new(),
            order: Vec::new(),
            limit: None,
        }
    }

    pub fn select(mut self, columns: &str) -> Self {
        self.select = columns.to_string();
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn gt(mut self, column: &str, value: impl ToString) -> Self {
        self.filters
            .push((column.to_string(), format!("gt.{}", value.to_string())));
        self
    }

    /// Descending order on `column`, nulls last. Calls accumulate.
    pub fn order_desc(mut self, column: &str) -> Self {
        self.order.push(format!("{}.desc.nullslast", column));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order.push(format!("{}.asc", column));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Query string pairs in PostgREST syntax.
    pub fn params(&self) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), self.select.clone())];
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

/// Error payload returned by PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

// ============================================================================
// Store
// ============================================================================

/// Market store backed by a hosted PostgREST endpoint.
pub struct PostgrestStore {
    client: Client,
    rest_url: Url,
    api_key: String,
}

impl PostgrestStore {
    /// Create a store for the project at `base_url` (e.g. `https://xyz.supabase.co`).
    pub fn new(base_url: Url, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            rest_url: rest_endpoint(base_url)?,
            api_key: api_key.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> StoreResult<RequestBuilder> {
        let url = self
            .rest_url
            .join(path)
            .map_err(|e| StoreError::Decode(format!("invalid path {}: {}", path, e)))?;
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key))
    }

    async fn send(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let code = body.code.unwrap_or_default();
        let message = match (body.message, body.details) {
            (Some(message), Some(details)) => format!("{} ({})", message, details),
            (Some(message), None) => message,
            (None, _) => text,
        };

        if status == StatusCode::CONFLICT || code == UNIQUE_VIOLATION {
            return Err(StoreError::Duplicate(message));
        }

        warn!(status = status.as_u16(), code = %code, "Database API request failed");
        Err(StoreError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, query: TableQuery) -> StoreResult<Vec<T>> {
        debug!(table = query.table(), "Fetching rows");
        let request = self
            .request(Method::GET, query.table())?
            .query(&query.params());
        let response = self.send(request).await?;
        let rows = response.json::<Vec<T>>().await.map_err(|e| {
            StoreError::Decode(format!("{} rows: {}", query.table(), e))
        })?;
        Ok(rows)
    }

    async fn fetch_one<T: DeserializeOwned>(&self, query: TableQuery) -> StoreResult<Option<T>> {
        let rows = self.fetch(query.limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    async fn rpc<T: DeserializeOwned>(&self, function: &str, args: Value) -> StoreResult<Vec<T>> {
        debug!(function, "Calling database function");
        let request = self
            .request(Method::POST, &format!("rpc/{}", function))?
            .json(&args);
        let response = self.send(request).await?;
        let rows = response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::Decode(format!("{} result: {}", function, e)))?;
        Ok(rows)
    }
}

/// `{base}/rest/v1/`, keeping any path prefix of the base URL.
fn rest_endpoint(mut base_url: Url) -> anyhow::Result<Url> {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    Ok(base_url.join("rest/v1/")?)
}

#[async_trait]
impl MarketStore for PostgrestStore {
    fn backend(&self) -> &'static str {
        "postgrest"
    }

    async fn insert_stock(&self, stock: &Stock) -> StoreResult<Stock> {
        let request = self
            .request(Method::POST, Table::Stocks.name())?
            .header("Prefer", "return=representation")
            .json(stock);
        let response = self.send(request).await?;
        let mut rows: Vec<Stock> = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("inserted stock: {}", e)))?;
        if rows.is_empty() {
            return Err(StoreError::Decode("insert returned no rows".to_string()));
        }
        Ok(rows.swap_remove(0))
    }

    async fn get_stock(&self, symbol: &str) -> StoreResult<Option<Stock>> {
        self.fetch_one(TableQuery::new("stocks").eq("symbol", symbol))
            .await
    }

    async fn list_stocks(&self) -> StoreResult<Vec<Stock>> {
        self.fetch(TableQuery::new("stocks").order_asc("id")).await
    }

    async fn latest_price(&self, symbol: &str) -> StoreResult<Option<PriceBar>> {
        self.fetch_one(
            TableQuery::new("stock_prices")
                .eq("symbol", symbol)
                .order_desc("date"),
        )
        .await
    }

    async fn price_history(&self, symbol: &str, limit: u32) -> StoreResult<Vec<PriceBar>> {
        self.fetch(
            TableQuery::new("stock_prices")
                .eq("symbol", symbol)
                .order_desc("date")
                .limit(limit),
        )
        .await
    }

    async fn latest_fundamentals(&self, symbol: &str) -> StoreResult<Option<Fundamentals>> {
        self.fetch_one(
            TableQuery::new("fundamentals")
                .eq("symbol", symbol)
                .order_desc("year")
                .order_desc("quarter"),
        )
        .await
    }

    async fn latest_technical(&self, symbol: &str) -> StoreResult<Option<TechnicalIndicator>> {
        self.fetch_one(
            TableQuery::new("technical_indicators")
                .eq("symbol", symbol)
                .order_desc("date"),
        )
        .await
    }

    async fn etfs_holding(&self, stock_symbol: &str) -> StoreResult<Vec<StockEtfHolding>> {
        self.fetch(
            TableQuery::new("etf_holdings")
                .select("*,etfs(name,category)")
                .eq("stock_symbol", stock_symbol)
                .order_desc("weight_percentage"),
        )
        .await
    }

    async fn list_sectors(&self) -> StoreResult<Vec<Sector>> {
        self.fetch(TableQuery::new("sectors").order_desc("performance_1d"))
            .await
    }

    async fn top_sectors(&self, period: SectorPeriod, limit: u32) -> StoreResult<Vec<Sector>> {
        self.fetch(
            TableQuery::new("sectors")
                .order_desc(period.column())
                .limit(limit),
        )
        .await
    }

    async fn sector_stocks(&self, sector: &str) -> StoreResult<Vec<SectorStock>> {
        self.rpc("sector_stocks", json!({ "p_sector": sector }))
            .await
    }

    async fn screen(&self, filter: &ScreenerFilter) -> StoreResult<Vec<ScreenedStock>> {
        self.rpc("screen_stocks", filter.rpc_args()).await
    }

    async fn movers(&self, direction: MoverDirection, limit: u32) -> StoreResult<Vec<PriceMover>> {
        self.rpc(
            "price_movers",
            json!({ "p_ascending": direction.is_ascending(), "p_limit": limit }),
        )
        .await
    }

    async fn list_etfs(&self) -> StoreResult<Vec<Etf>> {
        self.fetch(TableQuery::new("etfs").order_desc("aum")).await
    }

    async fn get_etf(&self, symbol: &str) -> StoreResult<Option<Etf>> {
        self.fetch_one(TableQuery::new("etfs").eq("symbol", symbol))
            .await
    }

    async fn latest_etf_price(&self, symbol: &str) -> StoreResult<Option<PriceBar>> {
        self.fetch_one(
            TableQuery::new("etf_prices")
                .eq("symbol", symbol)
                .order_desc("date"),
        )
        .await
    }

    async fn etf_price_history(&self, symbol: &str, limit: u32) -> StoreResult<Vec<PriceBar>> {
        self.fetch(
            TableQuery::new("etf_prices")
                .eq("symbol", symbol)
                .order_desc("date")
                .limit(limit),
        )
        .await
    }

    async fn etf_holdings(&self, etf_symbol: &str, limit: u32) -> StoreResult<Vec<EtfHoldingDetail>> {
        self.fetch(
            TableQuery::new("etf_holdings")
                .select("*,stocks(name,sector,market_cap)")
                .eq("etf_symbol", etf_symbol)
                .order_desc("weight_percentage")
                .limit(limit),
        )
        .await
    }

    async fn etfs_by_category(&self, category: &str) -> StoreResult<Vec<Etf>> {
        self.fetch(
            TableQuery::new("etfs")
                .eq("category", category)
                .order_desc("aum"),
        )
        .await
    }

    async fn leveraged_etfs(&self) -> StoreResult<Vec<Etf>> {
        self.fetch(
            TableQuery::new("etfs")
                .gt("leverage_ratio", 1)
                .order_desc("aum"),
        )
        .await
    }

    async fn insert_batch(&self, batch: &RowBatch) -> StoreResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut request = self.request(Method::POST, batch.table().name())?;
        request = match batch {
            // missing=default only applies to listed columns
            RowBatch::Etfs(_) => request
                .query(&[("columns", ETF_INSERT_COLUMNS)])
                .header("Prefer", "return=minimal, missing=default"),
            _ => request.header("Prefer", "return=minimal"),
        };
        self.send(request.json(&batch.to_json()?)).await?;

        debug!(table = %batch.table(), count = batch.len(), "Inserted batch");
        Ok(batch.len())
    }

    async fn clear(&self, table: Table) -> StoreResult<()> {
        let request = self
            .request(Method::DELETE, table.name())?
            .query(&[("id", "neq.0")]);
        self.send(request).await?;
        debug!(table = %table, "Cleared table");
        Ok(())
    }
}
