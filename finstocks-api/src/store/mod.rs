//! Market data stores.
//!
//! [`MarketStore`] is the only way handlers and the seeding tool reach the
//! database. Two implementations exist:
//! - [`SqliteStore`]: local file or in-memory SQLite
//! - [`PostgrestStore`]: hosted Postgres behind a PostgREST (Supabase) API

pub mod postgrest;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;
use chrono::NaiveDate;
use finstocks_common::{DatabaseConfig, DatabaseTarget};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::model::{
    Etf, EtfHolding, EtfHoldingDetail, Fundamentals, MoverDirection, PriceBar, PriceMover,
    ScreenedStock, Sector, SectorPeriod, SectorStock, Stock, StockEtfHolding, TechnicalIndicator,
};
use crate::screener::ScreenerFilter;

pub use postgrest::PostgrestStore;
pub use sqlite::SqliteStore;

// ============================================================================
// Errors
// ============================================================================

/// Failure reported by a store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database API error ({status}, {code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Failed to decode row: {0}")]
    Decode(String),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ffi;

        if let rusqlite::Error::SqliteFailure(code, _) = &err {
            if code.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
                || code.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            {
                return Self::Duplicate(err.to_string());
            }
        }
        Self::Sqlite(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ============================================================================
// Tables and batches
// ============================================================================

/// Tables of the market database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Stocks,
    StockPrices,
    Sectors,
    Fundamentals,
    TechnicalIndicators,
    Etfs,
    EtfPrices,
    EtfHoldings,
}

impl Table {
    /// Every table, children before the parents they reference.
    pub const DELETE_ORDER: [Table; 8] = [
        Table::EtfHoldings,
        Table::EtfPrices,
        Table::Etfs,
        Table::TechnicalIndicators,
        Table::Fundamentals,
        Table::StockPrices,
        Table::Stocks,
        Table::Sectors,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Stocks => "stocks",
            Self::StockPrices => "stock_prices",
            Self::Sectors => "sectors",
            Self::Fundamentals => "fundamentals",
            Self::TechnicalIndicators => "technical_indicators",
            Self::Etfs => "etfs",
            Self::EtfPrices => "etf_prices",
            Self::EtfHoldings => "etf_holdings",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rows destined for a single table.
#[derive(Debug, Clone)]
pub enum RowBatch {
    Stocks(Vec<Stock>),
    StockPrices(Vec<PriceBar>),
    Sectors(Vec<Sector>),
    Fundamentals(Vec<Fundamentals>),
    TechnicalIndicators(Vec<TechnicalIndicator>),
    Etfs(Vec<Etf>),
    EtfPrices(Vec<PriceBar>),
    EtfHoldings(Vec<EtfHolding>),
}

impl RowBatch {
    pub fn table(&self) -> Table {
        match self {
            Self::Stocks(_) => Table::Stocks,
            Self::StockPrices(_) => Table::StockPrices,
            Self::Sectors(_) => Table::Sectors,
            Self::Fundamentals(_) => Table::Fundamentals,
            Self::TechnicalIndicators(_) => Table::TechnicalIndicators,
            Self::Etfs(_) => Table::Etfs,
            Self::EtfPrices(_) => Table::EtfPrices,
            Self::EtfHoldings(_) => Table::EtfHoldings,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Stocks(rows) => rows.len(),
            Self::StockPrices(rows) | Self::EtfPrices(rows) => rows.len(),
            Self::Sectors(rows) => rows.len(),
            Self::Fundamentals(rows) => rows.len(),
            Self::TechnicalIndicators(rows) => rows.len(),
            Self::Etfs(rows) => rows.len(),
            Self::EtfHoldings(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON array of the rows, as sent to the hosted API.
    pub fn to_json(&self) -> StoreResult<serde_json::Value> {
        let value = match self {
            Self::Stocks(rows) => serde_json::to_value(rows)?,
            Self::StockPrices(rows) | Self::EtfPrices(rows) => serde_json::to_value(rows)?,
            Self::Sectors(rows) => serde_json::to_value(rows)?,
            Self::Fundamentals(rows) => serde_json::to_value(rows)?,
            Self::TechnicalIndicators(rows) => serde_json::to_value(rows)?,
            Self::Etfs(rows) => {
                serde_json::to_value(rows.iter().map(NewEtf::from).collect::<Vec<_>>())?
            }
            Self::EtfHoldings(rows) => serde_json::to_value(rows)?,
        };
        Ok(value)
    }
}

/// Columns written when inserting ETFs.
pub const ETF_INSERT_COLUMNS: &str =
    "symbol,name,category,expense_ratio,aum,inception_date,benchmark,leverage_ratio";

/// ETF insert payload. A missing leverage ratio is left out so the column
/// default applies.
#[derive(Debug, Serialize)]
struct NewEtf<'a> {
    symbol: &'a str,
    name: &'a str,
    category: &'a str,
    expense_ratio: Option<f64>,
    aum: Option<f64>,
    inception_date: Option<NaiveDate>,
    benchmark: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    leverage_ratio: Option<f64>,
}

impl<'a> From<&'a Etf> for NewEtf<'a> {
    fn from(etf: &'a Etf) -> Self {
        Self {
            symbol: &etf.symbol,
            name: &etf.name,
            category: &etf.category,
            expense_ratio: etf.expense_ratio,
            aum: etf.aum,
            inception_date: etf.inception_date,
            benchmark: etf.benchmark.as_deref(),
            leverage_ratio: etf.leverage_ratio,
        }
    }
}

// ============================================================================
// Store trait
// ============================================================================

/// Read and write access to the market database.
///
/// Symbol arguments are expected to be normalized by the caller.
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    // Stocks
    async fn insert_stock(&self, stock: &Stock) -> StoreResult<Stock>;
    async fn get_stock(&self, symbol: &str) -> StoreResult<Option<Stock>>;
    async fn list_stocks(&self) -> StoreResult<Vec<Stock>>;
    async fn latest_price(&self, symbol: &str) -> StoreResult<Option<PriceBar>>;
    async fn price_history(&self, symbol: &str, limit: u32) -> StoreResult<Vec<PriceBar>>;
    async fn latest_fundamentals(&self, symbol: &str) -> StoreResult<Option<Fundamentals>>;
    async fn latest_technical(&self, symbol: &str) -> StoreResult<Option<TechnicalIndicator>>;
    async fn etfs_holding(&self, stock_symbol: &str) -> StoreResult<Vec<StockEtfHolding>>;

    // Sectors
    async fn list_sectors(&self) -> StoreResult<Vec<Sector>>;
    async fn top_sectors(&self, period: SectorPeriod, limit: u32) -> StoreResult<Vec<Sector>>;
    async fn sector_stocks(&self, sector: &str) -> StoreResult<Vec<SectorStock>>;

    // Screener
    async fn screen(&self, filter: &ScreenerFilter) -> StoreResult<Vec<ScreenedStock>>;
    async fn movers(&self, direction: MoverDirection, limit: u32) -> StoreResult<Vec<PriceMover>>;

    // ETFs
    async fn list_etfs(&self) -> StoreResult<Vec<Etf>>;
    async fn get_etf(&self, symbol: &str) -> StoreResult<Option<Etf>>;
    async fn latest_etf_price(&self, symbol: &str) -> StoreResult<Option<PriceBar>>;
    async fn etf_price_history(&self, symbol: &str, limit: u32) -> StoreResult<Vec<PriceBar>>;
    async fn etf_holdings(&self, etf_symbol: &str, limit: u32) -> StoreResult<Vec<EtfHoldingDetail>>;
    async fn etfs_by_category(&self, category: &str) -> StoreResult<Vec<Etf>>;
    async fn leveraged_etfs(&self) -> StoreResult<Vec<Etf>>;

    // Bulk
    /// Insert all rows of `batch` into its table. Returns the number inserted.
    async fn insert_batch(&self, batch: &RowBatch) -> StoreResult<usize>;
    /// Delete every row of `table`.
    async fn clear(&self, table: Table) -> StoreResult<()>;
}

/// Open the store selected by the database configuration.
pub fn connect(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn MarketStore>> {
    let store: Arc<dyn MarketStore> = match config.target()? {
        DatabaseTarget::Hosted { base_url, api_key } => Arc::new(PostgrestStore::new(
            base_url,
            &api_key,
            Duration::from_secs(config.timeout_secs),
        )?),
        DatabaseTarget::SqliteFile(path) => Arc::new(SqliteStore::open(&path)?),
        DatabaseTarget::SqliteMemory => Arc::new(SqliteStore::open_in_memory()?),
    };

    tracing::info!(backend = store.backend(), "Connected market data store");
    Ok(store)
}
