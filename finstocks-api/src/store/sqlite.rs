//! SQLite market store.
//!
//! One connection behind an async mutex. Statements are short and never span
//! an await point, so the lock is held only for the duration of one query
//! or one batch transaction.

use anyhow::Context;
use async_trait::async_trait;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Params, Row};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::schema::SQLITE_SCHEMA;
use super::{MarketStore, RowBatch, StoreError, StoreResult, Table};
use crate::model::{
    Etf, EtfHolding, EtfHoldingDetail, Fundamentals, HoldingEtf, HoldingStock, MoverDirection,
    PriceBar, PriceMover, ScreenedStock, Sector, SectorPeriod, SectorStock, Stock,
    StockEtfHolding, TechnicalIndicator,
};
use crate::screener::ScreenerFilter;

const STOCK_COLUMNS: &str =
    "s.id, s.symbol, s.name, s.sector, s.industry, s.market_cap, s.created_at, s.updated_at";

const PRICE_COLUMNS: &str =
    "id, symbol, date, open_price, high_price, low_price, close_price, volume";

const ETF_COLUMNS: &str = "id, symbol, name, category, expense_ratio, aum, inception_date, \
     benchmark, leverage_ratio, created_at, updated_at";

const HOLDING_COLUMNS: &str =
    "h.id, h.etf_symbol, h.stock_symbol, h.weight_percentage, h.shares_held, h.market_value";

/// Market store backed by SQLite.
pub struct SqliteStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database file and apply the schema.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open SQLite database {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .context("Failed to set database pragmas")?;

        let store = Self::init(conn)?;
        info!(db_path = %path.display(), "Opened SQLite market store");
        Ok(store)
    }

    /// Private in-memory database, empty apart from the schema.
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        let store = Self::init(conn)?;
        info!("Opened in-memory SQLite market store");
        Ok(store)
    }

    fn init(conn: Connection) -> anyhow::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;
        conn.execute_batch(SQLITE_SCHEMA)
            .context("Failed to create database tables")?;
        Ok(Self {
            db: Arc::new(Mutex::new(conn)),
        })
    }

    fn query_rows<T, P>(
        conn: &Connection,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> StoreResult<Vec<T>>
    where
        P: Params,
    {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        rows.collect::<rusqlite::Result<Vec<T>>>()
            .map_err(StoreError::from)
    }

    fn query_one<T, P>(
        conn: &Connection,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> StoreResult<Option<T>>
    where
        P: Params,
    {
        Ok(conn.query_row(sql, params, map).optional()?)
    }

    // ========================================================================
    // Row mapping
    // ========================================================================

    fn row_to_stock(row: &Row<'_>) -> rusqlite::Result<Stock> {
        Ok(Stock {
            id: row.get("id")?,
            symbol: row.get("symbol")?,
            name: row.get("name")?,
            sector: row.get("sector")?,
            industry: row.get("industry")?,
            market_cap: row.get("market_cap")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn row_to_price(row: &Row<'_>) -> rusqlite::Result<PriceBar> {
        Ok(PriceBar {
            id: row.get("id")?,
            symbol: row.get("symbol")?,
            date: row.get("date")?,
            open_price: row.get("open_price")?,
            high_price: row.get("high_price")?,
            low_price: row.get("low_price")?,
            close_price: row.get("close_price")?,
            volume: row.get("volume")?,
        })
    }

    fn row_to_fundamentals(row: &Row<'_>) -> rusqlite::Result<Fundamentals> {
        Ok(Fundamentals {
            id: row.get("id")?,
            symbol: row.get("symbol")?,
            pe_ratio: row.get("pe_ratio")?,
            pb_ratio: row.get("pb_ratio")?,
            debt_to_equity: row.get("debt_to_equity")?,
            roe: row.get("roe")?,
            revenue: row.get("revenue")?,
            net_income: row.get("net_income")?,
            eps: row.get("eps")?,
            dividend_yield: row.get("dividend_yield")?,
            quarter: row.get("quarter")?,
            year: row.get("year")?,
        })
    }

    fn row_to_technical(row: &Row<'_>) -> rusqlite::Result<TechnicalIndicator> {
        Ok(TechnicalIndicator {
            id: row.get("id")?,
            symbol: row.get("symbol")?,
            date: row.get("date")?,
            sma_20: row.get("sma_20")?,
            sma_50: row.get("sma_50")?,
            sma_200: row.get("sma_200")?,
            rsi: row.get("rsi")?,
            macd: row.get("macd")?,
            bollinger_upper: row.get("bollinger_upper")?,
            bollinger_lower: row.get("bollinger_lower")?,
        })
    }

    fn row_to_sector(row: &Row<'_>) -> rusqlite::Result<Sector> {
        Ok(Sector {
            id: row.get("id")?,
            name: row.get("name")?,
            performance_1d: row.get("performance_1d")?,
            performance_1w: row.get("performance_1w")?,
            performance_1m: row.get("performance_1m")?,
            performance_ytd: row.get("performance_ytd")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn row_to_etf(row: &Row<'_>) -> rusqlite::Result<Etf> {
        Ok(Etf {
            id: row.get("id")?,
            symbol: row.get("symbol")?,
            name: row.get("name")?,
            category: row.get("category")?,
            expense_ratio: row.get("expense_ratio")?,
            aum: row.get("aum")?,
            inception_date: row.get("inception_date")?,
            benchmark: row.get("benchmark")?,
            leverage_ratio: row.get("leverage_ratio")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    fn row_to_holding(row: &Row<'_>) -> rusqlite::Result<EtfHolding> {
        Ok(EtfHolding {
            id: row.get("id")?,
            etf_symbol: row.get("etf_symbol")?,
            stock_symbol: row.get("stock_symbol")?,
            weight_percentage: row.get("weight_percentage")?,
            shares_held: row.get("shares_held")?,
            market_value: row.get("market_value")?,
        })
    }

    fn row_to_holding_detail(row: &Row<'_>) -> rusqlite::Result<EtfHoldingDetail> {
        let name: Option<String> = row.get("stock_name")?;
        let stocks = match name {
            Some(name) => Some(HoldingStock {
                name,
                sector: row.get("stock_sector")?,
                market_cap: row.get("stock_market_cap")?,
            }),
            None => None,
        };
        Ok(EtfHoldingDetail {
            holding: Self::row_to_holding(row)?,
            stocks,
        })
    }

    fn row_to_stock_etf_holding(row: &Row<'_>) -> rusqlite::Result<StockEtfHolding> {
        let name: Option<String> = row.get("etf_name")?;
        let etfs = match name {
            Some(name) => Some(HoldingEtf {
                name,
                category: row.get("etf_category")?,
            }),
            None => None,
        };
        Ok(StockEtfHolding {
            holding: Self::row_to_holding(row)?,
            etfs,
        })
    }

    fn row_to_sector_stock(row: &Row<'_>) -> rusqlite::Result<SectorStock> {
        Ok(SectorStock {
            stock: Self::row_to_stock(row)?,
            close_price: row.get("close_price")?,
            price_date: row.get("price_date")?,
        })
    }

    fn row_to_screened(row: &Row<'_>) -> rusqlite::Result<ScreenedStock> {
        Ok(ScreenedStock {
            stock: Self::row_to_stock(row)?,
            close_price: row.get("close_price")?,
            pe_ratio: row.get("pe_ratio")?,
            roe: row.get("roe")?,
            eps: row.get("eps")?,
        })
    }

    fn row_to_mover(row: &Row<'_>) -> rusqlite::Result<PriceMover> {
        Ok(PriceMover {
            symbol: row.get("symbol")?,
            name: row.get("name")?,
            sector: row.get("sector")?,
            current_price: row.get("current_price")?,
            previous_price: row.get("previous_price")?,
            change_percent: row.get("change_percent")?,
        })
    }

    // ========================================================================
    // Batch inserts
    // ========================================================================

    fn insert_rows(conn: &Connection, batch: &RowBatch) -> rusqlite::Result<usize> {
        let mut count = 0;
        match batch {
            RowBatch::Stocks(rows) => {
                let mut stmt = conn.prepare_cached(
                    "INSERT INTO stocks (symbol, name, sector, industry, market_cap)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for s in rows {
                    count += stmt.execute(params![
                        s.symbol,
                        s.name,
                        s.sector,
                        s.industry,
                        s.market_cap
                    ])?;
                }
            }
            RowBatch::StockPrices(rows) | RowBatch::EtfPrices(rows) => {
                let sql = format!(
                    "INSERT INTO {} (symbol, date, open_price, high_price, low_price, close_price, volume)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    batch.table()
                );
                let mut stmt = conn.prepare_cached(&sql)?;
                for p in rows {
                    count += stmt.execute(params![
                        p.symbol,
                        p.date,
                        p.open_price,
                        p.high_price,
                        p.low_price,
                        p.close_price,
                        p.volume
                    ])?;
                }
            }
            RowBatch::Sectors(rows) => {
                let mut stmt = conn.prepare_cached(
                    "INSERT INTO sectors (name, performance_1d, performance_1w, performance_1m, performance_ytd)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for s in rows {
                    count += stmt.execute(params![
                        s.name,
                        s.performance_1d,
                        s.performance_1w,
                        s.performance_1m,
                        s.performance_ytd
                    ])?;
                }
            }
            RowBatch::Fundamentals(rows) => {
                let mut stmt = conn.prepare_cached(
                    "INSERT INTO fundamentals
                     (symbol, pe_ratio, pb_ratio, debt_to_equity, roe, revenue, net_income, eps, dividend_yield, quarter, year)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                )?;
                for f in rows {
                    count += stmt.execute(params![
                        f.symbol,
                        f.pe_ratio,
                        f.pb_ratio,
                        f.debt_to_equity,
                        f.roe,
                        f.revenue,
                        f.net_income,
                        f.eps,
                        f.dividend_yield,
                        f.quarter,
                        f.year
                    ])?;
                }
            }
            RowBatch::TechnicalIndicators(rows) => {
                let mut stmt = conn.prepare_cached(
                    "INSERT INTO technical_indicators
                     (symbol, date, sma_20, sma_50, sma_200, rsi, macd, bollinger_upper, bollinger_lower)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )?;
                for t in rows {
                    count += stmt.execute(params![
                        t.symbol,
                        t.date,
                        t.sma_20,
                        t.sma_50,
                        t.sma_200,
                        t.rsi,
                        t.macd,
                        t.bollinger_upper,
                        t.bollinger_lower
                    ])?;
                }
            }
            RowBatch::Etfs(rows) => {
                let mut stmt = conn.prepare_cached(
                    "INSERT INTO etfs
                     (symbol, name, category, expense_ratio, aum, inception_date, benchmark, leverage_ratio)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, 1.0))",
                )?;
                for e in rows {
                    count += stmt.execute(params![
                        e.symbol,
                        e.name,
                        e.category,
                        e.expense_ratio,
                        e.aum,
                        e.inception_date,
                        e.benchmark,
                        e.leverage_ratio
                    ])?;
                }
            }
            RowBatch::EtfHoldings(rows) => {
                let mut stmt = conn.prepare_cached(
                    "INSERT INTO etf_holdings
                     (etf_symbol, stock_symbol, weight_percentage, shares_held, market_value)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for h in rows {
                    count += stmt.execute(params![
                        h.etf_symbol,
                        h.stock_symbol,
                        h.weight_percentage,
                        h.shares_held,
                        h.market_value
                    ])?;
                }
            }
        }
        Ok(count)
    }
}

#[async_trait]
impl MarketStore for SqliteStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    // ========================================================================
    // Stocks
    // ========================================================================

    async fn insert_stock(&self, stock: &Stock) -> StoreResult<Stock> {
        let db = self.db.lock().await;
        db.execute(
            "INSERT INTO stocks (symbol, name, sector, industry, market_cap)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                stock.symbol,
                stock.name,
                stock.sector,
                stock.industry,
                stock.market_cap
            ],
        )?;
        let id = db.last_insert_rowid();
        let sql = format!("SELECT {} FROM stocks s WHERE s.id = ?1", STOCK_COLUMNS);
        let created = db.query_row(&sql, params![id], Self::row_to_stock)?;
        debug!(symbol = %created.symbol, id, "Inserted stock");
        Ok(created)
    }

    async fn get_stock(&self, symbol: &str) -> StoreResult<Option<Stock>> {
        let sql = format!("SELECT {} FROM stocks s WHERE s.symbol = ?1", STOCK_COLUMNS);
        let db = self.db.lock().await;
        Self::query_one(&db, &sql, params![symbol], Self::row_to_stock)
    }

    async fn list_stocks(&self) -> StoreResult<Vec<Stock>> {
        let sql = format!("SELECT {} FROM stocks s ORDER BY s.id", STOCK_COLUMNS);
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, [], Self::row_to_stock)
    }

    async fn latest_price(&self, symbol: &str) -> StoreResult<Option<PriceBar>> {
        let sql = format!(
            "SELECT {} FROM stock_prices WHERE symbol = ?1 ORDER BY date DESC LIMIT 1",
            PRICE_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_one(&db, &sql, params![symbol], Self::row_to_price)
    }

    async fn price_history(&self, symbol: &str, limit: u32) -> StoreResult<Vec<PriceBar>> {
        let sql = format!(
            "SELECT {} FROM stock_prices WHERE symbol = ?1 ORDER BY date DESC LIMIT ?2",
            PRICE_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![symbol, limit], Self::row_to_price)
    }

    async fn latest_fundamentals(&self, symbol: &str) -> StoreResult<Option<Fundamentals>> {
        let db = self.db.lock().await;
        Self::query_one(
            &db,
            "SELECT * FROM fundamentals WHERE symbol = ?1
             ORDER BY year DESC, quarter DESC LIMIT 1",
            params![symbol],
            Self::row_to_fundamentals,
        )
    }

    async fn latest_technical(&self, symbol: &str) -> StoreResult<Option<TechnicalIndicator>> {
        let db = self.db.lock().await;
        Self::query_one(
            &db,
            "SELECT * FROM technical_indicators WHERE symbol = ?1 ORDER BY date DESC LIMIT 1",
            params![symbol],
            Self::row_to_technical,
        )
    }

    async fn etfs_holding(&self, stock_symbol: &str) -> StoreResult<Vec<StockEtfHolding>> {
        let sql = format!(
            "SELECT {}, e.name AS etf_name, e.category AS etf_category
             FROM etf_holdings h
             LEFT JOIN etfs e ON e.symbol = h.etf_symbol
             WHERE h.stock_symbol = ?1
             ORDER BY h.weight_percentage DESC, h.etf_symbol",
            HOLDING_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![stock_symbol], Self::row_to_stock_etf_holding)
    }

    // ========================================================================
    // Sectors
    // ========================================================================

    async fn list_sectors(&self) -> StoreResult<Vec<Sector>> {
        let db = self.db.lock().await;
        Self::query_rows(
            &db,
            "SELECT * FROM sectors ORDER BY performance_1d DESC, name",
            [],
            Self::row_to_sector,
        )
    }

    async fn top_sectors(&self, period: SectorPeriod, limit: u32) -> StoreResult<Vec<Sector>> {
        let sql = format!(
            "SELECT * FROM sectors ORDER BY {} DESC, name LIMIT ?1",
            period.column()
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![limit], Self::row_to_sector)
    }

    async fn sector_stocks(&self, sector: &str) -> StoreResult<Vec<SectorStock>> {
        let sql = format!(
            "SELECT {}, p.close_price, p.date AS price_date
             FROM stocks s
             JOIN stock_prices p ON p.symbol = s.symbol
             WHERE s.sector = ?1
                AND p.date = (SELECT MAX(date) FROM stock_prices WHERE symbol = s.symbol)
             ORDER BY s.market_cap DESC, s.symbol",
            STOCK_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![sector], Self::row_to_sector_stock)
    }

    // ========================================================================
    // Screener
    // ========================================================================

    async fn screen(&self, filter: &ScreenerFilter) -> StoreResult<Vec<ScreenedStock>> {
        let mut sql = format!(
            "SELECT {}, p.close_price, f.pe_ratio, f.roe, f.eps
             FROM stocks s
             LEFT JOIN stock_prices p ON p.symbol = s.symbol
                AND p.date = (SELECT MAX(date) FROM stock_prices WHERE symbol = s.symbol)
             LEFT JOIN fundamentals f ON f.id = (
                SELECT id FROM fundamentals WHERE symbol = s.symbol
                ORDER BY year DESC, quarter DESC LIMIT 1)
             WHERE 1 = 1",
            STOCK_COLUMNS
        );
        let mut values: Vec<Value> = Vec::new();

        for bound in filter.bounds() {
            values.push(Value::Real(bound.value));
            sql.push_str(&format!(
                " AND {} {} ?{}",
                bound.field.sql_column(),
                bound.comparison.sql_operator(),
                values.len()
            ));
        }

        let sectors = filter.sector_names();
        if !sectors.is_empty() {
            let mut placeholders = Vec::with_capacity(sectors.len());
            for sector in sectors {
                values.push(Value::Text(sector.clone()));
                placeholders.push(format!("?{}", values.len()));
            }
            sql.push_str(&format!(" AND s.sector IN ({})", placeholders.join(", ")));
        }

        values.push(Value::Integer(i64::from(filter.effective_limit())));
        sql.push_str(&format!(
            " ORDER BY s.market_cap DESC, s.symbol LIMIT ?{}",
            values.len()
        ));

        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params_from_iter(values), Self::row_to_screened)
    }

    async fn movers(&self, direction: MoverDirection, limit: u32) -> StoreResult<Vec<PriceMover>> {
        let order = if direction.is_ascending() { "ASC" } else { "DESC" };
        let sql = format!(
            "WITH ranked AS (
                SELECT symbol, close_price,
                       ROW_NUMBER() OVER (PARTITION BY symbol ORDER BY date DESC) AS rn
                FROM stock_prices
             ),
             pairs AS (
                SELECT cur.symbol,
                       cur.close_price AS current_price,
                       prev.close_price AS previous_price,
                       ROUND((cur.close_price - prev.close_price) / prev.close_price * 100, 2) AS change_percent
                FROM ranked cur
                JOIN ranked prev ON prev.symbol = cur.symbol AND prev.rn = 2
                WHERE cur.rn = 1
                  AND cur.close_price IS NOT NULL
                  AND prev.close_price IS NOT NULL
                  AND prev.close_price <> 0
             )
             SELECT s.symbol, s.name, s.sector, pr.current_price, pr.previous_price, pr.change_percent
             FROM pairs pr
             JOIN stocks s ON s.symbol = pr.symbol
             ORDER BY pr.change_percent {}, s.symbol
             LIMIT ?1",
            order
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![limit], Self::row_to_mover)
    }

    // ========================================================================
    // ETFs
    // ========================================================================

    async fn list_etfs(&self) -> StoreResult<Vec<Etf>> {
        let sql = format!("SELECT {} FROM etfs ORDER BY aum DESC, symbol", ETF_COLUMNS);
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, [], Self::row_to_etf)
    }

    async fn get_etf(&self, symbol: &str) -> StoreResult<Option<Etf>> {
        let sql = format!("SELECT {} FROM etfs WHERE symbol = ?1", ETF_COLUMNS);
        let db = self.db.lock().await;
        Self::query_one(&db, &sql, params![symbol], Self::row_to_etf)
    }

    async fn latest_etf_price(&self, symbol: &str) -> StoreResult<Option<PriceBar>> {
        let sql = format!(
            "SELECT {} FROM etf_prices WHERE symbol = ?1 ORDER BY date DESC LIMIT 1",
            PRICE_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_one(&db, &sql, params![symbol], Self::row_to_price)
    }

    async fn etf_price_history(&self, symbol: &str, limit: u32) -> StoreResult<Vec<PriceBar>> {
        let sql = format!(
            "SELECT {} FROM etf_prices WHERE symbol = ?1 ORDER BY date DESC LIMIT ?2",
            PRICE_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![symbol, limit], Self::row_to_price)
    }

    async fn etf_holdings(&self, etf_symbol: &str, limit: u32) -> StoreResult<Vec<EtfHoldingDetail>> {
        let sql = format!(
            "SELECT {}, st.name AS stock_name, st.sector AS stock_sector,
                    st.market_cap AS stock_market_cap
             FROM etf_holdings h
             LEFT JOIN stocks st ON st.symbol = h.stock_symbol
             WHERE h.etf_symbol = ?1
             ORDER BY h.weight_percentage DESC, h.stock_symbol
             LIMIT ?2",
            HOLDING_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![etf_symbol, limit], Self::row_to_holding_detail)
    }

    async fn etfs_by_category(&self, category: &str) -> StoreResult<Vec<Etf>> {
        let sql = format!(
            "SELECT {} FROM etfs WHERE category = ?1 ORDER BY aum DESC, symbol",
            ETF_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, params![category], Self::row_to_etf)
    }

    async fn leveraged_etfs(&self) -> StoreResult<Vec<Etf>> {
        let sql = format!(
            "SELECT {} FROM etfs WHERE leverage_ratio > 1 ORDER BY aum DESC, symbol",
            ETF_COLUMNS
        );
        let db = self.db.lock().await;
        Self::query_rows(&db, &sql, [], Self::row_to_etf)
    }

    // ========================================================================
    // Bulk
    // ========================================================================

    async fn insert_batch(&self, batch: &RowBatch) -> StoreResult<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut db = self.db.lock().await;
        let tx = db.transaction()?;
        let count = Self::insert_rows(&tx, batch)?;
        tx.commit()?;

        debug!(table = %batch.table(), count, "Inserted batch");
        Ok(count)
    }

    async fn clear(&self, table: Table) -> StoreResult<()> {
        let db = self.db.lock().await;
        let deleted = db.execute(&format!("DELETE FROM {}", table), [])?;
        debug!(table = %table, deleted, "Cleared table");
        Ok(())
    }
}
