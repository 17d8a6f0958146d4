//! Market data records.
//!
//! Field names match the column names of the underlying tables, so rows
//! serialize to the same JSON whichever store produced them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trim and upper-case a ticker symbol.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

// ============================================================================
// Stocks
// ============================================================================

/// A listed company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

impl Stock {
    /// New stock record with the symbol normalized.
    pub fn new(symbol: &str, name: impl Into<String>) -> Self {
        Self {
            id: None,
            symbol: normalize_symbol(symbol),
            name: name.into(),
            sector: None,
            industry: None,
            market_cap: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_market_cap(mut self, market_cap: f64) -> Self {
        self.market_cap = Some(market_cap);
        self
    }
}

/// Body of `POST /api/stocks`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStockRequest {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

impl CreateStockRequest {
    pub fn into_stock(self) -> Stock {
        Stock {
            id: None,
            symbol: normalize_symbol(&self.symbol),
            name: self.name,
            sector: self.sector,
            industry: self.industry,
            market_cap: self.market_cap,
            created_at: None,
            updated_at: None,
        }
    }
}

/// One trading day of OHLCV data. Shared by `stock_prices` and `etf_prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub open_price: Option<f64>,
    #[serde(default)]
    pub high_price: Option<f64>,
    #[serde(default)]
    pub low_price: Option<f64>,
    #[serde(default)]
    pub close_price: Option<f64>,
    #[serde(default)]
    pub volume: Option<i64>,
}

/// Quarterly ratios and results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub symbol: String,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub pb_ratio: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Daily technical indicator snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalIndicator {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub sma_20: Option<f64>,
    #[serde(default)]
    pub sma_50: Option<f64>,
    #[serde(default)]
    pub sma_200: Option<f64>,
    #[serde(default)]
    pub rsi: Option<f64>,
    #[serde(default)]
    pub macd: Option<f64>,
    #[serde(default)]
    pub bollinger_upper: Option<f64>,
    #[serde(default)]
    pub bollinger_lower: Option<f64>,
}

/// Stock with its most recent price and fundamentals.
#[derive(Debug, Clone, Serialize)]
pub struct StockDetail {
    #[serde(flatten)]
    pub stock: Stock,
    pub latest_price: Option<PriceBar>,
    pub fundamentals: Option<Fundamentals>,
}

// ============================================================================
// Sectors
// ============================================================================

/// Sector performance snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub performance_1d: Option<f64>,
    #[serde(default)]
    pub performance_1w: Option<f64>,
    #[serde(default)]
    pub performance_1m: Option<f64>,
    #[serde(default)]
    pub performance_ytd: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Ranking window for sector performance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SectorPeriod {
    #[default]
    OneDay,
    OneWeek,
    OneMonth,
    YearToDate,
}

impl SectorPeriod {
    /// Parse a query value. Unknown values fall back to one day.
    pub fn from_param(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "1w" => Self::OneWeek,
            "1m" => Self::OneMonth,
            "ytd" => Self::YearToDate,
            _ => Self::OneDay,
        }
    }

    /// Column ranked by this period.
    pub const fn column(self) -> &'static str {
        match self {
            Self::OneDay => "performance_1d",
            Self::OneWeek => "performance_1w",
            Self::OneMonth => "performance_1m",
            Self::YearToDate => "performance_ytd",
        }
    }
}

impl fmt::Display for SectorPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::OneDay => "1d",
            Self::OneWeek => "1w",
            Self::OneMonth => "1m",
            Self::YearToDate => "ytd",
        };
        write!(f, "{}", label)
    }
}

/// Stock row of a sector listing, with its latest close.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorStock {
    #[serde(flatten)]
    pub stock: Stock,
    #[serde(default)]
    pub close_price: Option<f64>,
    #[serde(default)]
    pub price_date: Option<NaiveDate>,
}

// ============================================================================
// Screener
// ============================================================================

/// Screener result row: stock columns plus the latest close and fundamentals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenedStock {
    #[serde(flatten)]
    pub stock: Stock,
    #[serde(default)]
    pub close_price: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
}

/// Which end of the daily change ranking to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoverDirection {
    Gainers,
    Losers,
}

impl MoverDirection {
    pub const fn is_ascending(self) -> bool {
        matches!(self, Self::Losers)
    }
}

/// Change between a stock's two most recent closes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceMover {
    pub symbol: String,
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    pub current_price: f64,
    pub previous_price: f64,
    pub change_percent: f64,
}

// ============================================================================
// ETFs
// ============================================================================

/// Exchange traded fund.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Etf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub symbol: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub expense_ratio: Option<f64>,
    #[serde(default)]
    pub aum: Option<f64>,
    #[serde(default)]
    pub inception_date: Option<NaiveDate>,
    #[serde(default)]
    pub benchmark: Option<String>,
    #[serde(default)]
    pub leverage_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// ETF with its most recent price.
#[derive(Debug, Clone, Serialize)]
pub struct EtfDetail {
    #[serde(flatten)]
    pub etf: Etf,
    pub latest_price: Option<PriceBar>,
}

/// Position of one stock inside one ETF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfHolding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub etf_symbol: String,
    pub stock_symbol: String,
    pub weight_percentage: f64,
    #[serde(default)]
    pub shares_held: Option<i64>,
    #[serde(default)]
    pub market_value: Option<f64>,
}

/// Stock columns embedded in a holding row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingStock {
    pub name: String,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

/// Holding of an ETF, with the held stock's name and sector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtfHoldingDetail {
    #[serde(flatten)]
    pub holding: EtfHolding,
    #[serde(default)]
    pub stocks: Option<HoldingStock>,
}

/// ETF columns embedded in a holding row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingEtf {
    pub name: String,
    pub category: String,
}

/// Holding of a stock, with the holding ETF's name and category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEtfHolding {
    #[serde(flatten)]
    pub holding: EtfHolding,
    #[serde(default)]
    pub etfs: Option<HoldingEtf>,
}
