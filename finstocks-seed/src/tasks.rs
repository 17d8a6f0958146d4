//! Seeding commands, each a sequence of loads against one store.

use chrono::NaiveDate;
use rand::Rng;
use std::collections::HashSet;
use tracing::{info, warn};

use finstocks_api::store::{RowBatch, Table};

use crate::catalog;
use crate::etf::etf_prices;
use crate::generate::{fundamentals, stock_prices, technical_indicators};
use crate::holdings::all_holdings;
use crate::loader::{LoadReport, Loader, PRICE_BATCH_SIZE, ROW_BATCH_SIZE};

/// Tables rewritten by the stock seeding, children first. Holdings go too
/// since they reference stocks.
pub const STOCK_TABLES: [Table; 6] = [
    Table::EtfHoldings,
    Table::TechnicalIndicators,
    Table::Fundamentals,
    Table::StockPrices,
    Table::Stocks,
    Table::Sectors,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockOptions {
    pub days: u32,
    pub technical_days: u32,
    pub reset: bool,
}

impl Default for StockOptions {
    fn default() -> Self {
        Self {
            days: 730,
            technical_days: 90,
            reset: false,
        }
    }
}

/// The small fixed sample set, one row at a time.
pub async fn seed_sample(loader: &Loader) -> LoadReport {
    let sample = catalog::sample();
    let mut report = LoadReport::default();

    report.merge(loader.load_each(&sample.stocks, RowBatch::Stocks).await);
    report.merge(loader.load_each(&sample.sectors, RowBatch::Sectors).await);
    report.merge(loader.load_each(&sample.prices, RowBatch::StockPrices).await);
    report.merge(
        loader
            .load_each(&sample.fundamentals, RowBatch::Fundamentals)
            .await,
    );

    report
}

/// The full stock universe with prices, fundamentals and indicators.
pub async fn seed_stocks<R: Rng + ?Sized>(
    loader: &Loader,
    rng: &mut R,
    options: StockOptions,
    end: NaiveDate,
) -> LoadReport {
    if options.reset {
        loader.clear(&STOCK_TABLES).await;
    }

    let sectors = catalog::sectors();
    let stocks = catalog::stocks();
    info!(
        stocks = stocks.len(),
        sectors = sectors.len(),
        days = options.days,
        technical_days = options.technical_days,
        "Generating stock data"
    );

    let prices = stock_prices(rng, &stocks, options.days, end);
    let fundamentals = fundamentals(rng, &stocks);
    let indicators = technical_indicators(rng, &stocks, options.technical_days, end);

    let mut report = LoadReport::default();
    report.merge(loader.load_each(&sectors, RowBatch::Sectors).await);
    report.merge(loader.load_each(&stocks, RowBatch::Stocks).await);
    report.merge(
        loader
            .load(&prices, PRICE_BATCH_SIZE, RowBatch::StockPrices)
            .await,
    );
    report.merge(
        loader
            .load(&fundamentals, ROW_BATCH_SIZE, RowBatch::Fundamentals)
            .await,
    );
    report.merge(
        loader
            .load(&indicators, ROW_BATCH_SIZE, RowBatch::TechnicalIndicators)
            .await,
    );

    report
}

/// The ETF list and its daily prices.
pub async fn seed_etfs<R: Rng + ?Sized>(
    loader: &Loader,
    rng: &mut R,
    days: u32,
    end: NaiveDate,
) -> LoadReport {
    let etfs = catalog::etfs();
    info!(
        etfs = etfs.len(),
        categories = catalog::ETF_CATEGORIES.len(),
        days,
        "Generating ETF data"
    );
    let prices = etf_prices(rng, &etfs, days, end);

    let mut report = loader.load_each(&etfs, RowBatch::Etfs).await;
    report.merge(
        loader
            .load(&prices, PRICE_BATCH_SIZE, RowBatch::EtfPrices)
            .await,
    );
    report
}

/// Holdings for the known fund compositions, drawn from the stocks and ETFs
/// already in the store.
pub async fn seed_holdings<R: Rng + ?Sized>(
    loader: &Loader,
    rng: &mut R,
) -> anyhow::Result<LoadReport> {
    let stocks = loader.store().list_stocks().await?;
    let etf_symbols: HashSet<String> = loader
        .store()
        .list_etfs()
        .await?
        .into_iter()
        .map(|e| e.symbol)
        .collect();

    if stocks.is_empty() || etf_symbols.is_empty() {
        warn!(
            stocks = stocks.len(),
            etfs = etf_symbols.len(),
            "Seed stocks and ETFs before holdings"
        );
        return Ok(LoadReport::default());
    }
    info!(stocks = stocks.len(), etfs = etf_symbols.len(), "Generating ETF holdings");

    let holdings = all_holdings(rng, &stocks, &etf_symbols);
    Ok(loader
        .load(&holdings, ROW_BATCH_SIZE, RowBatch::EtfHoldings)
        .await)
}

/// Delete every row of every table. Returns how many tables failed to clear.
pub async fn reset(loader: &Loader) -> usize {
    loader.clear(&Table::DELETE_ORDER).await
}
