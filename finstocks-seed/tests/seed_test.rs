//! End-to-end seeding into an in-memory SQLite store.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

use finstocks_api::model::{MoverDirection, SectorPeriod};
use finstocks_api::store::{MarketStore, SqliteStore};
use finstocks_seed::{catalog, tasks, Loader, StockOptions};

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn small_run() -> StockOptions {
    StockOptions {
        days: 40,
        technical_days: 10,
        reset: false,
    }
}

fn fresh_loader() -> Loader {
    Loader::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
}

#[tokio::test]
async fn test_seed_stocks_populates_every_table() {
    let loader = fresh_loader();
    let mut rng = StdRng::seed_from_u64(1);

    let report = tasks::seed_stocks(&loader, &mut rng, small_run(), end_date()).await;
    let stock_count = catalog::stocks().len();
    assert_eq!(report.failed_batches, 0);
    assert_eq!(report.duplicates, 0);
    assert_eq!(
        report.inserted,
        11 + stock_count + stock_count * 40 + stock_count * 8 + 20 * 10
    );

    let store = loader.store();
    assert_eq!(store.list_stocks().await.unwrap().len(), stock_count);

    let latest = store.latest_price("AAPL").await.unwrap().unwrap();
    assert_eq!(latest.date, end_date());
    assert_eq!(store.price_history("MSFT", 100).await.unwrap().len(), 40);

    let fundamentals = store.latest_fundamentals("XOM").await.unwrap().unwrap();
    assert_eq!(fundamentals.year, Some(2023));
    assert_eq!(fundamentals.quarter.as_deref(), Some("Q4"));

    // Indicators only cover the first twenty catalog stocks
    assert!(store.latest_technical("AAPL").await.unwrap().is_some());
    assert!(store.latest_technical("AEP").await.unwrap().is_none());

    let top = store.top_sectors(SectorPeriod::YearToDate, 1).await.unwrap();
    assert_eq!(top[0].name, "Consumer Cyclical");

    let gainers = store.movers(MoverDirection::Gainers, 10).await.unwrap();
    assert_eq!(gainers.len(), 10);
    for pair in gainers.windows(2) {
        assert!(pair[0].change_percent >= pair[1].change_percent);
    }
}

#[tokio::test]
async fn test_rerun_without_reset_skips_duplicates() {
    let loader = fresh_loader();
    let options = StockOptions {
        days: 5,
        technical_days: 2,
        reset: false,
    };

    tasks::seed_stocks(&loader, &mut StdRng::seed_from_u64(2), options, end_date()).await;
    let again = tasks::seed_stocks(&loader, &mut StdRng::seed_from_u64(2), options, end_date()).await;
    assert_eq!(again.inserted, 0);
    assert_eq!(again.duplicates, again.attempted);
    assert_eq!(again.failed_batches, 0);

    let reset = StockOptions {
        reset: true,
        ..options
    };
    let fresh = tasks::seed_stocks(&loader, &mut StdRng::seed_from_u64(3), reset, end_date()).await;
    assert_eq!(fresh.inserted, fresh.attempted);
}

#[tokio::test]
async fn test_etfs_and_holdings() {
    let loader = fresh_loader();
    let mut rng = StdRng::seed_from_u64(10);

    // Holdings need stocks and ETFs to exist first
    let early = tasks::seed_holdings(&loader, &mut rng).await.unwrap();
    assert_eq!(early.attempted, 0);

    tasks::seed_stocks(&loader, &mut rng, small_run(), end_date()).await;
    let etfs = tasks::seed_etfs(&loader, &mut rng, 30, end_date()).await;
    assert_eq!(etfs.failed_batches, 0);
    assert_eq!(etfs.inserted, catalog::etfs().len() * 31);

    let holdings = tasks::seed_holdings(&loader, &mut rng).await.unwrap();
    assert!(holdings.inserted > 0);
    assert_eq!(holdings.inserted, holdings.attempted);

    let store = loader.store();
    let leveraged = store.leveraged_etfs().await.unwrap();
    assert_eq!(leveraged.len(), 5);

    let spy = store.etf_holdings("SPY", 100).await.unwrap();
    let total: f64 = spy.iter().map(|h| h.holding.weight_percentage).sum();
    assert!((total - 100.0).abs() < 0.05, "SPY weights sum to {}", total);
    for pair in spy.windows(2) {
        assert!(pair[0].holding.weight_percentage >= pair[1].holding.weight_percentage);
    }
    assert!(spy[0].stocks.is_some());

    let holders = store.etfs_holding("XOM").await.unwrap();
    assert!(holders.iter().any(|h| h.holding.etf_symbol == "XLE"));

    let latest = store.latest_etf_price("TQQQ").await.unwrap().unwrap();
    assert_eq!(latest.date, end_date());
}

#[tokio::test]
async fn test_reset_clears_everything() {
    let loader = fresh_loader();
    let mut rng = StdRng::seed_from_u64(4);
    tasks::seed_sample(&loader).await;
    tasks::seed_etfs(&loader, &mut rng, 3, end_date()).await;

    assert_eq!(tasks::reset(&loader).await, 0);

    let store = loader.store();
    assert!(store.list_stocks().await.unwrap().is_empty());
    assert!(store.list_sectors().await.unwrap().is_empty());
    assert!(store.list_etfs().await.unwrap().is_empty());
    assert!(store.latest_price("AAPL").await.unwrap().is_none());
}

#[tokio::test]
async fn test_sample_set_loads() {
    let loader = fresh_loader();
    let report = tasks::seed_sample(&loader).await;
    assert_eq!(report.inserted, 18);

    let latest = loader.store().latest_price("AAPL").await.unwrap().unwrap();
    assert_eq!(latest.close_price, Some(189.25));
}

#[tokio::test]
async fn test_same_seed_same_data_in_separate_stores() {
    let a = fresh_loader();
    let b = fresh_loader();
    let options = StockOptions {
        days: 10,
        technical_days: 0,
        reset: false,
    };

    tasks::seed_stocks(&a, &mut StdRng::seed_from_u64(99), options, end_date()).await;
    tasks::seed_stocks(&b, &mut StdRng::seed_from_u64(99), options, end_date()).await;

    let from_a = a.store().price_history("NVDA", 10).await.unwrap();
    let from_b = b.store().price_history("NVDA", 10).await.unwrap();
    let closes_a: Vec<_> = from_a.iter().map(|p| p.close_price).collect();
    let closes_b: Vec<_> = from_b.iter().map(|p| p.close_price).collect();
    assert_eq!(closes_a, closes_b);
}

#[tokio::test]
async fn test_seeded_file_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("finstocks.db");

    {
        let loader = Loader::new(Arc::new(SqliteStore::open(&path).unwrap()));
        let report = tasks::seed_sample(&loader).await;
        assert_eq!(report.inserted, 18);
    }

    let reopened = SqliteStore::open(&path).unwrap();
    assert_eq!(reopened.list_stocks().await.unwrap().len(), 5);
    let latest = reopened.latest_price("AAPL").await.unwrap().unwrap();
    assert_eq!(latest.close_price, Some(189.25));
}
