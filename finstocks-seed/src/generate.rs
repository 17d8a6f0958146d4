//! Synthetic price series, fundamentals and technical indicators.

use chrono::{Duration, NaiveDate};
use rand::Rng;

use finstocks_api::model::{Fundamentals, PriceBar, Stock, TechnicalIndicator};

/// Prices never close below this.
pub const PRICE_FLOOR: f64 = 1.0;

/// Quarters of fundamentals generated for each stock.
pub const FUNDAMENTAL_YEARS: [i32; 2] = [2022, 2023];
const QUARTERS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

/// Number of catalog stocks that get technical indicators.
pub const TECHNICAL_STOCK_COUNT: usize = 20;

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Shape of a daily random walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkProfile {
    pub start_price: f64,
    /// Uniform daily move in `[-daily_move, daily_move]`
    pub daily_move: f64,
    /// Drift applied on the first year of days, then on the rest
    pub drift: (f64, f64),
    /// Extra uniform noise in `[-seasonal, seasonal]`
    pub seasonal: f64,
    /// Open is the close scaled by up to this fraction either way
    pub open_jitter: f64,
    /// High and low reach this far beyond the open/close range
    pub wick: f64,
    pub volume: (i64, i64),
}

impl WalkProfile {
    /// Stock walk: ±3% days, slight upward drift that doubles after a year.
    pub fn stock(start_price: f64) -> Self {
        Self {
            start_price,
            daily_move: 0.03,
            drift: (0.0001, 0.0002),
            seasonal: 0.001,
            open_jitter: 0.01,
            wick: 0.02,
            volume: (5_000_000, 150_000_000),
        }
    }
}

/// Starting price band for a catalog stock.
pub fn stock_start_price<R: Rng + ?Sized>(rng: &mut R, symbol: &str) -> f64 {
    match symbol {
        "AAPL" | "MSFT" | "GOOGL" => rng.gen_range(150.0..200.0),
        "AMZN" | "NVDA" | "TSLA" => rng.gen_range(200.0..500.0),
        "BRK.B" | "UNH" => rng.gen_range(300.0..600.0),
        _ => rng.gen_range(30.0..150.0),
    }
}

/// `days` consecutive daily bars ending on `end`, oldest first.
pub fn random_walk<R: Rng + ?Sized>(
    rng: &mut R,
    symbol: &str,
    profile: &WalkProfile,
    days: u32,
    end: NaiveDate,
) -> Vec<PriceBar> {
    let mut bars = Vec::with_capacity(days as usize);
    let mut close = profile.start_price;

    for i in 0..days {
        let date = end - Duration::days(i64::from(days - 1 - i));

        let drift = if i > 365 { profile.drift.1 } else { profile.drift.0 };
        let seasonal = if profile.seasonal > 0.0 {
            profile.seasonal * rng.gen_range(-1.0..1.0)
        } else {
            0.0
        };
        let change = drift + seasonal + rng.gen_range(-profile.daily_move..profile.daily_move);
        close = (close * (1.0 + change)).max(PRICE_FLOOR);

        let open = close * rng.gen_range((1.0 - profile.open_jitter)..(1.0 + profile.open_jitter));
        let high = open.max(close) * rng.gen_range(1.0..(1.0 + profile.wick));
        let low = open.min(close) * rng.gen_range((1.0 - profile.wick)..=1.0);
        let volume = rng.gen_range(profile.volume.0..=profile.volume.1);

        bars.push(PriceBar {
            id: None,
            symbol: symbol.to_string(),
            date,
            open_price: Some(round_to(open, 2)),
            high_price: Some(round_to(high, 2)),
            low_price: Some(round_to(low, 2)),
            close_price: Some(round_to(close, 2)),
            volume: Some(volume),
        });
    }

    bars
}

/// Daily bars for every stock, each with its own starting price.
pub fn stock_prices<R: Rng + ?Sized>(
    rng: &mut R,
    stocks: &[Stock],
    days: u32,
    end: NaiveDate,
) -> Vec<PriceBar> {
    let mut bars = Vec::with_capacity(stocks.len() * days as usize);
    for stock in stocks {
        let profile = WalkProfile::stock(stock_start_price(rng, &stock.symbol));
        bars.extend(random_walk(rng, &stock.symbol, &profile, days, end));
    }
    bars
}

/// Base P/E and ROE by sector.
fn sector_bases(sector: Option<&str>) -> (f64, f64) {
    match sector {
        Some("Technology") => (25.0, 25.0),
        Some("Healthcare") => (18.0, 15.0),
        Some("Financial Services") => (12.0, 12.0),
        Some("Energy") => (15.0, 8.0),
        _ => (20.0, 18.0),
    }
}

/// Eight quarters of fundamentals per stock.
pub fn fundamentals<R: Rng + ?Sized>(rng: &mut R, stocks: &[Stock]) -> Vec<Fundamentals> {
    let mut rows = Vec::with_capacity(stocks.len() * FUNDAMENTAL_YEARS.len() * QUARTERS.len());

    for stock in stocks {
        let (pe_base, roe_base) = sector_bases(stock.sector.as_deref());
        for year in FUNDAMENTAL_YEARS {
            for quarter in QUARTERS {
                rows.push(Fundamentals {
                    id: None,
                    symbol: stock.symbol.clone(),
                    pe_ratio: Some(round_to(pe_base + rng.gen_range(-5.0..10.0), 2)),
                    pb_ratio: Some(round_to(rng.gen_range(1.5..8.0), 2)),
                    debt_to_equity: Some(round_to(rng.gen_range(0.1..2.5), 2)),
                    roe: Some(round_to(roe_base + rng.gen_range(-5.0..15.0), 2)),
                    revenue: Some(rng.gen_range(10_000_000_000i64..=500_000_000_000) as f64),
                    net_income: Some(rng.gen_range(1_000_000_000i64..=100_000_000_000) as f64),
                    eps: Some(round_to(rng.gen_range(1.0..15.0), 2)),
                    dividend_yield: Some(round_to(rng.gen_range(0.0..4.0), 2)),
                    quarter: Some(quarter.to_string()),
                    year: Some(year),
                });
            }
        }
    }

    rows
}

/// Indicator snapshots for the first [`TECHNICAL_STOCK_COUNT`] stocks over the
/// last `days` days.
pub fn technical_indicators<R: Rng + ?Sized>(
    rng: &mut R,
    stocks: &[Stock],
    days: u32,
    end: NaiveDate,
) -> Vec<TechnicalIndicator> {
    let mut rows = Vec::new();

    for stock in stocks.iter().take(TECHNICAL_STOCK_COUNT) {
        for i in 0..days {
            let date = end - Duration::days(i64::from(days - 1 - i));
            let base = rng.gen_range(50.0..300.0);

            rows.push(TechnicalIndicator {
                id: None,
                symbol: stock.symbol.clone(),
                date,
                sma_20: Some(round_to(base * rng.gen_range(0.95..1.05), 2)),
                sma_50: Some(round_to(base * rng.gen_range(0.90..1.10), 2)),
                sma_200: Some(round_to(base * rng.gen_range(0.85..1.15), 2)),
                rsi: Some(round_to(rng.gen_range(25.0..75.0), 2)),
                macd: Some(round_to(rng.gen_range(-3.0..3.0), 4)),
                bollinger_upper: Some(round_to(base * 1.1, 2)),
                bollinger_lower: Some(round_to(base * 0.9, 2)),
            });
        }
    }

    rows
}
