//! ETF price series. Volatility and volume depend on the fund's category,
//! leverage and popularity.

use chrono::NaiveDate;
use rand::Rng;

use finstocks_api::model::{Etf, PriceBar};

use crate::catalog::{BOND_CATEGORY, LEVERAGED_CATEGORY};
use crate::generate::{random_walk, WalkProfile};

const HIGH_VOLUME: [&str; 3] = ["SPY", "QQQ", "IWM"];

fn start_price<R: Rng + ?Sized>(rng: &mut R, symbol: &str) -> f64 {
    match symbol {
        "SPY" | "QQQ" | "IVV" | "VOO" => rng.gen_range(400.0..500.0),
        "TQQQ" | "UPRO" | "SOXL" => rng.gen_range(50.0..150.0),
        "TLT" | "BND" | "AGG" => rng.gen_range(80.0..120.0),
        _ => rng.gen_range(100.0..300.0),
    }
}

/// Walk profile for `etf`, starting at `start_price`.
pub fn profile(etf: &Etf, start_price: f64) -> WalkProfile {
    let leverage = etf.leverage_ratio.unwrap_or(1.0);
    let daily_move = match etf.category.as_str() {
        LEVERAGED_CATEGORY => 0.08 * leverage,
        BOND_CATEGORY => 0.01,
        _ => 0.03,
    };
    let volume = if HIGH_VOLUME.contains(&etf.symbol.as_str()) {
        (50_000_000, 200_000_000)
    } else if etf.category == LEVERAGED_CATEGORY {
        (20_000_000, 100_000_000)
    } else {
        (1_000_000, 50_000_000)
    };

    WalkProfile {
        start_price,
        daily_move,
        drift: (0.0, 0.0),
        seasonal: 0.0,
        open_jitter: 0.005,
        wick: 0.015,
        volume,
    }
}

/// Daily bars for every ETF.
pub fn etf_prices<R: Rng + ?Sized>(
    rng: &mut R,
    etfs: &[Etf],
    days: u32,
    end: NaiveDate,
) -> Vec<PriceBar> {
    let mut bars = Vec::with_capacity(etfs.len() * days as usize);
    for etf in etfs {
        let start = start_price(rng, &etf.symbol);
        bars.extend(random_walk(rng, &etf.symbol, &profile(etf, start), days, end));
    }
    bars
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn find(symbol: &str) -> Etf {
        catalog::etfs()
            .into_iter()
            .find(|e| e.symbol == symbol)
            .unwrap()
    }

    #[test]
    fn test_profiles_by_category() {
        let tqqq = profile(&find("TQQQ"), 100.0);
        assert!((tqqq.daily_move - 0.24).abs() < 1e-9);
        assert_eq!(tqqq.volume, (20_000_000, 100_000_000));

        let bnd = profile(&find("BND"), 100.0);
        assert_eq!(bnd.daily_move, 0.01);
        assert_eq!(bnd.volume, (1_000_000, 50_000_000));

        let spy = profile(&find("SPY"), 450.0);
        assert_eq!(spy.daily_move, 0.03);
        assert_eq!(spy.volume, (50_000_000, 200_000_000));
        assert_eq!(spy.drift, (0.0, 0.0));
    }

    #[test]
    fn test_etf_prices_per_fund() {
        let etfs: Vec<_> = ["SPY", "TQQQ", "BND"].iter().map(|s| find(s)).collect();
        let end = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
        let bars = etf_prices(&mut StdRng::seed_from_u64(11), &etfs, 100, end);
        assert_eq!(bars.len(), 300);

        for bar in &bars {
            let open = bar.open_price.unwrap();
            let close = bar.close_price.unwrap();
            assert!(bar.high_price.unwrap() >= open.max(close));
            assert!(bar.low_price.unwrap() <= open.min(close));
            assert!(close >= 1.0);
        }

        let spy_volume_floor = bars
            .iter()
            .filter(|b| b.symbol == "SPY")
            .all(|b| b.volume.unwrap() >= 50_000_000);
        assert!(spy_volume_floor);
    }
}
