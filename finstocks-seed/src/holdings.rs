//! ETF holdings built from fixed fund compositions.
//!
//! Each fund gets its named top holdings with tiered weights, then fills the
//! remaining weight from its target sectors. Weights are scaled afterwards so
//! each fund sums to roughly 100%.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use finstocks_api::model::{EtfHolding, Stock};

use crate::generate::round_to;

/// Smallest weight given to a sector fill holding.
const MIN_FILL_WEIGHT: f64 = 0.1;

pub struct Composition {
    pub etf: &'static str,
    pub top_holdings: &'static [&'static str],
    /// Sector name and target share of the remaining weight, in percent
    pub sector_weights: &'static [(&'static str, f64)],
}

const BROAD_TOP: &[&str] = &[
    "AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA", "BRK.B", "V", "JPM",
];
const MEGA_TECH: &[&str] = &["AAPL", "MSFT", "NVDA", "GOOGL", "META"];

pub const COMPOSITIONS: &[Composition] = &[
    Composition {
        etf: "SPY",
        top_holdings: BROAD_TOP,
        sector_weights: &[
            ("Technology", 30.0),
            ("Financial Services", 13.0),
            ("Healthcare", 12.0),
            ("Consumer Cyclical", 10.0),
        ],
    },
    Composition {
        etf: "QQQ",
        top_holdings: &["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA", "NFLX"],
        sector_weights: &[
            ("Technology", 60.0),
            ("Consumer Cyclical", 20.0),
            ("Communication Services", 15.0),
        ],
    },
    Composition {
        etf: "VTI",
        top_holdings: BROAD_TOP,
        sector_weights: &[
            ("Technology", 28.0),
            ("Financial Services", 14.0),
            ("Healthcare", 13.0),
            ("Consumer Cyclical", 11.0),
        ],
    },
    Composition {
        etf: "XLK",
        top_holdings: MEGA_TECH,
        sector_weights: &[("Technology", 100.0)],
    },
    Composition {
        etf: "VGT",
        top_holdings: MEGA_TECH,
        sector_weights: &[("Technology", 100.0)],
    },
    Composition {
        etf: "TQQQ",
        top_holdings: &["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA"],
        sector_weights: &[
            ("Technology", 60.0),
            ("Consumer Cyclical", 25.0),
            ("Communication Services", 15.0),
        ],
    },
    Composition {
        etf: "UPRO",
        top_holdings: &["AAPL", "MSFT", "NVDA", "GOOGL", "AMZN", "META", "TSLA", "BRK.B"],
        sector_weights: &[
            ("Technology", 30.0),
            ("Financial Services", 13.0),
            ("Healthcare", 12.0),
        ],
    },
    Composition {
        etf: "SOXL",
        top_holdings: &["NVDA", "AAPL", "MSFT"],
        sector_weights: &[("Technology", 100.0)],
    },
    Composition {
        etf: "IWM",
        top_holdings: &[],
        sector_weights: &[
            ("Technology", 20.0),
            ("Healthcare", 18.0),
            ("Financial Services", 15.0),
            ("Industrials", 15.0),
        ],
    },
    Composition {
        etf: "XLF",
        top_holdings: &["JPM", "BRK.B", "V", "MA", "BAC"],
        sector_weights: &[("Financial Services", 100.0)],
    },
    Composition {
        etf: "XLE",
        top_holdings: &["XOM", "CVX", "COP", "EOG", "SLB"],
        sector_weights: &[("Energy", 100.0)],
    },
    Composition {
        etf: "XLV",
        top_holdings: &["JNJ", "UNH", "PFE", "ABBV", "TMO"],
        sector_weights: &[("Healthcare", 100.0)],
    },
    Composition {
        etf: "XLI",
        top_holdings: &["BA", "CAT", "GE", "UPS", "HON"],
        sector_weights: &[("Industrials", 100.0)],
    },
    Composition {
        etf: "XLP",
        top_holdings: &["PG", "KO", "PEP", "WMT", "COST"],
        sector_weights: &[("Consumer Defensive", 100.0)],
    },
];

/// Weight, shares and market value ranges for one tier of holdings.
struct Tier {
    weight: (f64, f64),
    shares: (i64, i64),
    market_value: (i64, i64),
}

const LEAD_TIER: Tier = Tier {
    weight: (8.0, 15.0),
    shares: (10_000_000, 50_000_000),
    market_value: (5_000_000_000, 20_000_000_000),
};

const SECOND_TIER: Tier = Tier {
    weight: (2.0, 8.0),
    shares: (5_000_000, 25_000_000),
    market_value: (1_000_000_000, 10_000_000_000),
};

const FILL_TIER: Tier = Tier {
    weight: (MIN_FILL_WEIGHT, 2.0),
    shares: (100_000, 5_000_000),
    market_value: (50_000_000, 2_000_000_000),
};

/// Top holdings: the first three lead, the next seven follow.
const LEAD_COUNT: usize = 3;
const TOP_COUNT: usize = 10;

fn holding<R: Rng + ?Sized>(
    rng: &mut R,
    etf: &str,
    stock: &str,
    weight: f64,
    tier: &Tier,
) -> EtfHolding {
    EtfHolding {
        id: None,
        etf_symbol: etf.to_string(),
        stock_symbol: stock.to_string(),
        weight_percentage: weight,
        shares_held: Some(rng.gen_range(tier.shares.0..=tier.shares.1)),
        market_value: Some(rng.gen_range(tier.market_value.0..=tier.market_value.1) as f64),
    }
}

/// Holdings of one fund drawn from `available` stocks. Top holdings missing
/// from `available` are skipped.
pub fn build_holdings<R: Rng + ?Sized>(
    rng: &mut R,
    composition: &Composition,
    available: &[Stock],
) -> Vec<EtfHolding> {
    let known: HashSet<&str> = available.iter().map(|s| s.symbol.as_str()).collect();
    let mut holdings = Vec::new();
    let mut total = 0.0;

    for (i, symbol) in composition.top_holdings.iter().take(TOP_COUNT).enumerate() {
        if !known.contains(symbol) {
            continue;
        }
        let tier = if i < LEAD_COUNT { &LEAD_TIER } else { &SECOND_TIER };
        let weight = rng.gen_range(tier.weight.0..tier.weight.1);
        holdings.push(holding(rng, composition.etf, symbol, weight, tier));
        total += weight;
    }

    let mut remaining: f64 = 100.0 - total;

    for (sector, target) in composition.sector_weights {
        let held: HashSet<String> = holdings.iter().map(|h| h.stock_symbol.clone()).collect();
        let candidates: Vec<&Stock> = available
            .iter()
            .filter(|s| s.sector.as_deref() == Some(*sector) && !held.contains(&s.symbol))
            .collect();

        if candidates.is_empty() || remaining <= 0.0 {
            continue;
        }

        let count = rng
            .gen_range(5..=15usize)
            .min(candidates.len())
            .min((remaining / MIN_FILL_WEIGHT) as usize);
        let mut budget = remaining.min(target * remaining / 100.0);

        let chosen: Vec<&Stock> = candidates.choose_multiple(rng, count).copied().collect();
        for stock in chosen {
            if budget <= MIN_FILL_WEIGHT {
                break;
            }
            let weight = rng
                .gen_range(FILL_TIER.weight.0..FILL_TIER.weight.1)
                .min(budget);
            holdings.push(holding(rng, composition.etf, &stock.symbol, weight, &FILL_TIER));
            budget -= weight;
            remaining -= weight;
        }
    }

    normalize(&mut holdings);
    holdings
}

/// Scale weights so they sum to about 100, rounded to three decimals.
pub fn normalize(holdings: &mut [EtfHolding]) {
    let total: f64 = holdings.iter().map(|h| h.weight_percentage).sum();
    if total <= 0.0 {
        return;
    }
    let factor = 100.0 / total;
    for h in holdings.iter_mut() {
        h.weight_percentage = round_to(h.weight_percentage * factor, 3);
    }
}

/// Holdings for every known composition whose fund exists.
pub fn all_holdings<R: Rng + ?Sized>(
    rng: &mut R,
    available: &[Stock],
    etf_symbols: &HashSet<String>,
) -> Vec<EtfHolding> {
    COMPOSITIONS
        .iter()
        .filter(|c| etf_symbols.contains(c.etf))
        .flat_map(|c| build_holdings(rng, c, available))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn composition(etf: &str) -> &'static Composition {
        COMPOSITIONS.iter().find(|c| c.etf == etf).unwrap()
    }

    fn total_weight(holdings: &[EtfHolding]) -> f64 {
        holdings.iter().map(|h| h.weight_percentage).sum()
    }

    #[test]
    fn test_weights_sum_to_about_100() {
        let stocks = catalog::stocks();
        let mut rng = StdRng::seed_from_u64(21);

        for c in COMPOSITIONS {
            let holdings = build_holdings(&mut rng, c, &stocks);
            assert!(!holdings.is_empty(), "{}", c.etf);
            let total = total_weight(&holdings);
            assert!((total - 100.0).abs() < 0.05, "{} sums to {}", c.etf, total);
        }
    }

    #[test]
    fn test_no_stock_held_twice() {
        let stocks = catalog::stocks();
        let holdings = build_holdings(&mut StdRng::seed_from_u64(4), composition("SPY"), &stocks);
        let unique: HashSet<_> = holdings.iter().map(|h| &h.stock_symbol).collect();
        assert_eq!(unique.len(), holdings.len());
        assert!(holdings.iter().all(|h| h.etf_symbol == "SPY"));
    }

    #[test]
    fn test_sector_fund_stays_in_sector() {
        let stocks = catalog::stocks();
        let energy: HashSet<_> = stocks
            .iter()
            .filter(|s| s.sector.as_deref() == Some("Energy"))
            .map(|s| s.symbol.clone())
            .collect();

        let holdings = build_holdings(&mut StdRng::seed_from_u64(8), composition("XLE"), &stocks);
        assert_eq!(holdings.len(), 5);
        assert!(holdings.iter().all(|h| energy.contains(&h.stock_symbol)));
    }

    #[test]
    fn test_missing_top_holdings_are_skipped() {
        let stocks = vec![
            Stock::new("NVDA", "NVIDIA Corporation").with_sector("Technology"),
            Stock::new("AMD", "Advanced Micro Devices").with_sector("Technology"),
        ];
        let holdings = build_holdings(&mut StdRng::seed_from_u64(2), composition("SOXL"), &stocks);
        let symbols: Vec<_> = holdings.iter().map(|h| h.stock_symbol.as_str()).collect();
        assert_eq!(symbols[0], "NVDA");
        assert!(symbols.contains(&"AMD"));
        assert!(!symbols.contains(&"AAPL"));
    }

    #[test]
    fn test_normalize_rounds_to_three_places() {
        let mut holdings = vec![
            EtfHolding {
                id: None,
                etf_symbol: "X".into(),
                stock_symbol: "A".into(),
                weight_percentage: 1.0,
                shares_held: None,
                market_value: None,
            },
            EtfHolding {
                id: None,
                etf_symbol: "X".into(),
                stock_symbol: "B".into(),
                weight_percentage: 2.0,
                shares_held: None,
                market_value: None,
            },
        ];
        normalize(&mut holdings);
        assert_eq!(holdings[0].weight_percentage, 33.333);
        assert_eq!(holdings[1].weight_percentage, 66.667);

        let mut empty: Vec<EtfHolding> = Vec::new();
        normalize(&mut empty);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_all_holdings_skips_unknown_funds() {
        let stocks = catalog::stocks();
        let etfs: HashSet<String> = ["XLE".to_string()].into_iter().collect();
        let holdings = all_holdings(&mut StdRng::seed_from_u64(6), &stocks, &etfs);
        assert!(!holdings.is_empty());
        assert!(holdings.iter().all(|h| h.etf_symbol == "XLE"));
    }
}
