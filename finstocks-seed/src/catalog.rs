//! Fixed reference data: the stock universe, sector performance, the ETF
//! list and the small sample set.

use chrono::NaiveDate;
use finstocks_api::model::{Etf, Fundamentals, PriceBar, Sector, Stock};

pub struct StockEntry {
    pub symbol: &'static str,
    pub name: &'static str,
    pub industry: &'static str,
    pub market_cap: f64,
}

/// A sector, its performance over 1d/1w/1m/ytd, and its constituents.
pub struct SectorEntry {
    pub name: &'static str,
    pub performance: [f64; 4],
    pub stocks: &'static [StockEntry],
}

const fn stock(
    symbol: &'static str,
    name: &'static str,
    industry: &'static str,
    market_cap: f64,
) -> StockEntry {
    StockEntry {
        symbol,
        name,
        industry,
        market_cap,
    }
}

pub const SECTORS: &[SectorEntry] = &[
    SectorEntry {
        name: "Technology",
        performance: [1.5, 3.2, 8.7, 25.4],
        stocks: &[
            stock("AAPL", "Apple Inc.", "Consumer Electronics", 3.0e12),
            stock("MSFT", "Microsoft Corporation", "Software", 2.8e12),
            stock("GOOGL", "Alphabet Inc.", "Internet Services", 2.0e12),
            stock("NVDA", "NVIDIA Corporation", "Semiconductors", 1.8e12),
            stock("META", "Meta Platforms Inc.", "Internet Services", 9.0e11),
            stock("NFLX", "Netflix Inc.", "Entertainment", 2.0e11),
        ],
    },
    SectorEntry {
        name: "Healthcare",
        performance: [0.8, 1.9, 4.3, 12.1],
        stocks: &[
            stock("JNJ", "Johnson & Johnson", "Drug Manufacturers", 4.2e11),
            stock("UNH", "UnitedHealth Group Inc.", "Healthcare Plans", 5.2e11),
            stock("PFE", "Pfizer Inc.", "Drug Manufacturers", 1.8e11),
            stock("ABBV", "AbbVie Inc.", "Drug Manufacturers", 2.8e11),
            stock("TMO", "Thermo Fisher Scientific Inc.", "Diagnostics & Research", 2.2e11),
        ],
    },
    SectorEntry {
        name: "Financial Services",
        performance: [-0.3, 2.1, 6.8, 18.9],
        stocks: &[
            stock("BRK.B", "Berkshire Hathaway Inc.", "Insurance", 7.5e11),
            stock("JPM", "JPMorgan Chase & Co.", "Banks", 4.5e11),
            stock("V", "Visa Inc.", "Credit Services", 5.0e11),
            stock("MA", "Mastercard Inc.", "Credit Services", 4.0e11),
            stock("BAC", "Bank of America Corp.", "Banks", 2.8e11),
        ],
    },
    SectorEntry {
        name: "Consumer Cyclical",
        performance: [2.1, 4.5, 12.3, 28.7],
        stocks: &[
            stock("AMZN", "Amazon.com Inc.", "Internet Retail", 1.5e12),
            stock("TSLA", "Tesla Inc.", "Auto Manufacturers", 8.0e11),
            stock("HD", "Home Depot Inc.", "Home Improvement", 3.5e11),
            stock("MCD", "McDonald's Corp.", "Restaurants", 2.0e11),
            stock("NKE", "Nike Inc.", "Footwear & Accessories", 1.8e11),
        ],
    },
    SectorEntry {
        name: "Consumer Defensive",
        performance: [0.2, 0.8, 2.1, 8.5],
        stocks: &[
            stock("PG", "Procter & Gamble Co.", "Household Products", 3.8e11),
            stock("KO", "Coca-Cola Co.", "Beverages", 2.6e11),
            stock("PEP", "PepsiCo Inc.", "Beverages", 2.4e11),
            stock("WMT", "Walmart Inc.", "Discount Stores", 4.5e11),
            stock("COST", "Costco Wholesale Corp.", "Discount Stores", 3.2e11),
        ],
    },
    SectorEntry {
        name: "Energy",
        performance: [-1.2, -2.8, 3.4, 15.6],
        stocks: &[
            stock("XOM", "Exxon Mobil Corp.", "Oil & Gas", 4.5e11),
            stock("CVX", "Chevron Corp.", "Oil & Gas", 3.0e11),
            stock("COP", "ConocoPhillips", "Oil & Gas", 1.5e11),
            stock("SLB", "Schlumberger NV", "Oil & Gas Equipment", 7.0e10),
            stock("EOG", "EOG Resources Inc.", "Oil & Gas", 8.0e10),
        ],
    },
    SectorEntry {
        name: "Communication Services",
        performance: [0.9, 2.3, 5.7, 14.2],
        stocks: &[
            stock("DIS", "Walt Disney Co.", "Entertainment", 2.0e11),
            stock("CMCSA", "Comcast Corp.", "Telecom Services", 1.8e11),
            stock("VZ", "Verizon Communications Inc.", "Telecom Services", 1.7e11),
            stock("T", "AT&T Inc.", "Telecom Services", 1.2e11),
            stock("TMUS", "T-Mobile US Inc.", "Telecom Services", 2.0e11),
        ],
    },
    SectorEntry {
        name: "Industrials",
        performance: [1.1, 2.8, 7.2, 16.8],
        stocks: &[
            stock("BA", "Boeing Co.", "Aerospace & Defense", 1.3e11),
            stock("CAT", "Caterpillar Inc.", "Farm & Heavy Construction", 1.5e11),
            stock("GE", "General Electric Co.", "Specialty Industrial Machinery", 1.8e11),
            stock("UPS", "United Parcel Service Inc.", "Integrated Freight & Logistics", 1.4e11),
            stock("HON", "Honeywell International Inc.", "Specialty Industrial Machinery", 1.6e11),
        ],
    },
    SectorEntry {
        name: "Materials",
        performance: [-0.5, 1.2, 4.8, 11.3],
        stocks: &[
            stock("LIN", "Linde PLC", "Specialty Chemicals", 2.0e11),
            stock("APD", "Air Products & Chemicals Inc.", "Specialty Chemicals", 6.0e10),
            stock("SHW", "Sherwin-Williams Co.", "Specialty Chemicals", 8.0e10),
            stock("FCX", "Freeport-McMoRan Inc.", "Copper", 6.0e10),
            stock("NEM", "Newmont Corp.", "Gold", 4.0e10),
        ],
    },
    SectorEntry {
        name: "Real Estate",
        performance: [0.3, 1.5, 3.2, 9.7],
        stocks: &[
            stock("AMT", "American Tower Corp.", "REIT - Specialty", 1.0e11),
            stock("PLD", "Prologis Inc.", "REIT - Industrial", 1.2e11),
            stock("CCI", "Crown Castle Inc.", "REIT - Specialty", 6.0e10),
            stock("EQIX", "Equinix Inc.", "REIT - Specialty", 8.0e10),
            stock("SPG", "Simon Property Group Inc.", "REIT - Retail", 5.0e10),
        ],
    },
    SectorEntry {
        name: "Utilities",
        performance: [-0.1, 0.5, 1.8, 6.2],
        stocks: &[
            stock("NEE", "NextEra Energy Inc.", "Utilities - Regulated Electric", 1.6e11),
            stock("DUK", "Duke Energy Corp.", "Utilities - Regulated Electric", 8.0e10),
            stock("SO", "Southern Co.", "Utilities - Regulated Electric", 7.5e10),
            stock("D", "Dominion Energy Inc.", "Utilities - Regulated Electric", 7.0e10),
            stock("AEP", "American Electric Power Co. Inc.", "Utilities - Regulated Electric", 5.0e10),
        ],
    },
];

impl SectorEntry {
    pub fn to_sector(&self) -> Sector {
        let [d, w, m, ytd] = self.performance;
        Sector {
            id: None,
            name: self.name.to_string(),
            performance_1d: Some(d),
            performance_1w: Some(w),
            performance_1m: Some(m),
            performance_ytd: Some(ytd),
            updated_at: None,
        }
    }
}

/// Every catalog stock, grouped by sector in catalog order.
pub fn stocks() -> Vec<Stock> {
    SECTORS
        .iter()
        .flat_map(|sector| {
            sector.stocks.iter().map(move |entry| {
                Stock::new(entry.symbol, entry.name)
                    .with_sector(sector.name)
                    .with_industry(entry.industry)
                    .with_market_cap(entry.market_cap)
            })
        })
        .collect()
}

pub fn sectors() -> Vec<Sector> {
    SECTORS.iter().map(SectorEntry::to_sector).collect()
}

// ============================================================================
// ETFs
// ============================================================================

pub const LEVERAGED_CATEGORY: &str = "Leveraged";
pub const BOND_CATEGORY: &str = "Bond ETFs";

pub struct EtfEntry {
    pub symbol: &'static str,
    pub name: &'static str,
    pub expense_ratio: f64,
    pub aum: f64,
    pub benchmark: &'static str,
    pub leverage: f64,
}

pub struct EtfCategory {
    pub name: &'static str,
    pub etfs: &'static [EtfEntry],
}

const fn etf(
    symbol: &'static str,
    name: &'static str,
    expense_ratio: f64,
    aum: f64,
    benchmark: &'static str,
) -> EtfEntry {
    EtfEntry {
        symbol,
        name,
        expense_ratio,
        aum,
        benchmark,
        leverage: 1.0,
    }
}

const fn leveraged(
    symbol: &'static str,
    name: &'static str,
    expense_ratio: f64,
    aum: f64,
    benchmark: &'static str,
) -> EtfEntry {
    EtfEntry {
        symbol,
        name,
        expense_ratio,
        aum,
        benchmark,
        leverage: 3.0,
    }
}

pub const ETF_CATEGORIES: &[EtfCategory] = &[
    EtfCategory {
        name: "Broad Market",
        etfs: &[
            etf("SPY", "SPDR S&P 500 ETF Trust", 0.095, 4.0e11, "S&P 500"),
            etf("VTI", "Vanguard Total Stock Market ETF", 0.03, 3.0e11, "CRSP US Total Market"),
            etf("IVV", "iShares Core S&P 500 ETF", 0.03, 3.5e11, "S&P 500"),
            etf("VOO", "Vanguard S&P 500 ETF", 0.03, 3.2e11, "S&P 500"),
        ],
    },
    EtfCategory {
        name: "Technology",
        etfs: &[
            etf("QQQ", "Invesco QQQ Trust", 0.20, 2.0e11, "NASDAQ-100"),
            etf("XLK", "Technology Select Sector SPDR Fund", 0.12, 5.0e10, "Technology Select Sector"),
            etf("VGT", "Vanguard Information Technology ETF", 0.10, 6.0e10, "MSCI US IT Index"),
            etf("FTEC", "Fidelity MSCI Information Technology ETF", 0.084, 1.5e10, "MSCI USA IT Index"),
        ],
    },
    EtfCategory {
        name: LEVERAGED_CATEGORY,
        etfs: &[
            leveraged("TQQQ", "ProShares UltraPro QQQ", 0.95, 1.5e10, "NASDAQ-100"),
            leveraged("UPRO", "ProShares UltraPro S&P500", 0.92, 3.0e9, "S&P 500"),
            leveraged("SOXL", "Direxion Daily Semiconductor Bull 3X Shares", 0.99, 8.0e9, "ICE Semiconductor Index"),
            leveraged("TECL", "Direxion Daily Technology Bull 3X Shares", 0.95, 2.0e9, "Technology Select Sector"),
            leveraged("SPXL", "Direxion Daily S&P 500 Bull 3X Shares", 0.99, 4.0e9, "S&P 500"),
        ],
    },
    EtfCategory {
        name: "Small Cap",
        etfs: &[
            etf("IWM", "iShares Russell 2000 ETF", 0.19, 6.0e10, "Russell 2000"),
            etf("VB", "Vanguard Small-Cap ETF", 0.05, 4.0e10, "CRSP US Small Cap"),
            etf("VTWO", "Vanguard Russell 2000 ETF", 0.10, 1.5e10, "Russell 2000"),
            etf("IJR", "iShares Core S&P Small-Cap ETF", 0.06, 7.0e10, "S&P SmallCap 600"),
        ],
    },
    EtfCategory {
        name: "Mid Cap",
        etfs: &[
            etf("MDY", "SPDR S&P MidCap 400 ETF Trust", 0.23, 2.0e10, "S&P MidCap 400"),
            etf("VO", "Vanguard Mid-Cap ETF", 0.04, 3.5e10, "CRSP US Mid Cap"),
            etf("IJH", "iShares Core S&P Mid-Cap ETF", 0.05, 8.0e10, "S&P MidCap 400"),
            etf("VMOT", "Vanguard Russell Mid-Cap ETF", 0.20, 5.0e9, "Russell Mid Cap"),
        ],
    },
    EtfCategory {
        name: "Large Cap",
        etfs: &[
            etf("VV", "Vanguard Large-Cap ETF", 0.04, 2.5e10, "CRSP US Large Cap"),
            etf("IVW", "iShares Russell 1000 Growth ETF", 0.19, 4.0e10, "Russell 1000 Growth"),
            etf("IVE", "iShares Russell 1000 Value ETF", 0.19, 2.0e10, "Russell 1000 Value"),
            etf("VUG", "Vanguard Growth ETF", 0.04, 1.0e11, "CRSP US Large Cap Growth"),
        ],
    },
    EtfCategory {
        name: "Sector ETFs",
        etfs: &[
            etf("XLF", "Financial Select Sector SPDR Fund", 0.12, 4.0e10, "Financial Select Sector"),
            etf("XLE", "Energy Select Sector SPDR Fund", 0.12, 2.5e10, "Energy Select Sector"),
            etf("XLV", "Health Care Select Sector SPDR Fund", 0.12, 3.5e10, "Health Care Select Sector"),
            etf("XLI", "Industrial Select Sector SPDR Fund", 0.12, 2.0e10, "Industrial Select Sector"),
            etf("XLP", "Consumer Staples Select Sector SPDR Fund", 0.12, 1.5e10, "Consumer Staples Select Sector"),
        ],
    },
    EtfCategory {
        name: "International",
        etfs: &[
            etf("VEA", "Vanguard FTSE Developed Markets ETF", 0.05, 1.0e11, "FTSE Developed All Cap ex US"),
            etf("VWO", "Vanguard FTSE Emerging Markets ETF", 0.10, 8.0e10, "FTSE Emerging Markets All Cap"),
            etf("IEFA", "iShares Core MSCI EAFE IMI Index ETF", 0.07, 9.0e10, "MSCI EAFE IMI"),
            etf("EEM", "iShares MSCI Emerging Markets ETF", 0.68, 2.5e10, "MSCI Emerging Markets"),
        ],
    },
    EtfCategory {
        name: BOND_CATEGORY,
        etfs: &[
            etf("BND", "Vanguard Total Bond Market ETF", 0.03, 3.0e11, "Bloomberg US Aggregate Float Adjusted"),
            etf("AGG", "iShares Core US Aggregate Bond ETF", 0.03, 9.0e10, "Bloomberg US Aggregate Bond"),
            etf("TLT", "iShares 20+ Year Treasury Bond ETF", 0.15, 2.0e10, "ICE US Treasury 20+ Year"),
            etf("HYG", "iShares iBoxx $ High Yield Corporate Bond ETF", 0.49, 1.5e10, "Markit iBoxx USD Liquid High Yield"),
        ],
    },
];

/// Inception date recorded for every catalog ETF.
pub fn inception_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2010, 1, 1)
}

/// Every catalog ETF with its category and leverage.
pub fn etfs() -> Vec<Etf> {
    ETF_CATEGORIES
        .iter()
        .flat_map(|category| {
            category.etfs.iter().map(move |entry| Etf {
                id: None,
                symbol: entry.symbol.to_string(),
                name: entry.name.to_string(),
                category: category.name.to_string(),
                expense_ratio: Some(entry.expense_ratio),
                aum: Some(entry.aum),
                inception_date: inception_date(),
                benchmark: Some(entry.benchmark.to_string()),
                leverage_ratio: Some(entry.leverage),
                created_at: None,
                updated_at: None,
            })
        })
        .collect()
}

// ============================================================================
// Sample set
// ============================================================================

/// Five stocks, five sectors, a few prices and three fundamentals rows.
pub struct SampleSet {
    pub stocks: Vec<Stock>,
    pub sectors: Vec<Sector>,
    pub prices: Vec<PriceBar>,
    pub fundamentals: Vec<Fundamentals>,
}

const SAMPLE_SYMBOLS: [&str; 5] = ["AAPL", "GOOGL", "MSFT", "TSLA", "NVDA"];

pub fn sample() -> SampleSet {
    let all = stocks();
    let stocks = SAMPLE_SYMBOLS
        .iter()
        .filter_map(|symbol| all.iter().find(|s| s.symbol == *symbol).cloned())
        .collect();

    let sectors = SECTORS[..4]
        .iter()
        .chain(SECTORS.iter().filter(|s| s.name == "Energy"))
        .map(SectorEntry::to_sector)
        .collect();

    let prices = [
        sample_bar("AAPL", 15, [185.50, 188.20, 184.30, 187.45], 45_000_000),
        sample_bar("AAPL", 16, [187.45, 189.80, 186.90, 189.25], 42_000_000),
        sample_bar("GOOGL", 15, [142.30, 144.50, 141.80, 143.90], 28_000_000),
        sample_bar("GOOGL", 16, [143.90, 145.20, 143.10, 144.75], 25_000_000),
        sample_bar("MSFT", 15, [384.20, 387.50, 383.10, 386.95], 22_000_000),
    ]
    .into_iter()
    .flatten()
    .collect();

    let fundamentals = vec![
        sample_fundamentals("AAPL", [28.5, 45.2, 1.73, 160.58], 394.328e9, 99.803e9, 6.16, 0.44),
        sample_fundamentals("GOOGL", [25.8, 5.9, 0.11, 30.22], 307.394e9, 73.795e9, 5.80, 0.0),
        sample_fundamentals("MSFT", [32.1, 12.8, 0.47, 38.52], 211.915e9, 72.361e9, 9.65, 0.72),
    ];

    SampleSet {
        stocks,
        sectors,
        prices,
        fundamentals,
    }
}

fn sample_bar(symbol: &str, day: u32, ohlc: [f64; 4], volume: i64) -> Option<PriceBar> {
    let [open, high, low, close] = ohlc;
    Some(PriceBar {
        id: None,
        symbol: symbol.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 1, day)?,
        open_price: Some(open),
        high_price: Some(high),
        low_price: Some(low),
        close_price: Some(close),
        volume: Some(volume),
    })
}

/// `ratios` is pe, pb, debt/equity, roe.
fn sample_fundamentals(
    symbol: &str,
    ratios: [f64; 4],
    revenue: f64,
    net_income: f64,
    eps: f64,
    dividend_yield: f64,
) -> Fundamentals {
    let [pe, pb, de, roe] = ratios;
    Fundamentals {
        id: None,
        symbol: symbol.to_string(),
        pe_ratio: Some(pe),
        pb_ratio: Some(pb),
        debt_to_equity: Some(de),
        roe: Some(roe),
        revenue: Some(revenue),
        net_income: Some(net_income),
        eps: Some(eps),
        dividend_yield: Some(dividend_yield),
        quarter: Some("Q4".to_string()),
        year: Some(2023),
    }
}
