//! Table definitions for both backends.
//!
//! The SQLite schema is applied on open. The Postgres schema is printed by
//! the seeding tool and run by hand against the hosted database; it also
//! defines the functions the hosted store calls over RPC.

/// SQLite DDL, safe to run repeatedly.
pub const SQLITE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS stocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    sector TEXT,
    industry TEXT,
    market_cap REAL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS stock_prices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    open_price REAL,
    high_price REAL,
    low_price REAL,
    close_price REAL,
    volume INTEGER,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (symbol) REFERENCES stocks(symbol),
    UNIQUE(symbol, date)
);

CREATE INDEX IF NOT EXISTS idx_stock_prices_symbol_date
ON stock_prices(symbol, date DESC);

CREATE TABLE IF NOT EXISTS sectors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE NOT NULL,
    performance_1d REAL,
    performance_1w REAL,
    performance_1m REAL,
    performance_ytd REAL,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE TABLE IF NOT EXISTS fundamentals (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    pe_ratio REAL,
    pb_ratio REAL,
    debt_to_equity REAL,
    roe REAL,
    revenue REAL,
    net_income REAL,
    eps REAL,
    dividend_yield REAL,
    quarter TEXT,
    year INTEGER,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (symbol) REFERENCES stocks(symbol),
    UNIQUE(symbol, quarter, year)
);

CREATE INDEX IF NOT EXISTS idx_fundamentals_symbol
ON fundamentals(symbol);

CREATE TABLE IF NOT EXISTS technical_indicators (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    sma_20 REAL,
    sma_50 REAL,
    sma_200 REAL,
    rsi REAL,
    macd REAL,
    bollinger_upper REAL,
    bollinger_lower REAL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (symbol) REFERENCES stocks(symbol),
    UNIQUE(symbol, date)
);

CREATE INDEX IF NOT EXISTS idx_technical_indicators_symbol_date
ON technical_indicators(symbol, date DESC);

CREATE TABLE IF NOT EXISTS etfs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT UNIQUE NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    expense_ratio REAL,
    aum REAL,
    inception_date TEXT,
    benchmark TEXT,
    leverage_ratio REAL DEFAULT 1.0,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS idx_etfs_category
ON etfs(category);

CREATE TABLE IF NOT EXISTS etf_prices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    open_price REAL,
    high_price REAL,
    low_price REAL,
    close_price REAL,
    volume INTEGER,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (symbol) REFERENCES etfs(symbol),
    UNIQUE(symbol, date)
);

CREATE INDEX IF NOT EXISTS idx_etf_prices_symbol_date
ON etf_prices(symbol, date DESC);

CREATE TABLE IF NOT EXISTS etf_holdings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    etf_symbol TEXT NOT NULL,
    stock_symbol TEXT NOT NULL,
    weight_percentage REAL NOT NULL,
    shares_held INTEGER,
    market_value REAL,
    created_at TEXT DEFAULT CURRENT_TIMESTAMP,
    updated_at TEXT DEFAULT CURRENT_TIMESTAMP,
    FOREIGN KEY (etf_symbol) REFERENCES etfs(symbol),
    FOREIGN KEY (stock_symbol) REFERENCES stocks(symbol),
    UNIQUE(etf_symbol, stock_symbol)
);

CREATE INDEX IF NOT EXISTS idx_etf_holdings_etf
ON etf_holdings(etf_symbol);

CREATE INDEX IF NOT EXISTS idx_etf_holdings_stock
ON etf_holdings(stock_symbol);
"#;

/// Postgres DDL for the hosted database, including the RPC functions.
pub const POSTGRES_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS stocks (
    id SERIAL PRIMARY KEY,
    symbol VARCHAR(10) UNIQUE NOT NULL,
    name VARCHAR(255) NOT NULL,
    sector VARCHAR(100),
    industry VARCHAR(100),
    market_cap DECIMAL(15,2),
    created_at TIMESTAMP DEFAULT NOW(),
    updated_at TIMESTAMP DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS stock_prices (
    id SERIAL PRIMARY KEY,
    symbol VARCHAR(10) NOT NULL REFERENCES stocks(symbol),
    date DATE NOT NULL,
    open_price DECIMAL(10,4),
    high_price DECIMAL(10,4),
    low_price DECIMAL(10,4),
    close_price DECIMAL(10,4),
    volume BIGINT,
    created_at TIMESTAMP DEFAULT NOW(),
    UNIQUE(symbol, date)
);

CREATE INDEX IF NOT EXISTS idx_stock_prices_symbol_date ON stock_prices(symbol, date DESC);

CREATE TABLE IF NOT EXISTS sectors (
    id SERIAL PRIMARY KEY,
    name VARCHAR(100) UNIQUE NOT NULL,
    performance_1d DECIMAL(5,2),
    performance_1w DECIMAL(5,2),
    performance_1m DECIMAL(5,2),
    performance_ytd DECIMAL(5,2),
    updated_at TIMESTAMP DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS fundamentals (
    id SERIAL PRIMARY KEY,
    symbol VARCHAR(10) NOT NULL REFERENCES stocks(symbol),
    pe_ratio DECIMAL(8,2),
    pb_ratio DECIMAL(8,2),
    debt_to_equity DECIMAL(8,2),
    roe DECIMAL(5,2),
    revenue DECIMAL(15,2),
    net_income DECIMAL(15,2),
    eps DECIMAL(8,2),
    dividend_yield DECIMAL(5,2),
    quarter VARCHAR(10),
    year INTEGER,
    created_at TIMESTAMP DEFAULT NOW(),
    UNIQUE(symbol, quarter, year)
);

CREATE INDEX IF NOT EXISTS idx_fundamentals_symbol ON fundamentals(symbol);

CREATE TABLE IF NOT EXISTS technical_indicators (
    id SERIAL PRIMARY KEY,
    symbol VARCHAR(10) NOT NULL REFERENCES stocks(symbol),
    date DATE NOT NULL,
    sma_20 DECIMAL(10,4),
    sma_50 DECIMAL(10,4),
    sma_200 DECIMAL(10,4),
    rsi DECIMAL(5,2),
    macd DECIMAL(8,4),
    bollinger_upper DECIMAL(10,4),
    bollinger_lower DECIMAL(10,4),
    created_at TIMESTAMP DEFAULT NOW(),
    UNIQUE(symbol, date)
);

CREATE INDEX IF NOT EXISTS idx_technical_indicators_symbol_date ON technical_indicators(symbol, date DESC);

CREATE TABLE IF NOT EXISTS etfs (
    id SERIAL PRIMARY KEY,
    symbol VARCHAR(10) UNIQUE NOT NULL,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(100) NOT NULL,
    expense_ratio DECIMAL(4,3),
    aum DECIMAL(15,2),
    inception_date DATE,
    benchmark VARCHAR(255),
    leverage_ratio DECIMAL(3,1) DEFAULT 1.0,
    created_at TIMESTAMP DEFAULT NOW(),
    updated_at TIMESTAMP DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_etfs_category ON etfs(category);

CREATE TABLE IF NOT EXISTS etf_prices (
    id SERIAL PRIMARY KEY,
    symbol VARCHAR(10) NOT NULL REFERENCES etfs(symbol),
    date DATE NOT NULL,
    open_price DECIMAL(10,4),
    high_price DECIMAL(10,4),
    low_price DECIMAL(10,4),
    close_price DECIMAL(10,4),
    volume BIGINT,
    created_at TIMESTAMP DEFAULT NOW(),
    UNIQUE(symbol, date)
);

CREATE INDEX IF NOT EXISTS idx_etf_prices_symbol_date ON etf_prices(symbol, date DESC);

CREATE TABLE IF NOT EXISTS etf_holdings (
    id SERIAL PRIMARY KEY,
    etf_symbol VARCHAR(10) NOT NULL REFERENCES etfs(symbol),
    stock_symbol VARCHAR(10) NOT NULL REFERENCES stocks(symbol),
    weight_percentage DECIMAL(6,3) NOT NULL,
    shares_held BIGINT,
    market_value DECIMAL(15,2),
    created_at TIMESTAMP DEFAULT NOW(),
    updated_at TIMESTAMP DEFAULT NOW(),
    UNIQUE(etf_symbol, stock_symbol)
);

CREATE INDEX IF NOT EXISTS idx_etf_holdings_etf ON etf_holdings(etf_symbol);
CREATE INDEX IF NOT EXISTS idx_etf_holdings_stock ON etf_holdings(stock_symbol);

CREATE OR REPLACE FUNCTION screen_stocks(
    p_min_market_cap NUMERIC DEFAULT NULL,
    p_max_market_cap NUMERIC DEFAULT NULL,
    p_min_pe_ratio NUMERIC DEFAULT NULL,
    p_max_pe_ratio NUMERIC DEFAULT NULL,
    p_min_roe NUMERIC DEFAULT NULL,
    p_sectors TEXT[] DEFAULT NULL,
    p_min_price NUMERIC DEFAULT NULL,
    p_max_price NUMERIC DEFAULT NULL,
    p_limit INTEGER DEFAULT 50
)
RETURNS TABLE (
    id INTEGER,
    symbol VARCHAR,
    name VARCHAR,
    sector VARCHAR,
    industry VARCHAR,
    market_cap NUMERIC,
    created_at TIMESTAMP,
    updated_at TIMESTAMP,
    close_price NUMERIC,
    pe_ratio NUMERIC,
    roe NUMERIC,
    eps NUMERIC
)
LANGUAGE sql STABLE AS $$
    SELECT s.id, s.symbol, s.name, s.sector, s.industry, s.market_cap,
           s.created_at, s.updated_at, p.close_price, f.pe_ratio, f.roe, f.eps
    FROM stocks s
    LEFT JOIN LATERAL (
        SELECT sp.close_price FROM stock_prices sp
        WHERE sp.symbol = s.symbol ORDER BY sp.date DESC LIMIT 1
    ) p ON TRUE
    LEFT JOIN LATERAL (
        SELECT fu.pe_ratio, fu.roe, fu.eps FROM fundamentals fu
        WHERE fu.symbol = s.symbol ORDER BY fu.year DESC, fu.quarter DESC LIMIT 1
    ) f ON TRUE
    WHERE (p_min_market_cap IS NULL OR s.market_cap >= p_min_market_cap)
      AND (p_max_market_cap IS NULL OR s.market_cap <= p_max_market_cap)
      AND (p_min_pe_ratio IS NULL OR f.pe_ratio >= p_min_pe_ratio)
      AND (p_max_pe_ratio IS NULL OR f.pe_ratio <= p_max_pe_ratio)
      AND (p_min_roe IS NULL OR f.roe >= p_min_roe)
      AND (p_sectors IS NULL OR s.sector = ANY(p_sectors))
      AND (p_min_price IS NULL OR p.close_price >= p_min_price)
      AND (p_max_price IS NULL OR p.close_price <= p_max_price)
    ORDER BY s.market_cap DESC NULLS LAST, s.symbol
    LIMIT p_limit;
$$;

CREATE OR REPLACE FUNCTION price_movers(
    p_ascending BOOLEAN DEFAULT FALSE,
    p_limit INTEGER DEFAULT 10
)
RETURNS TABLE (
    symbol VARCHAR,
    name VARCHAR,
    sector VARCHAR,
    current_price NUMERIC,
    previous_price NUMERIC,
    change_percent NUMERIC
)
LANGUAGE sql STABLE AS $$
    WITH ranked AS (
        SELECT sp.symbol, sp.close_price,
               ROW_NUMBER() OVER (PARTITION BY sp.symbol ORDER BY sp.date DESC) AS rn
        FROM stock_prices sp
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
    ORDER BY
        CASE WHEN p_ascending THEN pr.change_percent END ASC,
        CASE WHEN NOT p_ascending THEN pr.change_percent END DESC,
        s.symbol
    LIMIT p_limit;
$$;

CREATE OR REPLACE FUNCTION sector_stocks(p_sector TEXT)
RETURNS TABLE (
    id INTEGER,
    symbol VARCHAR,
    name VARCHAR,
    sector VARCHAR,
    industry VARCHAR,
    market_cap NUMERIC,
    created_at TIMESTAMP,
    updated_at TIMESTAMP,
    close_price NUMERIC,
    price_date DATE
)
LANGUAGE sql STABLE AS $$
    SELECT s.id, s.symbol, s.name, s.sector, s.industry, s.market_cap,
           s.created_at, s.updated_at, p.close_price, p.date AS price_date
    FROM stocks s
    JOIN LATERAL (
        SELECT sp.close_price, sp.date FROM stock_prices sp
        WHERE sp.symbol = s.symbol ORDER BY sp.date DESC LIMIT 1
    ) p ON TRUE
    WHERE s.sector = p_sector
    ORDER BY s.market_cap DESC NULLS LAST, s.symbol;
$$;
"#;
