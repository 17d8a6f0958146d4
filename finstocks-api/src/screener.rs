//! Stock screener filter.
//!
//! A filter is a conjunction of optional bounds. Absent bounds add no
//! condition, so an empty filter returns every stock (up to `limit`).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Default number of screener rows.
pub const DEFAULT_SCREENER_LIMIT: u32 = 50;

/// Comparison applied by one bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtLeast,
    AtMost,
}

impl Comparison {
    pub const fn sql_operator(self) -> &'static str {
        match self {
            Self::AtLeast => ">=",
            Self::AtMost => "<=",
        }
    }
}

/// Column of the screened row a bound applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenField {
    MarketCap,
    PeRatio,
    Roe,
    Price,
}

impl ScreenField {
    /// Qualified column in the joined screener query.
    pub const fn sql_column(self) -> &'static str {
        match self {
            Self::MarketCap => "s.market_cap",
            Self::PeRatio => "f.pe_ratio",
            Self::Roe => "f.roe",
            Self::Price => "p.close_price",
        }
    }
}

/// One numeric bound of the filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub field: ScreenField,
    pub comparison: Comparison,
    pub value: f64,
}

/// Body of `POST /api/screener`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScreenerFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_pe_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pe_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_roe: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ScreenerFilter {
    pub fn effective_limit(&self) -> u32 {
        self.limit.unwrap_or(DEFAULT_SCREENER_LIMIT)
    }

    /// Numeric bounds that are present, in a fixed order.
    pub fn bounds(&self) -> Vec<Bound> {
        let candidates = [
            (ScreenField::MarketCap, Comparison::AtLeast, self.min_market_cap),
            (ScreenField::MarketCap, Comparison::AtMost, self.max_market_cap),
            (ScreenField::PeRatio, Comparison::AtLeast, self.min_pe_ratio),
            (ScreenField::PeRatio, Comparison::AtMost, self.max_pe_ratio),
            (ScreenField::Roe, Comparison::AtLeast, self.min_roe),
            (ScreenField::Price, Comparison::AtLeast, self.min_price),
            (ScreenField::Price, Comparison::AtMost, self.max_price),
        ];

        candidates
            .into_iter()
            .filter_map(|(field, comparison, value)| {
                value.map(|value| Bound {
                    field,
                    comparison,
                    value,
                })
            })
            .collect()
    }

    /// Sector names to match. An empty list adds no condition.
    pub fn sector_names(&self) -> &[String] {
        self.sectors.as_deref().unwrap_or(&[])
    }

    /// Stable key for memoizing results of this filter. Sector order and
    /// repeats do not change the key.
    pub fn cache_key(&self) -> String {
        let mut normalized = self.clone();
        normalized.limit = Some(self.effective_limit());
        normalized.sectors = match self.sector_names() {
            [] => None,
            names => {
                let mut names = names.to_vec();
                names.sort();
                names.dedup();
                Some(names)
            }
        };
        serde_json::to_string(&normalized).unwrap_or_default()
    }

    /// Named arguments of the hosted `screen_stocks` function.
    pub fn rpc_args(&self) -> Value {
        let mut args = Map::new();
        args.insert("p_min_market_cap".into(), json!(self.min_market_cap));
        args.insert("p_max_market_cap".into(), json!(self.max_market_cap));
        args.insert("p_min_pe_ratio".into(), json!(self.min_pe_ratio));
        args.insert("p_max_pe_ratio".into(), json!(self.max_pe_ratio));
        args.insert("p_min_roe".into(), json!(self.min_roe));
        let sectors = if self.sector_names().is_empty() {
            Value::Null
        } else {
            json!(self.sector_names())
        };
        args.insert("p_sectors".into(), sectors);
        args.insert("p_min_price".into(), json!(self.min_price));
        args.insert("p_max_price".into(), json!(self.max_price));
        args.insert("p_limit".into(), json!(self.effective_limit()));
        Value::Object(args)
    }
}
