//! Metric - Named Financial Metrics and Sort Order

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// One of the numeric metrics carried by every stock row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MarketCap,
    PeRatio,
    DebtToEquityRatio,
    Eps,
    DividendYield,
    ReturnOnEquity,
    PriceToBookRatio,
    CurrentRatio,
    OperatingMargin,
    NetProfitMargin,
    FreeCashFlow,
}

impl Metric {
    /// All metrics in table column order
    pub const ALL: [Metric; 11] = [
        Metric::MarketCap,
        Metric::PeRatio,
        Metric::DebtToEquityRatio,
        Metric::Eps,
        Metric::DividendYield,
        Metric::ReturnOnEquity,
        Metric::PriceToBookRatio,
        Metric::CurrentRatio,
        Metric::OperatingMargin,
        Metric::NetProfitMargin,
        Metric::FreeCashFlow,
    ];

    /// Wire name: the row JSON key and the `sort_by` value
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::MarketCap => "market_cap",
            Metric::PeRatio => "pe_ratio",
            Metric::DebtToEquityRatio => "debt_to_equity_ratio",
            Metric::Eps => "eps",
            Metric::DividendYield => "dividend_yield",
            Metric::ReturnOnEquity => "return_on_equity",
            Metric::PriceToBookRatio => "price_to_book_ratio",
            Metric::CurrentRatio => "current_ratio",
            Metric::OperatingMargin => "operating_margin",
            Metric::NetProfitMargin => "net_profit_margin",
            Metric::FreeCashFlow => "free_cash_flow",
        }
    }

    /// Column header label
    pub fn label(&self) -> &'static str {
        match self {
            Metric::MarketCap => "Market Cap",
            Metric::PeRatio => "PE Ratio",
            Metric::DebtToEquityRatio => "Debt-to-Equity",
            Metric::Eps => "EPS",
            Metric::DividendYield => "Dividend Yield",
            Metric::ReturnOnEquity => "Return on Equity",
            Metric::PriceToBookRatio => "Price-to-Book Ratio",
            Metric::CurrentRatio => "Current Ratio",
            Metric::OperatingMargin => "Operating Margin",
            Metric::NetProfitMargin => "Net Profit Margin",
            Metric::FreeCashFlow => "Free Cash Flow",
        }
    }

    /// Prefix of the provider's `*_min` / `*_max` filter parameters.
    ///
    /// Differs from [`Metric::as_str`] for the two `*_ratio` metrics whose
    /// filter parameters drop the suffix.
    pub fn filter_stem(&self) -> &'static str {
        match self {
            Metric::DebtToEquityRatio => "debt_to_equity",
            Metric::PriceToBookRatio => "price_to_book",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| Error::Invalid {
                message: format!("Unknown metric: {name}"),
            })
    }
}

/// Sort direction sent to the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "Ascending",
            SortOrder::Descending => "Descending",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(Error::Invalid {
                message: format!("Unknown sort order: {other}"),
            }),
        }
    }
}
