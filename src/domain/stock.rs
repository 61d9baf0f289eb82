//! Stock - Dataset Rows as Returned by the Provider
//!
//! The provider's documents are loosely typed: unknown metrics are stored as
//! `"N/A"`, some numbers arrive as strings, and list responses carry extra
//! keys such as `historical_data`. Decoding here is lenient so that a single
//! odd value never drops the whole response.

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::metric::Metric;

/// Decode a metric that may be a number, a numeric string, `null`, missing,
/// or a placeholder such as `"N/A"`. Anything non-numeric becomes `None`.
pub(crate) fn deserialize_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FlexibleOptFloat {
        Float(f64),
        Int(i64),
        Str(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<FlexibleOptFloat>::deserialize(deserializer)? {
        None => None,
        Some(FlexibleOptFloat::Float(f)) => Some(f),
        Some(FlexibleOptFloat::Int(i)) => Some(i as f64),
        Some(FlexibleOptFloat::Str(s)) => s.trim().parse::<f64>().ok(),
        Some(FlexibleOptFloat::Other(_)) => None,
    }
    .filter(|v| v.is_finite()))
}

/// One ticker's metric record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    /// Ticker symbol (unique)
    pub ticker: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub pe_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub debt_to_equity_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub eps: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub return_on_equity: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub price_to_book_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub current_ratio: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub operating_margin: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub net_profit_margin: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub free_cash_flow: Option<f64>,
}

impl Stock {
    /// Create a row with every metric unknown
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            market_cap: None,
            pe_ratio: None,
            debt_to_equity_ratio: None,
            eps: None,
            dividend_yield: None,
            return_on_equity: None,
            price_to_book_ratio: None,
            current_ratio: None,
            operating_margin: None,
            net_profit_margin: None,
            free_cash_flow: None,
        }
    }

    /// Get a metric value by name
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::MarketCap => self.market_cap,
            Metric::PeRatio => self.pe_ratio,
            Metric::DebtToEquityRatio => self.debt_to_equity_ratio,
            Metric::Eps => self.eps,
            Metric::DividendYield => self.dividend_yield,
            Metric::ReturnOnEquity => self.return_on_equity,
            Metric::PriceToBookRatio => self.price_to_book_ratio,
            Metric::CurrentRatio => self.current_ratio,
            Metric::OperatingMargin => self.operating_margin,
            Metric::NetProfitMargin => self.net_profit_margin,
            Metric::FreeCashFlow => self.free_cash_flow,
        }
    }
}

/// One daily bar of a ticker's price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBar {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Open", default, deserialize_with = "deserialize_lenient_f64")]
    pub open: Option<f64>,
    #[serde(rename = "High", default, deserialize_with = "deserialize_lenient_f64")]
    pub high: Option<f64>,
    #[serde(rename = "Low", default, deserialize_with = "deserialize_lenient_f64")]
    pub low: Option<f64>,
    #[serde(rename = "Close", default, deserialize_with = "deserialize_lenient_f64")]
    pub close: Option<f64>,
    #[serde(rename = "Volume", default, deserialize_with = "deserialize_lenient_f64")]
    pub volume: Option<f64>,
}

/// Full document for a single ticker: the row plus its price history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDetail {
    #[serde(flatten)]
    pub stock: Stock,
    #[serde(default)]
    pub historical_data: Vec<HistoricalBar>,
}
