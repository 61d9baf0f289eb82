//! DetailState - Single Ticker Detail and History
//!
//! Kept apart from the row set: loading a ticker's detail never replaces or
//! reorders the list being browsed.

use std::sync::Arc;

use crate::domain::query::QueryError;
use crate::domain::stock::{HistoricalBar, StockDetail};

/// Detail loading state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailLoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Error(Arc<str>),
}

impl DetailLoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// What happened to a detail or history response
#[derive(Debug, Clone, PartialEq)]
pub enum DetailCompletion {
    /// Stored as the selected ticker's data
    Loaded { bars: usize },
    /// Request failed; error recorded on the detail state only
    Failed(QueryError),
    /// A newer detail request was issued first; response ignored
    Discarded { latest: u64 },
}

/// State for the selected ticker
#[derive(Debug, Clone, Default)]
pub struct DetailState {
    ticker: Option<String>,
    detail: Option<StockDetail>,
    history: Vec<HistoricalBar>,
    load_state: DetailLoadState,
    /// Latest issued detail/history request
    last_issued: u64,
}

impl DetailState {
    pub fn ticker(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    pub fn detail(&self) -> Option<&StockDetail> {
        self.detail.as_ref()
    }

    /// Price history from the last history or detail load
    pub fn history(&self) -> &[HistoricalBar] {
        &self.history
    }

    pub fn load_state(&self) -> &DetailLoadState {
        &self.load_state
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    /// Select a ticker and open a request for it. Switching tickers drops
    /// whatever was loaded for the previous one.
    pub fn begin(&mut self, ticker: &str) -> u64 {
        if self.ticker.as_deref() != Some(ticker) {
            self.detail = None;
            self.history.clear();
        }
        self.ticker = Some(ticker.to_string());
        self.load_state = DetailLoadState::Loading;
        self.last_issued += 1;
        self.last_issued
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.last_issued
    }

    /// Returns false when a newer request superseded this one
    pub fn apply_detail(&mut self, seq: u64, detail: StockDetail) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.history = detail.historical_data.clone();
        self.detail = Some(detail);
        self.load_state = DetailLoadState::Loaded;
        true
    }

    /// Returns false when a newer request superseded this one
    pub fn apply_history(&mut self, seq: u64, history: Vec<HistoricalBar>) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.history = history;
        self.load_state = DetailLoadState::Loaded;
        true
    }

    /// Returns false when a newer request superseded this one
    pub fn apply_error(&mut self, seq: u64, error: &QueryError) -> bool {
        if !self.is_current(seq) {
            return false;
        }
        self.load_state = DetailLoadState::Error(error.to_string().into());
        true
    }
}
