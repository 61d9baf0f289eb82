//! Query - User Intent and Provider Requests

use std::fmt;

use crate::domain::filter::{FilterBounds, FilterKey};
use crate::domain::metric::{Metric, SortOrder};

/// Which provider operation a request performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fetch,
    Search,
    Sort,
    Filter,
    Detail,
    History,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Search => "search",
            Operation::Sort => "sort",
            Operation::Filter => "filter",
            Operation::Detail => "detail",
            Operation::History => "history",
        }
    }

    /// Short user-facing message shown when this operation fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Fetch => "Failed to fetch stocks. Please try again later.",
            Operation::Search => "Failed to perform search.",
            Operation::Sort => "Failed to apply sorting.",
            Operation::Filter => "Failed to apply filters.",
            Operation::Detail => "Failed to fetch stock details.",
            Operation::History => "Failed to fetch historical data.",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A list request against the provider, built from the current intent
#[derive(Debug, Clone, PartialEq)]
pub enum StockQuery {
    FetchAll,
    Search {
        query: String,
    },
    Sort {
        field: Option<Metric>,
        order: SortOrder,
    },
    Filter {
        bounds: Vec<(String, f64)>,
    },
}

impl StockQuery {
    pub fn operation(&self) -> Operation {
        match self {
            StockQuery::FetchAll => Operation::Fetch,
            StockQuery::Search { .. } => Operation::Search,
            StockQuery::Sort { .. } => Operation::Sort,
            StockQuery::Filter { .. } => Operation::Filter,
        }
    }

    /// Provider path
    pub fn path(&self) -> &'static str {
        match self {
            StockQuery::FetchAll => "/fetch-stocks",
            StockQuery::Search { .. } => "/search-stocks",
            StockQuery::Sort { .. } => "/sort-stocks",
            StockQuery::Filter { .. } => "/filter-stocks",
        }
    }

    /// Query string parameters, values already string-encoded
    pub fn params(&self) -> Vec<(String, String)> {
        match self {
            StockQuery::FetchAll => Vec::new(),
            StockQuery::Search { query } => vec![("query".to_string(), query.clone())],
            StockQuery::Sort { field, order } => vec![
                (
                    "sort_by".to_string(),
                    field.map(|m| m.as_str()).unwrap_or_default().to_string(),
                ),
                ("order".to_string(), order.as_str().to_string()),
            ],
            StockQuery::Filter { bounds } => bounds
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect(),
        }
    }
}

/// The user's current desired view
#[derive(Debug, Clone, PartialEq)]
pub struct QueryIntent {
    pub search_text: String,
    pub sort_field: Option<Metric>,
    pub sort_order: SortOrder,
    pub filter: FilterBounds,
    /// 1-based
    pub page: usize,
}

impl Default for QueryIntent {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            sort_field: None,
            sort_order: SortOrder::default(),
            filter: FilterBounds::default(),
            page: 1,
        }
    }
}

impl QueryIntent {
    pub fn search_query(&self) -> StockQuery {
        StockQuery::Search {
            query: self.search_text.clone(),
        }
    }

    pub fn sort_query(&self) -> StockQuery {
        StockQuery::Sort {
            field: self.sort_field,
            order: self.sort_order,
        }
    }

    pub fn filter_query(&self) -> StockQuery {
        StockQuery::Filter {
            bounds: self.filter.params(),
        }
    }

    /// Raw filter text for controlled-input display
    pub fn filter_text(&self, key: FilterKey) -> &str {
        self.filter.text(key)
    }
}

/// The single user-visible failure kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    RequestFailed {
        operation: Operation,
        /// Underlying cause, for logs
        reason: String,
    },
}

impl QueryError {
    pub fn request_failed(operation: Operation, reason: impl Into<String>) -> Self {
        QueryError::RequestFailed {
            operation,
            reason: reason.into(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            QueryError::RequestFailed { operation, .. } => *operation,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            QueryError::RequestFailed { reason, .. } => reason,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::RequestFailed { operation, .. } => {
                f.write_str(operation.failure_message())
            }
        }
    }
}

impl std::error::Error for QueryError {}
