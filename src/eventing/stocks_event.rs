//! StocksEvent - Coordinator to View Events
//!
//! Emitted whenever a request starts or resolves so a view can re-render.

use chrono::{DateTime, Local};

use crate::domain::query::{Operation, QueryError};

/// Events for coordinator -> view communication
#[derive(Debug, Clone)]
pub enum StocksEvent {
    /// A request was issued
    RequestStarted {
        operation: Operation,
        seq: u64,
        timestamp: DateTime<Local>,
    },

    /// A list response replaced the row set
    RowsReplaced {
        operation: Operation,
        seq: u64,
        rows: usize,
    },

    /// A request failed; the row set is unchanged
    RequestFailed {
        seq: u64,
        error: QueryError,
    },

    /// A response arrived after a newer request was issued and was dropped
    ResponseDiscarded {
        operation: Operation,
        seq: u64,
        latest: u64,
    },

    /// Single-ticker detail or history loaded
    DetailLoaded {
        operation: Operation,
        ticker: String,
    },

    /// Single-ticker detail or history failed
    DetailFailed {
        ticker: String,
        error: QueryError,
    },
}

impl StocksEvent {
    pub fn started(operation: Operation, seq: u64) -> Self {
        Self::RequestStarted {
            operation,
            seq,
            timestamp: Local::now(),
        }
    }

    /// Operation the event refers to
    pub fn operation(&self) -> Operation {
        match self {
            Self::RequestStarted { operation, .. }
            | Self::RowsReplaced { operation, .. }
            | Self::ResponseDiscarded { operation, .. }
            | Self::DetailLoaded { operation, .. } => *operation,
            Self::RequestFailed { error, .. } | Self::DetailFailed { error, .. } => {
                error.operation()
            }
        }
    }
}
