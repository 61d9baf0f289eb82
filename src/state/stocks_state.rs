//! StocksState - Query Intent, Row Set, and Request Bookkeeping
//!
//! Synchronous half of the coordinator. Nothing in here performs I/O: a
//! request is opened with [`StocksState::begin`], executed elsewhere, and its
//! result handed back through [`StocksState::complete`].
//!
//! Every request is tagged with a monotonically increasing sequence number.
//! Under [`ResponsePolicy::LatestIssued`] a response whose sequence number is
//! not the latest issued one is dropped, so a slow early request can never
//! overwrite the result of a later one.

use std::collections::BTreeSet;

use chrono::{DateTime, Local};

use crate::constants::PAGE_SIZE;
use crate::domain::config::ResponsePolicy;
use crate::domain::filter::FilterKey;
use crate::domain::metric::{Metric, SortOrder};
use crate::domain::query::{Operation, QueryError, QueryIntent, StockQuery};
use crate::domain::stock::Stock;
use crate::error::Error;
use crate::helpers::BoundedLog;
use crate::state::pagination::{page_count, paginate};

/// Handle for one in-flight list request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    seq: u64,
    operation: Operation,
}

impl RequestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

/// What happened to a response handed to [`StocksState::complete`]
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Row set replaced
    Applied { rows: usize },
    /// Request failed; row set untouched, error recorded
    Failed(QueryError),
    /// A newer request was issued first; response ignored
    Discarded { latest: u64 },
}

/// Outcome column of the request history
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    Pending,
    Applied { rows: usize },
    Failed { reason: String },
    Discarded,
}

/// One entry of the request history
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub seq: u64,
    pub operation: Operation,
    pub issued_at: DateTime<Local>,
    pub outcome: RequestOutcome,
}

/// Read-only snapshot handed to the view layer
#[derive(Debug, Clone, PartialEq)]
pub struct StocksView {
    /// Visible slice of the row set
    pub rows: Vec<Stock>,
    pub current_page: usize,
    pub page_count: usize,
    pub total_rows: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub loading: bool,
    pub error_message: Option<String>,
    /// Current intent, for controlled-input display
    pub intent: QueryIntent,
}

/// Query session state
#[derive(Debug)]
pub struct StocksState {
    intent: QueryIntent,
    rows: Vec<Stock>,
    error: Option<QueryError>,
    policy: ResponsePolicy,
    /// Sequence number of the most recently issued request (0 = none yet)
    last_issued: u64,
    /// Sequence number of the response the row set reflects
    applied_seq: Option<u64>,
    pending: BTreeSet<u64>,
    history: BoundedLog<RequestRecord>,
}

impl StocksState {
    pub fn new(policy: ResponsePolicy, history_capacity: usize) -> Self {
        Self {
            intent: QueryIntent::default(),
            rows: Vec::new(),
            error: None,
            policy,
            last_issued: 0,
            applied_seq: None,
            pending: BTreeSet::new(),
            history: BoundedLog::new(history_capacity),
        }
    }

    // ==================== Getters ====================

    pub fn intent(&self) -> &QueryIntent {
        &self.intent
    }

    /// Full row set in provider order
    pub fn rows(&self) -> &[Stock] {
        &self.rows
    }

    pub fn current_page(&self) -> usize {
        self.intent.page
    }

    pub fn page_size(&self) -> usize {
        PAGE_SIZE
    }

    pub fn page_count(&self) -> usize {
        page_count(self.rows.len(), PAGE_SIZE)
    }

    /// Rows on the current page
    pub fn visible_rows(&self) -> &[Stock] {
        paginate(&self.rows, PAGE_SIZE, self.intent.page).items
    }

    pub fn error(&self) -> Option<&QueryError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// True while any request is in flight, including ones whose response
    /// will be discarded
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn policy(&self) -> ResponsePolicy {
        self.policy
    }

    pub fn last_issued(&self) -> u64 {
        self.last_issued
    }

    pub fn applied_seq(&self) -> Option<u64> {
        self.applied_seq
    }

    /// Request history, newest first
    pub fn history(&self) -> impl Iterator<Item = &RequestRecord> {
        self.history.iter_rev()
    }

    pub fn view(&self) -> StocksView {
        let page = paginate(&self.rows, PAGE_SIZE, self.intent.page);
        StocksView {
            rows: page.items.to_vec(),
            current_page: self.intent.page,
            page_count: page.page_count,
            total_rows: page.total_items,
            has_previous: page.has_previous(),
            has_next: page.has_next(),
            loading: self.is_loading(),
            error_message: self.error_message(),
            intent: self.intent.clone(),
        }
    }

    // ==================== Intent Setters ====================

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.intent.search_text = text.into();
    }

    pub fn set_sort_field(&mut self, field: Option<Metric>) {
        self.intent.sort_field = field;
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.intent.sort_order = order;
    }

    pub fn set_filter_bound(&mut self, key: FilterKey, text: impl Into<String>) {
        self.intent.filter.set(key, text);
    }

    pub fn clear_filters(&mut self) {
        self.intent.filter.clear();
    }

    /// Move to `page`, clamped into `1..=max(page_count, 1)`
    pub fn set_page(&mut self, page: usize) {
        let last = self.page_count().max(1);
        self.intent.page = page.clamp(1, last);
    }

    // ==================== Request Lifecycle ====================

    /// Open a request for `query`. Clears the previous error.
    pub fn begin(&mut self, query: &StockQuery) -> RequestTicket {
        self.last_issued += 1;
        let ticket = RequestTicket {
            seq: self.last_issued,
            operation: query.operation(),
        };

        self.pending.insert(ticket.seq);
        self.error = None;
        self.history.push(RequestRecord {
            seq: ticket.seq,
            operation: ticket.operation,
            issued_at: Local::now(),
            outcome: RequestOutcome::Pending,
        });

        ticket
    }

    /// Hand back the result of a request opened with [`StocksState::begin`]
    pub fn complete(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<Stock>, Error>,
    ) -> Completion {
        self.pending.remove(&ticket.seq);

        let completion = if self.is_stale(ticket) {
            Completion::Discarded {
                latest: self.last_issued,
            }
        } else {
            match result {
                Ok(rows) => {
                    let count = rows.len();
                    self.rows = rows;
                    self.applied_seq = Some(ticket.seq);
                    self.intent.page = 1;
                    self.error = None;
                    Completion::Applied { rows: count }
                }
                Err(err) => {
                    let error = QueryError::request_failed(ticket.operation, err.to_string());
                    self.error = Some(error.clone());
                    Completion::Failed(error)
                }
            }
        };

        self.record_outcome(ticket, &completion);
        completion
    }

    fn is_stale(&self, ticket: RequestTicket) -> bool {
        match self.policy {
            ResponsePolicy::LatestIssued => ticket.seq != self.last_issued,
            ResponsePolicy::LastArrived => false,
        }
    }

    fn record_outcome(&mut self, ticket: RequestTicket, completion: &Completion) {
        let outcome = match completion {
            Completion::Applied { rows } => RequestOutcome::Applied { rows: *rows },
            Completion::Failed(error) => RequestOutcome::Failed {
                reason: error.reason().to_string(),
            },
            Completion::Discarded { .. } => RequestOutcome::Discarded,
        };

        if let Some(record) = self.history.find_latest_mut(|r| r.seq == ticket.seq) {
            record.outcome = outcome;
        }
    }
}

impl Default for StocksState {
    fn default() -> Self {
        Self::new(
            ResponsePolicy::default(),
            crate::constants::REQUEST_HISTORY_CAPACITY,
        )
    }
}
