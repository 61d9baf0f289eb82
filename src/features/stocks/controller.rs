//! Stocks Controller
//!
//! Drives provider requests for one browsing session. State lives in
//! [`StocksState`] behind a mutex that is only taken for the synchronous
//! `begin`/`complete` steps, never across an `.await`, so several requests
//! from one controller can be in flight at once.

use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::config::{ResponsePolicy, SessionConfig};
use crate::domain::filter::FilterKey;
use crate::domain::metric::{Metric, SortOrder};
use crate::domain::query::{Operation, QueryError, StockQuery};
use crate::error::Result;
use crate::eventing::stocks_event::StocksEvent;
use crate::services::StockProvider;
use crate::state::detail_state::{DetailCompletion, DetailState};
use crate::state::stocks_state::{Completion, RequestRecord, StocksState, StocksView};

/// Stocks session controller
#[derive(Clone)]
pub struct StocksController {
    provider: Arc<dyn StockProvider>,
    state: Arc<Mutex<StocksState>>,
    detail: Arc<Mutex<DetailState>>,
    events: Option<Sender<StocksEvent>>,
}

impl StocksController {
    /// Create a new controller
    pub fn new(provider: Arc<dyn StockProvider>, session: &SessionConfig) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(StocksState::new(
                session.response_policy,
                session.history_capacity,
            ))),
            detail: Arc::new(Mutex::new(DetailState::default())),
            events: None,
        }
    }

    /// Send [`StocksEvent`]s to `tx` as requests start and resolve
    pub fn with_events(mut self, tx: Sender<StocksEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, event: StocksEvent) {
        if let Some(tx) = &self.events {
            // A closed receiver just means nobody is rendering anymore
            tx.send(event).ok();
        }
    }

    // ==================== Read Side ====================

    pub fn view(&self) -> StocksView {
        self.state.lock().view()
    }

    pub fn policy(&self) -> ResponsePolicy {
        self.state.lock().policy()
    }

    /// Request history, newest first
    pub fn history(&self) -> Vec<RequestRecord> {
        self.state.lock().history().cloned().collect()
    }

    /// Snapshot of the selected ticker's detail
    pub fn detail(&self) -> DetailState {
        self.detail.lock().clone()
    }

    // ==================== Intent Setters ====================

    pub fn set_search_text(&self, text: impl Into<String>) {
        self.state.lock().set_search_text(text);
    }

    pub fn set_sort_field(&self, field: Option<Metric>) {
        debug!(field = ?field, "sort field set");
        self.state.lock().set_sort_field(field);
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        self.state.lock().set_sort_order(order);
    }

    pub fn set_filter_bound(&self, key: FilterKey, text: impl Into<String>) {
        self.state.lock().set_filter_bound(key, text);
    }

    /// Like [`Self::set_filter_bound`], keyed by the wire name (`pe_ratio_min`)
    pub fn set_filter_bound_by_name(
        &self,
        name: &str,
        text: impl Into<String>,
    ) -> Result<FilterKey> {
        let key: FilterKey = name.parse()?;
        self.set_filter_bound(key, text);
        Ok(key)
    }

    pub fn clear_filters(&self) {
        self.state.lock().clear_filters();
    }

    /// Returns the page actually selected after clamping
    pub fn set_page(&self, page: usize) -> usize {
        let mut state = self.state.lock();
        state.set_page(page);
        state.current_page()
    }

    pub fn next_page(&self) -> usize {
        let mut state = self.state.lock();
        let page = state.current_page().saturating_add(1);
        state.set_page(page);
        state.current_page()
    }

    pub fn prev_page(&self) -> usize {
        let mut state = self.state.lock();
        let page = state.current_page().saturating_sub(1);
        state.set_page(page);
        state.current_page()
    }

    // ==================== Requests ====================

    /// Load every row; the shell calls this once at session start
    pub async fn refresh_all(&self) -> Completion {
        self.run(StockQuery::FetchAll).await
    }

    pub async fn run_search(&self) -> Completion {
        let query = self.state.lock().intent().search_query();
        self.run(query).await
    }

    pub async fn run_sort(&self) -> Completion {
        let query = self.state.lock().intent().sort_query();
        self.run(query).await
    }

    pub async fn run_filter(&self) -> Completion {
        let query = self.state.lock().intent().filter_query();
        self.run(query).await
    }

    async fn run(&self, query: StockQuery) -> Completion {
        let ticket = self.state.lock().begin(&query);
        let (operation, seq) = (ticket.operation(), ticket.seq());
        info!(%operation, seq, "Request issued");
        self.emit(StocksEvent::started(operation, seq));

        let result = self.provider.execute(&query).await;
        if let Err(err) = &result {
            warn!(%operation, seq, error = %err, "Request failed");
        }

        let completion = self.state.lock().complete(ticket, result);
        match &completion {
            Completion::Applied { rows } => {
                info!(%operation, seq, rows, "Rows replaced");
                self.emit(StocksEvent::RowsReplaced {
                    operation,
                    seq,
                    rows: *rows,
                });
            }
            Completion::Failed(error) => {
                self.emit(StocksEvent::RequestFailed {
                    seq,
                    error: error.clone(),
                });
            }
            Completion::Discarded { latest } => {
                debug!(%operation, seq, latest, "Stale response discarded");
                self.emit(StocksEvent::ResponseDiscarded {
                    operation,
                    seq,
                    latest: *latest,
                });
            }
        }
        completion
    }

    /// Load one ticker's row and price history. Never touches the row set.
    pub async fn load_detail(&self, ticker: &str) -> DetailCompletion {
        let ticker = ticker.trim();
        let seq = self.detail.lock().begin(ticker);
        info!(ticker, seq, "Detail requested");

        match self.provider.stock(ticker).await {
            Ok(detail) => {
                let bars = detail.historical_data.len();
                if !self.detail.lock().apply_detail(seq, detail) {
                    return self.superseded(Operation::Detail, seq);
                }
                self.emit(StocksEvent::DetailLoaded {
                    operation: Operation::Detail,
                    ticker: ticker.to_string(),
                });
                DetailCompletion::Loaded { bars }
            }
            Err(err) => self.detail_failed(Operation::Detail, ticker, seq, err.to_string()),
        }
    }

    /// Load one ticker's price history into the detail state
    pub async fn load_history(&self, ticker: &str) -> DetailCompletion {
        let ticker = ticker.trim();
        let seq = self.detail.lock().begin(ticker);
        info!(ticker, seq, "History requested");

        match self.provider.history(ticker).await {
            Ok(bars) => {
                let count = bars.len();
                if !self.detail.lock().apply_history(seq, bars) {
                    return self.superseded(Operation::History, seq);
                }
                self.emit(StocksEvent::DetailLoaded {
                    operation: Operation::History,
                    ticker: ticker.to_string(),
                });
                DetailCompletion::Loaded { bars: count }
            }
            Err(err) => self.detail_failed(Operation::History, ticker, seq, err.to_string()),
        }
    }

    fn detail_failed(
        &self,
        operation: Operation,
        ticker: &str,
        seq: u64,
        reason: String,
    ) -> DetailCompletion {
        warn!(%operation, ticker, seq, error = %reason, "Request failed");
        let error = QueryError::request_failed(operation, reason);
        if !self.detail.lock().apply_error(seq, &error) {
            return self.superseded(operation, seq);
        }
        self.emit(StocksEvent::DetailFailed {
            ticker: ticker.to_string(),
            error: error.clone(),
        });
        DetailCompletion::Failed(error)
    }

    fn superseded(&self, operation: Operation, seq: u64) -> DetailCompletion {
        let latest = self.detail.lock().last_issued();
        debug!(%operation, seq, latest, "Stale detail response discarded");
        DetailCompletion::Discarded { latest }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, VecDeque};

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use super::*;
    use crate::domain::stock::{HistoricalBar, Stock, StockDetail};
    use crate::error::Error;

    enum Reply {
        Rows(Vec<Stock>),
        Fail,
    }

    struct Step {
        gate: Option<oneshot::Receiver<()>>,
        reply: Reply,
    }

    /// In-memory provider answering from per-operation scripts. Unscripted
    /// calls answer an empty list.
    #[derive(Default)]
    struct ScriptedProvider {
        calls: Mutex<Vec<StockQuery>>,
        steps: Mutex<HashMap<Operation, VecDeque<Step>>>,
        detail_gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    }

    impl ScriptedProvider {
        fn reply(&self, operation: Operation, reply: Reply) {
            self.push(operation, Step { gate: None, reply });
        }

        /// Reply only once the returned sender fires
        fn reply_gated(&self, operation: Operation, reply: Reply) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.push(operation, Step { gate: Some(rx), reply });
            tx
        }

        fn push(&self, operation: Operation, step: Step) {
            self.steps.lock().entry(operation).or_default().push_back(step);
        }

        fn gate_detail(&self, ticker: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.detail_gates.lock().insert(ticker.to_string(), rx);
            tx
        }

        fn calls(&self) -> Vec<StockQuery> {
            self.calls.lock().clone()
        }

        async fn respond(&self, query: StockQuery) -> Result<Vec<Stock>> {
            let operation = query.operation();
            self.calls.lock().push(query);
            let step = self.steps.lock().get_mut(&operation).and_then(VecDeque::pop_front);
            let Some(step) = step else {
                return Ok(Vec::new());
            };
            if let Some(gate) = step.gate {
                gate.await.ok();
            }
            match step.reply {
                Reply::Rows(rows) => Ok(rows),
                Reply::Fail => Err(Error::Status {
                    url: "http://localhost:8000".to_string(),
                    status: 500,
                }),
            }
        }
    }

    #[async_trait]
    impl StockProvider for ScriptedProvider {
        async fn fetch_all(&self) -> Result<Vec<Stock>> {
            self.respond(StockQuery::FetchAll).await
        }

        async fn search(&self, query: &str) -> Result<Vec<Stock>> {
            self.respond(StockQuery::Search {
                query: query.to_string(),
            })
            .await
        }

        async fn sort(&self, field: Option<Metric>, order: SortOrder) -> Result<Vec<Stock>> {
            self.respond(StockQuery::Sort { field, order }).await
        }

        async fn filter(&self, bounds: &[(String, f64)]) -> Result<Vec<Stock>> {
            self.respond(StockQuery::Filter {
                bounds: bounds.to_vec(),
            })
            .await
        }

        async fn stock(&self, ticker: &str) -> Result<StockDetail> {
            let gate = self.detail_gates.lock().remove(ticker);
            if let Some(gate) = gate {
                gate.await.ok();
            }
            if ticker == "MISSING" {
                return Err(Error::Provider {
                    message: format!("Stock with ticker {ticker} not found"),
                    details: None,
                });
            }
            Ok(StockDetail {
                stock: Stock::new(ticker),
                historical_data: bars(2),
            })
        }

        async fn history(&self, ticker: &str) -> Result<Vec<HistoricalBar>> {
            if ticker == "MISSING" {
                return Err(Error::Provider {
                    message: "Failed to fetch historical data".to_string(),
                    details: None,
                });
            }
            Ok(bars(5))
        }
    }

    fn rows(prefix: &str, n: usize) -> Vec<Stock> {
        (0..n).map(|i| Stock::new(format!("{prefix}{i}"))).collect()
    }

    fn bars(n: usize) -> Vec<HistoricalBar> {
        (0..n)
            .map(|i| HistoricalBar {
                date: Some(format!("2024-02-{:02}", i + 1)),
                open: None,
                high: None,
                low: None,
                close: Some(10.0 + i as f64),
                volume: None,
            })
            .collect()
    }

    fn controller(policy: ResponsePolicy) -> (StocksController, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::default());
        let session = SessionConfig {
            response_policy: policy,
            ..Default::default()
        };
        (StocksController::new(provider.clone(), &session), provider)
    }

    #[tokio::test]
    async fn refresh_all_loads_rows() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        provider.reply(Operation::Fetch, Reply::Rows(rows("T", 25)));

        let completion = controller.refresh_all().await;

        assert_eq!(completion, Completion::Applied { rows: 25 });
        assert_eq!(provider.calls(), vec![StockQuery::FetchAll]);
        let view = controller.view();
        assert_eq!(view.total_rows, 25);
        assert_eq!(view.page_count, 3);
        assert_eq!(view.rows.len(), 10);
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn search_replaces_rows_and_resets_page() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        provider.reply(Operation::Fetch, Reply::Rows(rows("T", 25)));
        provider.reply(Operation::Search, Reply::Rows(vec![Stock::new("AAPL")]));
        controller.refresh_all().await;
        assert_eq!(controller.set_page(3), 3);

        controller.set_search_text("AAPL");
        controller.run_search().await;

        assert_eq!(
            provider.calls().last(),
            Some(&StockQuery::Search {
                query: "AAPL".to_string()
            })
        );
        let view = controller.view();
        assert_eq!(view.total_rows, 1);
        assert_eq!(view.current_page, 1);
        assert_eq!(view.page_count, 1);
        assert_eq!(view.rows[0].ticker, "AAPL");
    }

    #[tokio::test]
    async fn setters_issue_no_requests() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        controller.set_search_text("INFY");
        controller.set_sort_field(Some(Metric::PeRatio));
        controller.set_sort_order(SortOrder::Descending);
        controller.set_filter_bound(FilterKey::MARKET_CAP_MAX, "1e12");
        controller.set_page(2);
        controller.clear_filters();

        assert!(provider.calls().is_empty());
        assert!(controller.history().is_empty());
        assert_eq!(controller.view().intent.search_text, "INFY");
    }

    #[tokio::test]
    async fn filter_sends_only_constrained_bounds() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        controller
            .set_filter_bound_by_name("pe_ratio_min", "10")
            .expect("known filter");
        controller.set_filter_bound(FilterKey::PE_RATIO_MAX, "");
        controller.set_filter_bound(FilterKey::MARKET_CAP_MIN, "lots");

        controller.run_filter().await;

        assert_eq!(
            provider.calls(),
            vec![StockQuery::Filter {
                bounds: vec![("pe_ratio_min".to_string(), 10.0)]
            }]
        );
        assert!(controller.set_filter_bound_by_name("pe_min", "1").is_err());
    }

    #[tokio::test]
    async fn sort_sends_current_field_and_order() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        controller.set_sort_field(Some(Metric::MarketCap));
        controller.set_sort_order(SortOrder::Descending);

        controller.run_sort().await;

        assert_eq!(
            provider.calls(),
            vec![StockQuery::Sort {
                field: Some(Metric::MarketCap),
                order: SortOrder::Descending
            }]
        );
    }

    #[tokio::test]
    async fn failed_startup_fetch_leaves_empty_rows_and_error() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        provider.reply(Operation::Fetch, Reply::Fail);

        let completion = controller.refresh_all().await;

        assert!(matches!(completion, Completion::Failed(_)));
        let view = controller.view();
        assert!(view.rows.is_empty());
        assert_eq!(view.page_count, 0);
        assert!(!view.loading);
        assert_eq!(
            view.error_message.as_deref(),
            Some("Failed to fetch stocks. Please try again later.")
        );
    }

    #[tokio::test]
    async fn failure_keeps_previous_rows() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        provider.reply(Operation::Fetch, Reply::Rows(rows("T", 12)));
        provider.reply(Operation::Sort, Reply::Fail);
        controller.refresh_all().await;
        controller.next_page();

        controller.run_sort().await;

        let view = controller.view();
        assert_eq!(view.total_rows, 12);
        assert_eq!(view.current_page, 2);
        assert_eq!(view.error_message.as_deref(), Some("Failed to apply sorting."));
    }

    #[tokio::test]
    async fn late_search_is_discarded_under_latest_issued() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        let release = provider.reply_gated(Operation::Search, Reply::Rows(rows("SEARCH", 2)));
        provider.reply(Operation::Sort, Reply::Rows(rows("SORT", 4)));

        let search = controller.run_search();
        let sort = async {
            let completion = controller.run_sort().await;
            assert!(controller.view().loading);
            release.send(()).ok();
            completion
        };
        let (search, sort) = tokio::join!(search, sort);

        assert_eq!(sort, Completion::Applied { rows: 4 });
        assert_eq!(search, Completion::Discarded { latest: 2 });
        let view = controller.view();
        assert_eq!(view.total_rows, 4);
        assert_eq!(view.rows[0].ticker, "SORT0");
        assert!(!view.loading);
    }

    #[tokio::test]
    async fn late_search_wins_under_last_arrived() {
        let (controller, provider) = controller(ResponsePolicy::LastArrived);
        let release = provider.reply_gated(Operation::Search, Reply::Rows(rows("SEARCH", 2)));
        provider.reply(Operation::Sort, Reply::Rows(rows("SORT", 4)));

        let search = controller.run_search();
        let sort = async {
            let completion = controller.run_sort().await;
            release.send(()).ok();
            completion
        };
        let (search, sort) = tokio::join!(search, sort);

        assert_eq!(sort, Completion::Applied { rows: 4 });
        assert_eq!(search, Completion::Applied { rows: 2 });
        let view = controller.view();
        assert_eq!(view.total_rows, 2);
        assert_eq!(view.rows[0].ticker, "SEARCH0");
    }

    #[tokio::test]
    async fn events_follow_request_lifecycle() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        let controller = controller.with_events(tx);
        provider.reply(Operation::Fetch, Reply::Rows(rows("T", 3)));
        provider.reply(Operation::Filter, Reply::Fail);

        controller.refresh_all().await;
        controller.run_filter().await;

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(
            events[0],
            StocksEvent::RequestStarted { operation: Operation::Fetch, seq: 1, .. }
        ));
        assert!(matches!(events[1], StocksEvent::RowsReplaced { rows: 3, seq: 1, .. }));
        assert!(matches!(
            events[2],
            StocksEvent::RequestStarted { operation: Operation::Filter, seq: 2, .. }
        ));
        assert!(matches!(events[3], StocksEvent::RequestFailed { seq: 2, .. }));
        assert_eq!(events[3].operation(), Operation::Filter);
    }

    #[tokio::test]
    async fn dropped_event_receiver_is_ignored() {
        let (tx, rx) = crossbeam_channel::unbounded();
        drop(rx);
        let (controller, _provider) = controller(ResponsePolicy::LatestIssued);
        let controller = controller.with_events(tx);

        assert_eq!(controller.refresh_all().await, Completion::Applied { rows: 0 });
    }

    #[tokio::test]
    async fn detail_never_touches_rows() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        provider.reply(Operation::Fetch, Reply::Rows(rows("T", 3)));
        controller.refresh_all().await;

        assert_eq!(
            controller.load_detail(" ITC ").await,
            DetailCompletion::Loaded { bars: 2 }
        );
        assert_eq!(
            controller.load_history("ITC").await,
            DetailCompletion::Loaded { bars: 5 }
        );

        let detail = controller.detail();
        assert_eq!(detail.ticker(), Some("ITC"));
        assert_eq!(detail.history().len(), 5);
        assert_eq!(controller.view().total_rows, 3);
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn detail_failure_is_scoped() {
        let (controller, _provider) = controller(ResponsePolicy::LatestIssued);

        let completion = controller.load_detail("MISSING").await;
        match completion {
            DetailCompletion::Failed(error) => {
                assert_eq!(error.to_string(), "Failed to fetch stock details.");
                assert!(error.reason().contains("not found"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(controller.view().error_message, None);
        assert!(controller.detail().load_state().error_message().is_some());
    }

    #[tokio::test]
    async fn superseded_detail_is_discarded() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        let release = provider.gate_detail("TCS");

        let slow = controller.load_detail("TCS");
        let fast = async {
            let completion = controller.load_detail("INFY").await;
            release.send(()).ok();
            completion
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert_eq!(fast, DetailCompletion::Loaded { bars: 2 });
        assert_eq!(slow, DetailCompletion::Discarded { latest: 2 });
        assert_eq!(controller.detail().ticker(), Some("INFY"));
    }

    #[tokio::test]
    async fn page_navigation_clamps() {
        let (controller, provider) = controller(ResponsePolicy::LatestIssued);
        provider.reply(Operation::Fetch, Reply::Rows(rows("T", 21)));
        controller.refresh_all().await;

        assert_eq!(controller.prev_page(), 1);
        assert_eq!(controller.next_page(), 2);
        assert_eq!(controller.next_page(), 3);
        assert_eq!(controller.next_page(), 3);
        assert_eq!(controller.view().rows.len(), 1);
    }
}
