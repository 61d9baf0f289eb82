//! Console Shell
//!
//! Line-oriented front end over [`StocksController`]. Commands that hit the
//! provider are spawned onto the runtime, so a slow request never blocks
//! the prompt; results are printed by a separate thread listening for
//! [`StocksEvent`]s.

use crossbeam_channel::Receiver;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::domain::metric::Metric;
use crate::error::Result;
use crate::eventing::stocks_event::StocksEvent;
use crate::features::stocks::controller::StocksController;
use crate::services::spawn_named_in_tokio;
use crate::state::detail_state::DetailState;
use crate::state::stocks_state::{RequestOutcome, RequestRecord, StocksView};
use crate::utils::format::{MISSING, format_metric, format_time, truncate};
use crate::views::command::{HELP, ShellCommand, parse_command};

const TICKER_WIDTH: usize = 12;
const CELL_WIDTH: usize = 10;
/// Bars shown under a detail view
const DETAIL_BARS: usize = 10;

/// Render the visible page as a fixed-width table with a status footer
pub fn render_table(view: &StocksView) -> String {
    let mut lines = Vec::with_capacity(view.rows.len() + 4);

    let mut header = format!("{:<TICKER_WIDTH$}", "Ticker");
    for metric in Metric::ALL {
        header.push_str(&format!(" {:>CELL_WIDTH$}", truncate(metric.label(), CELL_WIDTH)));
    }
    let rule = "-".repeat(header.chars().count());
    lines.push(header);
    lines.push(rule);

    if view.rows.is_empty() {
        lines.push("No stocks to show.".to_string());
    }
    for stock in &view.rows {
        let mut line = format!("{:<TICKER_WIDTH$}", truncate(&stock.ticker, TICKER_WIDTH));
        for metric in Metric::ALL {
            let cell = format_metric(metric, stock.metric(metric));
            line.push_str(&format!(" {:>CELL_WIDTH$}", truncate(&cell, CELL_WIDTH)));
        }
        lines.push(line);
    }

    let mut footer = format!(
        "Page {} of {} ({} stocks)",
        view.current_page,
        view.page_count.max(1),
        view.total_rows
    );
    if view.has_previous {
        footer.push_str("  [prev]");
    }
    if view.has_next {
        footer.push_str("  [next]");
    }
    if view.loading {
        footer.push_str("  Loading...");
    }
    lines.push(footer);

    if let Some(message) = &view.error_message {
        lines.push(format!("Error: {message}"));
    }

    lines.join("\n")
}

/// Render the selected ticker's metrics and most recent bars
pub fn render_detail(detail: &DetailState) -> String {
    let Some(ticker) = detail.ticker() else {
        return "No stock selected.".to_string();
    };
    let mut lines = vec![ticker.to_string()];

    if let Some(message) = detail.load_state().error_message() {
        lines.push(format!("Error: {message}"));
    }
    if let Some(loaded) = detail.detail() {
        for metric in Metric::ALL {
            lines.push(format!(
                "  {:<20} {}",
                metric.label(),
                format_metric(metric, loaded.stock.metric(metric))
            ));
        }
    }

    let bars = detail.history();
    if !bars.is_empty() {
        lines.push(format!("  {:<12} {:>12} {:>14}", "Date", "Close", "Volume"));
        let skip = bars.len().saturating_sub(DETAIL_BARS);
        for bar in bars.iter().skip(skip) {
            lines.push(format!(
                "  {:<12} {:>12} {:>14}",
                truncate(bar.date.as_deref().unwrap_or(MISSING), 12),
                bar.close.map_or_else(|| MISSING.to_string(), |v| format!("{v:.2}")),
                bar.volume.map_or_else(|| MISSING.to_string(), |v| format!("{v:.0}")),
            ));
        }
    }

    lines.join("\n")
}

/// One line per request, newest first
pub fn render_requests(records: &[RequestRecord]) -> String {
    if records.is_empty() {
        return "No requests yet.".to_string();
    }
    records
        .iter()
        .map(|record| {
            let outcome = match &record.outcome {
                RequestOutcome::Pending => "pending".to_string(),
                RequestOutcome::Applied { rows } => format!("applied, {rows} rows"),
                RequestOutcome::Failed { reason } => format!("failed: {reason}"),
                RequestOutcome::Discarded => "discarded (superseded)".to_string(),
            };
            format!(
                "#{:<4} {} {:<7} {}",
                record.seq,
                format_time(&record.issued_at),
                record.operation,
                outcome
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print views as events arrive. Runs until every sender is gone.
fn spawn_event_printer(
    controller: StocksController,
    events: Receiver<StocksEvent>,
) -> Result<()> {
    std::thread::Builder::new()
        .name("event-printer".to_string())
        .spawn(move || {
            for event in events.iter() {
                match event {
                    StocksEvent::RequestStarted {
                        operation,
                        seq,
                        timestamp,
                    } => {
                        debug!(%operation, seq, at = %format_time(&timestamp), "Request started");
                    }
                    StocksEvent::RowsReplaced { .. } | StocksEvent::RequestFailed { .. } => {
                        println!("{}", render_table(&controller.view()));
                    }
                    StocksEvent::ResponseDiscarded { operation, seq, latest } => {
                        debug!(%operation, seq, latest, "Response discarded");
                    }
                    StocksEvent::DetailLoaded { .. } | StocksEvent::DetailFailed { .. } => {
                        println!("{}", render_detail(&controller.detail()));
                    }
                }
            }
        })?;
    Ok(())
}

fn dispatch(controller: &StocksController, command: ShellCommand) {
    let c = controller.clone();
    match command {
        ShellCommand::Refresh => spawn_named_in_tokio("refresh", async move {
            c.refresh_all().await;
        }),
        ShellCommand::Search(text) => {
            c.set_search_text(text);
            spawn_named_in_tokio("search", async move {
                c.run_search().await;
            });
        }
        ShellCommand::Sort { field, order } => {
            c.set_sort_field(field);
            if let Some(order) = order {
                c.set_sort_order(order);
            }
            spawn_named_in_tokio("sort", async move {
                c.run_sort().await;
            });
        }
        ShellCommand::Filter { key, value } => {
            c.set_filter_bound(key, value);
            let text = c.view().intent.filter_text(key).to_string();
            if text.is_empty() {
                println!("{key} cleared");
            } else {
                println!("{key} = {text}");
            }
        }
        ShellCommand::ApplyFilter => {
            if !c.view().intent.filter.is_constrained() {
                println!("No bounds set; every stock matches");
            }
            spawn_named_in_tokio("filter", async move {
                c.run_filter().await;
            });
        }
        ShellCommand::ClearFilters => {
            c.clear_filters();
            println!("Filters cleared");
        }
        ShellCommand::Page(page) => {
            c.set_page(page);
            println!("{}", render_table(&c.view()));
        }
        ShellCommand::Next => {
            c.next_page();
            println!("{}", render_table(&c.view()));
        }
        ShellCommand::Prev => {
            c.prev_page();
            println!("{}", render_table(&c.view()));
        }
        ShellCommand::Show(ticker) => spawn_named_in_tokio("detail", async move {
            c.load_detail(&ticker).await;
        }),
        ShellCommand::History(ticker) => spawn_named_in_tokio("history", async move {
            c.load_history(&ticker).await;
        }),
        ShellCommand::Requests => println!("{}", render_requests(&c.history())),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
}

/// Run the shell until `quit` or end of input. Loads every row first.
pub async fn run(controller: StocksController, events: Receiver<StocksEvent>) -> Result<()> {
    spawn_event_printer(controller.clone(), events)?;
    println!("Stock browser. Type `help` for commands.");
    dispatch(&controller, ShellCommand::Refresh);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => {
                debug!(?command, request = command.issues_request(), "Command");
                dispatch(&controller, command);
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    info!("Console closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::query::{Operation, QueryIntent};
    use crate::domain::stock::{HistoricalBar, Stock, StockDetail};

    fn view(rows: Vec<Stock>) -> StocksView {
        StocksView {
            total_rows: rows.len(),
            rows,
            current_page: 1,
            page_count: 1,
            has_previous: false,
            has_next: false,
            loading: false,
            error_message: None,
            intent: QueryIntent::default(),
        }
    }

    #[test]
    fn table_has_header_rows_and_footer() {
        let mut aapl = Stock::new("AAPL");
        aapl.market_cap = Some(2.5e12);
        aapl.pe_ratio = Some(29.456);

        let mut v = view(vec![aapl, Stock::new("TCS")]);
        v.total_rows = 25;
        v.page_count = 3;
        v.has_next = true;

        let text = render_table(&v);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[0].starts_with("Ticker"));
        assert!(lines[0].contains("Market Cap"));
        assert!(lines[2].starts_with("AAPL"));
        assert!(lines[2].contains("2.50T"));
        assert!(lines[2].contains("29.46"));
        assert!(lines[3].contains(MISSING));
        assert_eq!(lines[4], "Page 1 of 3 (25 stocks)  [next]");
        assert_eq!(lines[0].chars().count(), lines[2].chars().count());
    }

    #[test]
    fn empty_table_with_error_and_loading() {
        let mut v = view(Vec::new());
        v.page_count = 0;
        v.loading = true;
        v.error_message = Some(Operation::Fetch.failure_message().to_string());

        let text = render_table(&v);
        assert!(text.contains("No stocks to show."));
        assert!(text.contains("Page 1 of 1 (0 stocks)  Loading..."));
        assert!(text.ends_with("Error: Failed to fetch stocks. Please try again later."));
    }

    #[test]
    fn requests_show_outcomes() {
        assert_eq!(render_requests(&[]), "No requests yet.");

        let records = vec![
            RequestRecord {
                seq: 2,
                operation: Operation::Sort,
                issued_at: chrono::Local::now(),
                outcome: RequestOutcome::Applied { rows: 4 },
            },
            RequestRecord {
                seq: 1,
                operation: Operation::Search,
                issued_at: chrono::Local::now(),
                outcome: RequestOutcome::Discarded,
            },
        ];
        let text = render_requests(&records);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#2"));
        assert!(lines[0].contains("sort"));
        assert!(lines[0].ends_with("applied, 4 rows"));
        assert!(lines[1].ends_with("discarded (superseded)"));
    }

    #[test]
    fn detail_shows_metrics_and_recent_bars() {
        let mut state = DetailState::default();
        assert_eq!(render_detail(&state), "No stock selected.");

        let seq = state.begin("ITC");
        let mut stock = Stock::new("ITC");
        stock.eps = Some(16.0);
        let bars = (0..15)
            .map(|i| HistoricalBar {
                date: Some(format!("2024-03-{:02}", i + 1)),
                open: None,
                high: None,
                low: None,
                close: Some(400.0 + i as f64),
                volume: Some(1000.0),
            })
            .collect();
        state.apply_detail(
            seq,
            StockDetail {
                stock,
                historical_data: bars,
            },
        );

        let text = render_detail(&state);
        assert!(text.starts_with("ITC"));
        assert!(text.contains("16.00"));
        assert!(text.contains("2024-03-15"));
        assert!(!text.contains("2024-03-05"));
        assert!(text.contains("2024-03-06"));
    }
}
