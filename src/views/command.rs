//! Console command parsing

use crate::domain::filter::FilterKey;
use crate::domain::metric::{Metric, SortOrder};
use crate::error::{Error, Result};

pub const HELP: &str = "\
Commands:
  refresh                        reload every stock
  search <text>                  search by ticker or name
  sort <field|none> [asc|desc]   sort by a metric
  filter <name> [value]          set a bound, e.g. `filter pe_ratio_min 10`; no value clears it
  apply-filter                   request rows inside the current bounds
  clear-filters                  blank every bound
  page <n> | next | prev         move between pages
  show <ticker>                  load one stock with its price history
  history <ticker>               load price history only
  requests                       recent requests and how they ended
  help                           this text
  quit                           leave";

/// One console line
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Refresh,
    Search(String),
    /// `order` is `None` when the user kept the current order
    Sort {
        field: Option<Metric>,
        order: Option<SortOrder>,
    },
    Filter {
        key: FilterKey,
        value: String,
    },
    ApplyFilter,
    ClearFilters,
    Page(usize),
    Next,
    Prev,
    Show(String),
    History(String),
    Requests,
    Help,
    Quit,
}

impl ShellCommand {
    /// Whether the command sends a list request
    pub fn issues_request(&self) -> bool {
        matches!(
            self,
            Self::Refresh | Self::Search(_) | Self::Sort { .. } | Self::ApplyFilter
        )
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Invalid {
        message: message.into(),
    }
}

fn required<'a>(arg: Option<&'a str>, usage: &str) -> Result<&'a str> {
    arg.filter(|s| !s.is_empty())
        .ok_or_else(|| invalid(format!("Usage: {usage}")))
}

/// Parse one input line
pub fn parse_command(line: &str) -> Result<ShellCommand> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let command = match verb.to_ascii_lowercase().as_str() {
        "" => return Err(invalid("Empty command")),
        "refresh" | "r" => ShellCommand::Refresh,
        // Search text keeps its inner spaces
        "search" | "s" => ShellCommand::Search(rest.to_string()),
        "sort" => {
            let field = required(args.next(), "sort <field|none> [asc|desc]")?;
            let field = match field.to_ascii_lowercase().as_str() {
                "none" | "-" => None,
                name => Some(name.parse::<Metric>()?),
            };
            let order = args.next().map(str::parse::<SortOrder>).transpose()?;
            ShellCommand::Sort { field, order }
        }
        "filter" | "f" => {
            let key: FilterKey = required(args.next(), "filter <name> [value]")?.parse()?;
            ShellCommand::Filter {
                key,
                value: args.next().unwrap_or_default().to_string(),
            }
        }
        "apply-filter" | "apply" => ShellCommand::ApplyFilter,
        "clear-filters" | "clear" => ShellCommand::ClearFilters,
        "page" => {
            let n = required(args.next(), "page <n>")?;
            let page = n
                .parse::<usize>()
                .map_err(|_| invalid(format!("Not a page number: {n}")))?;
            ShellCommand::Page(page)
        }
        "next" | "n" => ShellCommand::Next,
        "prev" | "p" => ShellCommand::Prev,
        "show" => ShellCommand::Show(required(args.next(), "show <ticker>")?.to_string()),
        "history" => ShellCommand::History(required(args.next(), "history <ticker>")?.to_string()),
        "requests" | "log" => ShellCommand::Requests,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(invalid(format!("Unknown command: {other} (try `help`)"))),
    };

    if args.next().is_some() && !matches!(command, ShellCommand::Search(_)) {
        return Err(invalid(format!("Too many arguments for `{verb}`")));
    }
    Ok(command)
}
