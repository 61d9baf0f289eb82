//! Format - Formatting Utilities

use chrono::{DateTime, Local};

use crate::domain::metric::Metric;

/// Placeholder for a metric the provider does not know
pub const MISSING: &str = "-";

/// Format just the time portion
pub fn format_time(dt: &DateTime<Local>) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// Truncate a string to max chars with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Format a large amount with a magnitude suffix (K, M, B, T)
pub fn format_compact(value: f64) -> String {
    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

    let abs = value.abs();
    for (scale, suffix) in UNITS {
        if abs >= scale {
            return format!("{:.2}{}", value / scale, suffix);
        }
    }
    format!("{value:.2}")
}

/// Format a metric value for a table cell
pub fn format_metric(metric: Metric, value: Option<f64>) -> String {
    let Some(v) = value else {
        return MISSING.to_string();
    };

    match metric {
        Metric::MarketCap | Metric::FreeCashFlow => format_compact(v),
        _ => format!("{v:.2}"),
    }
}
