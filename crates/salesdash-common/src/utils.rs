//! Shared formatting helpers for stat cards, axis labels and tooltips.

use chrono::NaiveDateTime;

/// Compacts a number for display: `1.23M`, `4.5K`, or a whole number.
///
/// Non-finite values render as `-` so an empty dataset shows a placeholder
/// instead of `NaN`.
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        "-".to_string()
    } else if num >= 1_000_000.0 {
        format!("{:.2}M", num / 1_000_000.0)
    } else if num >= 1_000.0 {
        format!("{:.1}K", num / 1_000.0)
    } else {
        format!("{:.0}", num)
    }
}

/// Same as [`format_number`] with a dollar prefix.
pub fn format_currency(num: f64) -> String {
    format!("${}", format_number(num))
}

/// Formats an order date the way tooltips show it (`M/D/YYYY`).
pub fn format_date(date: NaiveDateTime) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
