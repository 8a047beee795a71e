//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;

/// Used when a configured format cannot be rendered
const FALLBACK_FORMAT: &str = "%Y-%m-%d";

/// Format a date using a Moment.js-style format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date(date: &NaiveDateTime, format: &str) -> String {
    let chrono_format = moment_to_chrono_format(format);
    if StrftimeItems::new(&chrono_format).any(|item| matches!(item, Item::Error)) {
        tracing::warn!("Invalid date format {:?}, using {}", format, FALLBACK_FORMAT);
        return date.format(FALLBACK_FORMAT).to_string();
    }
    date.format_with_items(StrftimeItems::new(&chrono_format)).to_string()
}

/// `lastmod` value for sitemaps (W3C date)
pub fn sitemap_date(date: &NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longer tokens first so "MM" does not eat half of "MMMM"
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    // Anything else is literal text, including a stray '%'
    let mut result = format.replace('%', "%%");

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}
