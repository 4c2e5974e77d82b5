// Utility helpers for parsing and formatting incident values.
//
// This module centralizes all the "dirty" text/number/date handling so the
// transform can assume clean, typed values. Every helper is pure and reports
// absence through `Option` instead of guessing a value.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use num_format::{Locale, ToFormattedString};
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator used between values that share one card cell.
pub const BREAK: &str = "<br>";

static BRACED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{.*?\}").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// First maximal run of ASCII digits in `text`, e.g. `"Affected: 42 customers"`
/// gives `Some("42")`. Leading zeros are kept as written.
pub fn first_number(text: &str) -> Option<&str> {
    DIGITS.find(text).map(|m| m.as_str())
}

/// Strip `{...}` annotations, then delete every literal double space.
///
/// The double space is removed, not collapsed into one space: `"a {x} b"`
/// becomes `"a  b"` and then `"ab"`.
pub fn clean_description(text: &str) -> String {
    BRACED.replace_all(text, "").replace("  ", "")
}

/// Parse `YYYY-MM-DDTHH:MM:SS.ffffff`. The fraction is mandatory and holds
/// 1 to 6 digits, read as microseconds.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let (base, frac) = text.split_once('.')?;
    if frac.is_empty() || frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (date, time) = base.split_once('T')?;
    // Fixed-width fields only; chrono alone would accept `2024-1-5`.
    if date.len() != 10 || time.len() != 8 {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?;
    // chrono reads `:60` as a leap second; seconds stop at 59 here.
    if time.nanosecond() >= 1_000_000_000 {
        return None;
    }
    let micros: i64 = format!("{:0<6}", frac).parse().ok()?;
    Some(date.and_time(time) + TimeDelta::microseconds(micros))
}

pub fn format_display_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(&format!("%d/%m/%Y {} %H:%M:%S", BREAK)).to_string()
}

/// Render an elapsed span as `[D day[s], ]H:MM:SS[.ffffff]`.
///
/// Days are floored, so a span of minus one hour reads `-1 day, 23:00:00`.
pub fn format_duration(delta: TimeDelta) -> String {
    const MICROS_PER_DAY: i64 = 86_400 * 1_000_000;
    // Microsecond precision matches what `parse_timestamp` can produce.
    let total = delta.num_microseconds().unwrap_or_else(|| delta.num_milliseconds() * 1_000);
    let days = total.div_euclid(MICROS_PER_DAY);
    let rest = total.rem_euclid(MICROS_PER_DAY);
    let micros = rest % 1_000_000;
    let secs = rest / 1_000_000;
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);

    let mut out = String::new();
    if days != 0 {
        let plural = if days.abs() == 1 { "" } else { "s" };
        out.push_str(&format!("{} day{}, ", days, plural));
    }
    out.push_str(&format!("{}:{:02}:{:02}", h, m, s));
    if micros != 0 {
        out.push_str(&format!(".{:06}", micros));
    }
    out
}

/// Parse a money/percentage cell into `f64` while being forgiving about
/// the formatting found in spreadsheet exports.
///
/// - Trims whitespace.
/// - Strips space and no-break-space thousands separators.
/// - Accepts a single comma as the decimal separator when there is no dot.
/// - Returns `None` for anything else, including the `N/A` sentinel.
pub fn parse_amount(s: &str) -> Option<f64> {
    let s: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();
    if s.is_empty() || s.chars().any(|c| c.is_alphabetic()) {
        return None;
    }
    let s = if !s.contains('.') && s.matches(',').count() == 1 {
        s.replace(',', ".")
    } else {
        s
    };
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Deduplicate while keeping the first occurrence of each value.
pub fn unique_in_order<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<&str> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in log and console messages (e.g., `9,855 rows`).
    n.to_formatted_string(&Locale::en)
}
