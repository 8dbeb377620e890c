//! Calendar arithmetic for eligibility rules.

use chrono::{DateTime, Datelike, Months, NaiveDate};

/// Whole years elapsed from `from` to `to` (0 when `to` precedes `from`).
pub fn full_years(from: NaiveDate, to: NaiveDate) -> u32 {
    full_months(from, to) / 12
}

/// Whole calendar months elapsed from `from` to `to`.
pub fn full_months(from: NaiveDate, to: NaiveDate) -> u32 {
    if to <= from {
        return 0;
    }
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() && !is_month_end_catchup(from, to) {
        months -= 1;
    }
    months.max(0) as u32
}

// 31 Jan -> 28 Feb counts as a full month.
fn is_month_end_catchup(from: NaiveDate, to: NaiveDate) -> bool {
    to.succ_opt().map(|n| n.month() != to.month()).unwrap_or(false) && from.day() > to.day()
}

pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

/// Parse extension periods such as "2 years", "6 months", "1 year 6 months".
/// Returns the total in months.
pub fn parse_period_months(text: &str) -> Option<u32> {
    let lower = text.trim().to_lowercase();
    let tokens: Vec<&str> = lower.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return None;
    }
    let mut total = 0u32;
    for pair in tokens.chunks(2) {
        let n: u32 = pair[0].parse().ok()?;
        let unit = pair[1].trim_end_matches(',');
        let factor = match unit {
            "year" | "years" | "yr" | "yrs" => 12,
            "month" | "months" | "mo" => 1,
            _ => return None,
        };
        total = total.checked_add(n.checked_mul(factor)?)?;
    }
    (total > 0).then_some(total)
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp; only the date is kept.
pub fn parse_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|d| d.date_naive()))
}

/// Inclusive day range, present only when both bounds parse and are ordered.
pub fn date_window(from: Option<&str>, to: Option<&str>) -> Option<(NaiveDate, NaiveDate)> {
    let from = parse_day(from?)?;
    let to = parse_day(to?)?;
    (from <= to).then_some((from, to))
}
