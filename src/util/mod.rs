use crate::models::LeaderboardEntry;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse the calendar day out of a date or timestamp string.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the day is taken in the
/// timestamp's own offset) and naive `YYYY-MM-DDTHH:MM:SS[.fff]`.
pub(crate) fn parse_calendar_day(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    None
}

/// Day-level equality. Unparseable values only match on identical text.
pub(crate) fn same_calendar_day(a: &str, b: &str) -> bool {
    match (parse_calendar_day(a), parse_calendar_day(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.trim() == b.trim(),
        _ => false,
    }
}

/// Value suitable for `<input type="date">`; empty when unparseable.
pub(crate) fn date_input_value(s: &str) -> String {
    parse_calendar_day(s)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub(crate) fn display_date(s: &str) -> String {
    parse_calendar_day(s)
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| "—".to_string())
}

pub(crate) fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("₹{amount:.0}")
    } else {
        format!("₹{amount:.2}")
    }
}

/// Sort by score (desc) and assign dense ranks: equal scores share a rank.
pub(crate) fn rank_leaderboard(mut entries: Vec<LeaderboardEntry>) -> Vec<(u32, LeaderboardEntry)> {
    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });

    let mut out = Vec::with_capacity(entries.len());
    let mut rank = 0u32;
    let mut prev: Option<f64> = None;
    for e in entries {
        if prev != Some(e.score) {
            rank += 1;
            prev = Some(e.score);
        }
        out.push((rank, e));
    }
    out
}
