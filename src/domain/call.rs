//! Call history entries shown in the calls log.

use chrono::{Datelike, Local, LocalResult, TimeZone};

use super::{
    grouping::calendar_day,
    ids::{CallId, UserId},
};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// The log keeps at most this many entries, newest first.
pub const MAX_CALLS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallDirection {
    Incoming,
    Outgoing,
}

impl CallDirection {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Incoming => "Incoming",
            Self::Outgoing => "Outgoing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Answered,
    Missed,
    Declined,
    Canceled,
}

impl CallStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Answered => "Answered",
            Self::Missed => "Missed",
            Self::Declined => "Declined",
            Self::Canceled => "Canceled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub id: CallId,
    pub user_id: UserId,
    pub user_name: String,
    pub direction: CallDirection,
    pub status: CallStatus,
    pub timestamp_ms: i64,
}

impl Call {
    /// "Incoming • Missed • 5m ago"
    pub fn summary(&self, now_ms: i64) -> String {
        format!(
            "{} \u{2022} {} \u{2022} {}",
            self.direction.as_label(),
            self.status.as_label(),
            format_call_time(self.timestamp_ms, now_ms)
        )
    }
}

/// Relative age of a call in the local timezone.
pub fn format_call_time(timestamp_ms: i64, now_ms: i64) -> String {
    format_call_time_in(&Local, timestamp_ms, now_ms)
}

pub fn format_call_time_in<Tz: TimeZone>(tz: &Tz, timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = (now_ms - timestamp_ms).max(0);
    if elapsed < MINUTE_MS {
        return "just now".to_owned();
    }
    if elapsed < HOUR_MS {
        return format!("{}m ago", elapsed / MINUTE_MS);
    }
    if elapsed < DAY_MS {
        return format!("{}h ago", elapsed / HOUR_MS);
    }

    let days = elapsed / DAY_MS;
    if days == 1 {
        return "yesterday".to_owned();
    }
    if days < 7 {
        return format!("{days} days ago");
    }

    let then = match tz.timestamp_millis_opt(timestamp_ms) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.naive_local(),
        LocalResult::None => return String::new(),
    };
    if then.year() == calendar_day(tz, now_ms).year() {
        then.format("%b %-d").to_string()
    } else {
        then.format("%b %-d, %Y").to_string()
    }
}

/// Newest first, capped at [`MAX_CALLS`].
pub fn normalize_calls(mut calls: Vec<Call>) -> Vec<Call> {
    calls.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
    calls.truncate(MAX_CALLS);
    calls
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    // 2026-02-14 10:00:00 UTC
    const NOW: i64 = 1_771_063_200_000;

    fn call(id: &str, timestamp_ms: i64) -> Call {
        Call {
            id: CallId::from(id),
            user_id: UserId::from("alice"),
            user_name: "Alice".to_owned(),
            direction: CallDirection::Incoming,
            status: CallStatus::Missed,
            timestamp_ms,
        }
    }

    fn label(ago_ms: i64) -> String {
        format_call_time_in(&Utc, NOW - ago_ms, NOW)
    }

    #[test]
    fn recent_calls_get_relative_labels() {
        assert_eq!(label(30_000), "just now");
        assert_eq!(label(5 * MINUTE_MS), "5m ago");
        assert_eq!(label(3 * HOUR_MS), "3h ago");
        assert_eq!(label(DAY_MS + HOUR_MS), "yesterday");
        assert_eq!(label(4 * DAY_MS), "4 days ago");
    }

    #[test]
    fn older_calls_show_a_date_with_year_only_when_it_differs() {
        assert_eq!(label(30 * DAY_MS), "Jan 15");
        assert_eq!(label(60 * DAY_MS), "Dec 16, 2025");
    }

    #[test]
    fn summary_joins_direction_status_and_age() {
        let text = call("c1", NOW - 2 * MINUTE_MS).summary(NOW);

        assert!(text.starts_with("Incoming \u{2022} Missed \u{2022} "));
    }

    #[test]
    fn normalize_orders_newest_first_and_caps() {
        let calls: Vec<Call> = (0..MAX_CALLS as i64 + 5)
            .map(|index| call(&format!("c{index}"), NOW - index * MINUTE_MS))
            .rev()
            .collect();

        let calls = normalize_calls(calls);

        assert_eq!(calls.len(), MAX_CALLS);
        assert_eq!(calls[0].id, CallId::from("c0"));
        assert!(calls.windows(2).all(|pair| pair[0].timestamp_ms >= pair[1].timestamp_ms));
    }
}
