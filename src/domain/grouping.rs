//! Render-time grouping of a chat's messages.
//!
//! Folds an insertion-ordered message slice into per-message layout flags:
//! where date headers go, where sender runs start and end, and which incoming
//! messages carry the sender avatar.

use chrono::{NaiveDate, TimeZone};

use super::{ids::UserId, message::Message};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagePlacement {
    pub show_date_header: bool,
    pub is_first_in_group: bool,
    pub is_last_in_group: bool,
    pub show_avatar: bool,
}

/// Plans the layout of `messages`; `tz` decides where day boundaries fall.
pub fn plan_messages_in<Tz: TimeZone>(
    tz: &Tz,
    messages: &[Message],
    me: &UserId,
    multi_participant: bool,
) -> Vec<MessagePlacement> {
    let days: Vec<NaiveDate> = messages
        .iter()
        .map(|message| calendar_day(tz, message.timestamp_ms))
        .collect();

    messages
        .iter()
        .enumerate()
        .map(|(index, message)| {
            let previous = index.checked_sub(1).map(|i| (&messages[i], days[i]));
            let next = messages.get(index + 1).map(|m| (m, days[index + 1]));
            let day = days[index];

            let show_date_header = previous.map_or(true, |(_, prev_day)| prev_day != day);
            let is_first_in_group = show_date_header
                || previous.map_or(true, |(prev, _)| prev.sender_id != message.sender_id);
            let is_last_in_group = next.map_or(true, |(next, next_day)| {
                next.sender_id != message.sender_id || next_day != day
            });
            let is_outgoing = &message.sender_id == me;

            MessagePlacement {
                show_date_header,
                is_first_in_group,
                is_last_in_group,
                show_avatar: !is_outgoing && multi_participant && is_last_in_group,
            }
        })
        .collect()
}

pub fn calendar_day<Tz: TimeZone>(tz: &Tz, timestamp_ms: i64) -> NaiveDate {
    match tz.timestamp_millis_opt(timestamp_ms) {
        chrono::LocalResult::Single(dt) => dt.date_naive(),
        chrono::LocalResult::Ambiguous(dt, _) => dt.date_naive(),
        chrono::LocalResult::None => NaiveDate::default(),
    }
}
