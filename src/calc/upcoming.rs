use crate::calc::date_key::key_to_date;
use crate::data::{Event, EventData};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingEvent {
    pub date: NaiveDate,
    pub event: Event,
}

impl UpcomingEvent {
    /// e.g. "Mon, Oct 19"
    pub fn date_label(&self) -> String {
        self.date.format("%a, %b %-d").to_string()
    }

    /// "@ 09:00" or empty.
    pub fn time_label(&self) -> String {
        if self.event.has_time() {
            format!("@ {}", self.event.time)
        } else {
            String::new()
        }
    }
}

/// "Good morning, today is Monday the 19 of October".
pub fn greeting(now: NaiveDateTime) -> String {
    let part = match now.hour() {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    };
    format!(
        "{}, today is {} the {} of {}",
        part,
        now.format("%A"),
        now.day(),
        now.format("%B")
    )
}

/// Events dated `today` or later, earliest day first, at most `limit`.
/// Events sharing a day keep their stored order.
pub fn upcoming_events(data: &EventData, today: NaiveDate, limit: usize) -> Vec<UpcomingEvent> {
    let mut upcoming = Vec::new();
    for (key, events) in &data.days {
        let Some(date) = key_to_date(key) else {
            tracing::warn!(key = %key, "skipping unparseable day key");
            continue;
        };
        if date < today {
            continue;
        }
        upcoming.extend(events.iter().map(|event| UpcomingEvent {
            date,
            event: event.clone(),
        }));
    }
    upcoming.sort_by_key(|u| u.date);
    upcoming.truncate(limit);
    upcoming
}
