use crate::calc::upcoming::{UpcomingEvent, greeting, upcoming_events};
use crate::data::{AppSettings, EventStore, persistence::get_data_dir};
use anyhow::Result;
use chrono::Local;

pub fn run(limit: Option<usize>) -> Result<()> {
    let settings = AppSettings::load()?;
    let store = EventStore::open(&get_data_dir()?)?;
    let now = Local::now().naive_local();
    let limit = limit.unwrap_or(settings.upcoming_limit);
    let upcoming = upcoming_events(store.data(), now.date(), limit);
    write_upcoming(&greeting(now), &upcoming, &mut std::io::stdout())
}

pub(crate) fn write_upcoming<W: std::io::Write>(
    greeting: &str,
    upcoming: &[UpcomingEvent],
    out: &mut W,
) -> Result<()> {
    writeln!(out, "{greeting}")?;
    writeln!(out, "---")?;
    for u in upcoming {
        let time = u.time_label();
        if time.is_empty() {
            writeln!(out, "  {:<14} {}", u.date_label(), u.event.title)?;
        } else {
            writeln!(out, "  {:<14} {} {}", u.date_label(), u.event.title, time)?;
        }
        if !u.event.desc.is_empty() {
            writeln!(out, "  {:<14} {}", "", u.event.desc)?;
        }
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} upcoming event(s)", upcoming.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Event;
    use chrono::NaiveDate;

    fn upcoming(date: (i32, u32, u32), event: Event) -> UpcomingEvent {
        UpcomingEvent {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            event,
        }
    }

    #[test]
    fn test_write_upcoming_empty() {
        let mut buf = Vec::new();
        write_upcoming("Good morning", &[], &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.starts_with("Good morning\n"));
        assert!(out.contains("Total: 0 upcoming event(s)"));
    }

    #[test]
    fn test_write_upcoming_entries() {
        let list = vec![
            upcoming((2026, 10, 19), Event::new("Standup", "09:00", "daily")),
            upcoming((2026, 10, 20), Event::new("Dentist", "", "")),
        ];
        let mut buf = Vec::new();
        write_upcoming("hi", &list, &mut buf).unwrap();
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Mon, Oct 19"));
        assert!(out.contains("Standup @ 09:00"));
        assert!(out.contains("daily"));
        assert!(out.contains("Dentist\n"));
        assert!(out.contains("Total: 2 upcoming event(s)"));
    }
}
