use crate::calc::date_key::date_key;
use crate::data::{Event, EventStore, persistence::get_data_dir};
use anyhow::{Context, Result, bail};
use chrono::NaiveTime;

/// Replacement values; `None` keeps the current one.
#[derive(Debug, Default)]
pub struct EditArgs<'a> {
    pub title: Option<&'a str>,
    pub time: Option<&'a str>,
    pub desc: Option<&'a str>,
}

pub fn run(date: &str, position: usize, args: EditArgs) -> Result<()> {
    let mut store = EventStore::open(&get_data_dir()?)?;
    let event = edit_at(&mut store, date, position, args)?;
    println!("Updated \"{}\"", event.heading());
    Ok(())
}

/// Overwrites the event shown at `position` (1-based) by `daycal timeline`.
pub(crate) fn edit_at(
    store: &mut EventStore,
    date: &str,
    position: usize,
    args: EditArgs,
) -> Result<Event> {
    let key = date_key(super::parse_date_arg(date)?);
    let index = position.checked_sub(1).unwrap_or(usize::MAX);
    let Some(current) = store.sorted_by_time(&key).get(index).cloned() else {
        bail!("no event #{position} on {}", date.trim());
    };

    let title = args.title.map(str::trim).unwrap_or(&current.title);
    if title.is_empty() {
        bail!("Title is required");
    }
    let time = args.time.map(str::trim).unwrap_or(&current.time);
    if !time.is_empty() {
        NaiveTime::parse_from_str(time, "%H:%M")
            .with_context(|| format!("invalid time '{time}', expected HH:MM"))?;
    }
    let desc = args.desc.map(str::trim).unwrap_or(&current.desc);

    let event = Event::new(title, time, desc);
    store.update(&key, index, event.clone())?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_two() -> EventStore {
        let mut store = EventStore::default();
        store.add(2025, 2, 10, Event::new("whenever", "", "notes")).unwrap();
        store.add(2025, 2, 10, Event::new("Standup", "09:00", "")).unwrap();
        store
    }

    #[test]
    fn test_edit_at_targets_displayed_record() {
        let mut store = store_with_two();
        let args = EditArgs {
            title: Some("Retro"),
            ..EditArgs::default()
        };
        edit_at(&mut store, "2025-03-10", 2, args).unwrap();

        let day = store.get(2025, 2, 10);
        let retro = day.iter().find(|e| e.title == "Retro").unwrap();
        assert_eq!(retro.desc, "notes");
        assert!(!retro.has_time());
        assert!(day.iter().any(|e| e.title == "Standup"));
    }

    #[test]
    fn test_edit_at_keeps_identity() {
        let mut store = store_with_two();
        let before = store.sorted_by_time("2025-2-10")[0].id.clone();
        let args = EditArgs {
            time: Some("10:30"),
            ..EditArgs::default()
        };
        edit_at(&mut store, "2025-03-10", 1, args).unwrap();
        let after = &store.sorted_by_time("2025-2-10")[0];
        assert_eq!(after.id, before);
        assert_eq!(after.time, "10:30");
    }

    #[test]
    fn test_edit_at_rejects_blank_title_and_bad_position() {
        let mut store = store_with_two();
        let blank = EditArgs {
            title: Some(" "),
            ..EditArgs::default()
        };
        assert!(edit_at(&mut store, "2025-03-10", 1, blank).is_err());
        assert!(edit_at(&mut store, "2025-03-10", 9, EditArgs::default()).is_err());
        assert_eq!(store.get(2025, 2, 10)[1].title, "Standup");
    }
}
