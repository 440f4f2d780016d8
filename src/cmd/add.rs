use crate::data::{Event, EventStore, persistence::get_data_dir};
use anyhow::{Context, Result, bail};
use chrono::{Datelike, NaiveTime};

pub fn run(date: &str, title: &str, time: Option<&str>, desc: Option<&str>) -> Result<()> {
    let mut store = EventStore::open(&get_data_dir()?)?;
    let event = add_event(&mut store, date, title, time, desc)?;
    println!("Added \"{}\" on {}", event.heading(), date.trim());
    Ok(())
}

/// Validates the arguments and appends the event to its day.
pub(crate) fn add_event(
    store: &mut EventStore,
    date: &str,
    title: &str,
    time: Option<&str>,
    desc: Option<&str>,
) -> Result<Event> {
    let date = super::parse_date_arg(date)?;
    let title = title.trim();
    if title.is_empty() {
        bail!("Title is required");
    }
    let time = time.map(str::trim).unwrap_or("");
    if !time.is_empty() {
        NaiveTime::parse_from_str(time, "%H:%M")
            .with_context(|| format!("invalid time '{time}', expected HH:MM"))?;
    }
    let event = Event::new(title, time, desc.map(str::trim).unwrap_or(""));
    store.add(date.year(), date.month0(), date.day(), event.clone())?;
    Ok(event)
}
