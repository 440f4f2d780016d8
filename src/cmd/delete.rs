use crate::calc::date_key::date_key;
use crate::data::{Event, EventStore, persistence::get_data_dir};
use anyhow::{Result, bail};

pub fn run(date: &str, position: usize) -> Result<()> {
    let mut store = EventStore::open(&get_data_dir()?)?;
    let removed = delete_at(&mut store, date, position)?;
    println!("Deleted \"{}\"", removed.heading());
    Ok(())
}

/// Removes the event shown at `position` (1-based) by `daycal timeline`.
pub(crate) fn delete_at(store: &mut EventStore, date: &str, position: usize) -> Result<Event> {
    let key = date_key(super::parse_date_arg(date)?);
    let index = position.checked_sub(1).unwrap_or(usize::MAX);
    let Some(event) = store.sorted_by_time(&key).get(index).cloned() else {
        bail!("no event #{position} on {}", date.trim());
    };
    store.delete(&key, index)?;
    Ok(event)
}
