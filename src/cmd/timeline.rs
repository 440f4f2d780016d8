use crate::calc::date_key::date_key;
use crate::data::{Event, EventStore, persistence::get_data_dir};
use anyhow::Result;
use chrono::NaiveDate;

pub fn run(date: &str) -> Result<()> {
    let date = super::parse_date_arg(date)?;
    let store = EventStore::open(&get_data_dir()?)?;
    let events = store.sorted_by_time(&date_key(date));
    write_timeline(date, &events, &mut std::io::stdout())
}

/// `events` must already be in time order.
pub(crate) fn write_timeline<W: std::io::Write>(
    date: NaiveDate,
    events: &[Event],
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Timeline: {}", date.format("%B %-d, %Y"))?;
    writeln!(out, "---")?;
    if events.is_empty() {
        writeln!(out, "  No events for this day.")?;
    }
    for (i, ev) in events.iter().enumerate() {
        writeln!(out, "  {:>2}. {}", i + 1, ev.heading())?;
        if !ev.desc.is_empty() {
            writeln!(out, "      {}", ev.desc)?;
        }
    }
    writeln!(out, "---")?;
    writeln!(out, "Total: {} event(s)", events.len())?;
    Ok(())
}
