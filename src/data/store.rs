use crate::calc::date_key::day_key;
use crate::data::event::{Event, EventData, EventId};
use crate::data::persistence::Persistable;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The event map plus where it lives on disk. Every successful mutation
/// writes the whole map back before returning.
#[derive(Debug, Default)]
pub struct EventStore {
    data: EventData,
    dir: Option<PathBuf>,
}

impl EventStore {
    /// Loads `calendar-events.json` from `dir`. A corrupt file fails the whole
    /// load; nothing from it is kept.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut data = EventData::load_from(dir).context("failed to load calendar events")?;
        let reassigned = data.dedupe_ids();
        if reassigned > 0 {
            tracing::warn!(reassigned, "duplicate event ids in file, assigned fresh ones");
        }
        tracing::info!(
            dir = %dir.display(),
            days = data.days.len(),
            events = data.event_count(),
            "event store loaded"
        );
        Ok(EventStore {
            data,
            dir: Some(dir.to_path_buf()),
        })
    }

    /// A store that never touches the filesystem.
    #[cfg(test)]
    pub fn in_memory(data: EventData) -> Self {
        EventStore { data, dir: None }
    }

    pub fn data(&self) -> &EventData {
        &self.data
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn get(&self, year: i32, month0: u32, day: u32) -> Vec<Event> {
        self.get_by_key(&day_key(year, month0, day))
    }

    pub fn get_by_key(&self, key: &str) -> Vec<Event> {
        self.data.get_day(key)
    }

    pub fn sorted_by_time(&self, key: &str) -> Vec<Event> {
        self.data.sorted_day(key)
    }

    pub fn has_events(&self, key: &str) -> bool {
        self.data.has_events(key)
    }

    /// Number of events across all days.
    pub fn event_count(&self) -> usize {
        self.data.event_count()
    }

    pub fn add(&mut self, year: i32, month0: u32, day: u32, event: Event) -> Result<()> {
        let key = day_key(year, month0, day);
        tracing::info!(key = %key, id = %event.id, "adding event");
        self.data.push(&key, event);
        self.persist()
    }

    /// Overwrites the event shown at `index` of the day's time-sorted list.
    /// Returns `Ok(false)` when the key or index no longer exists.
    pub fn update(&mut self, key: &str, index: usize, event: Event) -> Result<bool> {
        match self.data.id_at_sorted(key, index) {
            Some(id) => self.update_by_id(key, &id, event),
            None => {
                tracing::debug!(key, index, "update skipped: no such event");
                Ok(false)
            }
        }
    }

    /// Removes the event shown at `index` of the day's time-sorted list.
    pub fn delete(&mut self, key: &str, index: usize) -> Result<bool> {
        match self.data.id_at_sorted(key, index) {
            Some(id) => self.delete_by_id(key, &id),
            None => {
                tracing::debug!(key, index, "delete skipped: no such event");
                Ok(false)
            }
        }
    }

    pub fn update_by_id(&mut self, key: &str, id: &EventId, event: Event) -> Result<bool> {
        if !self.data.replace(key, id, event) {
            tracing::debug!(key, id = %id, "update skipped: no such event");
            return Ok(false);
        }
        tracing::info!(key, id = %id, "updated event");
        self.persist()?;
        Ok(true)
    }

    pub fn delete_by_id(&mut self, key: &str, id: &EventId) -> Result<bool> {
        if !self.data.remove(key, id) {
            tracing::debug!(key, id = %id, "delete skipped: no such event");
            return Ok(false);
        }
        tracing::info!(key, id = %id, "deleted event");
        self.persist()?;
        Ok(true)
    }

    fn persist(&self) -> Result<()> {
        match &self.dir {
            Some(dir) => self.data.save_to(dir),
            None => Ok(()),
        }
    }
}
