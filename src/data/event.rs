use crate::data::persistence::Persistable;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Stable identity of a stored event. Generated once when the event is
/// created; older files without ids get one on load.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        EventId(id[..12].to_string())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(s: &str) -> Self {
        EventId(s.to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    #[serde(default = "EventId::generate")]
    pub id: EventId,
    pub title: String,
    /// Zero-padded "HH:MM", empty when the event has no time.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub desc: String,
}

impl Event {
    pub fn new(title: &str, time: &str, desc: &str) -> Self {
        Event {
            id: EventId::generate(),
            title: title.to_string(),
            time: time.to_string(),
            desc: desc.to_string(),
        }
    }

    pub fn has_time(&self) -> bool {
        !self.time.is_empty()
    }

    /// "09:00 - Standup" or just "Standup".
    pub fn heading(&self) -> String {
        if self.has_time() {
            format!("{} - {}", self.time, self.title)
        } else {
            self.title.clone()
        }
    }
}

/// Orders events without a time after timed ones. Timed events compare as
/// plain strings, which is only correct for zero-padded "HH:MM".
pub fn compare_by_time(a: &Event, b: &Event) -> Ordering {
    match (a.has_time(), b.has_time()) {
        (false, false) => Ordering::Equal,
        (false, true) => Ordering::Greater,
        (true, false) => Ordering::Less,
        (true, true) => a.time.cmp(&b.time),
    }
}

/// Stable in-place sort by time of day.
pub fn sort_by_time(events: &mut [Event]) {
    events.sort_by(compare_by_time);
}

/// All stored events, keyed by day key. Serialized as one JSON object.
#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
#[serde(transparent)]
pub struct EventData {
    pub days: BTreeMap<String, Vec<Event>>,
}

impl Persistable for EventData {
    fn filename() -> &'static str {
        "calendar-events.json"
    }
    fn is_json() -> bool {
        true
    }
}

impl EventData {
    /// Copy of a day's events in storage order.
    pub fn get_day(&self, key: &str) -> Vec<Event> {
        self.days.get(key).cloned().unwrap_or_default()
    }

    /// Copy of a day's events in display order.
    pub fn sorted_day(&self, key: &str) -> Vec<Event> {
        let mut events = self.get_day(key);
        sort_by_time(&mut events);
        events
    }

    pub fn has_events(&self, key: &str) -> bool {
        self.days.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn push(&mut self, key: &str, event: Event) {
        self.days.entry(key.to_string()).or_default().push(event);
    }

    /// Resolves a position in display order to the event's id.
    pub fn id_at_sorted(&self, key: &str, index: usize) -> Option<EventId> {
        self.sorted_day(key).get(index).map(|e| e.id.clone())
    }

    pub fn find(&self, key: &str, id: &EventId) -> Option<&Event> {
        self.days.get(key)?.iter().find(|e| &e.id == id)
    }

    /// Overwrites the content of the event with `id`, keeping its identity.
    pub fn replace(&mut self, key: &str, id: &EventId, event: Event) -> bool {
        let Some(slot) = self
            .days
            .get_mut(key)
            .and_then(|list| list.iter_mut().find(|e| &e.id == id))
        else {
            return false;
        };
        *slot = Event {
            id: id.clone(),
            ..event
        };
        true
    }

    /// Removes the event with `id`; drops the day key once it is empty.
    pub fn remove(&mut self, key: &str, id: &EventId) -> bool {
        let Some(list) = self.days.get_mut(key) else {
            return false;
        };
        let before = list.len();
        list.retain(|e| &e.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.days.remove(key);
        }
        removed
    }

    pub fn event_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    /// Gives a fresh id to every event whose id already appeared earlier on
    /// the same day. Returns how many were reassigned.
    pub fn dedupe_ids(&mut self) -> usize {
        let mut reassigned = 0;
        for list in self.days.values_mut() {
            let mut seen = HashSet::new();
            for event in list.iter_mut() {
                if !seen.insert(event.id.clone()) {
                    event.id = EventId::generate();
                    seen.insert(event.id.clone());
                    reassigned += 1;
                }
            }
        }
        reassigned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(title: &str, time: &str) -> Event {
        Event::new(title, time, "")
    }

    #[test]
    fn test_event_new_sets_fields() {
        let e = Event::new("Standup", "09:00", "daily");
        assert_eq!(e.title, "Standup");
        assert_eq!(e.time, "09:00");
        assert_eq!(e.desc, "daily");
        assert!(!e.id.to_string().is_empty());
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(EventId::generate(), EventId::generate());
    }

    #[test]
    fn test_heading_with_and_without_time() {
        assert_eq!(ev("Lunch", "12:30").heading(), "12:30 - Lunch");
        assert_eq!(ev("Lunch", "").heading(), "Lunch");
    }

    #[test]
    fn test_sort_by_time_untimed_last() {
        let mut events = vec![ev("untimed", ""), ev("timed", "09:00")];
        sort_by_time(&mut events);
        assert_eq!(events[0].title, "timed");
        assert_eq!(events[1].title, "untimed");
    }

    #[test]
    fn test_sort_by_time_ascending() {
        let mut events = vec![ev("c", "17:00"), ev("a", "08:15"), ev("b", "12:00")];
        sort_by_time(&mut events);
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
    }

    #[test]
    fn test_sort_by_time_is_stable() {
        let mut events = vec![
            ev("first-untimed", ""),
            ev("first-nine", "09:00"),
            ev("second-untimed", ""),
            ev("second-nine", "09:00"),
        ];
        sort_by_time(&mut events);
        let titles: Vec<_> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            ["first-nine", "second-nine", "first-untimed", "second-untimed"]
        );
    }

    #[test]
    fn test_get_day_missing_is_empty() {
        let data = EventData::default();
        assert!(data.get_day("2025-0-1").is_empty());
        assert!(!data.has_events("2025-0-1"));
    }

    #[test]
    fn test_push_creates_day_in_insertion_order() {
        let mut data = EventData::default();
        data.push("2025-2-10", ev("late", "18:00"));
        data.push("2025-2-10", ev("early", "07:00"));
        let day = data.get_day("2025-2-10");
        assert_eq!(day[0].title, "late");
        assert_eq!(day[1].title, "early");
        assert!(data.has_events("2025-2-10"));
    }

    #[test]
    fn test_sorted_day_does_not_reorder_storage() {
        let mut data = EventData::default();
        data.push("2025-2-10", ev("late", "18:00"));
        data.push("2025-2-10", ev("early", "07:00"));
        let sorted = data.sorted_day("2025-2-10");
        assert_eq!(sorted[0].title, "early");
        assert_eq!(data.days["2025-2-10"][0].title, "late");
    }

    #[test]
    fn test_id_at_sorted_follows_display_order() {
        let mut data = EventData::default();
        let untimed = ev("untimed", "");
        let timed = ev("timed", "09:00");
        data.push("k", untimed.clone());
        data.push("k", timed.clone());
        assert_eq!(data.id_at_sorted("k", 0), Some(timed.id));
        assert_eq!(data.id_at_sorted("k", 1), Some(untimed.id));
        assert_eq!(data.id_at_sorted("k", 2), None);
    }

    #[test]
    fn test_replace_keeps_identity() {
        let mut data = EventData::default();
        let original = ev("old", "");
        data.push("k", original.clone());
        assert!(data.replace("k", &original.id, ev("new", "10:00")));
        let stored = &data.days["k"][0];
        assert_eq!(stored.id, original.id);
        assert_eq!(stored.title, "new");
        assert_eq!(stored.time, "10:00");
    }

    #[test]
    fn test_replace_unknown_is_noop() {
        let mut data = EventData::default();
        data.push("k", ev("a", ""));
        assert!(!data.replace("k", &EventId::from("nope"), ev("b", "")));
        assert!(!data.replace("other", &EventId::from("nope"), ev("b", "")));
        assert_eq!(data.days["k"][0].title, "a");
    }

    #[test]
    fn test_remove_last_event_drops_key() {
        let mut data = EventData::default();
        let only = ev("only", "");
        data.push("k", only.clone());
        assert!(data.remove("k", &only.id));
        assert!(!data.days.contains_key("k"));
        assert!(data.days.is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut data = EventData::default();
        data.push("k", ev("a", ""));
        assert!(!data.remove("k", &EventId::from("nope")));
        assert!(!data.remove("missing", &EventId::from("nope")));
        assert_eq!(data.event_count(), 1);
    }

    #[test]
    fn test_deserialize_without_ids_generates_them() {
        let json = r#"{"2025-2-10":[
            {"title":"Standup","time":"09:00","desc":"daily"},
            {"title":"Notes"}
        ]}"#;
        let data: EventData = serde_json::from_str(json).unwrap();
        let day = &data.days["2025-2-10"];
        assert_eq!(day.len(), 2);
        assert!(!day[0].id.to_string().is_empty());
        assert_ne!(day[0].id, day[1].id);
        assert_eq!(day[1].time, "");
        assert_eq!(day[1].desc, "");
    }

    #[test]
    fn test_serialized_shape_is_object_of_arrays() {
        let mut data = EventData::default();
        data.push("2025-0-5", ev("a", ""));
        let value = serde_json::to_value(&data).unwrap();
        assert!(value.is_object());
        assert!(value["2025-0-5"].is_array());
        assert_eq!(value["2025-0-5"][0]["title"], "a");
    }

    #[test]
    fn test_dedupe_ids_only_touches_repeats() {
        let json = r#"{
            "2025-2-10":[{"id":"abc","title":"A"},{"id":"abc","title":"B"}],
            "2025-2-11":[{"id":"abc","title":"C"}]
        }"#;
        let mut data: EventData = serde_json::from_str(json).unwrap();
        assert_eq!(data.dedupe_ids(), 1);
        let day = &data.days["2025-2-10"];
        assert_eq!(day[0].id, EventId::from("abc"));
        assert_ne!(day[1].id, day[0].id);
        // ids only need to be unique within a day
        assert_eq!(data.days["2025-2-11"][0].id, EventId::from("abc"));
        assert_eq!(data.dedupe_ids(), 0);
    }
}
