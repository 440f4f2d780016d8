pub mod app_settings;
pub mod event;
pub mod persistence;
pub mod store;

pub use app_settings::AppSettings;
pub use event::{Event, EventData, EventId};
pub use persistence::Persistable;
pub use store::EventStore;
