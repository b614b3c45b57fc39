// mod.rs — Subcommand implementations and the wiring they share.

pub mod animal;
pub mod report;
pub mod seed;
pub mod shell;
pub mod sighting;
pub mod timeline;
pub mod verify;

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use paw_core::{EventDispatcher, LogSink, PawConfig};
use paw_records::JsonlRecordStore;

/// Open the project's record store.
pub fn open_store(config: &PawConfig) -> anyhow::Result<Arc<JsonlRecordStore>> {
    Ok(Arc::new(JsonlRecordStore::open(&config.data_dir)?))
}

/// Moderation events go to the project's event log.
pub fn event_dispatcher(config: &PawConfig) -> Arc<EventDispatcher> {
    Arc::new(EventDispatcher::new().with_sink(Box::new(LogSink::new(&config.events_log))))
}

/// Minute precision in local time, the way the campus board shows it.
pub fn display_time(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Shorten to `max` characters for table columns.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_characters() {
        assert_eq!(truncate("大黄", 10), "大黄");
        assert_eq!(truncate("经常出现在图书馆草坪", 5), "经常出现…");
        assert_eq!(truncate("", 3), "");
    }
}
