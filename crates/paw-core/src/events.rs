// events.rs — Moderation events and notification dispatch.
//
// Every committed intake emits a PawEvent. Curators read the event log to
// find new-profile proposals and welfare reports. Dispatch is synchronous
// and best-effort: a failing sink is logged and never undoes the intake.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use paw_records::{Animal, AnimalId, AnimalRef, PendingProfileId, Report, ReportCategory, Sighting};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PawError;

/// Events emitted after a record has been appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PawEvent {
    AnimalRegistered {
        animal_id: AnimalId,
        name: String,
        timestamp: DateTime<Utc>,
    },

    SightingRecorded {
        sighting_id: Uuid,
        animal_id: AnimalId,
        location_label: String,
        timestamp: DateTime<Utc>,
    },

    /// Someone saw an animal that is not registered yet. Needs curation.
    NewProfileProposed {
        sighting_id: Uuid,
        pending_id: PendingProfileId,
        photo_ref: Option<String>,
        timestamp: DateTime<Utc>,
    },

    ReportFiled {
        report_id: Uuid,
        category: ReportCategory,
        animal_id: Option<AnimalId>,
        timestamp: DateTime<Utc>,
    },
}

impl PawEvent {
    pub fn event_type(&self) -> &str {
        match self {
            PawEvent::AnimalRegistered { .. } => "animal_registered",
            PawEvent::SightingRecorded { .. } => "sighting_recorded",
            PawEvent::NewProfileProposed { .. } => "new_profile_proposed",
            PawEvent::ReportFiled { .. } => "report_filed",
        }
    }

    pub fn animal_registered(animal: &Animal) -> Self {
        PawEvent::AnimalRegistered {
            animal_id: animal.id,
            name: animal.name.clone(),
            timestamp: animal.registered_at,
        }
    }

    pub fn for_sighting(sighting: &Sighting) -> Self {
        match sighting.animal {
            AnimalRef::Known(animal_id) => PawEvent::SightingRecorded {
                sighting_id: sighting.id,
                animal_id,
                location_label: sighting.location_label.clone(),
                timestamp: sighting.timestamp,
            },
            AnimalRef::Pending(pending_id) => PawEvent::NewProfileProposed {
                sighting_id: sighting.id,
                pending_id,
                photo_ref: sighting.photo_ref.clone(),
                timestamp: sighting.timestamp,
            },
        }
    }

    pub fn report_filed(report: &Report) -> Self {
        PawEvent::ReportFiled {
            report_id: report.id,
            category: report.category,
            animal_id: report.animal_id,
            timestamp: report.timestamp,
        }
    }
}

/// Receives moderation events.
pub trait NotificationSink: Send + Sync {
    /// Handle an event. Errors are logged but don't stop the system.
    fn send(&self, event: &PawEvent) -> Result<(), PawError>;
}

/// Appends events as JSONL to a file.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl NotificationSink for LogSink {
    fn send(&self, event: &PawEvent) -> Result<(), PawError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PawError::IoError {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| PawError::IoError {
                path: self.path.display().to_string(),
                source,
            })?;

        let json = serde_json::to_string(event)?;
        writeln!(file, "{}", json).map_err(|source| PawError::IoError {
            path: self.path.display().to_string(),
            source,
        })?;

        Ok(())
    }
}

/// Fans events out to every registered sink.
#[derive(Default)]
pub struct EventDispatcher {
    sinks: Vec<Box<dyn NotificationSink>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sink(&mut self, sink: Box<dyn NotificationSink>) {
        self.sinks.push(sink);
    }

    pub fn with_sink(mut self, sink: Box<dyn NotificationSink>) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn dispatch(&self, event: &PawEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.send(event) {
                tracing::warn!(event = event.event_type(), "notification sink error: {}", e);
            }
        }
    }
}
