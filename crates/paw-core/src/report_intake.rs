// report_intake.rs — Validate and append a moderation Report.
//
// The category must come from the fixed vocabulary; the detail may be empty.
// Resubmissions are not deduplicated: every call that passes validation
// appends a distinct record.

use std::sync::Arc;

use paw_records::{AnimalId, RecordStore, Report, ReportCategory};

use crate::error::{PawError, ValidationError};
use crate::events::{EventDispatcher, PawEvent};
use crate::registry::AnimalRegistry;

pub struct ReportIntake {
    store: Arc<dyn RecordStore>,
    registry: AnimalRegistry,
    events: Arc<EventDispatcher>,
}

impl ReportIntake {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            registry: AnimalRegistry::new(Arc::clone(&store)),
            store,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// File a report. `category` is a wire name ("injured_or_sick") or a
    /// display label ("动物受伤/生病").
    pub fn submit(
        &self,
        category: &str,
        detail: &str,
        animal_id: Option<AnimalId>,
    ) -> Result<Report, PawError> {
        let category: ReportCategory = category
            .parse()
            .map_err(|_| ValidationError::InvalidCategory(category.to_string()))?;

        if let Some(id) = animal_id {
            self.registry.get_animal(id)?;
        }

        let report = Report::new(category, detail, animal_id);
        self.store.create_report(&report)?;

        tracing::info!(
            report_id = %report.id,
            category = %report.category,
            animal_id = ?report.animal_id.map(|id| id.get()),
            "filed report"
        );
        self.events.dispatch(&PawEvent::report_filed(&report));

        Ok(report)
    }

    /// Every report, oldest first, for moderators.
    pub fn list_reports(&self) -> Result<Vec<Report>, PawError> {
        Ok(self.store.list_reports()?)
    }
}
