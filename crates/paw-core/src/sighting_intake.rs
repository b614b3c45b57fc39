// sighting_intake.rs — Validate and append a new Sighting.
//
// Rules are checked in a fixed order and the first failure wins:
//   1. the selection resolves; a new-profile selection needs a photo
//   2. the note is at most NOTE_MAX_CHARS code points
//   3. the location names a place
// Nothing is written unless all three pass. The id and timestamp are always
// assigned here, never taken from the client.

use std::sync::Arc;

use paw_records::{AnimalRef, PendingProfileId, RecordStore, Sighting};

use crate::config::LocationVocabulary;
use crate::error::{PawError, ValidationError};
use crate::events::{EventDispatcher, PawEvent};
use crate::registry::{AnimalRegistry, Selection};

/// Longest accepted note, in Unicode code points.
pub const NOTE_MAX_CHARS: usize = 200;

pub struct SightingIntake {
    store: Arc<dyn RecordStore>,
    registry: AnimalRegistry,
    locations: LocationVocabulary,
    events: Arc<EventDispatcher>,
}

impl SightingIntake {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            registry: AnimalRegistry::new(Arc::clone(&store)),
            store,
            locations: LocationVocabulary::default(),
            events: Arc::new(EventDispatcher::new()),
        }
    }

    pub fn with_locations(mut self, locations: LocationVocabulary) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    pub fn locations(&self) -> &LocationVocabulary {
        &self.locations
    }

    /// Validate and append one sighting, returning the stored record.
    ///
    /// A [`Selection::NewProfile`] sighting is stored against a fresh
    /// [`AnimalRef::Pending`]; the registry itself is left untouched.
    pub fn submit(
        &self,
        selection: Selection,
        location: &str,
        note: &str,
        photo_ref: Option<&str>,
    ) -> Result<Sighting, PawError> {
        let photo_ref = photo_ref
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        let animal = match selection {
            Selection::Animal(id) => {
                self.registry.get_animal(id)?;
                AnimalRef::Known(id)
            }
            Selection::NewProfile => {
                if photo_ref.is_none() {
                    return Err(ValidationError::MissingPhoto.into());
                }
                AnimalRef::Pending(PendingProfileId::new())
            }
        };

        let length = note.chars().count();
        if length > NOTE_MAX_CHARS {
            return Err(ValidationError::NoteTooLong {
                length,
                limit: NOTE_MAX_CHARS,
            }
            .into());
        }

        if self.locations.is_blank(location) {
            return Err(ValidationError::MissingLocation.into());
        }

        let sighting = Sighting::new(animal, location.trim(), note, photo_ref);
        self.store.create_sighting(&sighting)?;

        tracing::info!(
            sighting_id = %sighting.id,
            animal = %sighting.animal,
            location = %sighting.location_label,
            "recorded sighting"
        );
        self.events.dispatch(&PawEvent::for_sighting(&sighting));

        Ok(sighting)
    }
}
