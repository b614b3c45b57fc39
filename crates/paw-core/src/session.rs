// session.rs — One user's command stream over navigation and intake.
//
// A Session is what a presentation layer drives. Every method takes
// `&mut self`, so commands within one session are strictly sequential.
// Methods return typed results (display data, created records or errors);
// the screen is re-rendered by the caller from `state()`.
//
// Outcome routing:
//   sighting committed  → home
//   report committed    → list
//   validation error    → stay on the form
//   context not found   → list
//   invalid transition  → home (done by the controller)

use std::sync::Arc;

use paw_records::{Animal, AnimalId, RecordStore, Report, Sighting};

use crate::config::{LocationVocabulary, PawConfig};
use crate::error::PawError;
use crate::events::EventDispatcher;
use crate::navigation::{NavigationController, NavigationState, View};
use crate::registry::{AnimalRegistry, SelectionList};
use crate::report_intake::ReportIntake;
use crate::sighting_intake::SightingIntake;
use crate::timeline::{Timeline, TimelineQuery};

/// Everything the sighting form needs to render.
#[derive(Debug, Clone)]
pub struct IntakeForm {
    pub animals: SelectionList,
    /// Pre-selected entry: the animal in context, else the first one.
    pub default_index: usize,
    pub locations: Vec<String>,
}

/// A detail page: the profile and its timeline.
#[derive(Debug, Clone)]
pub struct AnimalPage {
    pub animal: Animal,
    pub timeline: Timeline,
}

pub struct Session {
    nav: NavigationController,
    registry: AnimalRegistry,
    sightings: SightingIntake,
    reports: ReportIntake,
    timeline: TimelineQuery,
}

impl Session {
    /// A session with default locations and no event sinks.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_parts(
            store,
            LocationVocabulary::default(),
            Arc::new(EventDispatcher::new()),
        )
    }

    pub fn from_config(
        store: Arc<dyn RecordStore>,
        config: &PawConfig,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self::with_parts(store, config.locations.clone(), events)
    }

    fn with_parts(
        store: Arc<dyn RecordStore>,
        locations: LocationVocabulary,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            nav: NavigationController::new(),
            registry: AnimalRegistry::new(Arc::clone(&store)).with_events(Arc::clone(&events)),
            sightings: SightingIntake::new(Arc::clone(&store))
                .with_locations(locations)
                .with_events(Arc::clone(&events)),
            reports: ReportIntake::new(Arc::clone(&store)).with_events(events),
            timeline: TimelineQuery::new(store),
        }
    }

    pub fn state(&self) -> NavigationState {
        self.nav.state()
    }

    pub fn registry(&self) -> &AnimalRegistry {
        &self.registry
    }

    pub fn go_home(&mut self) -> NavigationState {
        self.nav.go_home()
    }

    pub fn open_faq(&mut self) -> Result<NavigationState, PawError> {
        self.nav.open_faq()
    }

    /// Show the animal list.
    pub fn open_list(&mut self) -> Result<Vec<Animal>, PawError> {
        self.nav.open_list()?;
        self.registry.list_animals()
    }

    /// Show one animal. Falls back to the list if it does not exist.
    pub fn open_detail(&mut self, animal: AnimalId) -> Result<AnimalPage, PawError> {
        self.nav.open_detail(animal)?;
        self.current_page()
    }

    /// Leave the report form without filing.
    pub fn back_to_detail(&mut self) -> Result<AnimalPage, PawError> {
        self.nav.back_to_detail()?;
        self.current_page()
    }

    /// Open the sighting form, pre-selecting the animal in context.
    pub fn open_submit(&mut self) -> Result<IntakeForm, PawError> {
        let state = self.nav.open_submit()?;
        let animals = self.registry.selection_options()?;
        Ok(IntakeForm {
            default_index: animals.default_index(state.context()),
            animals,
            locations: self
                .sightings
                .locations()
                .options()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }

    /// Submit the sighting form. On success the session returns home.
    pub fn submit_sighting(
        &mut self,
        choice: &str,
        location: &str,
        note: &str,
        photo_ref: Option<&str>,
    ) -> Result<Sighting, PawError> {
        self.require_view(View::Submit)?;
        let selection = self.registry.resolve_selection(choice)?;
        let sighting = self.sightings.submit(selection, location, note, photo_ref)?;
        self.nav.go_home();
        Ok(sighting)
    }

    pub fn cancel_submit(&mut self) -> Result<NavigationState, PawError> {
        self.require_view(View::Submit)?;
        Ok(self.nav.go_home())
    }

    /// Open the report form for the animal on the detail page.
    pub fn open_report(&mut self) -> Result<Animal, PawError> {
        let state = self.nav.open_report()?;
        self.context_animal(state)
    }

    /// File a report about the animal in context. On success the session
    /// moves to the list.
    pub fn submit_report(&mut self, category: &str, detail: &str) -> Result<Report, PawError> {
        let state = self.require_view(View::Report)?;
        let animal = self.context_animal(state)?;
        let report = self.reports.submit(category, detail, Some(animal.id))?;
        self.nav.open_list()?;
        Ok(report)
    }

    fn current_page(&mut self) -> Result<AnimalPage, PawError> {
        let animal = self.context_animal(self.nav.state())?;
        let timeline = self.timeline.get_timeline(animal.id)?;
        Ok(AnimalPage { animal, timeline })
    }

    /// Resolve the context animal; an unknown one sends the user to the list.
    fn context_animal(&mut self, state: NavigationState) -> Result<Animal, PawError> {
        let Some(id) = state.context() else {
            return Err(self.reject(state, state.view()));
        };

        match self.registry.get_animal(id) {
            Ok(animal) => Ok(animal),
            Err(e) if e.is_not_found() => {
                self.nav.fall_back_to_list();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    fn require_view(&mut self, view: View) -> Result<NavigationState, PawError> {
        let state = self.nav.state();
        if state.view() == view {
            Ok(state)
        } else {
            Err(self.reject(state, view))
        }
    }

    /// A command issued from the wrong screen: a caller bug.
    fn reject(&mut self, state: NavigationState, view: View) -> PawError {
        tracing::warn!(from = %state, command = %view, "command not valid here, resetting to home");
        self.nav.go_home();
        PawError::InvalidTransition {
            from: state.to_string(),
            to: view.to_string(),
        }
    }
}
