//! # paw-core
//!
//! Domain workflow for Paw Planet, an anonymous log of campus stray-animal
//! sightings.
//!
//! Every screen of the presentation layer is a read-only render of what this
//! crate returns. The interesting parts are the navigation state machine that
//! carries a selected animal between screens, and the intake workflow that
//! validates sightings and reports before they are appended to the
//! [`RecordStore`](paw_records::RecordStore).
//!
//! ## Key components
//!
//! - [`NavigationController`] — view state machine (home, list, detail,
//!   submit, faq, report) with an optional carried [`AnimalId`]
//! - [`AnimalRegistry`] — animal listing, lookup and selection resolution
//! - [`SightingIntake`] / [`ReportIntake`] — validate-then-append submissions
//! - [`TimelineQuery`] — sightings for one animal, newest first
//! - [`Session`] — one user's sequential command stream over all of the above
//! - [`EventDispatcher`] — moderation events for curators

pub mod config;
pub mod error;
pub mod events;
pub mod navigation;
pub mod registry;
pub mod report_intake;
pub mod session;
pub mod sighting_intake;
pub mod timeline;

pub use config::{LocationVocabulary, PawConfig, MANUAL_ENTRY_LABEL};
pub use error::{PawError, ValidationError};
pub use events::{EventDispatcher, LogSink, NotificationSink, PawEvent};
pub use navigation::{NavigationController, NavigationState, View};
pub use paw_records::{AnimalId, AnimalRef, ReportCategory, SterilizationStatus};
pub use registry::{
    AnimalRegistry, Selection, SelectionList, SelectionOption, NEW_PROFILE_LABEL,
};
pub use report_intake::ReportIntake;
pub use session::{AnimalPage, IntakeForm, Session};
pub use sighting_intake::{SightingIntake, NOTE_MAX_CHARS};
pub use timeline::{Timeline, TimelineQuery};
