//! # paw-records
//!
//! Append-only record store for Paw Planet.
//!
//! Three kinds of durable entities live here: [`Animal`] profiles, anonymous
//! [`Sighting`]s and moderation [`Report`]s. Nothing is ever updated or
//! deleted once written. The [`RecordStore`] trait is the only seam the
//! domain layer (`paw-core`) depends on.
//!
//! ## Implementations
//!
//! - [`MemoryRecordStore`] — process-local tables, used by tests and demos
//! - [`JsonlRecordStore`] — one hash-chained JSONL file per entity kind
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use paw_records::{JsonlRecordStore, NewAnimal, RecordStore};
//!
//! let store = JsonlRecordStore::open("/tmp/paw").unwrap();
//! let animal = store.create_animal(NewAnimal::new("大黄")).unwrap();
//! assert_eq!(store.get_animal(animal.id).unwrap().unwrap().name, "大黄");
//! ```

pub mod error;
pub mod hasher;
pub mod jsonl;
pub mod memory;
pub mod model;
pub mod store;

pub use error::StoreError;
pub use jsonl::{ChainedLog, JsonlRecordStore};
pub use memory::MemoryRecordStore;
pub use model::{
    Animal, AnimalId, AnimalRef, NewAnimal, PendingProfileId, Report, ReportCategory, Sighting,
    SterilizationStatus, UnknownVariant,
};
pub use store::RecordStore;
