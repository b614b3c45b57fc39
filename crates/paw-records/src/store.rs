// store.rs — RecordStore trait: the persistence seam.
//
// The domain layer only ever appends and reads. There are deliberately no
// update or delete operations.

use crate::error::StoreError;
use crate::model::{Animal, AnimalId, AnimalRef, NewAnimal, Report, Sighting};

/// Durable storage for animals, sightings and reports.
///
/// Implementations must accept concurrent appends from independent sessions
/// without losing entries, which is why the trait requires `Send + Sync` and
/// every method takes `&self`.
pub trait RecordStore: Send + Sync {
    /// Register an animal. The store allocates its id atomically with the write.
    fn create_animal(&self, animal: NewAnimal) -> Result<Animal, StoreError>;

    /// Append a sighting that already carries its id and timestamp.
    fn create_sighting(&self, sighting: &Sighting) -> Result<(), StoreError>;

    /// Append a report that already carries its id and timestamp.
    fn create_report(&self, report: &Report) -> Result<(), StoreError>;

    fn get_animal(&self, id: AnimalId) -> Result<Option<Animal>, StoreError>;

    /// All animals in insertion order.
    fn list_animals(&self) -> Result<Vec<Animal>, StoreError>;

    /// Sightings referencing `animal`, in append order.
    fn list_sightings(&self, animal: &AnimalRef) -> Result<Vec<Sighting>, StoreError>;

    /// Sightings that propose a new profile, in append order.
    fn list_pending_sightings(&self) -> Result<Vec<Sighting>, StoreError>;

    /// All reports in append order.
    fn list_reports(&self) -> Result<Vec<Report>, StoreError>;
}
