// memory.rs — In-process RecordStore.
//
// `Tables` is also the read cache behind JsonlRecordStore: both stores keep
// entities in append order and answer every query from these vectors.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use crate::error::StoreError;
use crate::model::{Animal, AnimalId, AnimalRef, NewAnimal, Report, Sighting};
use crate::store::RecordStore;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) animals: Vec<Animal>,
    pub(crate) sightings: Vec<Sighting>,
    pub(crate) reports: Vec<Report>,
}

impl Tables {
    /// Ids start at 1 and follow insertion order.
    pub(crate) fn next_animal_id(&self) -> AnimalId {
        let max = self.animals.iter().map(|a| a.id.get()).max().unwrap_or(0);
        AnimalId::new(max + 1)
    }

    pub(crate) fn animal(&self, id: AnimalId) -> Option<Animal> {
        self.animals.iter().find(|a| a.id == id).cloned()
    }

    pub(crate) fn sightings_for(&self, animal: &AnimalRef) -> Vec<Sighting> {
        self.sightings
            .iter()
            .filter(|s| &s.animal == animal)
            .cloned()
            .collect()
    }

    pub(crate) fn pending_sightings(&self) -> Vec<Sighting> {
        self.sightings
            .iter()
            .filter(|s| s.animal.is_pending())
            .cloned()
            .collect()
    }
}

/// A RecordStore that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: Mutex<Tables>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl RecordStore for MemoryRecordStore {
    fn create_animal(&self, animal: NewAnimal) -> Result<Animal, StoreError> {
        // Allocate the id and insert under one lock.
        let mut tables = self.tables()?;
        let animal = animal.into_animal(tables.next_animal_id(), Utc::now());
        tables.animals.push(animal.clone());
        Ok(animal)
    }

    fn create_sighting(&self, sighting: &Sighting) -> Result<(), StoreError> {
        self.tables()?.sightings.push(sighting.clone());
        Ok(())
    }

    fn create_report(&self, report: &Report) -> Result<(), StoreError> {
        self.tables()?.reports.push(report.clone());
        Ok(())
    }

    fn get_animal(&self, id: AnimalId) -> Result<Option<Animal>, StoreError> {
        Ok(self.tables()?.animal(id))
    }

    fn list_animals(&self) -> Result<Vec<Animal>, StoreError> {
        Ok(self.tables()?.animals.clone())
    }

    fn list_sightings(&self, animal: &AnimalRef) -> Result<Vec<Sighting>, StoreError> {
        Ok(self.tables()?.sightings_for(animal))
    }

    fn list_pending_sightings(&self) -> Result<Vec<Sighting>, StoreError> {
        Ok(self.tables()?.pending_sightings())
    }

    fn list_reports(&self) -> Result<Vec<Report>, StoreError> {
        Ok(self.tables()?.reports.clone())
    }
}
