// timeline.rs — Sightings of one animal, newest first.

use std::sync::Arc;

use paw_records::{AnimalId, AnimalRef, RecordStore, Sighting};

use crate::error::PawError;
use crate::registry::AnimalRegistry;

/// A finite, restartable sequence of sightings for one animal.
///
/// Ordered by timestamp descending. Sightings with equal timestamps keep
/// reverse append order, so the latest submission is always first.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    sightings: Vec<Sighting>,
}

impl Timeline {
    fn new(mut sightings: Vec<Sighting>) -> Self {
        sightings.reverse();
        // Stable sort keeps the reversed append order among equal timestamps.
        sightings.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Self { sightings }
    }

    /// Iterate from the most recent sighting. Can be called any number of times.
    pub fn iter(&self) -> std::slice::Iter<'_, Sighting> {
        self.sightings.iter()
    }

    pub fn latest(&self) -> Option<&Sighting> {
        self.sightings.first()
    }

    pub fn len(&self) -> usize {
        self.sightings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a Sighting;
    type IntoIter = std::slice::Iter<'a, Sighting>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct TimelineQuery {
    store: Arc<dyn RecordStore>,
    registry: AnimalRegistry,
}

impl TimelineQuery {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            registry: AnimalRegistry::new(Arc::clone(&store)),
            store,
        }
    }

    /// The animal's sightings, newest first. Empty, not an error, when it
    /// has never been seen; `AnimalNotFound` when the animal is unknown.
    pub fn get_timeline(&self, animal_id: AnimalId) -> Result<Timeline, PawError> {
        self.registry.get_animal(animal_id)?;
        let sightings = self.store.list_sightings(&AnimalRef::Known(animal_id))?;
        tracing::debug!(animal_id = %animal_id, count = sightings.len(), "loaded timeline");
        Ok(Timeline::new(sightings))
    }

    /// New-profile proposals awaiting curation, newest first.
    pub fn pending_sightings(&self) -> Result<Vec<Sighting>, PawError> {
        let mut pending = self.store.list_pending_sightings()?;
        pending.reverse();
        pending.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use paw_records::{MemoryRecordStore, NewAnimal, PendingProfileId};

    fn sighting_at(id: AnimalId, minutes_ago: i64, note: &str) -> Sighting {
        let mut s = Sighting::new(AnimalRef::Known(id), "宿舍区", note, None);
        s.timestamp = Utc::now() - Duration::minutes(minutes_ago);
        s
    }

    fn setup() -> (Arc<MemoryRecordStore>, TimelineQuery, AnimalId) {
        let store = Arc::new(MemoryRecordStore::new());
        let animal = store.create_animal(NewAnimal::new("大黄")).unwrap();
        let query = TimelineQuery::new(store.clone());
        (store, query, animal.id)
    }

    #[test]
    fn timeline_is_newest_first() {
        let (store, query, id) = setup();
        // Appended out of chronological order on purpose.
        for (minutes_ago, note) in [(30, "b"), (90, "a"), (5, "c")] {
            store
                .create_sighting(&sighting_at(id, minutes_ago, note))
                .unwrap();
        }

        let timeline = query.get_timeline(id).unwrap();
        let notes: Vec<_> = timeline.iter().map(|s| s.note.as_str()).collect();
        assert_eq!(notes, vec!["c", "b", "a"]);
        assert_eq!(timeline.latest().unwrap().note, "c");

        let stamps: Vec<_> = timeline.iter().map(|s| s.timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn equal_timestamps_show_latest_append_first() {
        let (store, query, id) = setup();
        let first = sighting_at(id, 10, "first");
        let mut second = sighting_at(id, 10, "second");
        second.timestamp = first.timestamp;
        store.create_sighting(&first).unwrap();
        store.create_sighting(&second).unwrap();

        let timeline = query.get_timeline(id).unwrap();
        assert_eq!(timeline.latest().unwrap().note, "second");
    }

    #[test]
    fn timeline_is_restartable() {
        let (store, query, id) = setup();
        store.create_sighting(&sighting_at(id, 1, "x")).unwrap();
        store.create_sighting(&sighting_at(id, 2, "y")).unwrap();

        let timeline = query.get_timeline(id).unwrap();
        let once: Vec<_> = timeline.iter().collect();
        let twice: Vec<_> = (&timeline).into_iter().collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn unseen_animal_has_empty_timeline() {
        let (_, query, id) = setup();
        let timeline = query.get_timeline(id).unwrap();
        assert!(timeline.is_empty());
        assert!(timeline.latest().is_none());
    }

    #[test]
    fn other_animals_are_filtered_out() {
        let (store, query, id) = setup();
        let other = store.create_animal(NewAnimal::new("点点")).unwrap();
        store.create_sighting(&sighting_at(other.id, 1, "")).unwrap();
        store
            .create_sighting(&Sighting::new(
                AnimalRef::Pending(PendingProfileId::new()),
                "宿舍区",
                "",
                Some("p.jpg".into()),
            ))
            .unwrap();

        assert!(query.get_timeline(id).unwrap().is_empty());
        assert_eq!(query.get_timeline(other.id).unwrap().len(), 1);
        assert_eq!(query.pending_sightings().unwrap().len(), 1);
    }

    #[test]
    fn unknown_animal_is_not_found() {
        let (_, query, _) = setup();
        assert!(matches!(
            query.get_timeline(AnimalId::new(50)),
            Err(PawError::AnimalNotFound(_))
        ));
    }
}
