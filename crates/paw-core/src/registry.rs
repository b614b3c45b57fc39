// registry.rs — AnimalRegistry: profiles, lookup and selection resolution.
//
// The intake form offers animals by display name. Names are not unique in
// storage, so the selection list disambiguates colliding names with the
// animal id ("大黄 #3"). A list never offers two identical labels.

use std::collections::HashMap;
use std::sync::Arc;

use paw_records::{Animal, AnimalId, NewAnimal, RecordStore};

use crate::error::{PawError, ValidationError};
use crate::events::{EventDispatcher, PawEvent};

/// Label of the trailing "someone new" option in every selection list.
pub const NEW_PROFILE_LABEL: &str = "新面孔（去建档）";

/// What a selection-list choice resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A registered animal.
    Animal(AnimalId),
    /// A new face. Never resolves to an id until a curator registers it.
    NewProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOption {
    pub label: String,
    pub selection: Selection,
}

/// The options of the "who did you see?" picker, in registry order, with
/// the new-profile option last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionList {
    options: Vec<SelectionOption>,
}

impl SelectionList {
    pub fn from_animals(animals: &[Animal]) -> Self {
        let mut labels: Vec<String> = animals.iter().map(|a| a.name.clone()).collect();
        let mut suffixed = vec![false; animals.len()];

        // Each pass suffixes at least one label, so this terminates.
        loop {
            let clashing: Vec<usize> = {
                let mut counts: HashMap<&str, usize> = HashMap::new();
                // An animal literally named like the new-profile option clashes too.
                counts.insert(NEW_PROFILE_LABEL, 1);
                for label in &labels {
                    *counts.entry(label.as_str()).or_insert(0) += 1;
                }
                labels
                    .iter()
                    .enumerate()
                    .filter(|(i, label)| !suffixed[*i] && counts[label.as_str()] > 1)
                    .map(|(i, _)| i)
                    .collect()
            };

            if clashing.is_empty() {
                break;
            }
            for i in clashing {
                labels[i] = format!("{} #{}", labels[i], animals[i].id);
                suffixed[i] = true;
            }
        }

        // Registry order, then the new-profile option last.
        let mut options: Vec<SelectionOption> = animals
            .iter()
            .zip(labels)
            .map(|(animal, label)| SelectionOption {
                label,
                selection: Selection::Animal(animal.id),
            })
            .collect();
        options.push(SelectionOption {
            label: NEW_PROFILE_LABEL.to_string(),
            selection: Selection::NewProfile,
        });

        Self { options }
    }

    pub fn options(&self) -> &[SelectionOption] {
        &self.options
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(|o| o.label.as_str())
    }

    /// Exact label match.
    pub fn resolve(&self, choice: &str) -> Option<Selection> {
        let choice = choice.trim();
        self.options
            .iter()
            .find(|o| o.label == choice)
            .map(|o| o.selection)
    }

    /// Index to pre-select when the form opens with `context` (0 without).
    pub fn default_index(&self, context: Option<AnimalId>) -> usize {
        context
            .and_then(|id| {
                self.options
                    .iter()
                    .position(|o| o.selection == Selection::Animal(id))
            })
            .unwrap_or(0)
    }
}

/// Read access to animal profiles, plus curator registration.
#[derive(Clone)]
pub struct AnimalRegistry {
    store: Arc<dyn RecordStore>,
    events: Arc<EventDispatcher>,
}

impl AnimalRegistry {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            events: Arc::new(EventDispatcher::new()),
        }
    }

    /// Send `animal_registered` events to `events`.
    pub fn with_events(mut self, events: Arc<EventDispatcher>) -> Self {
        self.events = events;
        self
    }

    /// All animals in registration order. Stable across calls.
    pub fn list_animals(&self) -> Result<Vec<Animal>, PawError> {
        Ok(self.store.list_animals()?)
    }

    pub fn get_animal(&self, id: AnimalId) -> Result<Animal, PawError> {
        self.store
            .get_animal(id)?
            .ok_or(PawError::AnimalNotFound(id))
    }

    pub fn selection_options(&self) -> Result<SelectionList, PawError> {
        Ok(SelectionList::from_animals(&self.list_animals()?))
    }

    /// Resolve a picker choice. Accepts a label from
    /// [`selection_options`](Self::selection_options) or a bare animal id.
    pub fn resolve_selection(&self, choice: &str) -> Result<Selection, PawError> {
        // Labels win, so an animal named "7" is not mistaken for id 7.
        if let Some(selection) = self.selection_options()?.resolve(choice) {
            return Ok(selection);
        }

        // Fall back to a bare id, which must still name a real animal.
        match choice.parse::<AnimalId>() {
            Ok(id) => {
                self.get_animal(id)?;
                Ok(Selection::Animal(id))
            }
            Err(_) => Err(PawError::UnknownSelection(choice.to_string())),
        }
    }

    /// Register a new profile. Curator-only; sighting intake never calls this.
    pub fn register_animal(&self, animal: NewAnimal) -> Result<Animal, PawError> {
        if animal.name.trim().is_empty() {
            return Err(ValidationError::MissingName.into());
        }
        // The store assigns the id; events go out only after the append.
        let animal = self.store.create_animal(animal)?;
        tracing::info!(animal_id = %animal.id, name = %animal.name, "registered animal");
        self.events.dispatch(&PawEvent::animal_registered(&animal));
        Ok(animal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paw_records::MemoryRecordStore;

    fn registry_with(names: &[&str]) -> AnimalRegistry {
        let registry = AnimalRegistry::new(Arc::new(MemoryRecordStore::new()));
        for name in names {
            registry.register_animal(NewAnimal::new(*name)).unwrap();
        }
        registry
    }

    #[test]
    fn listing_is_stable() {
        let registry = registry_with(&["大黄", "点点"]);
        let first = registry.list_animals().unwrap();
        let second = registry.list_animals().unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].name, "大黄");
        assert_eq!(first[1].name, "点点");
    }

    #[test]
    fn get_unknown_animal_is_not_found() {
        let registry = registry_with(&[]);
        let err = registry.get_animal(AnimalId::new(99)).unwrap_err();
        assert!(matches!(err, PawError::AnimalNotFound(id) if id == AnimalId::new(99)));
        assert!(err.is_not_found());
    }

    #[test]
    fn selection_list_ends_with_new_profile() {
        let registry = registry_with(&["大黄", "点点"]);
        let list = registry.selection_options().unwrap();
        let labels: Vec<_> = list.labels().collect();
        assert_eq!(labels, vec!["大黄", "点点", NEW_PROFILE_LABEL]);
    }

    #[test]
    fn duplicate_names_are_disambiguated() {
        let registry = registry_with(&["大黄", "大黄", "点点"]);
        let list = registry.selection_options().unwrap();
        let labels: Vec<_> = list.labels().collect();
        assert_eq!(labels, vec!["大黄 #1", "大黄 #2", "点点", NEW_PROFILE_LABEL]);
        assert_eq!(
            list.resolve("大黄 #2"),
            Some(Selection::Animal(AnimalId::new(2)))
        );
        assert_eq!(list.resolve("大黄"), None);
    }

    #[test]
    fn labels_stay_unique_even_against_suffix_lookalikes() {
        let registry = registry_with(&["a", "a", "a #1", NEW_PROFILE_LABEL]);
        let list = registry.selection_options().unwrap();
        let labels: Vec<_> = list.labels().collect();
        let unique: std::collections::HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn resolve_selection_by_label_id_and_sentinel() {
        let registry = registry_with(&["大黄"]);
        assert_eq!(
            registry.resolve_selection("大黄").unwrap(),
            Selection::Animal(AnimalId::new(1))
        );
        assert_eq!(
            registry.resolve_selection("1").unwrap(),
            Selection::Animal(AnimalId::new(1))
        );
        assert_eq!(
            registry.resolve_selection(NEW_PROFILE_LABEL).unwrap(),
            Selection::NewProfile
        );
        assert!(matches!(
            registry.resolve_selection("小黑"),
            Err(PawError::UnknownSelection(_))
        ));
        assert!(matches!(
            registry.resolve_selection("7"),
            Err(PawError::AnimalNotFound(_))
        ));
    }

    #[test]
    fn default_index_follows_context() {
        let registry = registry_with(&["大黄", "点点"]);
        let list = registry.selection_options().unwrap();
        assert_eq!(list.default_index(None), 0);
        assert_eq!(list.default_index(Some(AnimalId::new(2))), 1);
        assert_eq!(list.default_index(Some(AnimalId::new(42))), 0);
    }

    #[test]
    fn register_requires_a_name() {
        let registry = registry_with(&[]);
        let err = registry.register_animal(NewAnimal::new("  ")).unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::MissingName));
        assert!(registry.list_animals().unwrap().is_empty());
    }
}
