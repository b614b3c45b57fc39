// store_concurrency_test.rs — Concurrent appends from independent sessions.
//
// Both stores are shared behind an Arc and hammered from several threads.
// Every append must land exactly once and animal ids must stay unique.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use paw_records::{
    AnimalRef, JsonlRecordStore, MemoryRecordStore, NewAnimal, RecordStore, Sighting,
};
use tempfile::tempdir;

const THREADS: usize = 8;
const PER_THREAD: usize = 25;

fn hammer(store: Arc<dyn RecordStore>) {
    let seed = store.create_animal(NewAnimal::new("大黄")).unwrap();
    let target = AnimalRef::Known(seed.id);

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    store
                        .create_sighting(&Sighting::new(target, "宿舍区", format!("{t}-{i}"), None))
                        .unwrap();
                    store
                        .create_animal(NewAnimal::new(format!("cat-{t}-{i}")))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let sightings = store.list_sightings(&target).unwrap();
    assert_eq!(sightings.len(), THREADS * PER_THREAD);
    let notes: HashSet<_> = sightings.iter().map(|s| s.note.clone()).collect();
    assert_eq!(notes.len(), THREADS * PER_THREAD);

    let animals = store.list_animals().unwrap();
    assert_eq!(animals.len(), THREADS * PER_THREAD + 1);
    let ids: HashSet<_> = animals.iter().map(|a| a.id).collect();
    assert_eq!(ids.len(), animals.len());
}

#[test]
fn memory_store_concurrent_appends_lose_nothing() {
    hammer(Arc::new(MemoryRecordStore::new()));
}

#[test]
fn jsonl_store_concurrent_appends_lose_nothing() {
    let dir = tempdir().unwrap();
    hammer(Arc::new(JsonlRecordStore::open(dir.path()).unwrap()));

    // The on-disk chain is intact after interleaved writers.
    let verified = JsonlRecordStore::verify(dir.path()).unwrap();
    let total: usize = verified.iter().map(|(_, n)| n).sum();
    assert_eq!(total, 1 + 2 * THREADS * PER_THREAD);
}
