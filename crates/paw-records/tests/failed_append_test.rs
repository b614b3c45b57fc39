// failed_append_test.rs — A write that fails part-way must leave no trace.
//
// The file-size limit is process-wide, so this lives in its own test binary
// with a single test.

#![cfg(unix)]

use std::fs;

use paw_records::jsonl::ANIMALS_FILE;
use paw_records::{AnimalId, JsonlRecordStore, NewAnimal, RecordStore, StoreError};
use tempfile::tempdir;

fn file_size_limit() -> libc::rlimit {
    let mut limit = libc::rlimit {
        rlim_cur: 0,
        rlim_max: 0,
    };
    assert_eq!(unsafe { libc::getrlimit(libc::RLIMIT_FSIZE, &mut limit) }, 0);
    limit
}

fn set_file_size_limit(limit: &libc::rlimit) {
    assert_eq!(unsafe { libc::setrlimit(libc::RLIMIT_FSIZE, limit) }, 0);
}

#[test]
fn failed_append_never_resurfaces() {
    // Exceeding the limit should fail the write, not kill the process.
    unsafe {
        libc::signal(libc::SIGXFSZ, libc::SIG_IGN);
    }

    let dir = tempdir().unwrap();
    let path = dir.path().join(ANIMALS_FILE);
    let store = JsonlRecordStore::open(dir.path()).unwrap();
    store.create_animal(NewAnimal::new("大黄")).unwrap();
    let good_len = fs::metadata(&path).unwrap().len();

    // Room for only a fragment of the next line.
    let original = file_size_limit();
    set_file_size_limit(&libc::rlimit {
        rlim_cur: good_len + 10,
        rlim_max: original.rlim_max,
    });
    let failed = store.create_animal(NewAnimal::new("写不进去"));
    set_file_size_limit(&original);

    assert!(matches!(failed, Err(StoreError::WriteFailed(_))));
    assert_eq!(fs::metadata(&path).unwrap().len(), good_len);
    assert_eq!(store.list_animals().unwrap().len(), 1);

    // The next append reuses the id the failed one would have had.
    let dian = store.create_animal(NewAnimal::new("点点")).unwrap();
    assert_eq!(dian.id, AnimalId::new(2));
    drop(store);

    let reopened = JsonlRecordStore::open(dir.path()).unwrap();
    let animals: Vec<(u64, String)> = reopened
        .list_animals()
        .unwrap()
        .into_iter()
        .map(|a| (a.id.get(), a.name))
        .collect();
    assert_eq!(
        animals,
        vec![(1, "大黄".to_string()), (2, "点点".to_string())]
    );

    let verified = JsonlRecordStore::verify(dir.path()).unwrap();
    let animals_log = verified.iter().find(|(p, _)| p == &path).unwrap();
    assert_eq!(animals_log.1, 2);
}
