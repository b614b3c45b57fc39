// sighting_flow_test.rs — End-to-end flow over a file-backed store.
//
//   1. Curator registers 大黄 and 点点
//   2. A user browses home → list → detail(大黄) → submit and records a sighting
//   3. Another user proposes a new face with a photo
//   4. A third user flags 点点 as not sterilized
//   5. The store is reopened: records, order and hash chains all survive
//   6. The moderation event log lists every committed intake

use std::fs;
use std::sync::Arc;

use paw_core::{
    AnimalId, AnimalRef, EventDispatcher, LogSink, NavigationState, PawConfig, PawError,
    ReportCategory, Session, TimelineQuery, ValidationError, View, NEW_PROFILE_LABEL,
    NOTE_MAX_CHARS,
};
use paw_records::{JsonlRecordStore, NewAnimal, RecordStore, SterilizationStatus};
use tempfile::TempDir;

fn open_session(config: &PawConfig) -> (Arc<JsonlRecordStore>, Session) {
    let store = Arc::new(JsonlRecordStore::open(&config.data_dir).unwrap());
    let events = Arc::new(
        EventDispatcher::new().with_sink(Box::new(LogSink::new(&config.events_log))),
    );
    let session = Session::from_config(store.clone(), config, events);
    (store, session)
}

#[test]
fn campus_sighting_flow_survives_reopen() {
    let project = TempDir::new().unwrap();
    let config = PawConfig::for_project(project.path());

    {
        let (_store, mut session) = open_session(&config);

        // 1. Curator registration.
        let dahuang = session
            .registry()
            .register_animal(
                NewAnimal::new("大黄")
                    .with_species("橘猫")
                    .with_traits("亲人、贪吃")
                    .with_status(SterilizationStatus::Sterilized),
            )
            .unwrap();
        session
            .registry()
            .register_animal(NewAnimal::new("点点").with_species("三花"))
            .unwrap();
        assert_eq!(dahuang.id, AnimalId::new(1));

        // 2. Browse to 大黄 and record a sighting.
        let animals = session.open_list().unwrap();
        assert_eq!(animals.len(), 2);
        session.open_detail(dahuang.id).unwrap();
        let form = session.open_submit().unwrap();
        assert_eq!(form.default_index, 0);
        assert!(form.locations.iter().any(|l| l == "图书馆草坪"));

        session
            .submit_sighting("大黄", "图书馆草坪", "晒太阳", None)
            .unwrap();
        assert_eq!(session.state(), NavigationState::home());

        // 3. A new face, with and without a photo.
        session.open_submit().unwrap();
        let err = session
            .submit_sighting(NEW_PROFILE_LABEL, "宿舍区", "", None)
            .unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::MissingPhoto));
        session
            .submit_sighting(
                NEW_PROFILE_LABEL,
                "宿舍区",
                "黑白花",
                Some("media/new-1.jpg"),
            )
            .unwrap();

        // 4. Flag 点点.
        session.open_list().unwrap();
        session.open_detail(AnimalId::new(2)).unwrap();
        session.open_report().unwrap();
        let report = session.submit_report("not_sterilized", "").unwrap();
        assert_eq!(report.category, ReportCategory::NotSterilized);
        assert_eq!(session.state().view(), View::List);
    }

    // 5. Reopen.
    let (store, mut session) = open_session(&config);
    session.open_list().unwrap();
    let page = session.open_detail(AnimalId::new(1)).unwrap();
    assert_eq!(page.animal.traits, "亲人、贪吃");
    assert_eq!(page.timeline.len(), 1);
    assert_eq!(page.timeline.latest().unwrap().note, "晒太阳");

    let pending = store.list_pending_sightings().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].photo_ref.as_deref(), Some("media/new-1.jpg"));
    assert_eq!(store.list_animals().unwrap().len(), 2);
    assert_eq!(store.list_reports().unwrap().len(), 1);

    let verified = JsonlRecordStore::verify(&config.data_dir).unwrap();
    assert_eq!(verified.len(), 3);

    // 6. Moderation events, in commit order.
    let events = fs::read_to_string(&config.events_log).unwrap();
    let kinds: Vec<String> = events
        .lines()
        .map(|line| {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            value["event_type"].as_str().unwrap().to_string()
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "animal_registered",
            "animal_registered",
            "sighting_recorded",
            "new_profile_proposed",
            "report_filed",
        ]
    );
}

#[test]
fn rejected_note_is_never_persisted() {
    let project = TempDir::new().unwrap();
    let config = PawConfig::for_project(project.path());
    let (store, mut session) = open_session(&config);
    let animal = session
        .registry()
        .register_animal(NewAnimal::new("大黄"))
        .unwrap();

    session.open_submit().unwrap();
    let long = "喵".repeat(NOTE_MAX_CHARS + 1);
    let err = session
        .submit_sighting("大黄", "操场看台", &long, None)
        .unwrap_err();
    assert!(matches!(
        err,
        PawError::Validation(ValidationError::NoteTooLong { .. })
    ));

    assert!(store
        .list_sightings(&AnimalRef::Known(animal.id))
        .unwrap()
        .is_empty());
    let on_disk =
        fs::read_to_string(config.data_dir.join("sightings.jsonl")).unwrap_or_default();
    assert!(on_disk.is_empty());

    let timeline = TimelineQuery::new(store).get_timeline(animal.id).unwrap();
    assert!(timeline.iter().all(|s| s.note.chars().count() <= NOTE_MAX_CHARS));
}

#[test]
fn detail_context_never_leaks_between_animals() {
    let project = TempDir::new().unwrap();
    let config = PawConfig::for_project(project.path());
    let (_store, mut session) = open_session(&config);
    let a = session.registry().register_animal(NewAnimal::new("A")).unwrap();
    let b = session.registry().register_animal(NewAnimal::new("B")).unwrap();

    session.open_list().unwrap();
    session.open_detail(a.id).unwrap();
    session.open_list().unwrap();
    let page = session.open_detail(b.id).unwrap();

    assert_eq!(page.animal.id, b.id);
    assert_eq!(session.state().view(), View::Detail);
    assert_eq!(session.state().context(), Some(b.id));

    // The form opened from B's page pre-selects B, not A.
    let form = session.open_submit().unwrap();
    assert_eq!(form.default_index, 1);
}
