//! Save/restore across reloads

use crate::common::harness::PlaygroundHarness;
use playground::app::{SaveIndicator, SAVE_TOAST};
use playground::config::Config;
use playground::model::StoreError;
use playground::services::examples::ExampleSet;
use playground::services::persistence::{MemoryStorage, TABS_KEY};

#[test]
fn test_save_then_reload_round_trips_mapping() {
    let mut harness = PlaygroundHarness::new();
    harness.session.edit("Model.py", "import stormpy\n").unwrap();
    harness.session.add_tab_named("Model.prism").unwrap();
    harness.session.add_tab_named("empty.py").unwrap();
    harness.session.edit("Model.prism", "dtmc\n").unwrap();
    harness.session.save().unwrap();

    let reloaded = PlaygroundHarness::with_storage(Config::default(), harness.storage.clone());
    assert_eq!(
        reloaded.session.store().entries(),
        vec![
            ("Model.py".to_string(), "import stormpy\n".to_string()),
            ("Model.prism".to_string(), "dtmc\n".to_string()),
            ("empty.py".to_string(), String::new()),
        ]
    );
    assert_eq!(reloaded.session.save_indicator(), SaveIndicator::Saved);
}

#[test]
fn test_explicit_and_auto_save_write_the_same_mapping() {
    let mut harness = PlaygroundHarness::new();
    harness.session.edit("Model.py", "a = 1").unwrap();
    let after_auto = harness.storage.get(TABS_KEY);

    harness.session.save().unwrap();
    assert_eq!(harness.storage.get(TABS_KEY), after_auto);
    assert_eq!(harness.session.take_toast().as_deref(), Some(SAVE_TOAST));

    // Later edits win regardless of which path wrote them
    harness.session.edit("Model.py", "a = 2").unwrap();
    let reloaded = PlaygroundHarness::with_storage(Config::default(), harness.storage.clone());
    assert_eq!(reloaded.session.active_document().content(), "a = 2");
}

#[test]
fn test_closed_tab_is_gone_after_reload() {
    let mut harness = PlaygroundHarness::new();
    harness.session.add_tab_named("temp.py").unwrap();
    harness.session.close_tab("temp.py").unwrap();

    let reloaded = PlaygroundHarness::with_storage(Config::default(), harness.storage.clone());
    assert_eq!(reloaded.session.store().names(), vec!["Model.py"]);
}

#[test]
fn test_load_example_replaces_session() {
    let mut harness = PlaygroundHarness::new();
    harness.session.edit("Model.py", "old").unwrap();
    harness.take_requests();

    let example = ExampleSet::new(
        "pgc",
        vec![
            ("pgc.py".to_string(), "import stormpy\n".to_string()),
            ("pgc.prism".to_string(), "pomdp\n".to_string()),
        ],
    );
    harness.session.load_example(&example).unwrap();

    assert_eq!(harness.session.store().names(), vec!["pgc.py", "pgc.prism"]);
    assert_eq!(harness.session.active_document().name(), "pgc.py");
    assert_eq!(harness.session.save_indicator(), SaveIndicator::Unsaved);

    // The newly active document is linted right away
    let requests = harness.take_lint_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, "pgc.py");

    let reloaded = PlaygroundHarness::with_storage(Config::default(), harness.storage.clone());
    assert_eq!(reloaded.session.store().names(), vec!["pgc.py", "pgc.prism"]);
}

#[test]
fn test_load_example_discards_in_flight_lint() {
    let mut harness = PlaygroundHarness::new();
    harness.session.edit("Model.py", "import os").unwrap();
    harness.wait_debounce();
    let stale = harness.take_lint_requests().remove(0);

    harness
        .session
        .load_example(&ExampleSet::new(
            "one",
            vec![("Model.py".to_string(), "x".to_string())],
        ))
        .unwrap();
    harness.deliver_lint(&stale, "/f.py:1:1: F401 unused");
    assert!(harness.shown_codes().is_empty());
}

#[test]
fn test_empty_example_is_rejected() {
    let mut harness = PlaygroundHarness::new();
    assert_eq!(
        harness.session.load_example(&ExampleSet::new("none", Vec::new())),
        Err(StoreError::EmptySet)
    );
    assert_eq!(harness.session.store().names(), vec!["Model.py"]);
}

#[test]
fn test_restore_from_custom_default_document() {
    let mut config = Config::default();
    config.session.default_document = "Model.prism".to_string();
    let harness = PlaygroundHarness::with_storage(config, MemoryStorage::new());
    assert_eq!(harness.session.store().names(), vec!["Model.prism"]);
}
