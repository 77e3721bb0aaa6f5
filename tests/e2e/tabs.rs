//! Tab lifecycle through the session controller

use crate::common::harness::PlaygroundHarness;
use playground::model::{LanguageMode, StoreError};

#[test]
fn test_session_always_keeps_one_document() {
    let mut harness = PlaygroundHarness::new();
    let session = &mut harness.session;

    assert_eq!(
        session.close_tab("Model.py"),
        Err(StoreError::LastDocument("Model.py".to_string()))
    );
    assert_eq!(session.store().names(), vec!["Model.py"]);
    assert_eq!(session.active_document().name(), "Model.py");
}

#[test]
fn test_closing_active_tab_activates_previous() {
    let mut harness = PlaygroundHarness::new();
    let session = &mut harness.session;
    session.add_tab_named("a.py").unwrap();
    session.add_tab_named("b.py").unwrap();
    session.switch_tab("a.py").unwrap();

    session.close_tab("a.py").unwrap();
    assert_eq!(session.active_document().name(), "Model.py");

    session.switch_tab("Model.py").unwrap();
    session.close_tab("Model.py").unwrap();
    assert_eq!(session.active_document().name(), "b.py");
    assert_eq!(session.store().len(), 1);
}

#[test]
fn test_closing_inactive_tab_keeps_active() {
    let mut harness = PlaygroundHarness::new();
    let session = &mut harness.session;
    session.add_tab_named("a.py").unwrap();
    session.add_tab_named("b.py").unwrap();

    session.close_tab("a.py").unwrap();
    assert_eq!(session.active_document().name(), "b.py");
    assert_eq!(session.store().names(), vec!["Model.py", "b.py"]);
}

#[test]
fn test_structural_errors_are_reported() {
    let mut harness = PlaygroundHarness::new();
    let session = &mut harness.session;
    session.add_tab_named("Model.prism").unwrap();

    assert_eq!(
        session.rename_tab("Model.py", "Model.prism"),
        Err(StoreError::NameConflict("Model.prism".to_string()))
    );
    assert_eq!(
        session.rename_tab("missing.py", "x.py"),
        Err(StoreError::NotFound("missing.py".to_string()))
    );
    assert_eq!(
        session.switch_tab("missing.py"),
        Err(StoreError::NotFound("missing.py".to_string()))
    );
    assert_eq!(
        session.edit("missing.py", "x"),
        Err(StoreError::NotFound("missing.py".to_string()))
    );
    assert!(matches!(
        session.add_tab_named("dir/file.py"),
        Err(StoreError::InvalidName(_))
    ));
    assert_eq!(session.store().names(), vec!["Model.py", "Model.prism"]);
}

#[test]
fn test_language_mode_follows_name() {
    let mut harness = PlaygroundHarness::new();
    let session = &mut harness.session;
    session.add_tab_named("Model.prism").unwrap();
    let name = session.add_tab().unwrap();

    assert_eq!(
        session.document("Model.py").unwrap().language_mode(),
        LanguageMode::Python
    );
    assert_eq!(
        session.document("Model.prism").unwrap().language_mode(),
        LanguageMode::Prism
    );
    assert_eq!(
        session.document(&name).unwrap().language_mode(),
        LanguageMode::PlainText
    );
    assert!(!session.document("Model.prism").unwrap().is_lint_eligible());
}

#[test]
fn test_rename_to_eligible_name_lints_active_document() {
    let mut harness = PlaygroundHarness::new();
    let name = harness.session.add_tab().unwrap();
    harness.session.edit(&name, "print(1)").unwrap();
    harness.wait_debounce();
    assert!(harness.take_lint_requests().is_empty());

    harness.session.rename_tab(&name, "script.py").unwrap();
    let requests = harness.take_lint_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, "script.py");
    assert_eq!(&*requests[0].content, "print(1)");
}

#[test]
fn test_tab_operations_auto_save() {
    let mut harness = PlaygroundHarness::new();
    harness.session.add_tab_named("b.py").unwrap();
    harness.session.edit("b.py", "2").unwrap();
    harness.session.rename_tab("b.py", "c.py").unwrap();

    let reloaded = PlaygroundHarness::with_storage(
        harness.session.config().clone(),
        harness.storage.clone(),
    );
    assert_eq!(reloaded.session.store().names(), vec!["Model.py", "c.py"]);
    assert_eq!(reloaded.session.document("c.py").unwrap().content(), "2");
}
