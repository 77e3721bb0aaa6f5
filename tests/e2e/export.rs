//! Zip export of the live session

use std::io::{Cursor, Read};

use chrono::NaiveDate;
use zip::ZipArchive;

use crate::common::harness::PlaygroundHarness;

#[test]
fn test_two_document_export() {
    let mut harness = PlaygroundHarness::new();
    harness
        .time
        .set_today(NaiveDate::from_ymd_opt(2025, 11, 4).unwrap());
    harness.session.edit("Model.py", "import stormpy\n").unwrap();
    harness.session.add_tab_named("Model.prism").unwrap();
    harness.session.edit("Model.prism", "").unwrap();

    let (file_name, bytes) = harness.session.export_archive().unwrap();
    assert_eq!(file_name, "playground-04-11-2025.zip");

    let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
    assert_eq!(archive.len(), 2);

    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "playground-04-11-2025/Model.prism",
            "playground-04-11-2025/Model.py"
        ]
    );

    let mut content = String::new();
    archive
        .by_name("playground-04-11-2025/Model.py")
        .unwrap()
        .read_to_string(&mut content)
        .unwrap();
    assert_eq!(content, "import stormpy\n");
}

#[test]
fn test_export_does_not_touch_request_pipeline() {
    let mut harness = PlaygroundHarness::new();
    harness.session.edit("Model.py", "x").unwrap();
    let before = harness.session.lint_state("Model.py").unwrap();
    harness.take_requests();

    harness.session.export_archive().unwrap();
    assert!(harness.take_requests().is_empty());
    assert_eq!(harness.session.lint_state("Model.py").unwrap(), before);
    assert!(harness.session.active_document().is_dirty());
}

#[test]
fn test_export_uses_configured_app_name() {
    let mut config = playground::config::Config::default();
    config.export.app_name = "stormvogel".to_string();
    let harness = PlaygroundHarness::with_config(config);
    harness
        .time
        .set_today(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());

    let (file_name, _) = harness.session.export_archive().unwrap();
    assert_eq!(file_name, "stormvogel-02-01-2024.zip");
}
