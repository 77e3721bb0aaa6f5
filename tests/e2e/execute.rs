//! Execute channel and startup status

use crate::common::harness::{error_reply, success_reply, PlaygroundHarness};
use playground::app::RunIndicator;
use playground::services::async_bridge::{AsyncMessage, Request};

#[test]
fn test_execute_renders_output() {
    let mut harness = PlaygroundHarness::new();
    harness.session.edit("Model.py", "print('hi')").unwrap();
    harness.take_requests();

    let generation = harness.session.execute();
    assert_eq!(harness.session.run_indicator(), RunIndicator::Running);

    let requests = harness.take_execute_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].name, "Model.py");
    assert_eq!(&*requests[0].content, "print('hi')");
    assert_eq!(requests[0].generation, generation);

    harness.deliver_execute(generation, success_reply("hi\n", "<pre>hi</pre>"));
    let output = harness.session.output().unwrap();
    assert_eq!(output.output_text, "hi\n");
    assert_eq!(output.output_html, "<pre>hi</pre>");
    assert!(!output.is_error());
    assert_eq!(harness.session.run_indicator(), RunIndicator::Ready);
}

#[test]
fn test_superseded_run_is_dropped_silently() {
    let mut harness = PlaygroundHarness::new();
    let first = harness.session.execute();
    let second = harness.session.execute();
    assert!(second > first);

    harness.deliver_execute(first, success_reply("old\n", ""));
    assert!(harness.session.output().is_none());
    assert_eq!(harness.session.run_indicator(), RunIndicator::Running);

    harness.deliver_execute(second, success_reply("new\n", ""));
    assert_eq!(harness.session.output().unwrap().output_text, "new\n");
    assert_eq!(harness.session.run_indicator(), RunIndicator::Ready);

    // Late delivery of the superseded run changes nothing
    harness.deliver_execute(first, error_reply("boom"));
    assert_eq!(harness.session.output().unwrap().generation, second);
    assert!(!harness.session.output().unwrap().is_error());
}

#[test]
fn test_remote_error_message_is_shown_verbatim() {
    let mut harness = PlaygroundHarness::new();
    let generation = harness.session.execute();
    let message = "Traceback (most recent call last):\n  File \"Model.py\", line 1\nNameError: name 'x' is not defined";
    harness.deliver_execute(generation, error_reply(message));

    let output = harness.session.output().unwrap();
    assert_eq!(output.error.as_deref(), Some(message));
    // Execution errors never turn into lint diagnostics
    assert!(harness.session.displayed_diagnostics().is_empty());
}

#[test]
fn test_transport_failure_unblocks_run_button() {
    let mut harness = PlaygroundHarness::new();
    let generation = harness.session.execute();
    harness.deliver_execute_failure(generation, "connection reset");

    assert_eq!(harness.session.run_indicator(), RunIndicator::Ready);
    let error = harness.session.output().unwrap().error.clone().unwrap();
    assert!(error.contains("connection reset"));
    assert!(harness.session.is_idle());
}

#[test]
fn test_execute_runs_active_document() {
    let mut harness = PlaygroundHarness::new();
    harness.session.add_tab_named("other.py").unwrap();
    harness.session.edit("other.py", "print(2)").unwrap();
    harness.take_requests();

    harness.session.execute();
    let requests = harness.take_execute_requests();
    assert_eq!(requests[0].name, "other.py");
}

#[test]
fn test_startup_status_is_recorded() {
    let mut harness = PlaygroundHarness::new();
    harness.session.startup();
    assert_eq!(harness.take_requests(), vec![Request::Startup]);
    assert!(!harness.session.is_idle());

    harness
        .session
        .handle_async(AsyncMessage::StartupFinished(Ok("Started".to_string())));
    assert_eq!(harness.session.service_status(), Some("Started"));
    assert!(harness.session.is_idle());
}

#[test]
fn test_shutdown_stops_service_and_saves() {
    let mut harness = PlaygroundHarness::new();
    harness.session.edit("Model.py", "x = 1").unwrap();
    harness.take_requests();

    harness.session.shutdown().unwrap();
    assert_eq!(harness.take_requests(), vec![Request::Stop]);
    assert!(harness.session.active_document().is_saved());
}
