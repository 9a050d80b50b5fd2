//! End-to-end flows through the widget model: record, submit, and the
//! transport-outcome policy, driven purely by events.

use bugreel_core::submission::{PageContext, SubmitOutcome, build_report_body};
use bugreel_core::widget::{StatusTone, WidgetCmd, WidgetEvent, WidgetModel};
use bugreel_core::{LogEntry, LogLevel, NetworkEntry, WidgetConfig};
use pretty_assertions::assert_eq;

fn status_cmds(cmds: &[WidgetCmd]) -> Vec<(String, StatusTone)> {
    cmds.iter()
        .filter_map(|cmd| match cmd {
            WidgetCmd::SetStatus { text, tone } => Some((text.clone(), *tone)),
            _ => None,
        })
        .collect()
}

fn drive_to_submittable(model: &mut WidgetModel) {
    model.update(WidgetEvent::EncoderReady);
    model.update(WidgetEvent::TriggerClicked);
    model.update(WidgetEvent::DescriptionChanged("the page goes blank".to_owned()));
    model.update(WidgetEvent::RecordClicked);
    model.update(WidgetEvent::CaptureAcquired);
    model.update(WidgetEvent::RecordClicked);
    model.update(WidgetEvent::RecordingFinalized { bytes: 512_000 });
}

#[test]
fn empty_description_start_shows_message_and_skips_prompt() {
    let mut model = WidgetModel::new(WidgetConfig::default());
    model.update(WidgetEvent::EncoderReady);
    model.update(WidgetEvent::TriggerClicked);

    let cmds = model.update(WidgetEvent::RecordClicked);
    assert!(!cmds.contains(&WidgetCmd::RequestCapture));
    assert_eq!(
        status_cmds(&cmds),
        vec![(
            "Please provide a description first.".to_owned(),
            StatusTone::Error
        )]
    );
}

#[test]
fn granted_permission_and_stop_enable_submit() {
    let mut model = WidgetModel::new(WidgetConfig::default());
    model.update(WidgetEvent::EncoderReady);
    model.update(WidgetEvent::TriggerClicked);
    model.update(WidgetEvent::DescriptionChanged("the page goes blank".to_owned()));

    let cmds = model.update(WidgetEvent::RecordClicked);
    assert!(cmds.contains(&WidgetCmd::RequestCapture));

    let cmds = model.update(WidgetEvent::CaptureAcquired);
    assert!(cmds.contains(&WidgetCmd::BeginEncoding));
    assert!(cmds.contains(&WidgetCmd::SetRecordingBorder(true)));

    let cmds = model.update(WidgetEvent::RecordClicked);
    assert!(cmds.contains(&WidgetCmd::FinalizeRecording));

    let cmds = model.update(WidgetEvent::RecordingFinalized { bytes: 512_000 });
    assert!(cmds.contains(&WidgetCmd::ReleaseCapture));
    assert!(cmds.contains(&WidgetCmd::SetSubmitEnabled(true)));
    assert!(model.draft().artifact.is_some());
    assert!(model.submit_enabled());
}

#[test]
fn server_failure_with_stock_policy_still_reports_success() {
    let mut model = WidgetModel::new(WidgetConfig::default());
    drive_to_submittable(&mut model);

    let cmds = model.update(WidgetEvent::SubmitClicked);
    assert!(cmds.contains(&WidgetCmd::SubmitReport));

    let cmds = model.update(WidgetEvent::SubmitFinished(SubmitOutcome::Failed {
        reason: "server responded with status 500".to_owned(),
    }));
    assert_eq!(
        status_cmds(&cmds),
        vec![("Report submitted successfully!".to_owned(), StatusTone::Success)]
    );
    // The form stays resubmittable: no close is scheduled.
    assert!(!cmds
        .iter()
        .any(|cmd| matches!(cmd, WidgetCmd::ScheduleClose { .. })));
    assert!(cmds.contains(&WidgetCmd::SetSubmitEnabled(true)));
}

#[test]
fn server_failure_with_strict_policy_surfaces_the_error() {
    let config = WidgetConfig {
        report_optimistic_success: false,
        ..WidgetConfig::default()
    };
    let mut model = WidgetModel::new(config);
    drive_to_submittable(&mut model);
    model.update(WidgetEvent::SubmitClicked);

    let cmds = model.update(WidgetEvent::SubmitFinished(SubmitOutcome::Failed {
        reason: "server responded with status 500".to_owned(),
    }));
    let statuses = status_cmds(&cmds);
    assert_eq!(statuses.len(), 1);
    assert_eq!(statuses[0].1, StatusTone::Error);
    assert!(cmds.contains(&WidgetCmd::SetSubmitEnabled(true)));
}

#[test]
fn delivered_report_closes_and_clears_after_the_delay() {
    let mut model = WidgetModel::new(WidgetConfig::default());
    drive_to_submittable(&mut model);
    model.update(WidgetEvent::SubmitClicked);

    let cmds = model.update(WidgetEvent::SubmitFinished(SubmitOutcome::Delivered));
    assert_eq!(
        status_cmds(&cmds),
        vec![("Report submitted successfully!".to_owned(), StatusTone::Success)]
    );
    assert!(cmds.contains(&WidgetCmd::ScheduleClose { delay_ms: 2_000 }));

    let cmds = model.update(WidgetEvent::CloseDelayElapsed);
    assert!(cmds.contains(&WidgetCmd::SetModalVisible(false)));
    assert!(cmds.contains(&WidgetCmd::ClearForm));
    assert!(!model.modal_open());
    assert_eq!(model.draft().description, "");
    assert!(model.draft().artifact.is_none());
}

#[test]
fn payload_fields_match_the_ingestion_contract() {
    let mut model = WidgetModel::new(WidgetConfig::default());
    drive_to_submittable(&mut model);

    let logs = vec![LogEntry {
        level: LogLevel::Error,
        message: "TypeError: x is undefined".to_owned(),
        timestamp: "2026-08-06T10:00:00.000Z".to_owned(),
    }];
    let network = vec![NetworkEntry {
        name: "https://api.example/session".to_owned(),
        initiator_type: "xmlhttprequest".to_owned(),
        duration: 87.5,
        timestamp: "2026-08-06T10:00:02.000Z".to_owned(),
    }];
    let context = PageContext {
        url: "https://app.example/checkout".to_owned(),
        user_agent: "Mozilla/5.0".to_owned(),
        screen_resolution: "1920x1080".to_owned(),
    };

    let body = build_report_body(
        model.draft(),
        &logs,
        &network,
        &context,
        "2026-08-06T10:05:00.000Z",
    )
    .unwrap();

    assert_eq!(body.description, "the page goes blank");
    assert_eq!(body.email, None);

    let logs_value: serde_json::Value = serde_json::from_str(&body.console_logs_json).unwrap();
    assert_eq!(logs_value[0]["level"], "error");

    let metadata: serde_json::Value = serde_json::from_str(&body.metadata_json).unwrap();
    assert_eq!(metadata["url"], "https://app.example/checkout");
    assert_eq!(
        metadata["networkRequests"][0]["name"],
        "https://api.example/session"
    );
    assert_eq!(metadata["networkRequests"][0]["type"], "xmlhttprequest");
}
