#![forbid(unsafe_code)]

//! The widget model: one reducer turning UI and host events into commands.
//!
//! `WidgetModel::update` is the only entry point. The host (the web
//! surface) feeds it a [`WidgetEvent`] and executes every returned
//! [`WidgetCmd`] in order; the model never performs an effect itself. This
//! keeps the whole UI/recording/submission behavior testable on the
//! native target: a scenario is a sequence of events and an assertion over
//! the emitted commands.

use crate::config::WidgetConfig;
use crate::recording::{
    EncoderStatus, RecorderCommand, RecorderEvent, RecorderMachine, RecorderPhase,
};
use crate::submission::{ArtifactMeta, ReportDraft, SubmitOutcome, SubmitRefusal};

/// Tone of the single status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Neutral,
    Success,
    Error,
}

impl StatusTone {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// Status line texts.
pub const MSG_ENCODER_LOADING: &str = "Preparing the recorder...";
pub const MSG_ENCODER_NOT_READY: &str = "Recorder not ready yet.";
pub const MSG_READY: &str = "Ready to record.";
pub const MSG_NEED_DESCRIPTION_FIRST: &str = "Please provide a description first.";
pub const MSG_RECORDING_STARTED: &str = "Recording started. Show us the bug!";
pub const MSG_PERMISSION_DENIED: &str = "Screen recording permission denied.";
pub const MSG_NEED_DESCRIPTION: &str = "Please provide a description.";
pub const MSG_NEED_VIDEO: &str = "Please record a video first.";
pub const MSG_PREPARING: &str = "Preparing your report...";
pub const MSG_SUBMITTED: &str = "Report submitted successfully!";
pub const MSG_SUBMIT_FAILED: &str = "Could not submit the report. Please try again.";

/// Events fed into the model by the host surface.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Floating trigger button clicked.
    TriggerClicked,
    /// Modal close button clicked.
    CloseClicked,
    /// Description textarea changed (every keystroke).
    DescriptionChanged(String),
    /// Email input changed.
    EmailChanged(String),
    /// Record button clicked (start or stop, depending on phase).
    RecordClicked,
    /// Screen-capture stream acquired.
    CaptureAcquired,
    /// Permission denied or stream acquisition failed.
    CaptureFailed,
    /// Encoder finalized; the artifact is `bytes` bytes.
    RecordingFinalized { bytes: u64 },
    /// Submit button clicked.
    SubmitClicked,
    /// Submission settled (either way).
    SubmitFinished(SubmitOutcome),
    /// The post-success close delay elapsed.
    CloseDelayElapsed,
    /// Encoder capability probe succeeded.
    EncoderReady,
    /// Encoder capability probe failed; the control stays disabled.
    EncoderFailed,
}

/// Effects the host surface must execute, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetCmd {
    /// Prompt for a screen-capture stream (with audio).
    RequestCapture,
    /// Attach and start the encoder on the acquired stream.
    BeginEncoding,
    /// Stop the encoder and collect the artifact.
    FinalizeRecording,
    /// Stop all tracks of the captured stream.
    ReleaseCapture,
    /// Build the multipart payload and POST it.
    SubmitReport,
    /// Show or hide the modal overlay.
    SetModalVisible(bool),
    /// Show or hide the full-viewport recording border.
    SetRecordingBorder(bool),
    /// Update the status line.
    SetStatus { text: String, tone: StatusTone },
    /// Enable/disable the submit button.
    SetSubmitEnabled(bool),
    /// Toggle the submit button's busy label.
    SetSubmitBusy(bool),
    /// Update the record button: enabled state and whether it currently
    /// shows the stop affordance.
    SetRecordControl { enabled: bool, recording: bool },
    /// Clear the form inputs and drop the held artifact blob.
    ClearForm,
    /// Arrange for `CloseDelayElapsed` after `delay_ms`.
    ScheduleClose { delay_ms: u32 },
}

fn status(text: &str, tone: StatusTone) -> WidgetCmd {
    WidgetCmd::SetStatus {
        text: text.to_owned(),
        tone,
    }
}

/// The widget's state and reducer.
#[derive(Debug)]
pub struct WidgetModel {
    config: WidgetConfig,
    draft: ReportDraft,
    recorder: RecorderMachine,
    encoder: EncoderStatus,
    modal_open: bool,
    submitting: bool,
}

impl WidgetModel {
    #[must_use]
    pub fn new(config: WidgetConfig) -> Self {
        Self {
            config,
            draft: ReportDraft::default(),
            recorder: RecorderMachine::new(),
            encoder: EncoderStatus::Loading,
            modal_open: false,
            submitting: false,
        }
    }

    /// Commands establishing the initial UI state: record control disabled
    /// until the encoder capability reports ready, submit disabled, and the
    /// not-ready status visible.
    #[must_use]
    pub fn init_cmds(&self) -> Vec<WidgetCmd> {
        vec![
            WidgetCmd::SetRecordControl {
                enabled: false,
                recording: false,
            },
            WidgetCmd::SetSubmitEnabled(false),
            status(MSG_ENCODER_LOADING, StatusTone::Neutral),
        ]
    }

    #[must_use]
    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    #[must_use]
    pub fn draft(&self) -> &ReportDraft {
        &self.draft
    }

    #[must_use]
    pub const fn phase(&self) -> RecorderPhase {
        self.recorder.phase()
    }

    #[must_use]
    pub const fn encoder_status(&self) -> EncoderStatus {
        self.encoder
    }

    #[must_use]
    pub const fn modal_open(&self) -> bool {
        self.modal_open
    }

    /// Submit-enablement invariant: description (trimmed) non-empty AND an
    /// artifact present, and neither a recording session nor a submission
    /// in flight.
    #[must_use]
    pub fn submit_enabled(&self) -> bool {
        self.draft.ready() && !self.submitting && !self.phase().session_in_progress()
    }

    /// Why a submit request would be refused right now, if it would be.
    #[must_use]
    pub fn submit_refusal(&self) -> Option<SubmitRefusal> {
        if self.submitting {
            Some(SubmitRefusal::InFlight)
        } else if self.draft.description.trim().is_empty() {
            Some(SubmitRefusal::MissingDescription)
        } else if self.draft.artifact.is_none() {
            Some(SubmitRefusal::MissingArtifact)
        } else {
            None
        }
    }

    /// Feed one event; returns the commands the host must execute in order.
    pub fn update(&mut self, event: WidgetEvent) -> Vec<WidgetCmd> {
        match event {
            WidgetEvent::TriggerClicked => {
                if self.modal_open {
                    self.close_modal()
                } else {
                    self.modal_open = true;
                    vec![WidgetCmd::SetModalVisible(true)]
                }
            }
            WidgetEvent::CloseClicked => self.close_modal(),
            WidgetEvent::DescriptionChanged(text) => {
                self.draft.description = text;
                vec![WidgetCmd::SetSubmitEnabled(self.submit_enabled())]
            }
            WidgetEvent::EmailChanged(text) => {
                self.draft.email = text;
                Vec::new()
            }
            WidgetEvent::RecordClicked => self.record_clicked(),
            WidgetEvent::CaptureAcquired => self.capture_acquired(),
            WidgetEvent::CaptureFailed => self.capture_failed(),
            WidgetEvent::RecordingFinalized { bytes } => self.recording_finalized(bytes),
            WidgetEvent::SubmitClicked => self.submit_clicked(),
            WidgetEvent::SubmitFinished(outcome) => self.submit_finished(outcome),
            WidgetEvent::CloseDelayElapsed => {
                let mut cmds = vec![WidgetCmd::SetModalVisible(false)];
                self.modal_open = false;
                cmds.extend(self.reset_form());
                cmds
            }
            WidgetEvent::EncoderReady => {
                self.encoder = EncoderStatus::Ready;
                if self.phase().can_start() {
                    vec![
                        WidgetCmd::SetRecordControl {
                            enabled: true,
                            recording: false,
                        },
                        status(MSG_READY, StatusTone::Neutral),
                    ]
                } else {
                    Vec::new()
                }
            }
            WidgetEvent::EncoderFailed => {
                self.encoder = EncoderStatus::Failed;
                // Control stays disabled; the host logs the probe failure.
                Vec::new()
            }
        }
    }

    /// Close the modal. A recording in progress or an in-flight submission
    /// keeps its state; otherwise the form resets.
    fn close_modal(&mut self) -> Vec<WidgetCmd> {
        self.modal_open = false;
        let mut cmds = vec![WidgetCmd::SetModalVisible(false)];
        if !self.phase().session_in_progress() && !self.submitting {
            cmds.extend(self.reset_form());
        }
        cmds
    }

    fn reset_form(&mut self) -> Vec<WidgetCmd> {
        self.draft.clear();
        vec![
            WidgetCmd::ClearForm,
            status("", StatusTone::Neutral),
            WidgetCmd::SetRecordControl {
                enabled: self.encoder.is_ready(),
                recording: false,
            },
            WidgetCmd::SetSubmitEnabled(false),
        ]
    }

    fn record_clicked(&mut self) -> Vec<WidgetCmd> {
        match self.phase() {
            RecorderPhase::Active => {
                let Some(transition) = self.recorder.handle(RecorderEvent::StopRequested) else {
                    return Vec::new();
                };
                transition
                    .commands
                    .into_iter()
                    .map(map_recorder_command)
                    .collect()
            }
            RecorderPhase::Requesting => Vec::new(),
            RecorderPhase::Idle | RecorderPhase::Stopped => {
                // Both preconditions are checked before any permission
                // prompt is issued.
                if !self.encoder.is_ready() {
                    return vec![status(MSG_ENCODER_NOT_READY, StatusTone::Error)];
                }
                if self.draft.description.trim().is_empty() {
                    return vec![status(MSG_NEED_DESCRIPTION_FIRST, StatusTone::Error)];
                }
                let Some(transition) = self.recorder.handle(RecorderEvent::StartRequested) else {
                    return Vec::new();
                };
                let mut cmds = vec![WidgetCmd::SetRecordControl {
                    enabled: false,
                    recording: false,
                }];
                cmds.extend(transition.commands.into_iter().map(map_recorder_command));
                cmds
            }
        }
    }

    fn capture_acquired(&mut self) -> Vec<WidgetCmd> {
        let Some(transition) = self.recorder.handle(RecorderEvent::CaptureAcquired) else {
            return Vec::new();
        };
        let mut cmds: Vec<WidgetCmd> = transition
            .commands
            .into_iter()
            .map(map_recorder_command)
            .collect();
        cmds.push(WidgetCmd::SetRecordingBorder(true));
        cmds.push(WidgetCmd::SetRecordControl {
            enabled: true,
            recording: true,
        });
        cmds.push(status(MSG_RECORDING_STARTED, StatusTone::Neutral));
        cmds.push(WidgetCmd::SetSubmitEnabled(false));
        cmds
    }

    fn capture_failed(&mut self) -> Vec<WidgetCmd> {
        let Some(_transition) = self.recorder.handle(RecorderEvent::CaptureFailed) else {
            return Vec::new();
        };
        vec![
            status(MSG_PERMISSION_DENIED, StatusTone::Error),
            WidgetCmd::SetRecordControl {
                enabled: true,
                recording: false,
            },
        ]
    }

    fn recording_finalized(&mut self, bytes: u64) -> Vec<WidgetCmd> {
        let Some(transition) = self.recorder.handle(RecorderEvent::Finalized { bytes }) else {
            return Vec::new();
        };
        let artifact = ArtifactMeta { bytes };
        self.draft.artifact = Some(artifact);
        let mut cmds: Vec<WidgetCmd> = transition
            .commands
            .into_iter()
            .map(map_recorder_command)
            .collect();
        cmds.push(WidgetCmd::SetRecordingBorder(false));
        // The record control stays disabled until the form resets; a new
        // session would overwrite the artifact.
        cmds.push(WidgetCmd::SetRecordControl {
            enabled: false,
            recording: false,
        });
        cmds.push(status(
            &format!("Recording complete! ({:.2} MB)", artifact.megabytes()),
            StatusTone::Success,
        ));
        cmds.push(WidgetCmd::SetSubmitEnabled(self.submit_enabled()));
        cmds
    }

    fn submit_clicked(&mut self) -> Vec<WidgetCmd> {
        match self.submit_refusal() {
            Some(SubmitRefusal::InFlight) => Vec::new(),
            Some(SubmitRefusal::MissingDescription) => {
                vec![status(MSG_NEED_DESCRIPTION, StatusTone::Error)]
            }
            Some(SubmitRefusal::MissingArtifact) => {
                vec![status(MSG_NEED_VIDEO, StatusTone::Error)]
            }
            None => {
                self.submitting = true;
                vec![
                    WidgetCmd::SetSubmitBusy(true),
                    WidgetCmd::SetSubmitEnabled(false),
                    status(MSG_PREPARING, StatusTone::Neutral),
                    WidgetCmd::SubmitReport,
                ]
            }
        }
    }

    fn submit_finished(&mut self, outcome: SubmitOutcome) -> Vec<WidgetCmd> {
        self.submitting = false;
        match outcome {
            SubmitOutcome::Delivered => vec![
                status(MSG_SUBMITTED, StatusTone::Success),
                WidgetCmd::ScheduleClose {
                    delay_ms: self.config.close_delay_ms,
                },
            ],
            SubmitOutcome::Failed { .. } if self.config.report_optimistic_success => {
                // Stock behavior: the user is told it worked either way,
                // but the form stays resubmittable.
                vec![
                    status(MSG_SUBMITTED, StatusTone::Success),
                    WidgetCmd::SetSubmitBusy(false),
                    WidgetCmd::SetSubmitEnabled(self.submit_enabled()),
                ]
            }
            SubmitOutcome::Failed { .. } => vec![
                status(MSG_SUBMIT_FAILED, StatusTone::Error),
                WidgetCmd::SetSubmitBusy(false),
                WidgetCmd::SetSubmitEnabled(self.submit_enabled()),
            ],
        }
    }
}

const fn map_recorder_command(command: RecorderCommand) -> WidgetCmd {
    match command {
        RecorderCommand::RequestCapture => WidgetCmd::RequestCapture,
        RecorderCommand::BeginEncoding => WidgetCmd::BeginEncoding,
        RecorderCommand::FinalizeEncoder => WidgetCmd::FinalizeRecording,
        RecorderCommand::ReleaseTracks => WidgetCmd::ReleaseCapture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ready_model() -> WidgetModel {
        let mut model = WidgetModel::new(WidgetConfig::default());
        model.update(WidgetEvent::EncoderReady);
        model
    }

    fn has_status(cmds: &[WidgetCmd], expected: &str, tone: StatusTone) -> bool {
        cmds.iter().any(|cmd| {
            matches!(cmd, WidgetCmd::SetStatus { text, tone: t }
                if text == expected && *t == tone)
        })
    }

    #[test]
    fn trigger_toggles_modal() {
        let mut model = ready_model();
        let cmds = model.update(WidgetEvent::TriggerClicked);
        assert!(cmds.contains(&WidgetCmd::SetModalVisible(true)));
        assert!(model.modal_open());

        let cmds = model.update(WidgetEvent::TriggerClicked);
        assert!(cmds.contains(&WidgetCmd::SetModalVisible(false)));
        assert!(!model.modal_open());
    }

    #[test]
    fn start_with_empty_description_never_prompts() {
        let mut model = ready_model();
        let cmds = model.update(WidgetEvent::RecordClicked);
        assert!(!cmds.contains(&WidgetCmd::RequestCapture));
        assert!(has_status(
            &cmds,
            MSG_NEED_DESCRIPTION_FIRST,
            StatusTone::Error
        ));
        assert_eq!(model.phase(), RecorderPhase::Idle);
    }

    #[test]
    fn start_before_encoder_ready_is_refused() {
        let mut model = WidgetModel::new(WidgetConfig::default());
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        let cmds = model.update(WidgetEvent::RecordClicked);
        assert!(!cmds.contains(&WidgetCmd::RequestCapture));
        assert!(has_status(&cmds, MSG_ENCODER_NOT_READY, StatusTone::Error));
    }

    #[test]
    fn valid_start_disables_control_and_requests_capture() {
        let mut model = ready_model();
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        let cmds = model.update(WidgetEvent::RecordClicked);
        assert_eq!(
            cmds,
            vec![
                WidgetCmd::SetRecordControl {
                    enabled: false,
                    recording: false,
                },
                WidgetCmd::RequestCapture,
            ]
        );
        assert_eq!(model.phase(), RecorderPhase::Requesting);
    }

    #[test]
    fn second_start_while_requesting_is_inert() {
        let mut model = ready_model();
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        model.update(WidgetEvent::RecordClicked);
        assert_eq!(model.update(WidgetEvent::RecordClicked), Vec::new());
        assert_eq!(model.phase(), RecorderPhase::Requesting);
    }

    #[test]
    fn permission_denial_restores_idle() {
        let mut model = ready_model();
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        model.update(WidgetEvent::RecordClicked);
        let cmds = model.update(WidgetEvent::CaptureFailed);
        assert!(has_status(&cmds, MSG_PERMISSION_DENIED, StatusTone::Error));
        assert_eq!(model.phase(), RecorderPhase::Idle);
        assert!(model.draft().artifact.is_none());
    }

    #[test]
    fn submit_enablement_tracks_both_conditions() {
        let mut model = ready_model();
        assert!(!model.submit_enabled());

        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        assert!(!model.submit_enabled()); // no artifact yet

        model.update(WidgetEvent::RecordClicked);
        model.update(WidgetEvent::CaptureAcquired);
        model.update(WidgetEvent::RecordClicked); // stop
        model.update(WidgetEvent::RecordingFinalized { bytes: 4_096 });
        assert!(model.submit_enabled());

        // Toggling either condition off disables again.
        let cmds = model.update(WidgetEvent::DescriptionChanged("  ".to_owned()));
        assert!(cmds.contains(&WidgetCmd::SetSubmitEnabled(false)));
        assert!(!model.submit_enabled());

        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        assert!(model.submit_enabled());
    }

    #[test]
    fn finalize_hands_over_artifact_and_reports_size() {
        let mut model = ready_model();
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        model.update(WidgetEvent::RecordClicked);
        model.update(WidgetEvent::CaptureAcquired);
        model.update(WidgetEvent::RecordClicked);
        let cmds = model.update(WidgetEvent::RecordingFinalized { bytes: 1_300_234 });

        assert!(cmds.contains(&WidgetCmd::ReleaseCapture));
        assert!(cmds.contains(&WidgetCmd::SetRecordingBorder(false)));
        assert!(has_status(
            &cmds,
            "Recording complete! (1.24 MB)",
            StatusTone::Success
        ));
        assert_eq!(model.draft().artifact.map(|a| a.bytes), Some(1_300_234));
        assert_eq!(model.phase(), RecorderPhase::Stopped);
    }

    #[test]
    fn submit_without_artifact_reports_specific_precondition() {
        let mut model = ready_model();
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        let cmds = model.update(WidgetEvent::SubmitClicked);
        assert!(!cmds.contains(&WidgetCmd::SubmitReport));
        assert!(has_status(&cmds, MSG_NEED_VIDEO, StatusTone::Error));
    }

    #[test]
    fn submit_is_suppressed_while_in_flight() {
        let mut model = ready_model();
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        model.update(WidgetEvent::RecordClicked);
        model.update(WidgetEvent::CaptureAcquired);
        model.update(WidgetEvent::RecordClicked);
        model.update(WidgetEvent::RecordingFinalized { bytes: 64 });

        let first = model.update(WidgetEvent::SubmitClicked);
        assert!(first.contains(&WidgetCmd::SubmitReport));

        let second = model.update(WidgetEvent::SubmitClicked);
        assert_eq!(second, Vec::new());
    }

    #[test]
    fn close_while_recording_keeps_the_session() {
        let mut model = ready_model();
        model.update(WidgetEvent::TriggerClicked);
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        model.update(WidgetEvent::RecordClicked);
        model.update(WidgetEvent::CaptureAcquired);

        let cmds = model.update(WidgetEvent::CloseClicked);
        assert_eq!(cmds, vec![WidgetCmd::SetModalVisible(false)]);
        assert_eq!(model.phase(), RecorderPhase::Active);
        assert_eq!(model.draft().description, "it broke");
    }

    #[test]
    fn close_while_idle_resets_draft_and_status() {
        let mut model = ready_model();
        model.update(WidgetEvent::TriggerClicked);
        model.update(WidgetEvent::DescriptionChanged("it broke".to_owned()));
        model.update(WidgetEvent::EmailChanged("user@example.com".to_owned()));

        let cmds = model.update(WidgetEvent::CloseClicked);
        assert!(cmds.contains(&WidgetCmd::ClearForm));
        assert!(has_status(&cmds, "", StatusTone::Neutral));
        assert_eq!(model.draft().description, "");
        assert_eq!(model.draft().email, "");
    }
}
