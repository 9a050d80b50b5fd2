#![forbid(unsafe_code)]

//! Screen-recording session state machine.
//!
//! Phase flow:
//!
//! ```text
//! Idle -> Requesting -> Active -> Stopped
//!   ^         |
//!   +---------+  (permission denied / acquisition failure)
//! ```
//!
//! The machine is pure: feeding it an event yields a [`RecorderTransition`]
//! carrying the phase change and the [`RecorderCommand`] effects the host
//! must execute, or `None` when the event is not legal in the current phase
//! (which is how a second concurrent start request is refused). The
//! asynchronous gaps — the permission prompt between `Requesting` and
//! `Active`, the encoder finalize between the stop request and `Stopped` —
//! are bridged by the host reporting back with the matching event.
//!
//! `Stopped` is terminal for a session: a fresh start begins a new
//! `Requesting` cycle, and the previous artifact is only overwritten once
//! the new one completes.

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the recording controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderPhase {
    /// No session; a start may be requested.
    Idle,
    /// Waiting on the screen-capture permission prompt.
    Requesting,
    /// Stream acquired, encoder running.
    Active,
    /// Session finished; artifact handed off.
    Stopped,
}

impl RecorderPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requesting => "requesting",
            Self::Active => "active",
            Self::Stopped => "stopped",
        }
    }

    /// True while a session exists (`Requesting` or `Active`); the start
    /// affordance must be disabled in these phases.
    #[must_use]
    pub const fn session_in_progress(self) -> bool {
        matches!(self, Self::Requesting | Self::Active)
    }

    /// True in the phases from which a new start cycle may begin.
    #[must_use]
    pub const fn can_start(self) -> bool {
        matches!(self, Self::Idle | Self::Stopped)
    }
}

/// Readiness of the injected encoder capability.
///
/// Until the host reports `Ready`, the recording control surface stays
/// disabled; a failed probe is logged and the control stays disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncoderStatus {
    Loading,
    Ready,
    Failed,
}

impl EncoderStatus {
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Events fed into the machine by the UI and by the host's async callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderEvent {
    /// User asked to start (preconditions already validated by the widget).
    StartRequested,
    /// Screen-capture stream acquired; encoding may begin.
    CaptureAcquired,
    /// Permission denied or acquisition failed.
    CaptureFailed,
    /// User asked to stop; the encoder must be finalized.
    StopRequested,
    /// Encoder finalize completed, yielding an artifact of `bytes` bytes.
    Finalized { bytes: u64 },
}

/// Effects the host must execute after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderCommand {
    /// Prompt for a screen-capture stream (with audio).
    RequestCapture,
    /// Attach the encoder to the acquired stream and start it.
    BeginEncoding,
    /// Stop the encoder and collect the artifact.
    FinalizeEncoder,
    /// Stop every track of the captured stream so the browser's capture
    /// indicator disappears.
    ReleaseTracks,
}

/// Result of feeding one event into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderTransition {
    pub from: RecorderPhase,
    pub to: RecorderPhase,
    pub commands: Vec<RecorderCommand>,
}

/// The session state machine. At most one session exists at a time; events
/// that would create a second one are ignored.
#[derive(Debug, Clone)]
pub struct RecorderMachine {
    phase: RecorderPhase,
}

impl Default for RecorderMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: RecorderPhase::Idle,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> RecorderPhase {
        self.phase
    }

    /// Feed one event. Returns the transition to apply, or `None` when the
    /// event is not legal in the current phase.
    pub fn handle(&mut self, event: RecorderEvent) -> Option<RecorderTransition> {
        let from = self.phase;
        let (to, commands) = match (from, event) {
            (phase, RecorderEvent::StartRequested) if phase.can_start() => (
                RecorderPhase::Requesting,
                vec![RecorderCommand::RequestCapture],
            ),
            (RecorderPhase::Requesting, RecorderEvent::CaptureAcquired) => {
                (RecorderPhase::Active, vec![RecorderCommand::BeginEncoding])
            }
            (RecorderPhase::Requesting, RecorderEvent::CaptureFailed) => {
                (RecorderPhase::Idle, Vec::new())
            }
            (RecorderPhase::Active, RecorderEvent::StopRequested) => {
                // Finalize is asynchronous; the phase only advances once the
                // host reports `Finalized`.
                (RecorderPhase::Active, vec![RecorderCommand::FinalizeEncoder])
            }
            (RecorderPhase::Active, RecorderEvent::Finalized { .. }) => (
                RecorderPhase::Stopped,
                vec![RecorderCommand::ReleaseTracks],
            ),
            _ => return None,
        };
        self.phase = to;
        Some(RecorderTransition { from, to, commands })
    }
}
