#![forbid(unsafe_code)]

//! `bugreel-core` is the host-agnostic engine behind the BugReel bug-report
//! widget.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding surface (the browser, via
//!   `bugreel-web`) pushes events in and executes the returned commands.
//!   Nothing in this crate touches the DOM, the network, or a clock.
//! - **Deterministic time**: wall-clock timestamps are injected as ISO-8601
//!   strings by the host; the engine never reads time on its own.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`,
//!   where every suspension point (permission prompt, encoder finalize,
//!   submission round-trip) is surfaced back to the engine as a plain event.
//!
//! The crate is organized around the widget's moving parts:
//! - [`console`] — the console capture sink and its bounded entry log.
//! - [`network`] — resource-timing capture and its bounded entry log.
//! - [`recording`] — the screen-recording session state machine.
//! - [`submission`] — report assembly and the submit gate.
//! - [`widget`] — the event/command reducer tying the parts together.

pub mod bounded;
pub mod config;
pub mod console;
pub mod error;
pub mod network;
pub mod recording;
pub mod submission;
pub mod widget;

pub use bounded::BoundedLog;
pub use config::WidgetConfig;
pub use console::{CaptureSink, ConsoleBuffer, ConsoleSink, LogEntry, LogLevel};
pub use error::{Result, WidgetError};
pub use network::{NetworkBuffer, NetworkEntry};
pub use recording::{
    EncoderStatus, RecorderCommand, RecorderEvent, RecorderMachine, RecorderPhase,
    RecorderTransition,
};
pub use submission::{PageContext, ReportBody, ReportDraft, SubmitOutcome, SubmitRefusal};
pub use widget::{StatusTone, WidgetCmd, WidgetEvent, WidgetModel};
