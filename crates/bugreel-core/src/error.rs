#![forbid(unsafe_code)]

//! Error taxonomy for the widget engine.
//!
//! Everything here is handled locally by the widget; nothing is allowed to
//! escape into the host page's error stream. Precondition and permission
//! failures are modeled as refusals (see [`crate::submission::SubmitRefusal`])
//! rather than errors — `WidgetError` covers the few genuinely fallible
//! operations: configuration decoding and payload encoding.

use thiserror::Error;

/// Errors produced by the widget engine.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// The host-supplied configuration JSON could not be decoded.
    #[error("invalid widget configuration: {0}")]
    Config(String),

    /// A report payload field could not be serialized to JSON.
    #[error("failed to encode report payload: {0}")]
    Payload(String),
}

/// Convenience alias used across the crate.
pub type Result<T> = core::result::Result<T, WidgetError>;
