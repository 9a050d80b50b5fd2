#![forbid(unsafe_code)]

//! Widget configuration.
//!
//! The host page may pass a JSON object when embedding the widget; every
//! field is optional and falls back to the defaults below, so an empty or
//! absent configuration reproduces the stock widget.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WidgetError};

/// Default ingestion endpoint for submitted reports.
pub const DEFAULT_INGEST_URL: &str = "https://ingest.bugreel.dev/reports";

/// Default recording container/mime type.
pub const DEFAULT_VIDEO_MIME: &str = "video/webm";

const DEFAULT_CONSOLE_CAPACITY: usize = 10_240;
const DEFAULT_NETWORK_CAPACITY: usize = 4_096;
const DEFAULT_CLOSE_DELAY_MS: u32 = 2_000;

/// Embedding configuration, decoded from the host's JSON init argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetConfig {
    /// Ingestion endpoint receiving the multipart POST.
    pub ingest_url: String,
    /// Maximum retained console entries (drop-oldest beyond this).
    pub console_capacity: usize,
    /// Maximum retained network entries (drop-oldest beyond this).
    pub network_capacity: usize,
    /// When `true` (the stock behavior), a transport failure during
    /// submission still reports success to the user while leaving the form
    /// resubmittable. When `false`, the failure is surfaced with the error
    /// tone.
    pub report_optimistic_success: bool,
    /// Delay between a successful submission and the modal closing.
    pub close_delay_ms: u32,
    /// Mime type requested from the encoder.
    pub video_mime_type: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            ingest_url: DEFAULT_INGEST_URL.to_owned(),
            console_capacity: DEFAULT_CONSOLE_CAPACITY,
            network_capacity: DEFAULT_NETWORK_CAPACITY,
            report_optimistic_success: true,
            close_delay_ms: DEFAULT_CLOSE_DELAY_MS,
            video_mime_type: DEFAULT_VIDEO_MIME.to_owned(),
        }
    }
}

impl WidgetConfig {
    /// Decode a configuration from JSON. Missing fields take defaults;
    /// unknown fields are ignored.
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|err| WidgetError::Config(err.to_string()))
    }
}
