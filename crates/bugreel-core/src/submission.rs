#![forbid(unsafe_code)]

//! Report draft, payload assembly, and the submit gate.
//!
//! The draft collects what the user produced (description, optional email,
//! the recorded artifact); the payload is derived on demand from the draft,
//! the two capture logs, and page metadata. Field names and JSON shapes
//! match the ingestion endpoint's multipart contract exactly:
//!
//! | field         | content                                            |
//! |---------------|----------------------------------------------------|
//! | `description` | raw text                                           |
//! | `email`       | raw text, omitted entirely when empty              |
//! | `video`       | binary artifact, filename `bug-report.webm`        |
//! | `consoleLogs` | pretty-printed JSON array of log entries           |
//! | `metadata`    | JSON `{url, userAgent, timestamp,                  |
//! |               |  screenResolution, networkRequests}`               |

use serde::Serialize;

use crate::console::LogEntry;
use crate::error::{Result, WidgetError};
use crate::network::NetworkEntry;

/// Multipart field names of the ingestion contract.
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_VIDEO: &str = "video";
pub const FIELD_CONSOLE_LOGS: &str = "consoleLogs";
pub const FIELD_METADATA: &str = "metadata";

/// Filename attached to the `video` field.
pub const VIDEO_FILENAME: &str = "bug-report.webm";

/// What the engine knows about the recorded artifact; the binary blob
/// itself stays on the host side for the same lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactMeta {
    /// Encoded size in bytes.
    pub bytes: u64,
}

impl ArtifactMeta {
    /// Size in binary megabytes, for the post-stop status line.
    #[must_use]
    pub fn megabytes(self) -> f64 {
        self.bytes as f64 / 1024.0 / 1024.0
    }
}

/// The in-progress report, owned by the widget model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDraft {
    pub description: String,
    pub email: String,
    pub artifact: Option<ArtifactMeta>,
}

impl ReportDraft {
    /// Submit is allowed iff the trimmed description is non-empty and an
    /// artifact is present.
    #[must_use]
    pub fn ready(&self) -> bool {
        !self.description.trim().is_empty() && self.artifact.is_some()
    }

    /// The email field value, or `None` when empty (the field is then
    /// omitted from the payload entirely).
    #[must_use]
    pub fn email_or_none(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty()).then_some(email)
    }

    /// Reset to the empty draft (after successful submission or a
    /// close-while-idle).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Page metadata captured by the host at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub url: String,
    pub user_agent: String,
    /// `WIDTHxHEIGHT` of the screen.
    pub screen_resolution: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportMetadata<'a> {
    url: &'a str,
    user_agent: &'a str,
    timestamp: &'a str,
    screen_resolution: &'a str,
    network_requests: &'a [NetworkEntry],
}

/// The textual fields of one submission, ready for multipart encoding.
/// The binary `video` part is appended by the host from its blob handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBody {
    pub description: String,
    pub email: Option<String>,
    pub console_logs_json: String,
    pub metadata_json: String,
}

/// Assemble the textual payload from the draft, both capture logs, and the
/// page context. `timestamp_iso` is the host-supplied capture time.
pub fn build_report_body(
    draft: &ReportDraft,
    console_logs: &[LogEntry],
    network_requests: &[NetworkEntry],
    context: &PageContext,
    timestamp_iso: &str,
) -> Result<ReportBody> {
    let console_logs_json = serde_json::to_string_pretty(console_logs)
        .map_err(|err| WidgetError::Payload(err.to_string()))?;
    let metadata = ReportMetadata {
        url: &context.url,
        user_agent: &context.user_agent,
        timestamp: timestamp_iso,
        screen_resolution: &context.screen_resolution,
        network_requests,
    };
    let metadata_json =
        serde_json::to_string(&metadata).map_err(|err| WidgetError::Payload(err.to_string()))?;
    Ok(ReportBody {
        description: draft.description.clone(),
        email: draft.email_or_none().map(str::to_owned),
        console_logs_json,
        metadata_json,
    })
}

/// Why a submit request was refused before any network activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRefusal {
    /// A submission is already in flight.
    InFlight,
    /// Trimmed description is empty.
    MissingDescription,
    /// No recorded artifact.
    MissingArtifact,
}

/// Transport outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 2xx response.
    Delivered,
    /// Non-success status or transport exception.
    Failed { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::LogLevel;
    use pretty_assertions::assert_eq;

    fn draft() -> ReportDraft {
        ReportDraft {
            description: "The save button does nothing".to_owned(),
            email: String::new(),
            artifact: Some(ArtifactMeta { bytes: 2_048 }),
        }
    }

    fn context() -> PageContext {
        PageContext {
            url: "https://app.example/settings".to_owned(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64)".to_owned(),
            screen_resolution: "2560x1440".to_owned(),
        }
    }

    #[test]
    fn readiness_requires_description_and_artifact() {
        let mut d = draft();
        assert!(d.ready());

        d.description = "   ".to_owned();
        assert!(!d.ready());

        d.description = "real text".to_owned();
        d.artifact = None;
        assert!(!d.ready());
    }

    #[test]
    fn empty_email_is_omitted() {
        let mut d = draft();
        assert_eq!(d.email_or_none(), None);
        d.email = "  ".to_owned();
        assert_eq!(d.email_or_none(), None);
        d.email = "user@example.com".to_owned();
        assert_eq!(d.email_or_none(), Some("user@example.com"));
    }

    #[test]
    fn metadata_round_trips_network_requests_exactly() {
        let network = vec![
            NetworkEntry {
                name: "https://api.example/one".to_owned(),
                initiator_type: "fetch".to_owned(),
                duration: 41.0,
                timestamp: "2026-08-06T10:00:00.000Z".to_owned(),
            },
            NetworkEntry {
                name: "https://cdn.example/app.js".to_owned(),
                initiator_type: "script".to_owned(),
                duration: 120.25,
                timestamp: "2026-08-06T10:00:01.000Z".to_owned(),
            },
        ];
        let body = build_report_body(
            &draft(),
            &[],
            &network,
            &context(),
            "2026-08-06T10:05:00.000Z",
        )
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&body.metadata_json).unwrap();
        assert_eq!(parsed["url"], "https://app.example/settings");
        assert_eq!(parsed["userAgent"], "Mozilla/5.0 (X11; Linux x86_64)");
        assert_eq!(parsed["timestamp"], "2026-08-06T10:05:00.000Z");
        assert_eq!(parsed["screenResolution"], "2560x1440");

        let round_tripped: Vec<NetworkEntry> =
            serde_json::from_value(parsed["networkRequests"].clone()).unwrap();
        assert_eq!(round_tripped, network);
    }

    #[test]
    fn console_logs_are_pretty_printed() {
        let logs = vec![LogEntry {
            level: LogLevel::Error,
            message: "boom".to_owned(),
            timestamp: "2026-08-06T10:00:00.000Z".to_owned(),
        }];
        let body =
            build_report_body(&draft(), &logs, &[], &context(), "2026-08-06T10:05:00.000Z")
                .unwrap();
        // Pretty printing puts each field on its own line.
        assert!(body.console_logs_json.contains("\n"));
        assert!(body.console_logs_json.contains("\"level\": \"error\""));
    }

    #[test]
    fn artifact_size_in_megabytes() {
        let meta = ArtifactMeta {
            bytes: 1_300_234,
        };
        let label = format!("{:.2}", meta.megabytes());
        assert_eq!(label, "1.24");
    }
}
