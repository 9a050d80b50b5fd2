#![forbid(unsafe_code)]

//! Console capture: the sink capability and its bounded entry log.
//!
//! The host page's logging functions are modeled as a [`ConsoleSink`]
//! capability rather than a global to be monkey-patched. [`CaptureSink`]
//! decorates the original sink: every write is recorded into the
//! [`ConsoleBuffer`] first and then forwarded unchanged, so host-page
//! behavior is unaffected. Installation over the real `console` happens
//! once, on the web side, for the page's lifetime; there is no restore.
//!
//! Writes must never fail: the sink API is infallible, and argument
//! coercion (joining a call's arguments into one message string) happens
//! before the sink is reached.

use serde::{Deserialize, Serialize};

use crate::bounded::BoundedLog;

/// The five recognized console levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Log,
    Warn,
    Error,
    Info,
    Debug,
}

impl LogLevel {
    /// All levels, in the order they are installed over the host console.
    pub const ALL: [Self; 5] = [Self::Log, Self::Warn, Self::Error, Self::Info, Self::Debug];

    /// The console method name for this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }

    /// Parse a console method name, or `None` for unrecognized names.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "log" => Some(Self::Log),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            "info" => Some(Self::Info),
            "debug" => Some(Self::Debug),
            _ => None,
        }
    }
}

/// One captured console call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Level of the intercepted call.
    pub level: LogLevel,
    /// The call's arguments, each coerced to text and space-joined.
    pub message: String,
    /// Host-supplied ISO-8601 wall-clock timestamp.
    pub timestamp: String,
}

/// Bounded log of captured console calls.
pub type ConsoleBuffer = BoundedLog<LogEntry>;

/// Writing capability of the host page's console.
///
/// The web crate implements this over the original `console.*` functions
/// captured at install time; tests implement it over a `Vec`.
pub trait ConsoleSink {
    /// Emit one already-coerced message at `level`. Must not fail.
    fn write(&mut self, level: LogLevel, message: &str);
}

/// Decorator over a [`ConsoleSink`]: records every write, then forwards it.
#[derive(Debug)]
pub struct CaptureSink<S> {
    inner: S,
    buffer: ConsoleBuffer,
}

impl<S: ConsoleSink> CaptureSink<S> {
    /// Wrap `inner`, keeping at most `capacity` captured entries.
    #[must_use]
    pub fn new(inner: S, capacity: usize) -> Self {
        Self {
            inner,
            buffer: ConsoleBuffer::new(capacity),
        }
    }

    /// Record a call with the host-supplied timestamp, then forward it to
    /// the original sink unchanged.
    pub fn write(&mut self, level: LogLevel, message: &str, timestamp: &str) {
        self.buffer.push(LogEntry {
            level,
            message: message.to_owned(),
            timestamp: timestamp.to_owned(),
        });
        self.inner.write(level, message);
    }

    /// The captured entries.
    #[must_use]
    pub fn buffer(&self) -> &ConsoleBuffer {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingSink {
        forwarded: Vec<(LogLevel, String)>,
    }

    impl ConsoleSink for RecordingSink {
        fn write(&mut self, level: LogLevel, message: &str) {
            self.forwarded.push((level, message.to_owned()));
        }
    }

    #[test]
    fn level_names_round_trip() {
        for level in LogLevel::ALL {
            assert_eq!(LogLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(LogLevel::parse("trace"), None);
    }

    #[test]
    fn capture_records_then_forwards_in_call_order() {
        let mut sink = CaptureSink::new(RecordingSink::default(), 16);
        sink.write(LogLevel::Log, "first", "2026-08-06T10:00:00.000Z");
        sink.write(LogLevel::Error, "second", "2026-08-06T10:00:01.000Z");
        sink.write(LogLevel::Warn, "third", "2026-08-06T10:00:02.000Z");

        let captured: Vec<(LogLevel, &str)> = sink
            .buffer()
            .iter()
            .map(|entry| (entry.level, entry.message.as_str()))
            .collect();
        assert_eq!(
            captured,
            vec![
                (LogLevel::Log, "first"),
                (LogLevel::Error, "second"),
                (LogLevel::Warn, "third"),
            ]
        );
        assert_eq!(
            sink.inner.forwarded,
            vec![
                (LogLevel::Log, "first".to_owned()),
                (LogLevel::Error, "second".to_owned()),
                (LogLevel::Warn, "third".to_owned()),
            ]
        );
    }

    #[test]
    fn entry_serializes_with_lowercase_level() {
        let entry = LogEntry {
            level: LogLevel::Warn,
            message: "slow response".to_owned(),
            timestamp: "2026-08-06T10:00:00.000Z".to_owned(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["level"], "warn");
        assert_eq!(json["message"], "slow response");
        assert_eq!(json["timestamp"], "2026-08-06T10:00:00.000Z");
    }
}
