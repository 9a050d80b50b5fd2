#![forbid(unsafe_code)]

//! Network activity capture from the browser's resource-timing feed.
//!
//! The observer itself lives on the web side (`PerformanceObserver` over
//! `resource` entries, a silent no-op where the capability is missing);
//! this module owns the entry shape and the bounded log the observer
//! appends into. Entries are kept in arrival order, are never mutated,
//! and never interact with the recording session.

use serde::{Deserialize, Serialize};

use crate::bounded::BoundedLog;

/// One observed resource fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEntry {
    /// Resource URL.
    pub name: String,
    /// Initiator category reported by the browser (`fetch`, `script`, ...).
    #[serde(rename = "type")]
    pub initiator_type: String,
    /// Fetch duration in milliseconds.
    pub duration: f64,
    /// Host-supplied ISO-8601 wall-clock timestamp of observation.
    pub timestamp: String,
}

/// Bounded log of observed resource fetches.
pub type NetworkBuffer = BoundedLog<NetworkEntry>;
