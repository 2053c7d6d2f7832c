//! Observable record of intercepted traffic.
//!
//! Background syncs, telemetry, and feature-flag polls leave no trace in
//! the UI a test can assert on. The journal makes that traffic visible:
//! every matched or unmatched request is recorded, and a test can ask
//! "how many calls hit endpoint X" after the fact.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use fixture_core::HttpMethod;

use crate::matcher::{IncomingRequest, MatchOutcome};

/// One intercepted request, matched or not.
///
/// The method is kept as a string so traffic outside the mockable method
/// set (PATCH, OPTIONS preflights) is still visible to diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
    pub matched: bool,
    pub at: DateTime<Utc>,
}

/// Append-only log of every request the mock server intercepted.
#[derive(Debug, Default)]
pub struct RequestJournal {
    entries: Mutex<Vec<RequestRecord>>,
}

impl RequestJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one match attempt.
    pub fn record(&self, request: &IncomingRequest, outcome: &MatchOutcome) {
        self.record_raw(request.method.as_str(), &request.url, outcome.is_match());
    }

    /// Record traffic that never reached the matcher (unsupported method).
    pub fn record_raw(&self, method: &str, url: &str, matched: bool) {
        self.entries.lock().push(RequestRecord {
            method: method.to_string(),
            url: url.to_string(),
            matched,
            at: Utc::now(),
        });
    }

    /// Number of calls made to an exact method+URL pair, matched or not.
    pub fn calls_to(&self, method: HttpMethod, url: &str) -> usize {
        self.entries
            .lock()
            .iter()
            .filter(|r| r.method == method.as_str() && r.url == url)
            .count()
    }

    /// Records of requests no mock answered — the first place to look when
    /// diagnosing a missing declaration.
    pub fn unmatched(&self) -> Vec<RequestRecord> {
        self.entries
            .lock()
            .iter()
            .filter(|r| !r.matched)
            .cloned()
            .collect()
    }

    /// Copy of the full log, in interception order.
    pub fn snapshot(&self) -> Vec<RequestRecord> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Wipe the log between tests.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
