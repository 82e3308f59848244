//! Session data models

use crate::proxy::Proxy;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal state of a single submission attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// 2xx response from the form endpoint
    Accepted,
    /// Non-success HTTP status, e.g. "403 Forbidden"
    Rejected(String),
    /// Connect/send/read failure before a status was seen
    NetworkError(String),
    Timeout,
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionStatus::Accepted => write!(f, "accepted"),
            SubmissionStatus::Rejected(status) => write!(f, "rejected ({})", status),
            SubmissionStatus::NetworkError(error) => write!(f, "network error: {}", error),
            SubmissionStatus::Timeout => write!(f, "timed out"),
        }
    }
}

/// Outcome of one submission attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    /// Proxy the attempt was routed through, if any
    pub proxy: Option<Proxy>,
    pub status: SubmissionStatus,
    pub elapsed_ms: Option<u64>,
}

impl SubmissionOutcome {
    pub fn accepted(proxy: Option<Proxy>, elapsed_ms: u64) -> Self {
        Self {
            proxy,
            status: SubmissionStatus::Accepted,
            elapsed_ms: Some(elapsed_ms),
        }
    }

    pub fn rejected(proxy: Option<Proxy>, status: String) -> Self {
        Self {
            proxy,
            status: SubmissionStatus::Rejected(status),
            elapsed_ms: None,
        }
    }

    pub fn network_error(proxy: Option<Proxy>, error: String) -> Self {
        Self {
            proxy,
            status: SubmissionStatus::NetworkError(error),
            elapsed_ms: None,
        }
    }

    pub fn timed_out(proxy: Option<Proxy>) -> Self {
        Self {
            proxy,
            status: SubmissionStatus::Timeout,
            elapsed_ms: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, SubmissionStatus::Accepted)
    }

    /// One-line description for the run log
    pub fn describe(&self) -> String {
        let route = match &self.proxy {
            Some(proxy) => format!("via {}", proxy.endpoint()),
            None => "direct".to_string(),
        };

        match (&self.status, self.elapsed_ms) {
            (SubmissionStatus::Accepted, Some(ms)) => {
                format!("accepted in {}ms [{}]", ms, route)
            }
            (status, _) => format!("{} [{}]", status, route),
        }
    }
}

/// Running counters for the current session
#[derive(Debug, Clone)]
pub struct SessionStats {
    pub requested: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
}

impl SessionStats {
    pub fn new(requested: u64) -> Self {
        Self {
            requested,
            succeeded: 0,
            failed: 0,
            started_at: Local::now(),
            finished_at: None,
        }
    }

    /// Count one finished attempt
    pub fn record(&mut self, outcome: &SubmissionOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn attempts(&self) -> u64 {
        self.succeeded + self.failed
    }

    /// Requested submissions that did not succeed this session
    pub fn remaining(&self) -> u64 {
        self.requested.saturating_sub(self.succeeded)
    }

    pub fn success_rate(&self) -> f64 {
        let attempts = self.attempts();
        if attempts == 0 {
            0.0
        } else {
            self.succeeded as f64 / attempts as f64 * 100.0
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Local::now());
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Local::now) - self.started_at
    }
}
