//! Form Runner - Automated Web Form Submission
//!
//! This is a small automation tool that fires a bounded number of HTTP
//! submissions at a web form. The target URL and option text are read from
//! flat files, requests can be routed through a rotating proxy list, and
//! outcomes are written to a per-run log plus an append-only history file.

pub mod config;
pub mod proxy;
pub mod report;
pub mod session;

pub use config::Config;
pub use proxy::{Proxy, ProxyAuth, ProxyCursor, ProxyScheme, RotationStrategy};
pub use report::{History, RunLog, SessionRecord};
pub use session::{
    run_session, FormSubmitter, RunnerConfig, SessionStats, SubmissionOutcome, SubmissionStatus,
    SubmitterConfig,
};

/// Application result type
pub type Result<T> = anyhow::Result<T>;
