//! Reporting module for run logs and session history
//!
//! Two flat-file sinks: a transient per-run log that is overwritten at the
//! start of every session, and a persistent history file that only ever
//! grows by one summary line per session.

pub mod history;
pub mod run_log;

pub use history::{History, SessionRecord};
pub use run_log::RunLog;
