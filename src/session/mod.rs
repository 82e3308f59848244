//! Session module: the bounded submission loop
//!
//! A session is one execution of the runner for a user-specified number of
//! submission attempts. This module provides the HTTP submitter, the
//! sequential loop driving it, and the outcome/stat models.

pub mod models;
pub mod runner;
pub mod submitter;

pub use models::{SessionStats, SubmissionOutcome, SubmissionStatus};
pub use runner::{run_session, RunnerConfig};
pub use submitter::{FormSubmitter, SubmitterConfig};
