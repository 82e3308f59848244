//! Append-only session history

use crate::session::SessionStats;
use crate::Result;
use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static RECORD_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\] requested=(\d+) succeeded=(\d+) remaining=(\d+) cumulative=(\d+)$",
    )
    .expect("Invalid history record regex")
});

/// One session's outcome as stored in the history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: NaiveDateTime,
    pub requested: u64,
    pub succeeded: u64,
    /// Requested submissions that did not succeed this session
    pub remaining: u64,
    /// Successful submissions across all sessions, this one included
    pub cumulative: u64,
}

impl SessionRecord {
    /// Build the record for a finished session on top of the prior
    /// cumulative total
    pub fn from_stats(stats: &SessionStats, prior_cumulative: u64) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            requested: stats.requested,
            succeeded: stats.succeeded,
            remaining: stats.remaining(),
            cumulative: prior_cumulative + stats.succeeded,
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "[{}] requested={} succeeded={} remaining={} cumulative={}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.requested,
            self.succeeded,
            self.remaining,
            self.cumulative
        )
    }

    /// Parse a history line; `None` for anything not in record form
    pub fn parse_line(line: &str) -> Option<Self> {
        let caps = RECORD_LINE.captures(line.trim())?;
        Some(Self {
            timestamp: NaiveDateTime::parse_from_str(&caps[1], TIMESTAMP_FORMAT).ok()?,
            requested: caps[2].parse().ok()?,
            succeeded: caps[3].parse().ok()?,
            remaining: caps[4].parse().ok()?,
            cumulative: caps[5].parse().ok()?,
        })
    }
}

/// Append-only record of all past sessions.
///
/// Prior entries are never rewritten; each session adds exactly one line.
#[derive(Debug)]
pub struct History {
    path: PathBuf,
    cumulative: u64,
}

impl History {
    /// Open the history file, recovering the cumulative total from the last
    /// well-formed record line. The file is created if missing, so an
    /// unwritable path fails here rather than after the session ran.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let cumulative = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read history {}", path.display()))?;
            last_cumulative(&content)
        } else {
            0
        };

        OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .with_context(|| format!("failed to open history {}", path.display()))?;

        Ok(Self { path, cumulative })
    }

    /// Cumulative successful submissions across all recorded sessions
    pub fn cumulative(&self) -> u64 {
        self.cumulative
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record line; prior content is never touched
    pub fn append(&mut self, record: &SessionRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("failed to open history {}", self.path.display()))?;
        writeln!(file, "{}", record.to_line())?;

        self.cumulative = record.cumulative;
        Ok(())
    }
}

/// Cumulative total of the last parseable record, zero when none exists
fn last_cumulative(content: &str) -> u64 {
    content
        .lines()
        .rev()
        .find_map(SessionRecord::parse_line)
        .map(|record| record.cumulative)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionStats, SubmissionOutcome};
    use std::path::PathBuf;

    fn temp_history(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("form_runner_history_{}_{}", std::process::id(), name))
    }

    fn record(requested: u64, succeeded: u64, cumulative: u64) -> SessionRecord {
        SessionRecord {
            timestamp: NaiveDateTime::parse_from_str("2024-05-01 10:00:00", TIMESTAMP_FORMAT)
                .unwrap(),
            requested,
            succeeded,
            remaining: requested - succeeded,
            cumulative,
        }
    }

    #[test]
    fn test_line_round_trip() {
        let original = record(5, 4, 19);
        let line = original.to_line();
        assert_eq!(
            line,
            "[2024-05-01 10:00:00] requested=5 succeeded=4 remaining=1 cumulative=19"
        );
        assert_eq!(SessionRecord::parse_line(&line).unwrap(), original);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(SessionRecord::parse_line("").is_none());
        assert!(SessionRecord::parse_line("SESSION RESULTS").is_none());
        assert!(SessionRecord::parse_line("[not a date] requested=1").is_none());
    }

    #[test]
    fn test_last_cumulative_uses_last_valid_record() {
        let content = "\
[2024-05-01 10:00:00] requested=5 succeeded=5 remaining=0 cumulative=5
some hand-written note
[2024-05-02 10:00:00] requested=5 succeeded=3 remaining=2 cumulative=8
trailing junk";
        assert_eq!(last_cumulative(content), 8);
    }

    #[test]
    fn test_last_cumulative_empty() {
        assert_eq!(last_cumulative(""), 0);
        assert_eq!(last_cumulative("no records here"), 0);
    }

    #[test]
    fn test_record_from_stats() {
        let mut stats = SessionStats::new(5);
        for _ in 0..4 {
            stats.record(&SubmissionOutcome::accepted(None, 10));
        }
        stats.record(&SubmissionOutcome::timed_out(None));

        let record = SessionRecord::from_stats(&stats, 20);
        assert_eq!(record.requested, 5);
        assert_eq!(record.succeeded, 4);
        assert_eq!(record.remaining, 1);
        assert_eq!(record.cumulative, 24);
    }

    #[test]
    fn test_open_missing_file_starts_at_zero() {
        let path = temp_history("fresh.txt");
        fs::remove_file(&path).ok();

        let history = History::open(&path).unwrap();
        assert_eq!(history.cumulative(), 0);

        fs::remove_file(&path).ok();
    }

    #[test]
    fn test_append_accumulates_and_preserves_prior_entries() {
        let path = temp_history("append.txt");
        fs::remove_file(&path).ok();

        let mut history = History::open(&path).unwrap();
        history.append(&record(5, 5, 5)).unwrap();
        assert_eq!(history.cumulative(), 5);

        let first_content = fs::read_to_string(&path).unwrap();

        history.append(&record(5, 3, 8)).unwrap();
        assert_eq!(history.cumulative(), 8);

        let second_content = fs::read_to_string(&path).unwrap();
        assert!(second_content.starts_with(&first_content));
        assert_eq!(second_content.lines().count(), 2);

        // A reopened history picks up where the file left off
        let reopened = History::open(&path).unwrap();
        assert_eq!(reopened.cumulative(), 8);

        fs::remove_file(&path).ok();
    }
}
