//! Transient per-run log

use crate::session::SessionStats;
use crate::Result;
use anyhow::Context;
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "==================================================";

/// Line-by-line log for the current run.
///
/// The file is truncated when the log is created and every line is flushed
/// as it is written, so an interrupted run still leaves the lines recorded
/// up to that point.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Create the run log, truncating any previous run's content
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path)
            .with_context(|| format!("failed to create run log {}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the session header
    pub fn begin(&mut self, target: &str, requested: u64) -> Result<()> {
        writeln!(self.file, "=== form-runner session log ===")?;
        writeln!(
            self.file,
            "Started: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(self.file, "Target: {}", target)?;
        writeln!(self.file, "Requested: {}", requested)?;
        writeln!(self.file, "{}", SEPARATOR)?;
        self.file.flush()?;
        Ok(())
    }

    /// Append one timestamped status line
    pub fn record(&mut self, message: &str) -> Result<()> {
        writeln!(
            self.file,
            "[{}] {}",
            Local::now().format("%H:%M:%S"),
            message
        )?;
        self.file.flush()?;
        Ok(())
    }

    /// Write the results footer
    pub fn finish(&mut self, stats: &SessionStats) -> Result<()> {
        writeln!(self.file, "{}", SEPARATOR)?;
        writeln!(self.file, "SESSION RESULTS")?;
        writeln!(
            self.file,
            "Ended: {}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(self.file, "Attempts: {}", stats.attempts())?;
        writeln!(self.file, "Succeeded: {}", stats.succeeded)?;
        writeln!(self.file, "Failed: {}", stats.failed)?;
        writeln!(self.file, "Success rate: {:.1}%", stats.success_rate())?;
        writeln!(self.file, "Duration: {}s", stats.duration().num_seconds())?;
        writeln!(self.file, "{}", SEPARATOR)?;
        self.file.flush()?;
        Ok(())
    }
}
