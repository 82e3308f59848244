//! The bounded submission loop

use crate::proxy::ProxyCursor;
use crate::report::RunLog;
use crate::session::models::SessionStats;
use crate::session::submitter::FormSubmitter;
use crate::Result;
use rand::Rng;
use std::time::Duration;

/// Loop parameters for one session
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Number of submission attempts to make
    pub count: u64,
    /// Lower bound of the random inter-attempt delay in milliseconds
    pub min_delay_ms: u64,
    /// Upper bound of the random inter-attempt delay; 0 disables the delay
    pub max_delay_ms: u64,
}

impl RunnerConfig {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            min_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn with_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.min_delay_ms = min;
        self.max_delay_ms = max;
        self
    }

    /// Delay to sleep before the next attempt, or `None` when disabled
    fn next_delay(&self) -> Option<Duration> {
        if self.max_delay_ms == 0 {
            return None;
        }

        let ms = if self.min_delay_ms >= self.max_delay_ms {
            self.max_delay_ms
        } else {
            rand::thread_rng().gen_range(self.min_delay_ms..=self.max_delay_ms)
        };
        Some(Duration::from_millis(ms))
    }
}

/// Run one session: `config.count` sequential submission attempts.
///
/// Each attempt takes the next proxy from the cursor (none when the list is
/// empty), submits once, and appends exactly one status line to the run
/// log. Failed attempts are counted and the loop continues; the loop always
/// terminates after the requested number of attempts.
pub async fn run_session(
    submitter: &FormSubmitter,
    cursor: &mut ProxyCursor,
    run_log: &mut RunLog,
    config: &RunnerConfig,
) -> Result<SessionStats> {
    let mut stats = SessionStats::new(config.count);

    for attempt in 1..=config.count {
        let proxy = cursor.next();
        if let Some(ref proxy) = proxy {
            log::debug!("attempt {} routed via {}", attempt, proxy);
        }

        let outcome = submitter.submit(proxy.as_ref()).await;
        stats.record(&outcome);

        let line = format!("Attempt {}/{}: {}", attempt, config.count, outcome.describe());
        println!("{}", line);
        run_log.record(&line)?;

        if attempt < config.count {
            if let Some(delay) = config.next_delay() {
                log::debug!("sleeping {:?} before next attempt", delay);
                tokio::time::sleep(delay).await;
            }
        }
    }

    stats.finish();
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::RotationStrategy;
    use crate::session::submitter::SubmitterConfig;
    use reqwest::Url;
    use std::fs;
    use std::path::PathBuf;

    #[test]
    fn test_no_delay_when_disabled() {
        let config = RunnerConfig::new(5);
        assert!(config.next_delay().is_none());
    }

    #[test]
    fn test_fixed_delay_when_bounds_equal() {
        let config = RunnerConfig::new(5).with_delay_ms(250, 250);
        assert_eq!(config.next_delay(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_delay_stays_in_range() {
        let config = RunnerConfig::new(5).with_delay_ms(100, 200);
        for _ in 0..50 {
            let delay = config.next_delay().unwrap();
            assert!(delay >= Duration::from_millis(100));
            assert!(delay <= Duration::from_millis(200));
        }
    }

    fn temp_log(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("form_runner_runner_{}_{}", std::process::id(), name))
    }

    // The endpoint is a closed local port, so every attempt fails fast; the
    // loop must still make exactly `count` attempts and log each one.
    #[tokio::test]
    async fn test_failed_attempts_are_counted_and_logged() {
        let submitter = FormSubmitter::with_config(
            Url::parse("http://127.0.0.1:1/submit").unwrap(),
            "Yes".to_string(),
            SubmitterConfig::new().with_timeout(Duration::from_secs(2)),
        );
        let mut cursor = ProxyCursor::new(Vec::new(), RotationStrategy::RoundRobin);
        let path = temp_log("failures.txt");
        let mut run_log = RunLog::create(&path).unwrap();
        let config = RunnerConfig::new(3);

        let stats = run_session(&submitter, &mut cursor, &mut run_log, &config)
            .await
            .unwrap();

        assert_eq!(stats.attempts(), 3);
        assert_eq!(stats.succeeded, 0);
        assert_eq!(stats.failed, 3);
        assert_eq!(stats.remaining(), 3);

        let content = fs::read_to_string(&path).unwrap();
        let attempt_lines = content
            .lines()
            .filter(|line| line.starts_with('['))
            .count();
        assert_eq!(attempt_lines, 3);

        fs::remove_file(&path).ok();
    }
}
