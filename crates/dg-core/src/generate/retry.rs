//! Two-tier deadline shared by every strategy
//!
//! An attempt that runs past `duration_before_retry` is thrown away and
//! restarted; the whole call fails once `duration_before_error` has passed
//! since the first attempt began.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use strum::Display;

use crate::config::GenConfig;
use crate::error::{GenError, Result};
use crate::grid::Grid;

use super::Strategy;

/// Why an attempt was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RetryReason {
    /// The attempt ran past `duration_before_retry`
    Stalled,
    /// Random walk finished with a gap across its midline
    NotConvex,
    /// Organic dungeon could not place its first room
    FirstRoomRejected,
}

/// How one attempt ended, short of a fatal error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Done,
    Retry(RetryReason),
}

/// Summary of a successful generation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationReport {
    pub strategy: Strategy,
    /// Attempts started, including the successful one
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Clock for one generation call
#[derive(Debug, Clone)]
pub struct RetryClock {
    gen_start: Instant,
    attempt_start: Instant,
    retry_after: Duration,
    error_after: Duration,
    attempts: u32,
}

impl RetryClock {
    pub fn start(config: &GenConfig) -> Self {
        let now = Instant::now();
        Self {
            gen_start: now,
            attempt_start: now,
            retry_after: config.duration_before_retry,
            error_after: config.duration_before_error,
            attempts: 0,
        }
    }

    /// Mark the start of a fresh attempt
    pub fn begin_attempt(&mut self) {
        self.attempt_start = Instant::now();
        self.attempts += 1;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn elapsed(&self) -> Duration {
        self.gen_start.elapsed()
    }

    /// Fail once the whole call has run out of time
    pub fn check_total(&self) -> Result<()> {
        let elapsed = self.elapsed();
        if elapsed > self.error_after {
            return Err(GenError::GenerationTimeout {
                elapsed,
                attempts: self.attempts,
            });
        }
        Ok(())
    }

    /// Called at every unit of progress inside an attempt
    ///
    /// `Err` ends the call, `Some` ends the attempt, `None` carries on.
    pub fn tick(&self) -> Result<Option<RetryReason>> {
        self.check_total()?;
        if self.attempt_start.elapsed() > self.retry_after {
            return Ok(Some(RetryReason::Stalled));
        }
        Ok(None)
    }
}

/// Run `attempt` against a freshly cleared grid until it succeeds or fails fatally
///
/// Each pass of the loop is one attempt; nothing recurses, so the retry count
/// only costs time.
pub(crate) fn run_with_retries<F>(
    grid: &mut Grid,
    strategy: Strategy,
    mut attempt: F,
) -> Result<GenerationReport>
where
    F: FnMut(&mut Grid, &RetryClock) -> Result<Attempt>,
{
    let loud = grid.config.show_error_messages;
    let mut clock = RetryClock::start(&grid.config);
    loop {
        clock.check_total()?;
        grid.clear();
        clock.begin_attempt();
        match attempt(grid, &clock)? {
            Attempt::Done => {
                let report = GenerationReport {
                    strategy,
                    attempts: clock.attempts(),
                    elapsed: clock.elapsed(),
                };
                info!(
                    "{strategy}: done after {} attempt(s) in {:?}",
                    report.attempts, report.elapsed
                );
                return Ok(report);
            }
            Attempt::Retry(reason) => {
                let attempts = clock.attempts();
                if loud {
                    warn!("{strategy}: attempt {attempts} abandoned ({reason}), retrying");
                } else {
                    debug!("{strategy}: attempt {attempts} abandoned ({reason}), retrying");
                }
            }
        }
    }
}
