//! Bounded retry task
//!
//! The translation widget initializes on its own schedule, so applying a
//! language may have to be re-attempted. A [`RetryTask`] owns the attempt
//! budget; the event loop owns the timer and ticks the task on each interval.
//! The task id doubles as the cancellation token: the loop keeps its timer
//! armed only while a task with the same id is still pending.

use std::time::Duration;

/// How often and how many times to re-attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(250),
            max_attempts: 20,
        }
    }
}

/// Identity of one retry loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryId(pub u64);

/// Result of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryStatus {
    /// No retry loop is running
    Idle,
    /// Attempt failed, budget remains
    Pending,
    /// Attempt succeeded; the loop is finished
    Succeeded,
    /// Attempt failed and the budget is spent; the loop is finished
    Exhausted,
}

/// Pending re-application of a language
#[derive(Debug, Clone)]
pub struct RetryTask {
    id: RetryId,
    lang: String,
    attempts_left: u32,
}

impl RetryTask {
    pub fn new(id: RetryId, lang: impl Into<String>, policy: &RetryPolicy) -> Self {
        Self {
            id,
            lang: lang.into(),
            attempts_left: policy.max_attempts,
        }
    }

    pub fn id(&self) -> RetryId {
        self.id
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    /// Spend one attempt
    ///
    /// The attempt still runs on the final tick; only a failure there
    /// exhausts the task. Ticking a finished task is a no-op.
    pub fn tick(&mut self, attempt: impl FnOnce(&str) -> bool) -> RetryStatus {
        if self.attempts_left == 0 {
            return RetryStatus::Exhausted;
        }
        self.attempts_left -= 1;

        if attempt(&self.lang) {
            self.attempts_left = 0;
            RetryStatus::Succeeded
        } else if self.attempts_left == 0 {
            RetryStatus::Exhausted
        } else {
            RetryStatus::Pending
        }
    }
}
