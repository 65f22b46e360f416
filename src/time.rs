use chrono::{DateTime, SubsecRound, Utc};

/// Source of "now" for timestamping new rows. Tests swap in a fixed clock.
pub trait TimeProvider: Send + Sync {
    /// Current UTC instant, truncated to whole seconds.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(0)
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeProvider {
    now: DateTime<Utc>,
}

impl FixedTimeProvider {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: now.trunc_subsecs(0),
        }
    }
}

impl TimeProvider for FixedTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }
}
