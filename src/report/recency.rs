use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_DAY: u64 = 24 * 60 * 60 * 1000;

/// Trailing 24-hour window with a cutoff fixed once per run
#[derive(Debug, Clone, Copy)]
pub struct RecencyWindow {
    cutoff: DateTime<Utc>,
}

impl RecencyWindow {
    pub fn last_24h(now: DateTime<Utc>) -> Self {
        Self {
            cutoff: now - Duration::hours(24),
        }
    }

    /// Inclusive of the cutoff itself; timestamps ahead of `now` also count
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.cutoff
    }
}

/// Whole days a PR has been open, rounded up and never below one
pub fn days_open(created_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let elapsed = (now - created_at).num_milliseconds().unsigned_abs();
    elapsed.div_ceil(MILLIS_PER_DAY).max(1)
}
