use chrono::{DateTime, Duration, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// High-water mark: once more keys than this are tracked, the next check
/// sweeps out expired windows before it runs.
const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub allowed: bool,
    pub remaining: u32,
    /// Absolute end of the current window, unchanged on denial.
    pub reset_at: DateTime<Utc>,
}

impl Verdict {
    /// Whole seconds until the window resets, for Retry-After style hints.
    /// Never negative; a denial inside the current second reports 1.
    pub fn retry_after_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.reset_at - now).num_seconds().max(1)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Fixed-window rate limiter over process-local state.
///
/// Keys are caller-constructed, typically `client_ip:class`; the limiter is
/// bucket-agnostic and only sees the composite string. Each key's
/// read-modify-write runs under that key's shard entry guard, so a window
/// never admits more than `limit` requests even when checks race. Limits are
/// per-process by design; cross-instance coordination is a non-goal.
///
/// Construct one per application state (it is not a global), and prefer
/// [`RateLimiter::check_at`] in tests so expiry is driven by an explicit
/// clock instead of the wall clock.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    max_entries: usize,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Limiter that sweeps once more than `max_entries` keys are tracked.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            windows: DashMap::new(),
            max_entries,
        }
    }

    /// Count one request against `key` at the wall clock.
    pub fn check(&self, key: &str, limit: u32, window: Duration) -> Verdict {
        self.check_at(key, limit, window, Utc::now())
    }

    /// Count one request against `key` at an explicit instant.
    ///
    /// Window expired or absent: a fresh window starts with count 1 and the
    /// request is allowed. At or over `limit`: denied, `reset_at` unchanged.
    /// Otherwise: the count bumps in place and the request is allowed.
    pub fn check_at(
        &self,
        key: &str,
        limit: u32,
        window: Duration,
        now: DateTime<Utc>,
    ) -> Verdict {
        // Sweep before taking the entry guard: retain locks every shard and
        // would deadlock against a held guard.
        if self.windows.len() > self.max_entries {
            self.sweep(now);
        }

        match self.windows.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                let entry = occupied.get_mut();

                if entry.reset_at <= now {
                    // Expired window folds back to absent: start fresh.
                    *entry = Window {
                        count: 1,
                        reset_at: now + window,
                    };
                    return Verdict {
                        allowed: true,
                        remaining: limit.saturating_sub(1),
                        reset_at: entry.reset_at,
                    };
                }

                if entry.count >= limit {
                    return Verdict {
                        allowed: false,
                        remaining: 0,
                        reset_at: entry.reset_at,
                    };
                }

                entry.count += 1;
                Verdict {
                    allowed: true,
                    remaining: limit.saturating_sub(entry.count),
                    reset_at: entry.reset_at,
                }
            }
            Entry::Vacant(vacant) => {
                let reset_at = now + window;
                vacant.insert(Window { count: 1, reset_at });
                Verdict {
                    allowed: true,
                    remaining: limit.saturating_sub(1),
                    reset_at,
                }
            }
        }
    }

    /// Drop every expired window. Entries still inside their window survive
    /// even when the store is over the high-water mark.
    fn sweep(&self, now: DateTime<Utc>) {
        self.windows.retain(|_, w| w.reset_at > now);
    }

    /// Number of tracked keys; expired entries linger until the next sweep.
    pub fn tracked_keys(&self) -> usize {
        self.windows.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
