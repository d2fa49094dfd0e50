//! The shared throttle that paces the writer pool.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// How often the admission tally is compared against the target rate.
const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// A blocking throttle capping the aggregate operation rate of the pool.
///
/// Writers call [`admit`](Self::admit) after each completed operation.
/// Admissions accumulate in a shared window; once per check interval the
/// tally is compared against the target rate and the calling writer sleeps
/// off any excess. The sleep happens with the window lock held, so other
/// writers cannot slip extra operations into a window that is already over
/// target.
///
/// The throttle only ever slows callers down. A pool running behind the
/// target is never sped up or credited retroactively.
#[derive(Debug)]
pub struct Throttler {
    rate: f64,
    check_interval: Duration,
    window: Mutex<Window>,
}

#[derive(Debug)]
struct Window {
    admitted: f64,
    started_at: Instant,
}

impl Throttler {
    /// Creates a throttle targeting `rate` operations per second.
    ///
    /// `rate` must be positive.
    pub fn new(rate: f64) -> Self {
        Self::with_check_interval(rate, DEFAULT_CHECK_INTERVAL)
    }

    /// Creates a throttle that evaluates its window every `check_interval`.
    pub fn with_check_interval(rate: f64, check_interval: Duration) -> Self {
        debug_assert!(rate > 0.0);
        Self {
            rate,
            check_interval,
            window: Mutex::new(Window {
                admitted: 0.0,
                started_at: Instant::now(),
            }),
        }
    }

    /// Records `units` completed operations, sleeping if the pool is over
    /// target.
    ///
    /// Between checks this is a single lock and an add; the rate comparison
    /// and any sleep only happen once a full check interval has elapsed.
    pub fn admit(&self, units: u64) {
        // NB: We intentionally unwrap and crash on a poisoned lock.
        let mut window = self.window.lock().unwrap();
        window.admitted += units as f64;

        let now = Instant::now();
        let elapsed = now.duration_since(window.started_at);
        if elapsed < self.check_interval {
            return;
        }

        let expected = self.rate * elapsed.as_secs_f64();
        if window.admitted > expected {
            let excess = window.admitted - expected;
            thread::sleep(Duration::from_secs_f64(excess / self.rate));
        }

        // The next window starts at the check, not after the sleep, so time
        // spent sleeping counts towards the following window.
        window.admitted = 0.0;
        window.started_at = now;
    }
}
