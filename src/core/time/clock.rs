//=========================================================================
// Frame Clocks
//=========================================================================
//
// Timestamp sources for the loop controller.
//
// Architecture:
//   FrameClock (trait)
//     ├─ SystemClock: Instant-based, real sleeps
//     └─ ManualClock: synthetic time, sleeps advance the clock
//
// Timestamps are milliseconds since an arbitrary per-clock epoch and
// never decrease.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

//=== FrameClock ==========================================================

/// Monotonic time source owned by the loop controller.
///
/// `sleep` is the only place the loop yields to the host scheduler, so it
/// lives on the clock: a synthetic clock can then advance its own time
/// instead of blocking the test thread.
pub trait FrameClock {
    /// Milliseconds since this clock's epoch. Never decreases.
    fn now_millis(&self) -> u64;

    /// Blocks the calling thread for roughly `duration`.
    fn sleep(&self, duration: Duration);

    /// Gives up the remainder of the time slice without sleeping.
    fn yield_now(&self) {
        thread::yield_now();
    }
}

//=== SystemClock =========================================================

/// Wall-clock time based on [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock for SystemClock {
    fn now_millis(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}

//=== ManualClock =========================================================

/// Deterministic clock driven by the caller.
///
/// Cloning shares the underlying time, so a test can keep one handle while
/// the engine owns another. `sleep` advances time by the requested amount
/// and records the request.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    inner: Arc<ManualClockInner>,
}

#[derive(Debug, Default)]
struct ManualClockInner {
    nanos: AtomicU64,
    sleeps: Mutex<Vec<Duration>>,
    yields: AtomicU64,
}

impl ManualClock {
    /// Creates a clock at t = 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock at the given millisecond timestamp.
    pub fn starting_at(millis: u64) -> Self {
        let clock = Self::new();
        clock.set_millis(millis);
        clock
    }

    /// Moves time forward.
    pub fn advance(&self, duration: Duration) {
        self.inner
            .nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Moves time forward by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Jumps to an absolute timestamp.
    ///
    /// Going backwards is allowed here on purpose: it lets tests check that
    /// the frame timer never produces a negative delta.
    pub fn set_millis(&self, millis: u64) {
        self.inner
            .nanos
            .store(millis.saturating_mul(1_000_000), Ordering::SeqCst);
    }

    /// Every duration passed to `sleep`, in call order.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.inner
            .sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of `yield_now` calls.
    pub fn yields(&self) -> u64 {
        self.inner.yields.load(Ordering::SeqCst)
    }
}

impl FrameClock for ManualClock {
    fn now_millis(&self) -> u64 {
        self.inner.nanos.load(Ordering::SeqCst) / 1_000_000
    }

    fn sleep(&self, duration: Duration) {
        self.inner
            .sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
        self.advance(duration);
    }

    fn yield_now(&self) {
        self.inner.yields.fetch_add(1, Ordering::SeqCst);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_non_decreasing() {
        let clock = SystemClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_millis(), 0);
    }

    #[test]
    fn manual_clock_advance_is_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();

        handle.advance_millis(250);

        assert_eq!(clock.now_millis(), 250);
    }

    #[test]
    fn manual_clock_sleep_advances_and_records() {
        let clock = ManualClock::starting_at(1_000);

        clock.sleep(Duration::from_millis(16));
        clock.sleep(Duration::from_millis(4));

        assert_eq!(clock.now_millis(), 1_020);
        assert_eq!(
            clock.sleeps(),
            vec![Duration::from_millis(16), Duration::from_millis(4)]
        );
    }

    #[test]
    fn manual_clock_keeps_sub_millisecond_precision() {
        let clock = ManualClock::new();

        clock.advance(Duration::from_micros(600));
        assert_eq!(clock.now_millis(), 0);

        clock.advance(Duration::from_micros(600));
        assert_eq!(clock.now_millis(), 1);
    }

    #[test]
    fn manual_clock_counts_yields() {
        let clock = ManualClock::new();
        clock.yield_now();
        clock.yield_now();
        assert_eq!(clock.yields(), 2);
        assert_eq!(clock.now_millis(), 0);
    }
}
