//=========================================================================
// Frame Limiter
//=========================================================================
//
// Best-effort frame-rate cap.
//
// Each iteration has a budget of 1/target_fps seconds measured from the
// iteration's start timestamp. Time left in the budget is slept away;
// an iteration that overran the budget yields instead, so the loop never
// spins without giving the scheduler a chance.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::FrameClock;

//=== FrameLimiter ========================================================

/// Sleeps so that iterations do not exceed a target rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimiter {
    target_fps: u32,
}

impl FrameLimiter {
    /// Creates a limiter.
    ///
    /// # Panics
    ///
    /// Panics if `target_fps == 0`; callers validate before constructing.
    pub fn new(target_fps: u32) -> Self {
        assert!(target_fps > 0, "Target FPS must be positive, got {}", target_fps);
        Self { target_fps }
    }

    pub fn target_fps(&self) -> u32 {
        self.target_fps
    }

    /// Replaces the target rate. Zero is ignored.
    pub fn set_target_fps(&mut self, target_fps: u32) {
        if target_fps > 0 {
            self.target_fps = target_fps;
        }
    }

    /// Time allotted to one iteration.
    pub fn frame_budget(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_fps as f64)
    }

    /// Budget left after `elapsed`, or zero when the frame overran.
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.frame_budget().saturating_sub(elapsed)
    }

    /// Ends an iteration that started at `frame_start_ms`.
    ///
    /// Returns the duration slept (zero if the loop only yielded).
    pub fn throttle<C>(&self, clock: &C, frame_start_ms: u64) -> Duration
    where
        C: FrameClock + ?Sized,
    {
        let now = clock.now_millis();
        let elapsed = Duration::from_millis(now.saturating_sub(frame_start_ms));
        let sleep = self.remaining(elapsed);

        if sleep.is_zero() {
            clock.yield_now();
        } else {
            clock.sleep(sleep);
        }

        sleep
    }
}

impl Default for FrameLimiter {
    fn default() -> Self {
        Self::new(60)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::ManualClock;

    #[test]
    fn budget_matches_target_rate() {
        assert_eq!(FrameLimiter::new(1).frame_budget(), Duration::from_secs(1));
        assert_eq!(FrameLimiter::new(50).frame_budget(), Duration::from_millis(20));
    }

    #[test]
    #[should_panic(expected = "Target FPS must be positive")]
    fn zero_target_panics() {
        FrameLimiter::new(0);
    }

    #[test]
    fn set_target_ignores_zero() {
        let mut limiter = FrameLimiter::new(30);
        limiter.set_target_fps(0);
        assert_eq!(limiter.target_fps(), 30);
        limiter.set_target_fps(120);
        assert_eq!(limiter.target_fps(), 120);
    }

    #[test]
    fn throttle_sleeps_remaining_budget() {
        let clock = ManualClock::new();
        let limiter = FrameLimiter::new(50);

        clock.advance_millis(5);
        let slept = limiter.throttle(&clock, 0);

        assert_eq!(slept, Duration::from_millis(15));
        assert_eq!(clock.now_millis(), 20);
        assert_eq!(clock.yields(), 0);
    }

    #[test]
    fn throttle_yields_when_frame_overran() {
        let clock = ManualClock::new();
        let limiter = FrameLimiter::new(50);

        clock.advance_millis(35);
        let slept = limiter.throttle(&clock, 0);

        assert_eq!(slept, Duration::ZERO);
        assert!(clock.sleeps().is_empty());
        assert_eq!(clock.yields(), 1);
    }

    #[test]
    fn remaining_saturates_at_zero() {
        let limiter = FrameLimiter::new(100);
        assert_eq!(limiter.remaining(Duration::from_secs(1)), Duration::ZERO);
    }
}
