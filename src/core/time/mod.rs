//=========================================================================
// Time Subsystem
//=========================================================================
//
// Clock sources, per-iteration accounting and frame-rate limiting.
//
// Flow (one loop iteration):
//   FrameClock::now_millis() → FrameTimer::tick() → ... → FrameLimiter::throttle()
//
//=========================================================================

//=== Module Declarations =================================================

mod clock;
mod frame_timer;
mod limiter;

//=== Public API ==========================================================

pub use clock::{FrameClock, ManualClock, SystemClock};
pub use frame_timer::{FrameTime, FrameTimer};
pub use limiter::FrameLimiter;
