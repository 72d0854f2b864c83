//=========================================================================
// Frame Timer
//=========================================================================
//
// Per-iteration time accounting.
//
// Invariants:
// - delta_time(n) = (ts(n) - ts(n-1)) / 1000, never negative
// - total_time    = exact running sum of every delta_time produced
// - a timestamp earlier than the previous one is treated as "no time passed"
//
//=========================================================================

//=== FrameTime ===========================================================

/// Timing snapshot for one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous iteration started.
    pub delta_time: f64,

    /// Sum of every `delta_time` so far, in seconds.
    pub total_time: f64,

    /// Zero-based index of this iteration.
    pub frame_index: u64,

    /// Clock reading (ms) at the start of this iteration.
    pub timestamp_ms: u64,
}

//=== FrameTimer ==========================================================

/// Converts raw clock readings into [`FrameTime`] snapshots.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last_ms: Option<u64>,
    delta_time: f64,
    total_time: f64,
    frames: u64,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the baseline the first `tick` is measured against.
    pub fn start(&mut self, now_ms: u64) {
        self.last_ms = Some(now_ms);
    }

    /// Advances one iteration.
    ///
    /// Without a baseline the first delta is zero.
    pub fn tick(&mut self, now_ms: u64) -> FrameTime {
        let last = self.last_ms.unwrap_or(now_ms);
        let current = now_ms.max(last);

        self.last_ms = Some(current);
        self.delta_time = (current - last) as f64 / 1000.0;
        self.total_time += self.delta_time;

        let frame = FrameTime {
            delta_time: self.delta_time,
            total_time: self.total_time,
            frame_index: self.frames,
            timestamp_ms: current,
        };

        self.frames += 1;
        frame
    }

    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Number of completed `tick` calls.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Timestamp of the most recent tick (or the baseline).
    pub fn last_timestamp(&self) -> Option<u64> {
        self.last_ms
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
