//=========================================================================
// Engine State
//=========================================================================

//=== Lifecycle ===========================================================

/// Engine lifecycle: `Created → Running → Stopped`.
///
/// `Stopped` is terminal; cleanup has run and the engine cannot restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Running,
    Stopped,
}

//=== EngineState =========================================================

/// Snapshot of the loop's observable state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineState {
    pub running: bool,
    /// Seconds between the last two iteration starts.
    pub delta_time: f64,
    /// Sum of all deltas so far, in seconds.
    pub total_time: f64,
    pub target_frame_rate: u32,
    /// Iterations completed or in progress.
    pub frame_count: u64,
}
