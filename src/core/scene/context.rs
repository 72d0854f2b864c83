//=========================================================================
// Scene Contexts
//=========================================================================
//
// FrameContext  - what the loop hands the scene system each update
// SceneContext  - what a single scene sees (frame + transition queue)
//
// Both borrow for the duration of one update call only.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::{SceneKey, SceneTransition, TransitionQueue};
use crate::core::input::InputState;
use crate::core::time::FrameTime;
use crate::engine::EngineHandle;

//=== FrameContext ========================================================

/// Per-iteration data passed to the scene system.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub time: FrameTime,
    pub input: &'a InputState,
    pub engine: &'a EngineHandle,
}

//=== SceneContext ========================================================

/// Per-scene view of the current frame.
pub struct SceneContext<'a, K: SceneKey> {
    frame: &'a FrameContext<'a>,
    transitions: &'a mut TransitionQueue<K>,
}

impl<'a, K: SceneKey> SceneContext<'a, K> {
    pub fn new(frame: &'a FrameContext<'a>, transitions: &'a mut TransitionQueue<K>) -> Self {
        Self { frame, transitions }
    }

    //--- Timing -----------------------------------------------------------

    /// Seconds since the previous iteration.
    pub fn delta_time(&self) -> f64 {
        self.frame.time.delta_time
    }

    pub fn total_time(&self) -> f64 {
        self.frame.time.total_time
    }

    pub fn frame_index(&self) -> u64 {
        self.frame.time.frame_index
    }

    //--- Collaborators ----------------------------------------------------

    /// Input state, already updated with this frame's events.
    pub fn input(&self) -> &InputState {
        self.frame.input
    }

    /// Stop the loop or change its rate.
    pub fn engine(&self) -> &EngineHandle {
        self.frame.engine
    }

    //--- Transitions ------------------------------------------------------

    /// Queues a stack change, applied after this update pass.
    pub fn transition(&mut self, transition: SceneTransition<K>) {
        self.transitions.push(transition);
    }

    pub fn push_scene(&mut self, key: K) {
        self.transition(SceneTransition::Push(key));
    }

    pub fn remove_scene(&mut self, key: K) {
        self.transition(SceneTransition::Remove(key));
    }

    pub fn replace_scene(&mut self, old: K, new: K) {
        self.transition(SceneTransition::Replace(old, new));
    }
}
