//=========================================================================
// Engine Handle
//=========================================================================
//
// Shared control surface for a running engine.
//
// Both fields are plain atomics: a stop request or a new frame-rate
// target written from any thread (or from a collaborator mid-frame) is
// observed by the loop at the top of its next iteration. Repeated writes
// coalesce; the last writer wins.
//
// A stop also sets a latch, so a request that lands before `run()`
// (e.g. a signal handler firing during startup) is not lost when the
// loop raises the running flag.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use log::debug;

//=== Internal Dependencies ===============================================

use crate::error::EngineError;

//=== EngineHandle ========================================================

/// Cloneable, thread-safe handle for stopping the loop or changing its rate.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    running: AtomicBool,
    stop_requested: AtomicBool,
    target_fps: AtomicU32,
}

impl EngineHandle {
    pub(crate) fn new(target_fps: u32) -> Self {
        Self {
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                stop_requested: AtomicBool::new(false),
                target_fps: AtomicU32::new(target_fps),
            }),
        }
    }

    //--- Running Flag -----------------------------------------------------

    /// Requests the loop to end after the current iteration. Idempotent.
    pub fn stop(&self) {
        self.shared.stop_requested.store(true, Ordering::SeqCst);
        if self.shared.running.swap(false, Ordering::SeqCst) {
            debug!(target: "engine", "Stop requested");
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    /// Whether `stop` has ever been called on this engine.
    pub fn is_stop_requested(&self) -> bool {
        self.shared.stop_requested.load(Ordering::SeqCst)
    }

    /// Raises the running flag unless a stop is already latched.
    ///
    /// Returns whether the loop may start.
    pub(crate) fn start(&self) -> bool {
        self.shared.running.store(true, Ordering::SeqCst);
        if self.is_stop_requested() {
            // A concurrent stop may have landed between the two stores.
            self.shared.running.store(false, Ordering::SeqCst);
            return false;
        }
        true
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.shared.running.store(running, Ordering::SeqCst);
    }

    //--- Frame Rate -------------------------------------------------------

    /// Replaces the throttling target, effective from the next iteration.
    ///
    /// Zero is rejected and the previous target stays in effect.
    pub fn set_target_fps(&self, fps: u32) -> Result<(), EngineError> {
        if fps == 0 {
            return Err(EngineError::InvalidFrameRate(fps));
        }
        self.shared.target_fps.store(fps, Ordering::SeqCst);
        Ok(())
    }

    pub fn target_fps(&self) -> u32 {
        self.shared.target_fps.load(Ordering::SeqCst)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn handle_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineHandle>();
    }

    #[test]
    fn stop_is_idempotent() {
        let handle = EngineHandle::new(60);
        handle.set_running(true);

        handle.stop();
        handle.stop();

        assert!(!handle.is_running());
    }

    #[test]
    fn stop_before_start_is_latched() {
        let handle = EngineHandle::new(60);

        handle.stop();

        assert!(handle.is_stop_requested());
        assert!(!handle.start());
        assert!(!handle.is_running());
    }

    #[test]
    fn start_without_stop_raises_running() {
        let handle = EngineHandle::new(60);

        assert!(handle.start());
        assert!(handle.is_running());
        assert!(!handle.is_stop_requested());
    }

    #[test]
    fn last_rate_wins() {
        let handle = EngineHandle::new(60);
        handle.set_target_fps(30).unwrap();
        handle.set_target_fps(120).unwrap();
        assert_eq!(handle.target_fps(), 120);
    }

    #[test]
    fn zero_rate_is_rejected() {
        let handle = EngineHandle::new(60);
        assert!(matches!(handle.set_target_fps(0), Err(EngineError::InvalidFrameRate(0))));
        assert_eq!(handle.target_fps(), 60);
    }

    #[test]
    fn clones_share_state_across_threads() {
        let handle = EngineHandle::new(60);
        handle.set_running(true);

        let remote = handle.clone();
        thread::spawn(move || remote.stop()).join().unwrap();

        assert!(!handle.is_running());
    }
}
