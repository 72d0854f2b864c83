//=========================================================================
// Audio System
//=========================================================================
//
// Audio contract consumed by the frame loop, plus the default manager.
//
// The loop calls `update` once per iteration after the scene update, and
// `cleanup` exactly once at shutdown, before the platform is released.
//
//=========================================================================

//=== Module Declarations =================================================

mod device;
mod manager;

//=== Public API ==========================================================

pub use device::{AudioDevice, Loop, MusicState, SilentAudioDevice};
pub use manager::AudioManager;

//=== AudioSystem =========================================================

/// Audio collaborator driven by the engine loop.
pub trait AudioSystem {
    /// Advances playback bookkeeping.
    fn update(&mut self);

    /// Releases the audio device. Safe when nothing was ever acquired.
    fn cleanup(&mut self);
}
