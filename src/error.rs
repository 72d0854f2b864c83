//=========================================================================
// Engine Errors
//=========================================================================
//
// Error taxonomy for the whole crate.
//
// Policy: fail fast, always clean up.
// - Initialization failures abort construction (no partial engine)
// - Per-frame collaborator failures end the loop; cleanup still runs
// - Invalid configuration is rejected at the point of call, never clamped
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== EngineError =========================================================

/// Top-level error returned by [`crate::Engine`] and its builder.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero.
    #[error("invalid window dimensions {width}x{height}: both must be positive")]
    InvalidDimensions { width: u32, height: u32 },

    /// Target frame rate was zero.
    #[error("invalid target frame rate {0}: must be positive")]
    InvalidFrameRate(u32),

    /// `run()` was called while the loop is already executing.
    #[error("engine is already running")]
    AlreadyRunning,

    /// `run()` was called after cleanup; a stopped engine cannot restart.
    #[error("engine has been stopped and cleaned up; it cannot be restarted")]
    AlreadyStopped,

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

//=== PlatformError =======================================================

/// Display/event backend failures. Always fatal.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue, or created twice).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// The display surface could not be acquired.
    #[error("display surface creation failed: {0}")]
    SurfaceCreation(String),

    /// `open()` was called on a platform that already owns a surface.
    #[error("platform already has an open display surface")]
    AlreadyOpen,
}

//=== ConfigError =========================================================

/// Configuration load/save/validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

//=== AudioError ==========================================================

/// Audio device and asset failures.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device could not be opened: {0}")]
    DeviceOpen(String),

    #[error("audio device is not open")]
    DeviceClosed,

    #[error("failed to load audio asset: {0}")]
    Load(#[from] ResourceError),

    #[error("no audio registered under `{0}`")]
    UnknownAsset(String),

    #[error("channel {channel} out of range (device has {available} channels)")]
    InvalidChannel { channel: usize, available: usize },
}

//=== RenderError =========================================================

/// Renderer failures during clear/present.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render surface lost: {0}")]
    SurfaceLost(String),

    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

//=== SceneError ==========================================================

/// Failure reported by a scene during update or render.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene {scene} failed: {message}")]
    Failed { scene: String, message: String },
}

impl SceneError {
    /// Convenience constructor used by scene implementations.
    pub fn failed(scene: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            scene: scene.into(),
            message: message.into(),
        }
    }
}

//=== ResourceError =======================================================

/// Asset loading failures.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to load asset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("asset {0} is empty")]
    Empty(PathBuf),
}

//=========================================================================
// Unit Tests
//=========================================================================
