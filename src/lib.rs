//=========================================================================
// Tempo Engine — Library Root
//=========================================================================
//
// Single-threaded, frame-rate-limited game loop controller.
//
// Responsibilities:
// - Own the loop: time accounting, event dispatch, update, render, throttle
// - Coordinate pluggable collaborators (input, scenes, audio, renderer)
// - Guarantee ordered, exactly-once cleanup on every exit path
//
// Typical usage:
// ```no_run
// use tempo_engine::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     let mut engine = Engine::new(HeadlessPlatform::new(), 800, 600, "Demo")?;
//     engine.run()
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the collaborator contracts and their defaults.
// `platform` holds the display/event backends.
// `engine` is the loop controller itself.
//
pub mod core;
pub mod engine;
pub mod error;
pub mod logging;
pub mod platform;
pub mod prelude;

//--- Public Exports ------------------------------------------------------

pub use engine::{Engine, EngineBuilder, EngineHandle, EngineState, Lifecycle};
pub use error::EngineError;
