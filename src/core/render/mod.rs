//=========================================================================
// Render System
//=========================================================================
//
// Render target contracts and the default CPU renderer.
//
// Per iteration: Renderer::clear() → Scene render(&mut dyn RenderTarget)
// → Renderer::present(). Scenes only see the draw-only `RenderTarget`,
// so they cannot clear or flip the frame themselves.
//
//=========================================================================

//=== Module Declarations =================================================

mod software;
mod types;

//=== Public API ==========================================================

pub use software::SoftwareRenderer;
pub use types::{Color, Rect, Vec2};

use crate::error::RenderError;

//=== RenderTarget ========================================================

/// Draw-only surface handed to scenes during the render phase.
///
/// Coordinates are screen pixels; use the camera helpers for world space.
pub trait RenderTarget {
    /// Surface size in pixels.
    fn size(&self) -> (u32, u32);

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// One-pixel outline.
    fn draw_rect(&mut self, rect: Rect, color: Color);

    /// World-space position shown at the top-left corner.
    fn camera(&self) -> Vec2;

    fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.camera()
    }

    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.camera()
    }
}

//=== Renderer ============================================================

/// Frame-bracketing renderer owned by the engine.
pub trait Renderer: RenderTarget {
    /// Resets the back buffer for a new frame.
    fn clear(&mut self) -> Result<(), RenderError>;

    /// Makes the frame visible (buffer swap).
    fn present(&mut self) -> Result<(), RenderError>;
}
