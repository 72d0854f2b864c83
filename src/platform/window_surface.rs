//=========================================================================
// Window Surface
//=========================================================================
//
// Render surface handed out by `WinitPlatform`.
//
// Architecture:
// ```text
//  scenes draw → SoftwareRenderer (back) → present() swaps buffers
//                                           └─ front buffer → softbuffer
//                                              → OS window (visible)
// ```
//
// The canvas keeps the construction-time size. When the window's
// physical size differs (HiDPI, compositor decisions) the frame is
// scaled nearest-neighbour into the window buffer.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::num::NonZeroU32;
use std::sync::Arc;

use log::{debug, trace};
use softbuffer::{Context, Surface};
use winit::window::Window;

//=== Internal Dependencies ===============================================

use crate::core::render::{Color, Rect, RenderTarget, Renderer, SoftwareRenderer, Vec2};
use crate::error::{PlatformError, RenderError};

//=== Constants ===========================================================

/// softbuffer expects `0x00RRGGBB`; the top byte must stay clear.
const RGB_MASK: u32 = 0x00FF_FFFF;

//=== WindowSurface =======================================================

pub struct WindowSurface {
    canvas: SoftwareRenderer,
    window: Arc<Window>,
    surface: Surface<Arc<Window>, Arc<Window>>,
}

impl WindowSurface {
    pub(crate) fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, PlatformError> {
        let canvas =
            SoftwareRenderer::new(width, height).map_err(|err| PlatformError::SurfaceCreation(err.to_string()))?;

        let context =
            Context::new(Arc::clone(&window)).map_err(|err| PlatformError::SurfaceCreation(err.to_string()))?;
        let surface = Surface::new(&context, Arc::clone(&window))
            .map_err(|err| PlatformError::SurfaceCreation(err.to_string()))?;

        debug!(target: "platform", "Window surface attached: {}x{}", width, height);
        Ok(Self { canvas, window, surface })
    }

    /// CPU canvas the scenes draw into.
    pub fn canvas(&self) -> &SoftwareRenderer {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut SoftwareRenderer {
        &mut self.canvas
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    //--- Presentation -----------------------------------------------------

    /// Copies the canvas front buffer into the window.
    fn blit(&mut self) -> Result<(), RenderError> {
        let size = self.window.inner_size();
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) else {
            // Minimized: nothing to show this frame.
            trace!(target: "platform", "Window has zero size, frame skipped");
            return Ok(());
        };

        self.surface
            .resize(width, height)
            .map_err(|err| RenderError::SurfaceLost(err.to_string()))?;

        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|err| RenderError::SurfaceLost(err.to_string()))?;

        scale_into(
            self.canvas.front_buffer(),
            self.canvas.size(),
            &mut buffer,
            (width.get(), height.get()),
        );

        self.window.pre_present_notify();
        buffer.present().map_err(|err| RenderError::SurfaceLost(err.to_string()))
    }
}

impl RenderTarget for WindowSurface {
    fn size(&self) -> (u32, u32) {
        self.canvas.size()
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.canvas.fill_rect(rect, color);
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.canvas.draw_rect(rect, color);
    }

    fn camera(&self) -> Vec2 {
        self.canvas.camera()
    }
}

impl Renderer for WindowSurface {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.canvas.clear()
    }

    fn present(&mut self) -> Result<(), RenderError> {
        self.canvas.present()?;
        self.blit()
    }
}

//=== scale_into() ========================================================

/// Nearest-neighbour copy of an ARGB frame into a `0RGB` window buffer.
fn scale_into(src: &[u32], (src_w, src_h): (u32, u32), dst: &mut [u32], (dst_w, dst_h): (u32, u32)) {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return;
    }

    let (src_w, src_h) = (src_w as usize, src_h as usize);
    let (dst_w, dst_h) = (dst_w as usize, dst_h as usize);

    for (y, row) in dst.chunks_exact_mut(dst_w).take(dst_h).enumerate() {
        let sy = y * src_h / dst_h;
        let src_row = &src[sy * src_w..(sy + 1) * src_w];

        if src_w == dst_w {
            for (out, pixel) in row.iter_mut().zip(src_row) {
                *out = pixel & RGB_MASK;
            }
        } else {
            for (x, out) in row.iter_mut().enumerate() {
                *out = src_row[x * src_w / dst_w] & RGB_MASK;
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_size_copy_clears_alpha() {
        let src = [0xFF11_2233, 0x8044_5566];
        let mut dst = [0; 2];

        scale_into(&src, (2, 1), &mut dst, (2, 1));

        assert_eq!(dst, [0x0011_2233, 0x0044_5566]);
    }

    #[test]
    fn upscale_repeats_pixels() {
        let src = [1, 2, 3, 4];
        let mut dst = [0; 16];

        scale_into(&src, (2, 2), &mut dst, (4, 4));

        assert_eq!(dst, [1, 1, 2, 2, 1, 1, 2, 2, 3, 3, 4, 4, 3, 3, 4, 4]);
    }

    #[test]
    fn downscale_samples_pixels() {
        let src = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let mut dst = [0; 4];

        scale_into(&src, (4, 4), &mut dst, (2, 2));

        assert_eq!(dst, [1, 3, 9, 11]);
    }

    #[test]
    fn empty_source_leaves_destination_untouched() {
        let mut dst = [7; 4];
        scale_into(&[], (0, 0), &mut dst, (2, 2));
        assert_eq!(dst, [7; 4]);
    }
}
