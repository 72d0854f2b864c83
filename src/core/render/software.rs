//=========================================================================
// Software Renderer
//=========================================================================
//
// CPU framebuffer with a back buffer (drawn into) and a front buffer
// (last presented frame). Pixels are packed `0xAARRGGBB`.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use super::{Color, Rect, RenderTarget, Renderer, Vec2};
use crate::error::RenderError;

//=== SoftwareRenderer ====================================================

#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    width: u32,
    height: u32,
    back: Vec<u32>,
    front: Vec<u32>,
    clear_color: Color,
    camera: Vec2,
    frames_presented: u64,
}

impl SoftwareRenderer {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }

        let len = width as usize * height as usize;
        Ok(Self {
            width,
            height,
            back: vec![Color::BLACK.to_argb(); len],
            front: vec![Color::BLACK.to_argb(); len],
            clear_color: Color::BLACK,
            camera: Vec2::ZERO,
            frames_presented: 0,
        })
    }

    //--- Configuration ----------------------------------------------------

    pub fn set_clear_color(&mut self, color: Color) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn set_camera(&mut self, position: Vec2) {
        self.camera = position;
    }

    //--- Inspection -------------------------------------------------------

    /// Pixel of the last presented frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.index(x, y).map(|i| Color::from_argb(self.front[i]))
    }

    /// Last presented frame, row-major.
    pub fn front_buffer(&self) -> &[u32] {
        &self.front
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    //--- Internal Helpers -------------------------------------------------

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    // Clips to the surface; returns (x0, y0, x1, y1) exclusive, or None.
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.x.max(0.0).floor();
        let y0 = rect.y.max(0.0).floor();
        let x1 = rect.right().min(self.width as f32).ceil();
        let y1 = rect.bottom().min(self.height as f32).ceil();

        (x0 < x1 && y0 < y1).then(|| (x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }

    // Writes one back-buffer pixel; off-surface coordinates are dropped.
    fn put(&mut self, x: i64, y: i64, argb: u32) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if let Some(i) = self.index(x, y) {
            self.back[i] = argb;
        }
    }
}

impl RenderTarget for SoftwareRenderer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };

        let argb = color.to_argb();
        let stride = self.width as usize;
        for y in y0..y1 {
            let row = y as usize * stride;
            self.back[row + x0 as usize..row + x1 as usize].fill(argb);
        }
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return;
        }

        let argb = color.to_argb();
        let left = rect.x.floor() as i64;
        let top = rect.y.floor() as i64;
        let right = rect.right().ceil() as i64 - 1;
        let bottom = rect.bottom().ceil() as i64 - 1;

        for x in left..=right {
            self.put(x, top, argb);
            self.put(x, bottom, argb);
        }
        for y in top..=bottom {
            self.put(left, y, argb);
            self.put(right, y, argb);
        }
    }

    fn camera(&self) -> Vec2 {
        self.camera
    }
}

impl Renderer for SoftwareRenderer {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.back.fill(self.clear_color.to_argb());
        Ok(())
    }

    fn present(&mut self) -> Result<(), RenderError> {
        std::mem::swap(&mut self.front, &mut self.back);
        self.frames_presented += 1;
        trace!(target: "engine", "Presented frame {}", self.frames_presented);
        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
