//! Fixed-size logical drawing surface.
//!
//! The game draws in a 320×480 pixel space.  A [`Viewport`] fits that space
//! into the terminal, preserving its aspect ratio and letterboxing whatever is
//! left over; a [`Canvas`] holds one colour per viewport pixel.  Terminal
//! cells are about twice as tall as wide, so each cell shows two vertically
//! stacked pixels (rendered with a `▀` half block).

use crate::config::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::entities::Rgb;

/// Placement of the canvas inside the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Left-most terminal column of the canvas.
    pub col: u16,
    /// Top-most terminal row of the canvas.
    pub row: u16,
    /// Canvas width in pixels (= terminal columns).
    pub px_width: u16,
    /// Canvas height in pixels (= 2 × terminal rows).
    pub px_height: u16,
}

impl Viewport {
    /// Fit the canvas into `cols × rows` terminal cells, leaving `top` rows
    /// above and `bottom` rows below free for the HUD and buttons.
    pub fn fit(cols: u16, rows: u16, top: u16, bottom: u16) -> Viewport {
        let avail_rows = rows.saturating_sub(top + bottom);
        let avail_w = cols as f32;
        let avail_h = avail_rows as f32 * 2.0;

        // Multiply before dividing so whole-pixel fits stay exact.
        let (w, h) = if avail_h <= 0.0 || avail_w <= 0.0 {
            (0.0, 0.0)
        } else if avail_w * CANVAS_HEIGHT > avail_h * CANVAS_WIDTH {
            (avail_h * CANVAS_WIDTH / CANVAS_HEIGHT, avail_h)
        } else {
            (avail_w, avail_w * CANVAS_HEIGHT / CANVAS_WIDTH)
        };

        let px_width = (w.floor() as u16).min(cols);
        // Whole cells only.
        let px_height = ((h.floor() as u16) & !1).min(avail_rows * 2);
        let cell_rows = px_height / 2;

        Viewport {
            col: (cols - px_width) / 2,
            row: top + (avail_rows - cell_rows) / 2,
            px_width,
            px_height,
        }
    }

    pub fn cell_rows(&self) -> u16 {
        self.px_height / 2
    }

    pub fn is_empty(&self) -> bool {
        self.px_width == 0 || self.px_height == 0
    }

    fn scale_x(&self) -> f32 {
        self.px_width as f32 / CANVAS_WIDTH
    }

    fn scale_y(&self) -> f32 {
        self.px_height as f32 / CANVAS_HEIGHT
    }

    /// Terminal cell holding logical point `(x, y)`, clamped to the canvas.
    pub fn to_cell(&self, x: f32, y: f32) -> (u16, u16) {
        let px = ((x * self.scale_x()).floor().max(0.0) as u16).min(self.px_width.saturating_sub(1));
        let py = ((y * self.scale_y()).floor().max(0.0) as u16).min(self.px_height.saturating_sub(1));
        (self.col + px, self.row + py / 2)
    }
}

/// One colour per viewport pixel, drawn in logical coordinates.
#[derive(Clone, Debug)]
pub struct Canvas {
    viewport: Viewport,
    pixels: Vec<Rgb>,
}

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        let len = viewport.px_width as usize * viewport.px_height as usize;
        Canvas {
            viewport,
            pixels: vec![Rgb::BLACK; len],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Pixel span covered by `[start, start + len)` along an axis of `max`
    /// pixels at `scale`.  Anything visible keeps at least one pixel.
    fn span(start: f32, len: f32, scale: f32, max: u16) -> Option<(usize, usize)> {
        let end = start + len;
        if len <= 0.0 || end <= 0.0 {
            return None;
        }
        let lo = (start * scale).round().max(0.0);
        let mut hi = (end * scale).round().min(max as f32);
        if hi <= lo {
            hi = lo + 1.0;
        }
        if lo >= max as f32 {
            return None;
        }
        Some((lo as usize, (hi as usize).min(max as usize)))
    }

    /// Fill a logical rectangle, clipped to the canvas.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let vp = self.viewport;
        let Some((x0, x1)) = Self::span(x, w, vp.scale_x(), vp.px_width) else {
            return;
        };
        let Some((y0, y1)) = Self::span(y, h, vp.scale_y(), vp.px_height) else {
            return;
        };
        let stride = vp.px_width as usize;
        for py in y0..y1 {
            self.pixels[py * stride + x0..py * stride + x1].fill(color);
        }
    }

    /// Like [`fill_rect`](Self::fill_rect) but mixed over what is already
    /// drawn at `alpha`.
    pub fn blend_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb, alpha: f32) {
        let vp = self.viewport;
        let Some((x0, x1)) = Self::span(x, w, vp.scale_x(), vp.px_width) else {
            return;
        };
        let Some((y0, y1)) = Self::span(y, h, vp.scale_y(), vp.px_height) else {
            return;
        };
        let stride = vp.px_width as usize;
        for py in y0..y1 {
            for px in &mut self.pixels[py * stride + x0..py * stride + x1] {
                *px = color.blend(*px, alpha);
            }
        }
    }

    /// A vertical dashed line `width` wide, centred on `x`, whose dash
    /// pattern starts at `phase` (may be negative).
    pub fn dashed_vline(&mut self, x: f32, width: f32, phase: f32, dash: f32, gap: f32, color: Rgb) {
        let mut y = phase;
        while y < CANVAS_HEIGHT {
            self.fill_rect(x - width / 2.0, y, width, dash, color);
            y += dash + gap;
        }
    }

    /// Colour at viewport pixel `(px, py)`.
    pub fn pixel(&self, px: u16, py: u16) -> Rgb {
        self.pixels[py as usize * self.viewport.px_width as usize + px as usize]
    }

    /// Colours of the top and bottom halves of canvas cell `(col, row)`,
    /// both relative to the viewport.
    pub fn cell(&self, col: u16, row: u16) -> (Rgb, Rgb) {
        (self.pixel(col, row * 2), self.pixel(col, row * 2 + 1))
    }
}
