/// Axis-aligned hit boxes.

/// A rectangle in canvas pixels, `(x, y)` being the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Rect { x, y, w, h }
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// True when `a` and `b` overlap by more than `margin` on both axes.
///
/// Overlaps of `margin` pixels or less are forgiven, so grazing another car
/// does not cost a life.  The test is symmetric in its arguments.
pub fn collides(a: &Rect, b: &Rect, margin: f32) -> bool {
    a.x + margin < b.right()
        && a.right() - margin > b.x
        && a.y + margin < b.bottom()
        && a.bottom() - margin > b.y
}
