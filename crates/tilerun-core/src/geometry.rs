use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in screen space (+y points down).
///
/// Overlap is strict: rectangles that only share an edge do not overlap.
/// Point containment is half-open on both axes, so a point on the right or
/// bottom edge is outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square cell of `size` with its top-left corner at grid coordinates `(x, y)`.
    pub fn cell(x: i32, y: i32, size: i32) -> Self {
        Self::new(x as f32, y as f32, size as f32, size as f32)
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn set_left(&mut self, left: f32) {
        self.x = left;
    }

    pub fn set_right(&mut self, right: f32) {
        self.x = right - self.w;
    }

    pub fn set_top(&mut self, top: f32) {
        self.y = top;
    }

    pub fn set_bottom(&mut self, bottom: f32) {
        self.y = bottom - self.h;
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Midpoint of the bottom edge.
    pub fn mid_bottom(&self) -> (f32, f32) {
        (self.center_x(), self.bottom())
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    pub fn contains_point(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    /// Copy of this rectangle shifted by `(dx, dy)`.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }
}
