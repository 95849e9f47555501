//! Screen-space rectangles and pointer samples.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An element's screen rectangle, in the same coordinate space as pointer
/// samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width (may be zero for collapsed elements).
    pub width: f32,
    /// Height (may be zero for collapsed elements).
    pub height: f32,
}

impl Rect {
    /// Rectangle from position and size.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    /// Width and height.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Geometric center in screen space.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.origin() + self.size() * 0.5
    }

    /// Center relative to the rectangle's own origin.
    #[must_use]
    pub fn local_center(&self) -> Vec2 {
        self.size() * 0.5
    }

    /// Radius of the effective circle used for proximity: half of the
    /// larger side.
    #[must_use]
    pub fn effective_radius(&self) -> f32 {
        self.width.max(self.height) * 0.5
    }

    /// Whether either side is zero (or negative).
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Offset of a screen-space point relative to the top-left corner. Not
    /// clamped: points outside the rectangle give offsets outside
    /// `[0, size]`.
    #[must_use]
    pub fn relative(&self, point: Vec2) -> Vec2 {
        point - self.origin()
    }

    /// Relative offset clamped onto the rectangle.
    #[must_use]
    pub fn project(&self, point: Vec2) -> Vec2 {
        self.relative(point)
            .clamp(Vec2::ZERO, self.size().max(Vec2::ZERO))
    }

    /// Whether a screen-space point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let local = self.relative(point);
        local.x >= 0.0
            && local.y >= 0.0
            && local.x <= self.width
            && local.y <= self.height
    }

    /// Distance from a local point to the farthest corner.
    #[must_use]
    pub fn farthest_corner_distance(&self, local: Vec2) -> f32 {
        [
            Vec2::ZERO,
            Vec2::new(self.width, 0.0),
            Vec2::new(0.0, self.height),
            self.size(),
        ]
        .into_iter()
        .map(|corner| local.distance(corner))
        .fold(0.0, f32::max)
    }
}

/// A single pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl PointerSample {
    /// A sample infinitely far from every element; nothing is in range.
    pub const FAR_AWAY: Self = Self {
        x: f32::INFINITY,
        y: f32::INFINITY,
    };

    /// Sample at `(x, y)`.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Position as a vector.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl From<Vec2> for PointerSample {
    fn from(v: Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_and_effective_radius() {
        let rect = Rect::new(10.0, 20.0, 200.0, 100.0);
        assert_eq!(rect.center(), Vec2::new(110.0, 70.0));
        assert_eq!(rect.local_center(), Vec2::new(100.0, 50.0));
        assert_eq!(rect.effective_radius(), 100.0);
    }

    #[test]
    fn project_clamps_to_bounds() {
        let rect = Rect::new(100.0, 100.0, 50.0, 40.0);
        assert_eq!(rect.project(Vec2::new(0.0, 0.0)), Vec2::ZERO);
        assert_eq!(
            rect.project(Vec2::new(500.0, 120.0)),
            Vec2::new(50.0, 20.0)
        );
        assert_eq!(
            rect.relative(Vec2::new(90.0, 90.0)),
            Vec2::new(-10.0, -10.0)
        );
    }

    #[test]
    fn farthest_corner_from_center() {
        let rect = Rect::new(0.0, 0.0, 6.0, 8.0);
        assert_eq!(rect.farthest_corner_distance(Vec2::new(3.0, 4.0)), 5.0);
        assert_eq!(rect.farthest_corner_distance(Vec2::ZERO), 10.0);
    }

    #[test]
    fn degenerate_rects() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_degenerate());
        assert!(!Rect::new(0.0, 0.0, 1.0, 1.0).is_degenerate());
    }
}
