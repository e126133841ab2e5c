// Copyright 2026 the Treelens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer screen rectangles.

/// An axis-aligned screen rectangle with *inclusive* corners.
///
/// This is the shape engines report for object coordinates and for flushed
/// regions: a 1×1 pixel at the origin is `Area::new(0, 0, 0, 0)`. Use
/// [`to_rect`](Self::to_rect) to get a half-open [`kurbo::Rect`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Area {
    /// Left edge.
    pub x1: i32,
    /// Top edge.
    pub y1: i32,
    /// Right edge (inclusive).
    pub x2: i32,
    /// Bottom edge (inclusive).
    pub y2: i32,
}

impl Area {
    /// Creates an area from inclusive corners.
    #[inline]
    #[must_use]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Creates an area from a top-left corner and a size.
    ///
    /// A zero `width` or `height` yields an area whose far edge sits one
    /// pixel before its near edge, i.e. an empty area. Edges saturate at the
    /// `i32` range.
    #[inline]
    #[must_use]
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x.saturating_add(width).saturating_sub(1),
            y2: y.saturating_add(height).saturating_sub(1),
        }
    }

    /// Width in pixels, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.x2.saturating_sub(self.x1).saturating_add(1)
    }

    /// Height in pixels, saturating at `i32::MAX`.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.y2.saturating_sub(self.y1).saturating_add(1)
    }

    /// Returns `true` if the area covers no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x2 < self.x1 || self.y2 < self.y1
    }

    /// Returns `true` if the pixel at `(x, y)` lies inside.
    #[inline]
    #[must_use]
    pub const fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }

    /// Returns the area shifted by `(dx, dy)`, clamping edges to the `i32`
    /// range.
    #[inline]
    #[must_use]
    pub const fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            x1: self.x1.saturating_add(dx),
            y1: self.y1.saturating_add(dy),
            x2: self.x2.saturating_add(dx),
            y2: self.y2.saturating_add(dy),
        }
    }

    /// Converts to a half-open [`kurbo::Rect`] covering the same pixels.
    #[must_use]
    pub fn to_rect(&self) -> kurbo::Rect {
        kurbo::Rect::new(
            f64::from(self.x1),
            f64::from(self.y1),
            f64::from(self.x2) + 1.0,
            f64::from(self.y2) + 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_dimensions() {
        let a = Area::new(10, 20, 19, 24);
        assert_eq!(a.width(), 10);
        assert_eq!(a.height(), 5);
        assert!(a.contains(19, 24));
        assert!(!a.contains(20, 24));
    }

    #[test]
    fn origin_size_round_trips_dimensions() {
        let a = Area::from_origin_size(5, 6, 40, 30);
        assert_eq!((a.x1, a.y1, a.width(), a.height()), (5, 6, 40, 30));
        assert!(Area::from_origin_size(0, 0, 0, 10).is_empty());
    }

    #[test]
    fn extreme_edges_saturate() {
        let a = Area::new(i32::MIN, i32::MIN, i32::MAX, i32::MAX);
        assert_eq!((a.width(), a.height()), (i32::MAX, i32::MAX));
        let moved = Area::new(0, 0, i32::MAX, 10).translate(5, -5);
        assert_eq!(moved, Area::new(5, -5, i32::MAX, 5));
        assert_eq!(Area::from_origin_size(i32::MAX - 1, 0, 10, 1).x2, i32::MAX);
    }

    #[test]
    fn rect_covers_far_pixel() {
        let r = Area::new(0, 0, 0, 0).to_rect();
        assert_eq!(r, kurbo::Rect::new(0.0, 0.0, 1.0, 1.0));
    }
}
