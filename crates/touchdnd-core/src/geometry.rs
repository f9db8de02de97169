#![forbid(unsafe_code)]

//! Viewport geometry primitives.
//!
//! All coordinates are CSS pixels in viewport (client) space, origin at the
//! top-left of the visible area.

/// A point in viewport coordinates.
///
/// Used both for node positions (the top-left of an element's bounding box)
/// and for pointer positions (the averaged touch point).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientOffset {
    pub x: f64,
    pub y: f64,
}

impl ClientOffset {
    /// Create a new offset.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Arithmetic mean of a set of points, or `None` when the set is empty.
    #[must_use]
    pub fn mean<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = ClientOffset>,
    {
        let mut count = 0usize;
        let mut x = 0.0;
        let mut y = 0.0;
        for point in points {
            x += point.x;
            y += point.y;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self::new(x / n, y / n))
    }

    /// True when the two offsets differ on either axis.
    #[inline]
    #[must_use]
    pub fn moved_from(self, baseline: Self) -> bool {
        self.x != baseline.x || self.y != baseline.y
    }
}

/// An element's bounding box in viewport coordinates.
///
/// Unlike layout rectangles, every edge is part of the box: a point lying
/// exactly on `right` or `bottom` is inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl ClientRect {
    /// Create a rectangle from its four edges.
    #[must_use]
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Create a rectangle from an origin and a size.
    #[must_use]
    pub fn from_origin_size(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Top-left corner.
    #[inline]
    #[must_use]
    pub const fn top_left(&self) -> ClientOffset {
        ClientOffset::new(self.left, self.top)
    }

    /// Closed-interval containment test on all four edges.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: ClientOffset) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }
}
