//! Integer pixel geometry for screen layout.
//!
//! Screens are laid out on an integer pixel grid, so every type in this
//! module uses `i32` coordinates.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate on the canvas
//! - [`Size`] - Width and height dimensions
//! - [`Rect`] - An axis-aligned rectangle anchored at its top-left corner
//!
//! # Coordinate System
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! The origin is the top-left pixel of the enclosing canvas.

/// A 2D point on the canvas pixel grid.
///
/// # Examples
///
/// ```
/// # use screenc_core::geometry::Point;
/// let origin = Point::new(10, 20);
/// let moved = origin.offset(5, -5);
/// assert_eq!(moved, Point::new(15, 15));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> i32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> i32 {
        self.y
    }

    /// Returns this point moved by `dx` and `dy`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Returns the component-wise sum of two points.
    pub fn add_point(self, other: Point) -> Self {
        self.offset(other.x, other.y)
    }
}

/// Width and height of an element in pixels.
///
/// Zero in either dimension means "not yet resolved" while a tree is being
/// laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    width: i32,
    height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns the width
    pub fn width(self) -> i32 {
        self.width
    }

    /// Returns the height
    pub fn height(self) -> i32 {
        self.height
    }

    /// Returns true when either dimension is zero or negative.
    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// An axis-aligned rectangle defined by its top-left corner and size.
///
/// # Examples
///
/// ```
/// # use screenc_core::geometry::{Point, Rect, Size};
/// let rect = Rect::new(Point::new(2, 4), Size::new(10, 6));
/// assert_eq!(rect.right(), 12);
/// assert_eq!(rect.bottom(), 10);
/// assert_eq!(rect.center(), Point::new(7, 7));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    origin: Point,
    size: Size,
}

impl Rect {
    /// Creates a rectangle from its top-left corner and size.
    pub fn new(origin: Point, size: Size) -> Self {
        Self { origin, size }
    }

    /// Creates a rectangle from raw coordinates.
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn origin(self) -> Point {
        self.origin
    }

    pub fn size(self) -> Size {
        self.size
    }

    pub fn x(self) -> i32 {
        self.origin.x
    }

    pub fn y(self) -> i32 {
        self.origin.y
    }

    pub fn width(self) -> i32 {
        self.size.width
    }

    pub fn height(self) -> i32 {
        self.size.height
    }

    /// Returns the exclusive right edge.
    pub fn right(self) -> i32 {
        self.origin.x + self.size.width
    }

    /// Returns the exclusive bottom edge.
    pub fn bottom(self) -> i32 {
        self.origin.y + self.size.height
    }

    /// Returns the center point, rounding toward the top-left.
    pub fn center(self) -> Point {
        Point::new(
            self.origin.x + self.size.width / 2,
            self.origin.y + self.size.height / 2,
        )
    }

    pub fn is_empty(self) -> bool {
        self.size.is_empty()
    }
}

/// Rounds `value` up to the next multiple of `multiple`.
///
/// Multiples are expected to be powers of two, matching the alignment
/// requirements of display controllers; a multiple of zero or one leaves the
/// value unchanged.
///
/// # Examples
///
/// ```
/// # use screenc_core::geometry::round_up;
/// assert_eq!(round_up(10, 8), 16);
/// assert_eq!(round_up(16, 8), 16);
/// assert_eq!(round_up(7, 1), 7);
/// ```
pub fn round_up(value: i32, multiple: i32) -> i32 {
    if multiple <= 1 {
        return value;
    }
    (value + multiple - 1) & !(multiple - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_offset() {
        let p = Point::new(3, 4).offset(-3, 6);
        assert_eq!(p.x(), 0);
        assert_eq!(p.y(), 10);
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::from_xywh(5, 5, 10, 20);
        assert_eq!(rect.right(), 15);
        assert_eq!(rect.bottom(), 25);
        assert!(!rect.is_empty());
        assert!(Rect::from_xywh(0, 0, 0, 5).is_empty());
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(0, 4), 0);
        assert_eq!(round_up(1, 4), 4);
        assert_eq!(round_up(200, 32), 224);
        assert_eq!(round_up(13, 0), 13);
    }
}
