//! Geometric primitives for graph layout.
//!
//! Layout positions use `f64` throughout so that seeded simulations are
//! reproducible bit for bit.
//!
//! # Coordinate System
//!
//! Lexigraph uses a coordinate system consistent with SVG:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! A canvas of `width × height` spans `[0, width] × [0, height]`.

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use lexigraph_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lexigraph_core::geometry::Point;
    /// let halved = Point::new(10.0, 20.0).scale(0.5);
    /// assert_eq!(halved.x(), 5.0);
    /// assert_eq!(halved.y(), 10.0);
    /// ```
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Clamps both coordinates into `[0, width] × [0, height]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use lexigraph_core::geometry::Point;
    /// let clamped = Point::new(-5.0, 120.0).clamp_to(100.0, 100.0);
    /// assert_eq!(clamped, Point::new(0.0, 100.0));
    /// ```
    pub fn clamp_to(self, width: f64, height: f64) -> Self {
        Self {
            x: self.x.clamp(0.0, width),
            y: self.y.clamp(0.0, height),
        }
    }

    /// Returns `true` if the point lies inside `[0, width] × [0, height]`.
    pub fn is_within(self, width: f64, height: f64) -> bool {
        (0.0..=width).contains(&self.x) && (0.0..=height).contains(&self.y)
    }
}
