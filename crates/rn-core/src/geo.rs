//! Planar coordinate type.
//!
//! Map descriptions place nodes on a flat Cartesian plane, either directly
//! as `(x, y)` or as a `(distance, bearing)` vector from a reference origin.
//! Both forms end up as a `Point2D`; the polar form is converted once at load
//! time by [`Point2D::from_reference_vector`].

/// A Cartesian coordinate stored as double-precision floats.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const ORIGIN: Point2D = Point2D { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Derive a position from a `(distance, bearing)` vector with `origin`
    /// as the pole.
    ///
    /// The bearing is in degrees, measured from the positive x axis:
    /// `origin + distance · (cos θ, sin θ)`.
    pub fn from_reference_vector(origin: Point2D, distance: f64, bearing_deg: f64) -> Self {
        let theta = bearing_deg.to_radians();
        Self {
            x: origin.x + distance * theta.cos(),
            y: origin.y + distance * theta.sin(),
        }
    }

    /// Euclidean (straight-line) distance.
    #[inline]
    pub fn distance(self, other: Point2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// `true` if both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::fmt::Display for Point2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
