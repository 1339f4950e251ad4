//! Integer lattice vectors.
//!
//! A [`Vector`] is used for positions, velocities, per-sub-tick offsets and
//! contact normals alike. All arithmetic is plain `i32` arithmetic; keeping
//! values inside the map's coordinate range is the caller's responsibility.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// ---------------------------------------------------------------------------
// Vector
// ---------------------------------------------------------------------------

/// A point or displacement on the integer 3D lattice.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Vector {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Vector {
    /// The origin / null displacement.
    pub const ZERO: Vector = Vector { x: 0, y: 0, z: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Chebyshev ("king move") length: the largest absolute component.
    #[inline]
    pub fn chebyshev_length(self) -> i32 {
        self.x.abs().max(self.y.abs()).max(self.z.abs())
    }

    /// Chebyshev distance between two points.
    #[inline]
    pub fn chebyshev_distance(self, other: Vector) -> i32 {
        (other - self).chebyshev_length()
    }

    /// Unit-step direction: every component clamped to `{-1, 0, 1}` by sign.
    #[inline]
    pub fn normalize(self) -> Vector {
        Vector::new(self.x.signum(), self.y.signum(), self.z.signum())
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Vector::ZERO
    }
}

impl Add for Vector {
    type Output = Vector;

    #[inline]
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector {
    type Output = Vector;

    #[inline]
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector {
    type Output = Vector;

    #[inline]
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl AddAssign for Vector {
    #[inline]
    fn add_assign(&mut self, rhs: Vector) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vector {
    #[inline]
    fn sub_assign(&mut self, rhs: Vector) {
        *self = *self - rhs;
    }
}

impl From<(i32, i32, i32)> for Vector {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Vector::new(x, y, z)
    }
}

impl fmt::Debug for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_component_wise() {
        let a = Vector::new(1, -2, 3);
        let b = Vector::new(4, 5, -6);
        assert_eq!(a + b, Vector::new(5, 3, -3));
        assert_eq!(a - b, Vector::new(-3, -7, 9));
        assert_eq!(-a, Vector::new(-1, 2, -3));

        let mut c = a;
        c += b;
        c -= b;
        assert_eq!(c, a);
    }

    #[test]
    fn chebyshev_length_is_largest_absolute_component() {
        assert_eq!(Vector::ZERO.chebyshev_length(), 0);
        assert_eq!(Vector::new(3, -7, 2).chebyshev_length(), 7);
        assert_eq!(Vector::new(-1, -1, -1).chebyshev_length(), 1);
        assert_eq!(
            Vector::new(0, 0, 0).chebyshev_distance(Vector::new(2, -5, 1)),
            5
        );
    }

    #[test]
    fn normalize_clamps_each_axis_by_sign() {
        assert_eq!(Vector::new(5, -3, 0).normalize(), Vector::new(1, -1, 0));
        assert_eq!(Vector::ZERO.normalize(), Vector::ZERO);
        assert_eq!(Vector::new(-9, 9, 1).normalize(), Vector::new(-1, 1, 1));
    }

    #[test]
    fn debug_and_display_formats() {
        let v = Vector::new(1, 2, 3);
        assert_eq!(format!("{v:?}"), "Vector(1, 2, 3)");
        assert_eq!(format!("{v}"), "(1, 2, 3)");
    }
}
