//! Ship footprints and their overlap classification.
//!
//! The collision solver never looks at hull geometry directly. It asks a
//! [`HullModel`] for the [`Region`] a ship would occupy at a position and
//! then for the volume of intersection of two such regions. The volume is an
//! opaque classification code: `0` for no contact, `1`, `2` or `4` for
//! partial contact and `8` for full overlap.

use crate::ship::Ship;
use crate::vector::Vector;

/// The spatial footprint of a ship at some position.
pub trait Region {
    /// Classify the overlap between `self` and `other`.
    fn volume_of_intersection(&self, other: &Self) -> u32;
}

/// Produces regions for ships.
pub trait HullModel {
    type Region: Region;

    /// The region `ship` would occupy if it were at `position`.
    fn region(&self, ship: &Ship, position: Vector) -> Self::Region;
}

// ---------------------------------------------------------------------------
// CubeHull
// ---------------------------------------------------------------------------

/// Every ship is an axis-aligned cube of edge `2` anchored at its position.
///
/// Two such cubes whose anchors are within Chebyshev distance 1 overlap by
/// one or two cells per axis, so the intersection volume is always one of
/// `1`, `2`, `4` or `8`; farther apart it is `0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeHull;

impl CubeHull {
    pub const EDGE: i32 = 2;
}

/// Half-open cube `[min, min + edge)` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeRegion {
    pub min: Vector,
    pub edge: i32,
}

impl CubeRegion {
    fn overlap(a_min: i32, b_min: i32, edge: i32, other_edge: i32) -> i32 {
        let lo = a_min.max(b_min);
        let hi = (a_min + edge).min(b_min + other_edge);
        (hi - lo).max(0)
    }
}

impl Region for CubeRegion {
    fn volume_of_intersection(&self, other: &Self) -> u32 {
        let x = Self::overlap(self.min.x, other.min.x, self.edge, other.edge);
        let y = Self::overlap(self.min.y, other.min.y, self.edge, other.edge);
        let z = Self::overlap(self.min.z, other.min.z, self.edge, other.edge);
        (x * y * z) as u32
    }
}

impl HullModel for CubeHull {
    type Region = CubeRegion;

    fn region(&self, _ship: &Ship, position: Vector) -> CubeRegion {
        CubeRegion {
            min: position,
            edge: Self::EDGE,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
