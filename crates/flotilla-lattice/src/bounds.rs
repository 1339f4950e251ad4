//! Map boundaries.

use serde::{Deserialize, Serialize};

use crate::vector::Vector;

/// Decides whether a position lies outside the valid play volume.
pub trait Bounds {
    fn is_outside(&self, position: Vector) -> bool;
}

/// A cubic map: valid positions are `[0, size)` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubicMap {
    pub size: i32,
}

impl CubicMap {
    pub const DEFAULT_SIZE: i32 = 100;

    pub fn new(size: i32) -> Self {
        Self { size }
    }
}

impl Default for CubicMap {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

impl Bounds for CubicMap {
    fn is_outside(&self, p: Vector) -> bool {
        let range = 0..self.size;
        !(range.contains(&p.x) && range.contains(&p.y) && range.contains(&p.z))
    }
}

/// A map without edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unbounded;

impl Bounds for Unbounded {
    fn is_outside(&self, _position: Vector) -> bool {
        false
    }
}
