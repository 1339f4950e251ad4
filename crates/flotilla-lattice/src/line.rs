//! 3D digital line rasterization.
//!
//! The rasterizer walks from `start` to `end` one Chebyshev step at a time.
//! The number of steps is the largest axis delta; each axis keeps its own
//! error accumulator and steps towards `end` whenever that accumulator goes
//! negative. Everything is integer arithmetic, so the output is a pure
//! function of the inputs on every platform.

use crate::vector::Vector;

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

/// Incremental state of the three-axis digital differential analyzer.
struct LineWalker {
    current: Vector,
    delta: Vector,
    step: Vector,
    error: Vector,
    major: i32,
    remaining: i32,
}

impl LineWalker {
    fn new(start: Vector, end: Vector) -> Self {
        let diff = end - start;
        let delta = Vector::new(diff.x.abs(), diff.y.abs(), diff.z.abs());
        let step = Vector::new(
            if start.x < end.x { 1 } else { -1 },
            if start.y < end.y { 1 } else { -1 },
            if start.z < end.z { 1 } else { -1 },
        );
        // Floored to 1 so a degenerate line never divides the error by zero.
        let major = delta.chebyshev_length().max(1);
        let half = major / 2;
        Self {
            current: start,
            delta,
            step,
            error: Vector::new(half, half, half),
            major,
            remaining: diff.chebyshev_length(),
        }
    }

    /// Advance one step along the line.
    fn advance(&mut self) {
        self.remaining -= 1;
        advance_axis(
            &mut self.current.x,
            &mut self.error.x,
            self.delta.x,
            self.step.x,
            self.major,
        );
        advance_axis(
            &mut self.current.y,
            &mut self.error.y,
            self.delta.y,
            self.step.y,
            self.major,
        );
        advance_axis(
            &mut self.current.z,
            &mut self.error.z,
            self.delta.z,
            self.step.z,
            self.major,
        );
    }
}

#[inline]
fn advance_axis(coord: &mut i32, error: &mut i32, delta: i32, step: i32, major: i32) {
    *error -= delta;
    if *error < 0 {
        *error += major;
        *coord += step;
    }
}

impl Iterator for LineWalker {
    type Item = Vector;

    fn next(&mut self) -> Option<Vector> {
        if self.remaining < 0 {
            return None;
        }
        let point = self.current;
        if self.remaining > 0 {
            self.advance();
        } else {
            self.remaining = -1;
        }
        Some(point)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Every lattice point from `start` to `end`, both inclusive.
///
/// The result always has `start.chebyshev_distance(end) + 1` points, and
/// consecutive points differ by at most one on every axis. When
/// `start == end` the single point `[start]` is returned.
pub fn rasterize(start: Vector, end: Vector) -> Vec<Vector> {
    let mut line = Vec::with_capacity(start.chebyshev_distance(end) as usize + 1);
    line.extend(LineWalker::new(start, end));
    line
}

/// Like [`rasterize`], but clipped to the cube `[0, bound)` on every axis.
///
/// The sequence stops at the first point outside the cube, which is not
/// included. Returns an empty sequence when `start == end`. Used for
/// line-of-sight queries rather than movement.
pub fn rasterize_ray(start: Vector, end: Vector, bound: i32) -> Vec<Vector> {
    if start == end {
        return Vec::new();
    }
    LineWalker::new(start, end)
        .take_while(|p| in_cube(*p, bound))
        .collect()
}

#[inline]
fn in_cube(p: Vector, bound: i32) -> bool {
    (0..bound).contains(&p.x) && (0..bound).contains(&p.y) && (0..bound).contains(&p.z)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
