//! Flotilla Lattice -- integer geometry and the ship table.
//!
//! This crate holds the foundation the Flotilla engine is built on:
//! lattice [`Vector`](vector::Vector)s with Chebyshev norms, 3D digital line
//! rasterization, [`Ship`](ship::Ship)s and the [`Fleet`](fleet::Fleet) table
//! that addresses them by stable handle, plus the collaborator traits for hull
//! regions and map bounds. Everything is integer arithmetic; nothing here
//! depends on platform floating point.
//!
//! # Quick Start
//!
//! ```
//! use flotilla_lattice::prelude::*;
//!
//! let mut fleet = Fleet::new();
//! let handle = fleet
//!     .insert(Ship::new(ShipId(1), Vector::new(0, 0, 0), 10).with_velocity(Vector::new(3, 1, 0)))
//!     .unwrap();
//!
//! let ship = &fleet[handle];
//! let path = rasterize(ship.position, ship.position + ship.velocity);
//! assert_eq!(path.len(), 4);
//! assert_eq!(path[3], Vector::new(3, 1, 0));
//! ```

#![deny(unsafe_code)]

pub mod bounds;
pub mod fleet;
pub mod line;
pub mod region;
pub mod ship;
pub mod vector;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced while building or decoding a fleet.
#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    /// Two ships share the same id.
    #[error("ship id {id} is already present in the fleet")]
    DuplicateShip { id: ship::ShipId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::bounds::{Bounds, CubicMap, Unbounded};
    pub use crate::fleet::{Fleet, ShipHandle};
    pub use crate::line::{rasterize, rasterize_ray};
    pub use crate::region::{CubeHull, CubeRegion, HullModel, Region};
    pub use crate::ship::{Ship, ShipId};
    pub use crate::vector::Vector;
    pub use crate::LatticeError;
}
