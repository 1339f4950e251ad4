//! Flotilla Engine -- deterministic sub-tick movement and collision resolution.
//!
//! This crate builds on [`flotilla_lattice`] to advance a fleet of ships on
//! the integer lattice. Each tick is divided into
//! [`TOTAL_SUBTICKS`](schedule::TOTAL_SUBTICKS) sub-ticks so ships of
//! different speeds interleave exactly; ships that come into contact are
//! grouped, resolved by an energy-bounded solver, damaged and rescheduled.
//!
//! # Quick Start
//!
//! ```
//! use flotilla_engine::prelude::*;
//!
//! let mut fleet = Fleet::new();
//! fleet.insert(Ship::new(ShipId(1), Vector::new(10, 10, 10), 50).with_velocity(Vector::new(1, 0, 0))).unwrap();
//! fleet.insert(Ship::new(ShipId(2), Vector::new(30, 10, 10), 50)).unwrap();
//!
//! let mut sim = Simulation::new(fleet, TickProcessor::default());
//! sim.run_ticks(5).unwrap();
//!
//! assert_eq!(sim.tick_count(), 5);
//! assert_eq!(sim.fleet().ship(ShipId(1)).unwrap().position, Vector::new(15, 10, 10));
//! ```

#![deny(unsafe_code)]

pub mod physics;
pub mod report;
pub mod schedule;
pub mod simulation;
pub mod snapshot;
pub mod tick;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the lattice crate for convenience.
pub use flotilla_lattice;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The hull model classified an overlap with an unknown volume. The
    /// geometry model is corrupt; the current tick is abandoned.
    #[error("unexpected volume of intersection {volume} between ships {first} and {second}")]
    UnsupportedIntersection {
        volume: u32,
        first: flotilla_lattice::ship::ShipId,
        second: flotilla_lattice::ship::ShipId,
    },

    /// A snapshot's recorded hash does not match its contents.
    #[error("snapshot hash mismatch: recorded {recorded} but recomputed {recomputed}")]
    SnapshotHashMismatch { recorded: String, recomputed: String },

    /// Encoding state for hashing failed.
    #[error("failed to serialize simulation state: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use flotilla_lattice::prelude::*;

    pub use crate::physics::{ChebyshevEnergy, Contact, EnergyModel, Physics};
    pub use crate::report::{TickEvent, TickReport};
    pub use crate::schedule::{SubTick, TickSchedule, TOTAL_SUBTICKS};
    pub use crate::simulation::Simulation;
    pub use crate::snapshot::FleetSnapshot;
    pub use crate::tick::{ProcessorConfig, TickProcessor};
    pub use crate::EngineError;
}
