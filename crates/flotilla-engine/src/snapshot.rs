//! Simulation snapshots with BLAKE3 hashing.
//!
//! A [`FleetSnapshot`] captures the fleet and the tick counter together with
//! a BLAKE3 hex digest of their canonical JSON encoding. Two simulations in
//! the same state always produce the same digest, which makes snapshots the
//! tool for determinism checks and for branching a battle.
//!
//! # Usage
//!
//! ```
//! use flotilla_engine::prelude::*;
//!
//! let mut fleet = Fleet::new();
//! fleet.insert(Ship::new(ShipId(1), Vector::new(5, 5, 5), 10).with_velocity(Vector::new(1, 1, 0))).unwrap();
//! let mut sim = Simulation::new(fleet, TickProcessor::default());
//! sim.run_ticks(3).unwrap();
//!
//! let snapshot = sim.capture_snapshot().unwrap();
//! assert_eq!(snapshot.tick_counter, 3);
//! assert_eq!(snapshot.hash.len(), 64);
//!
//! sim.run_ticks(3).unwrap();
//! sim.restore_from_snapshot(&snapshot).unwrap();
//! assert_eq!(sim.tick_count(), 3);
//! assert_eq!(sim.state_hash().unwrap(), snapshot.hash);
//! ```
//!
//! The processor (hull model, energy model, bounds) is not part of the
//! snapshot; restoring keeps the simulation's own processor.

use flotilla_lattice::fleet::Fleet;
use flotilla_lattice::region::HullModel;
use serde::{Deserialize, Serialize};

use crate::simulation::Simulation;
use crate::EngineError;

// ---------------------------------------------------------------------------
// FleetSnapshot
// ---------------------------------------------------------------------------

/// A serializable copy of the simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Every ship, alive or dead, in table order.
    pub fleet: Fleet,
    /// Ticks executed at the time of capture.
    pub tick_counter: u64,
    /// BLAKE3 hex digest (64 lowercase hex chars) of `fleet` and
    /// `tick_counter`.
    pub hash: String,
}

/// BLAKE3 hex digest of the hashable simulation state.
fn compute_hash(fleet: &Fleet, tick_counter: u64) -> Result<String, EngineError> {
    #[derive(Serialize)]
    struct HashableState<'a> {
        fleet: &'a Fleet,
        tick_counter: u64,
    }

    let json_bytes = serde_json::to_vec(&HashableState {
        fleet,
        tick_counter,
    })?;
    Ok(blake3::hash(&json_bytes).to_hex().to_string())
}

impl FleetSnapshot {
    /// Recompute the digest and compare it with the recorded one.
    pub fn verify(&self) -> Result<(), EngineError> {
        let recomputed = compute_hash(&self.fleet, self.tick_counter)?;
        if recomputed != self.hash {
            return Err(EngineError::SnapshotHashMismatch {
                recorded: self.hash.clone(),
                recomputed,
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulation snapshot/restore methods
// ---------------------------------------------------------------------------

impl<H: HullModel> Simulation<H> {
    /// Capture the fleet and tick counter.
    pub fn capture_snapshot(&self) -> Result<FleetSnapshot, EngineError> {
        let fleet = self.fleet().clone();
        let tick_counter = self.tick_count();
        let hash = compute_hash(&fleet, tick_counter)?;
        Ok(FleetSnapshot {
            fleet,
            tick_counter,
            hash,
        })
    }

    /// Restore a previously captured state.
    ///
    /// # Errors
    ///
    /// [`EngineError::SnapshotHashMismatch`] if the snapshot was altered
    /// after capture. The simulation is left untouched in that case.
    pub fn restore_from_snapshot(&mut self, snapshot: &FleetSnapshot) -> Result<(), EngineError> {
        snapshot.verify()?;
        self.replace_state(snapshot.fleet.clone(), snapshot.tick_counter);
        Ok(())
    }

    /// Digest of the current state, equal to `capture_snapshot()?.hash`.
    pub fn state_hash(&self) -> Result<String, EngineError> {
        compute_hash(self.fleet(), self.tick_count())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tick::TickProcessor;
    use flotilla_lattice::ship::{Ship, ShipId};
    use flotilla_lattice::vector::Vector;

    fn sim() -> Simulation {
        let mut fleet = Fleet::new();
        fleet
            .insert(Ship::new(ShipId(1), Vector::new(10, 10, 10), 20).with_velocity(Vector::new(2, 0, 1)))
            .unwrap();
        fleet
            .insert(Ship::new(ShipId(2), Vector::new(30, 10, 10), 20).with_velocity(Vector::new(-2, 0, 1)))
            .unwrap();
        Simulation::new(fleet, TickProcessor::default())
    }

    #[test]
    fn identical_states_hash_identically() {
        let mut a = sim();
        let mut b = sim();
        assert_eq!(a.state_hash().unwrap(), b.state_hash().unwrap());
        a.run_ticks(8).unwrap();
        b.run_ticks(8).unwrap();
        assert_eq!(a.state_hash().unwrap(), b.state_hash().unwrap());
    }

    #[test]
    fn tick_counter_is_part_of_the_hash() {
        let mut fleet = Fleet::new();
        fleet.insert(Ship::new(ShipId(1), Vector::new(5, 5, 5), 10)).unwrap();
        let mut s = Simulation::new(fleet, TickProcessor::default());
        let before = s.state_hash().unwrap();

        s.tick().unwrap();
        assert_eq!(s.fleet().ship(ShipId(1)).unwrap().position, Vector::new(5, 5, 5));
        assert_ne!(s.state_hash().unwrap(), before);
    }

    #[test]
    fn restore_rewinds_state() {
        let mut s = sim();
        let snapshot = s.capture_snapshot().unwrap();
        s.run_ticks(5).unwrap();
        assert_ne!(s.state_hash().unwrap(), snapshot.hash);

        s.restore_from_snapshot(&snapshot).unwrap();
        assert_eq!(s.tick_count(), 0);
        assert_eq!(s.fleet(), &snapshot.fleet);
        assert_eq!(s.state_hash().unwrap(), snapshot.hash);
    }

    #[test]
    fn tampered_snapshot_is_rejected() {
        let mut s = sim();
        let mut snapshot = s.capture_snapshot().unwrap();
        snapshot.tick_counter = 42;

        s.run_ticks(1).unwrap();
        let err = s.restore_from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, EngineError::SnapshotHashMismatch { .. }));
        assert_eq!(s.tick_count(), 1);
    }

    #[test]
    fn snapshot_survives_json() {
        let s = sim();
        let snapshot = s.capture_snapshot().unwrap();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: FleetSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
        back.verify().unwrap();
    }
}
