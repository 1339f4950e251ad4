//! The ship table.
//!
//! A [`Fleet`] owns every ship of a battle. Ships are addressed by
//! [`ShipHandle`], a plain index into the table that stays valid for the
//! lifetime of the fleet (ships are never removed, only killed). All
//! per-ship bookkeeping in the engine is keyed by handle, so no component
//! ever holds a reference into the table while another mutates it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::ship::{Ship, ShipId};
use crate::LatticeError;

// ---------------------------------------------------------------------------
// ShipHandle
// ---------------------------------------------------------------------------

/// Stable index of a ship inside its [`Fleet`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShipHandle(u32);

impl ShipHandle {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ShipHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShipHandle({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// Fleet
// ---------------------------------------------------------------------------

/// All ships of a simulation, alive or dead.
///
/// Serializes as the plain list of ships in table order; deserializing
/// rebuilds the id index and rejects duplicate ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Ship>", into = "Vec<Ship>")]
pub struct Fleet {
    ships: Vec<Ship>,
    by_id: BTreeMap<ShipId, ShipHandle>,
}

impl Fleet {
    /// Create an empty fleet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a ship to the table.
    ///
    /// # Errors
    ///
    /// [`LatticeError::DuplicateShip`] if a ship with the same id exists.
    pub fn insert(&mut self, ship: Ship) -> Result<ShipHandle, LatticeError> {
        if self.by_id.contains_key(&ship.id()) {
            return Err(LatticeError::DuplicateShip { id: ship.id() });
        }
        let handle = ShipHandle(self.ships.len() as u32);
        self.by_id.insert(ship.id(), handle);
        self.ships.push(ship);
        Ok(handle)
    }

    pub fn get(&self, handle: ShipHandle) -> Option<&Ship> {
        self.ships.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: ShipHandle) -> Option<&mut Ship> {
        self.ships.get_mut(handle.index())
    }

    /// Look up the handle of a ship by id.
    pub fn handle_of(&self, id: ShipId) -> Option<ShipHandle> {
        self.by_id.get(&id).copied()
    }

    /// Look up a ship by id.
    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.handle_of(id).and_then(|h| self.get(h))
    }

    /// Handles of all ships in table order.
    pub fn handles(&self) -> impl Iterator<Item = ShipHandle> + '_ {
        (0..self.ships.len() as u32).map(ShipHandle)
    }

    /// Handles of all alive ships in table order.
    pub fn alive_handles(&self) -> impl Iterator<Item = ShipHandle> + '_ {
        self.handles().filter(|h| !self[*h].is_dead())
    }

    /// All ships in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    /// Number of ships, alive or dead.
    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.ships.iter().filter(|s| !s.is_dead()).count()
    }
}

impl Index<ShipHandle> for Fleet {
    type Output = Ship;

    fn index(&self, handle: ShipHandle) -> &Ship {
        &self.ships[handle.index()]
    }
}

impl IndexMut<ShipHandle> for Fleet {
    fn index_mut(&mut self, handle: ShipHandle) -> &mut Ship {
        &mut self.ships[handle.index()]
    }
}

impl TryFrom<Vec<Ship>> for Fleet {
    type Error = LatticeError;

    fn try_from(ships: Vec<Ship>) -> Result<Self, Self::Error> {
        let mut fleet = Fleet::new();
        for ship in ships {
            fleet.insert(ship)?;
        }
        Ok(fleet)
    }
}

impl From<Fleet> for Vec<Ship> {
    fn from(fleet: Fleet) -> Self {
        fleet.ships
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
