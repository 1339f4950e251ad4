//! Ships: the moving bodies of the simulation.
//!
//! The engine only relies on a narrow contract: a stable [`ShipId`], a
//! mutable position and velocity, a ram ("sharp nose") damage attribute and
//! a health pool that can be attacked until the ship dies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::vector::Vector;

// ---------------------------------------------------------------------------
// ShipId
// ---------------------------------------------------------------------------

/// Stable integer identity of a ship, unique within a fleet.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShipId(pub u32);

impl fmt::Debug for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShipId({})", self.0)
    }
}

impl fmt::Display for ShipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Ship
// ---------------------------------------------------------------------------

/// A ship on the lattice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    id: ShipId,
    /// Current lattice position.
    pub position: Vector,
    /// Displacement per full tick.
    pub velocity: Vector,
    /// Damage dealt to every ship this one rams.
    pub sharp_nose_damage: i32,
    health: i32,
    dead: bool,
}

impl Ship {
    /// Create a live ship at rest.
    pub fn new(id: ShipId, position: Vector, health: i32) -> Self {
        Self {
            id,
            position,
            velocity: Vector::ZERO,
            sharp_nose_damage: 0,
            health,
            dead: false,
        }
    }

    /// Builder-style velocity setter.
    pub fn with_velocity(mut self, velocity: Vector) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builder-style ram damage setter.
    pub fn with_sharp_nose_damage(mut self, damage: i32) -> Self {
        self.sharp_nose_damage = damage;
        self
    }

    #[inline]
    pub fn id(&self) -> ShipId {
        self.id
    }

    #[inline]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Mark the ship dead. Idempotent.
    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// Reduce health by `amount`, killing the ship once health is exhausted.
    ///
    /// Returns `true` if this attack killed the ship. Attacking a dead ship
    /// does nothing.
    pub fn be_attacked(&mut self, amount: i32) -> bool {
        if self.dead {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            self.kill();
            return true;
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
