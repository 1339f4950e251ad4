//! What happened during one call to
//! [`TickProcessor::process`](crate::tick::TickProcessor::process).

use flotilla_lattice::ship::ShipId;
use flotilla_lattice::vector::Vector;
use serde::{Deserialize, Serialize};

use crate::schedule::SubTick;

// ---------------------------------------------------------------------------
// TickEvent
// ---------------------------------------------------------------------------

/// A notable state change, recorded in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickEvent {
    /// A collision group was resolved.
    Collision {
        subtick: SubTick,
        /// Members of the group, ascending by table order.
        ships: Vec<ShipId>,
        /// Solver iterations, the damage multiplier.
        iterations: u32,
    },
    /// A ship took collision damage.
    Damaged {
        subtick: SubTick,
        ship: ShipId,
        amount: i32,
        killed: bool,
    },
    /// A ship tried to move outside the map and was destroyed.
    LeftMap {
        subtick: SubTick,
        ship: ShipId,
        /// The rejected position.
        position: Vector,
    },
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// Summary of one processed tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// Sub-ticks at which at least one ship was scheduled to move,
    /// counting reprocessed ones again.
    pub subticks_visited: u32,
    /// How many times the cursor was rewound after a collision.
    pub rewinds: u32,
    /// Number of collision groups handed to the solver.
    pub solver_invocations: u32,
    pub events: Vec<TickEvent>,
}

impl TickReport {
    /// No collision happened and no ship was destroyed.
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty()
    }

    pub fn collisions(&self) -> impl Iterator<Item = &TickEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, TickEvent::Collision { .. }))
    }

    /// Total damage dealt to `ship` during the tick.
    pub fn damage_to(&self, ship: ShipId) -> i32 {
        self.events
            .iter()
            .filter_map(|e| match e {
                TickEvent::Damaged {
                    ship: s, amount, ..
                } if *s == ship => Some(*amount),
                _ => None,
            })
            .sum()
    }

    /// Ships destroyed during the tick, by collision or by leaving the map.
    pub fn destroyed(&self) -> Vec<ShipId> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TickEvent::Damaged {
                    ship, killed: true, ..
                } => Some(*ship),
                TickEvent::LeftMap { ship, .. } => Some(*ship),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_is_quiet() {
        let report = TickReport::default();
        assert!(report.is_quiet());
        assert_eq!(report.collisions().count(), 0);
        assert!(report.destroyed().is_empty());
    }

    #[test]
    fn damage_and_destruction_are_aggregated() {
        let report = TickReport {
            events: vec![
                TickEvent::Collision {
                    subtick: 10,
                    ships: vec![ShipId(1), ShipId(2)],
                    iterations: 2,
                },
                TickEvent::Damaged {
                    subtick: 10,
                    ship: ShipId(1),
                    amount: 3,
                    killed: false,
                },
                TickEvent::Damaged {
                    subtick: 10,
                    ship: ShipId(1),
                    amount: 4,
                    killed: true,
                },
                TickEvent::LeftMap {
                    subtick: 20,
                    ship: ShipId(2),
                    position: Vector::new(-1, 0, 0),
                },
            ],
            ..Default::default()
        };
        assert!(!report.is_quiet());
        assert_eq!(report.damage_to(ShipId(1)), 7);
        assert_eq!(report.damage_to(ShipId(2)), 0);
        assert_eq!(report.destroyed(), vec![ShipId(1), ShipId(2)]);
    }
}
