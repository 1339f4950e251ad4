//! Sub-tick movement schedule.
//!
//! One tick is split into [`TOTAL_SUBTICKS`] sub-ticks. A ship whose
//! velocity has Chebyshev length `n` moves one lattice step every
//! `TOTAL_SUBTICKS / n` sub-ticks, following the rasterized line from its
//! position to `position + velocity`. Because `TOTAL_SUBTICKS = 8!`, every
//! speed from 1 to 8 divides the tick evenly and ships of different speeds
//! interleave without rounding.
//!
//! The schedule stores incremental offsets rather than absolute positions,
//! so a ship that is pushed off course only needs its own entries rebuilt.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use flotilla_lattice::fleet::ShipHandle;
use flotilla_lattice::line::rasterize;
use flotilla_lattice::ship::Ship;
use flotilla_lattice::vector::Vector;

/// Index of a sub-tick within one tick, in `(0, TOTAL_SUBTICKS]`.
pub type SubTick = u32;

/// Number of sub-ticks per tick (`8!`).
pub const TOTAL_SUBTICKS: SubTick = 2 * 3 * 4 * 5 * 6 * 7 * 8;

/// Sub-ticks between two steps of a ship moving at `velocity`.
///
/// A ship at rest gets a single event at the end of the tick.
pub fn step_interval(velocity: Vector) -> SubTick {
    match velocity.chebyshev_length() {
        0 => TOTAL_SUBTICKS,
        speed => (TOTAL_SUBTICKS / speed as SubTick).max(1),
    }
}

/// The `(sub-tick, offset)` events of `ship` for one full tick.
///
/// Grid points past the end of the rasterized line are not scheduled, which
/// only matters for speeds that do not divide [`TOTAL_SUBTICKS`].
pub fn trajectory(ship: &Ship) -> Vec<(SubTick, Vector)> {
    let interval = step_interval(ship.velocity);
    if ship.velocity.is_zero() {
        return vec![(TOTAL_SUBTICKS, Vector::ZERO)];
    }

    let line = rasterize(ship.position, ship.position + ship.velocity);
    let grid = (1..).map(|i| i * interval).take_while(|t| *t <= TOTAL_SUBTICKS);

    line.windows(2)
        .zip(grid)
        .map(|(step, subtick)| (subtick, step[1] - step[0]))
        .collect()
}

// ---------------------------------------------------------------------------
// TickSchedule
// ---------------------------------------------------------------------------

/// Ordered sub-tick -> movers map with a per-ship index of its sub-ticks.
#[derive(Debug, Clone, Default)]
pub struct TickSchedule {
    events: BTreeMap<SubTick, Vec<(ShipHandle, Vector)>>,
    moves: BTreeMap<ShipHandle, BTreeSet<SubTick>>,
}

impl TickSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` when no ship has any pending event.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// (Re)build the events of `ship` from its current position and velocity.
    ///
    /// All previous events of the ship are dropped first. Events before
    /// `not_before` are discarded: the tick has already passed them.
    pub fn schedule_ship(&mut self, handle: ShipHandle, ship: &Ship, not_before: SubTick) {
        self.clear_ship(handle);

        let mut subticks = BTreeSet::new();
        for (subtick, offset) in trajectory(ship) {
            if subtick < not_before {
                continue;
            }
            self.events.entry(subtick).or_default().push((handle, offset));
            subticks.insert(subtick);
        }
        if !subticks.is_empty() {
            self.moves.insert(handle, subticks);
        }
    }

    /// Remove every event of `handle`.
    pub fn clear_ship(&mut self, handle: ShipHandle) {
        let Some(subticks) = self.moves.remove(&handle) else {
            return;
        };
        for subtick in subticks {
            if let Some(movers) = self.events.get_mut(&subtick) {
                movers.retain(|(h, _)| *h != handle);
                if movers.is_empty() {
                    self.events.remove(&subtick);
                }
            }
        }
    }

    /// The first scheduled sub-tick strictly after `cursor`.
    pub fn next_after(&self, cursor: SubTick) -> Option<SubTick> {
        self.events
            .range((Bound::Excluded(cursor), Bound::Unbounded))
            .next()
            .map(|(subtick, _)| *subtick)
    }

    /// Ships scheduled at `subtick` with their offsets, in scheduling order.
    pub fn movers_at(&self, subtick: SubTick) -> &[(ShipHandle, Vector)] {
        self.events.get(&subtick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `handle` is scheduled to move at `subtick`.
    pub fn moves_at(&self, handle: ShipHandle, subtick: SubTick) -> bool {
        self.moves
            .get(&handle)
            .is_some_and(|subticks| subticks.contains(&subtick))
    }

    /// Sub-ticks at which `handle` is scheduled, ascending.
    pub fn subticks_of(&self, handle: ShipHandle) -> impl Iterator<Item = SubTick> + '_ {
        self.moves.get(&handle).into_iter().flatten().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
