//! The sub-tick processor.
//!
//! [`TickProcessor::process`] advances a [`Fleet`] by one full tick:
//!
//! 1. Every alive ship gets a movement schedule (see [`crate::schedule`]).
//! 2. Scheduled sub-ticks are visited in increasing order. At each one, every
//!    alive ship gets a candidate position: movers step by their offset,
//!    everyone else stays put.
//! 3. Ships whose candidates are within Chebyshev distance 1 of each other
//!    form collision groups. Each group goes through the [`Physics`] solver
//!    and its members take damage.
//! 4. After a collision, every ship whose velocity changed is rescheduled
//!    and the same sub-tick is processed again, before anyone moves.
//!    Without a collision the movers commit their candidates; a ship whose
//!    candidate lies outside the map is destroyed instead.
//!
//! # Determinism
//!
//! Positions, velocities and sub-tick indices are integers, the schedule is
//! an ordered map and ships are visited in table order, so the same fleet
//! always produces the same result.
//!
//! # Example
//!
//! ```
//! use flotilla_engine::prelude::*;
//!
//! let mut fleet = Fleet::new();
//! let ship = fleet
//!     .insert(Ship::new(ShipId(1), Vector::new(10, 10, 10), 10).with_velocity(Vector::new(2, 1, 0)))
//!     .unwrap();
//!
//! let processor = TickProcessor::default();
//! let report = processor.process(&mut fleet).unwrap();
//!
//! assert!(report.is_quiet());
//! assert_eq!(fleet[ship].position, Vector::new(12, 11, 10));
//! ```

use std::collections::BTreeMap;

use flotilla_lattice::bounds::{Bounds, CubicMap};
use flotilla_lattice::fleet::{Fleet, ShipHandle};
use flotilla_lattice::region::{CubeHull, HullModel};
use flotilla_lattice::vector::Vector;
use tracing::{debug, trace, warn};

use crate::physics::{ChebyshevEnergy, EnergyModel, Physics};
use crate::report::{TickEvent, TickReport};
use crate::schedule::{SubTick, TickSchedule};
use crate::EngineError;

/// Candidates closer than this (Chebyshev) are in contact.
pub const CONTACT_DISTANCE: i32 = 2;

// ---------------------------------------------------------------------------
// ProcessorConfig
// ---------------------------------------------------------------------------

/// Collaborators of the tick processor.
///
/// Defaults to cube hulls, squared Chebyshev energy and a
/// [`CubicMap`] of [`CubicMap::DEFAULT_SIZE`].
pub struct ProcessorConfig<H: HullModel = CubeHull> {
    pub hull: H,
    pub energy: Box<dyn EnergyModel>,
    pub bounds: Box<dyn Bounds>,
}

impl Default for ProcessorConfig<CubeHull> {
    fn default() -> Self {
        Self {
            hull: CubeHull,
            energy: Box::new(ChebyshevEnergy),
            bounds: Box::new(CubicMap::default()),
        }
    }
}

impl<H: HullModel> ProcessorConfig<H> {
    pub fn with_hull<H2: HullModel>(self, hull: H2) -> ProcessorConfig<H2> {
        ProcessorConfig {
            hull,
            energy: self.energy,
            bounds: self.bounds,
        }
    }

    pub fn with_energy(mut self, energy: impl EnergyModel + 'static) -> Self {
        self.energy = Box::new(energy);
        self
    }

    pub fn with_bounds(mut self, bounds: impl Bounds + 'static) -> Self {
        self.bounds = Box::new(bounds);
        self
    }
}

// ---------------------------------------------------------------------------
// Collision grouping
// ---------------------------------------------------------------------------

/// Contacts of one ship with the other candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ContactTally {
    neighbors: i32,
    nose_damage: i32,
}

/// Connected components of the contact graph over a candidate set.
#[derive(Debug, Default)]
struct CollisionSystems {
    /// Components with at least two members, as ascending candidate indices.
    groups: Vec<Vec<usize>>,
    /// Per candidate index.
    tallies: Vec<ContactTally>,
}

fn in_contact(a: Vector, b: Vector) -> bool {
    a.chebyshev_distance(b) < CONTACT_DISTANCE
}

fn find_collision_systems(fleet: &Fleet, candidates: &[(ShipHandle, Vector)]) -> CollisionSystems {
    let n = candidates.len();

    let mut tallies = vec![ContactTally::default(); n];
    for i in 0..n {
        for j in 0..n {
            if i != j && in_contact(candidates[i].1, candidates[j].1) {
                tallies[i].neighbors += 1;
                tallies[i].nose_damage += fleet[candidates[j].0].sharp_nose_damage;
            }
        }
    }

    let mut visited = vec![false; n];
    let mut groups = Vec::new();
    let mut stack = Vec::new();
    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        stack.push(root);

        let mut members = Vec::new();
        while let Some(i) = stack.pop() {
            members.push(i);
            for j in 0..n {
                if !visited[j] && in_contact(candidates[i].1, candidates[j].1) {
                    visited[j] = true;
                    stack.push(j);
                }
            }
        }

        if members.len() >= 2 {
            members.sort_unstable();
            groups.push(members);
        }
    }

    CollisionSystems { groups, tallies }
}

// ---------------------------------------------------------------------------
// TickProcessor
// ---------------------------------------------------------------------------

/// Outcome of collision handling at one sub-tick.
#[derive(Debug, Default)]
struct CollisionOutcome {
    collided: bool,
    /// Ships whose velocity differs after resolution.
    changed: Vec<ShipHandle>,
}

/// Advances a fleet through one tick of sub-tick movement and collisions.
pub struct TickProcessor<H: HullModel = CubeHull> {
    physics: Physics<H>,
    bounds: Box<dyn Bounds>,
}

impl Default for TickProcessor<CubeHull> {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl<H: HullModel> TickProcessor<H> {
    pub fn new(config: ProcessorConfig<H>) -> Self {
        Self {
            physics: Physics::with_boxed_energy(config.hull, config.energy),
            bounds: config.bounds,
        }
    }

    /// The collision solver used by this processor.
    pub fn physics(&self) -> &Physics<H> {
        &self.physics
    }

    /// Process one tick, mutating positions, velocities and health in place.
    ///
    /// # Errors
    ///
    /// [`EngineError::UnsupportedIntersection`] if the hull model produces an
    /// unknown contact classification. The tick is abandoned at that point;
    /// changes made at earlier sub-ticks are kept.
    pub fn process(&self, fleet: &mut Fleet) -> Result<TickReport, EngineError> {
        let mut report = TickReport::default();

        let mut schedule = TickSchedule::new();
        let alive: Vec<ShipHandle> = fleet.alive_handles().collect();
        for &handle in &alive {
            schedule.schedule_ship(handle, &fleet[handle], 0);
        }
        if schedule.is_empty() {
            return Ok(report);
        }

        let mut cursor: SubTick = 0;
        while let Some(subtick) = schedule.next_after(cursor) {
            cursor = subtick;

            let movers: BTreeMap<ShipHandle, Vector> = schedule
                .movers_at(subtick)
                .iter()
                .filter(|(h, _)| !fleet[*h].is_dead() && schedule.moves_at(*h, subtick))
                .copied()
                .collect();
            if movers.is_empty() {
                continue;
            }
            report.subticks_visited += 1;
            trace!(subtick, movers = movers.len(), "processing sub-tick");

            let candidates: Vec<(ShipHandle, Vector)> = fleet
                .alive_handles()
                .map(|h| {
                    let offset = movers.get(&h).copied().unwrap_or(Vector::ZERO);
                    (h, fleet[h].position + offset)
                })
                .collect();

            let outcome = self.resolve_collisions(fleet, &candidates, subtick, &mut report)?;
            if outcome.collided {
                if !outcome.changed.is_empty() {
                    for handle in outcome.changed {
                        if fleet[handle].is_dead() {
                            schedule.clear_ship(handle);
                        } else {
                            schedule.schedule_ship(handle, &fleet[handle], subtick);
                        }
                    }
                    report.rewinds += 1;
                    cursor = subtick - 1;
                    continue;
                }
                warn!(subtick, "collision left every velocity unchanged, committing contact");
            }

            self.commit(fleet, &movers, subtick, &mut report);
        }

        Ok(report)
    }

    fn resolve_collisions(
        &self,
        fleet: &mut Fleet,
        candidates: &[(ShipHandle, Vector)],
        subtick: SubTick,
        report: &mut TickReport,
    ) -> Result<CollisionOutcome, EngineError> {
        let systems = find_collision_systems(fleet, candidates);
        let mut outcome = CollisionOutcome {
            collided: !systems.groups.is_empty(),
            changed: Vec::new(),
        };

        for members in &systems.groups {
            let group: Vec<(ShipHandle, Vector)> = members.iter().map(|&i| candidates[i]).collect();
            let before: Vec<Vector> = group.iter().map(|(h, _)| fleet[*h].velocity).collect();

            let iterations = self.physics.resolve(fleet, &group)?;
            report.solver_invocations += 1;
            report.events.push(TickEvent::Collision {
                subtick,
                ships: group.iter().map(|(h, _)| fleet[*h].id()).collect(),
                iterations,
            });

            let multiplier = i32::try_from(iterations).unwrap_or(i32::MAX);
            for (&i, ((handle, _), old_velocity)) in members.iter().zip(group.iter().zip(&before)) {
                let tally = systems.tallies[i];
                let amount = tally
                    .neighbors
                    .saturating_mul(multiplier)
                    .saturating_add(tally.nose_damage);

                let ship = &mut fleet[*handle];
                let killed = ship.be_attacked(amount);
                debug!(subtick, ship = %ship.id(), amount, killed, "collision damage");
                report.events.push(TickEvent::Damaged {
                    subtick,
                    ship: ship.id(),
                    amount,
                    killed,
                });

                if ship.velocity != *old_velocity {
                    outcome.changed.push(*handle);
                }
            }
        }

        Ok(outcome)
    }

    fn commit(
        &self,
        fleet: &mut Fleet,
        movers: &BTreeMap<ShipHandle, Vector>,
        subtick: SubTick,
        report: &mut TickReport,
    ) {
        for (&handle, &offset) in movers {
            let ship = &mut fleet[handle];
            if ship.is_dead() {
                continue;
            }
            let next = ship.position + offset;
            if self.bounds.is_outside(next) {
                ship.kill();
                debug!(subtick, ship = %ship.id(), position = %next, "ship left the map");
                report.events.push(TickEvent::LeftMap {
                    subtick,
                    ship: ship.id(),
                    position: next,
                });
                continue;
            }
            ship.position = next;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
