//! Collision resolution for groups of touching ships.
//!
//! [`Physics::resolve`] takes a collision group (ships and the positions they
//! are about to move to) and overwrites every ship's velocity:
//!
//! 1. For every unordered pair the hull regions at the candidate positions
//!    are classified by their volume of intersection. Partial contact pushes
//!    along the direction between the candidate positions, full overlap along
//!    the direction between the current positions. Each pair's normal is
//!    added to the first ship and subtracted from the second.
//! 2. The accumulated normals are subtracted from the velocities repeatedly.
//!    The loop stops as soon as one more subtraction would lift the group's
//!    total energy above its pre-collision value.
//!
//! The number of executed subtractions is returned; the tick processor uses
//! it as a damage multiplier.

use flotilla_lattice::fleet::{Fleet, ShipHandle};
use flotilla_lattice::region::{CubeHull, HullModel, Region};
use flotilla_lattice::vector::Vector;
use tracing::debug;

use crate::EngineError;

// ---------------------------------------------------------------------------
// Energy models
// ---------------------------------------------------------------------------

/// Kinetic energy of a single velocity.
///
/// Implementations must grow without bound along every nonzero direction,
/// otherwise the solver loop has no stopping point.
pub trait EnergyModel {
    fn energy(&self, velocity: Vector) -> i64;
}

impl<F> EnergyModel for F
where
    F: Fn(Vector) -> i64,
{
    fn energy(&self, velocity: Vector) -> i64 {
        self(velocity)
    }
}

/// Squared Chebyshev length. The default energy model.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChebyshevEnergy;

impl EnergyModel for ChebyshevEnergy {
    fn energy(&self, velocity: Vector) -> i64 {
        let len = i64::from(velocity.chebyshev_length());
        len * len
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// Contact class derived from a volume of intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Regions do not touch.
    None,
    /// Regions share a corner, an edge or a face.
    Partial,
    /// Regions coincide.
    Full,
}

impl Contact {
    /// Map a volume of intersection to a contact class.
    ///
    /// Returns `None` for volumes outside `{0, 1, 2, 4, 8}`.
    pub fn from_volume(volume: u32) -> Option<Contact> {
        match volume {
            0 => Some(Contact::None),
            1 | 2 | 4 => Some(Contact::Partial),
            8 => Some(Contact::Full),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Physics
// ---------------------------------------------------------------------------

/// The collision solver.
pub struct Physics<H: HullModel = CubeHull> {
    hull: H,
    energy: Box<dyn EnergyModel>,
}

impl Default for Physics<CubeHull> {
    fn default() -> Self {
        Self::new(CubeHull, ChebyshevEnergy)
    }
}

impl<H: HullModel> Physics<H> {
    pub fn new(hull: H, energy: impl EnergyModel + 'static) -> Self {
        Self::with_boxed_energy(hull, Box::new(energy))
    }

    pub fn with_boxed_energy(hull: H, energy: Box<dyn EnergyModel>) -> Self {
        Self { hull, energy }
    }

    /// Resolve one collision group, overwriting the ships' velocities.
    ///
    /// `group` pairs each ship with the position it is about to move to.
    /// Returns the number of solver iterations (always at least one).
    ///
    /// # Errors
    ///
    /// [`EngineError::UnsupportedIntersection`] if the hull model reports a
    /// volume of intersection outside `{0, 1, 2, 4, 8}`. No velocity is
    /// modified in that case.
    pub fn resolve(
        &self,
        fleet: &mut Fleet,
        group: &[(ShipHandle, Vector)],
    ) -> Result<u32, EngineError> {
        let normals = self.contact_normals(fleet, group)?;
        let velocities: Vec<Vector> = group.iter().map(|(h, _)| fleet[*h].velocity).collect();

        let (resolved, count) = self.velocities_after_collision(&velocities, &normals);

        for ((handle, _), velocity) in group.iter().zip(resolved) {
            fleet[*handle].velocity = velocity;
        }

        debug!(ships = group.len(), iterations = count, "resolved collision group");
        Ok(count)
    }

    /// Accumulated contact normal of every member of `group`.
    pub fn contact_normals(
        &self,
        fleet: &Fleet,
        group: &[(ShipHandle, Vector)],
    ) -> Result<Vec<Vector>, EngineError> {
        let mut normals = vec![Vector::ZERO; group.len()];
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                if let Some(normal) = self.contact_normal(fleet, group[i], group[j])? {
                    normals[i] += normal;
                    normals[j] -= normal;
                }
            }
        }
        Ok(normals)
    }

    fn contact_normal(
        &self,
        fleet: &Fleet,
        (first, first_next): (ShipHandle, Vector),
        (second, second_next): (ShipHandle, Vector),
    ) -> Result<Option<Vector>, EngineError> {
        let a = &fleet[first];
        let b = &fleet[second];
        let volume = self
            .hull
            .region(a, first_next)
            .volume_of_intersection(&self.hull.region(b, second_next));

        match Contact::from_volume(volume) {
            Some(Contact::None) => Ok(None),
            Some(Contact::Partial) => Ok(Some((second_next - first_next).normalize())),
            Some(Contact::Full) => Ok(Some((b.position - a.position).normalize())),
            None => Err(EngineError::UnsupportedIntersection {
                volume,
                first: a.id(),
                second: b.id(),
            }),
        }
    }

    /// Subtract `normals` from `velocities` until one more step would raise
    /// the total energy above its starting value.
    ///
    /// Returns the resolved velocities and the number of executed steps.
    /// When every normal is zero the velocities cannot change, so exactly
    /// one step is reported.
    pub fn velocities_after_collision(
        &self,
        velocities: &[Vector],
        normals: &[Vector],
    ) -> (Vec<Vector>, u32) {
        let start_energy = self.total_energy(velocities.iter().copied());
        let stuck = normals.iter().all(|n| n.is_zero());

        let mut current = velocities.to_vec();
        let mut count = 0u32;
        loop {
            count += 1;
            for (v, n) in current.iter_mut().zip(normals) {
                *v -= *n;
            }
            if stuck {
                break;
            }
            let next_energy =
                self.total_energy(current.iter().zip(normals).map(|(v, n)| *v - *n));
            if next_energy > start_energy {
                break;
            }
        }
        (current, count)
    }

    fn total_energy(&self, velocities: impl Iterator<Item = Vector>) -> i64 {
        velocities.map(|v| self.energy.energy(v)).sum()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
