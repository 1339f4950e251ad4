//! Tick-by-tick driver around a [`TickProcessor`].
//!
//! [`Simulation`] owns a [`Fleet`] and advances it one full tick at a time,
//! counting ticks and keeping the report of the most recent one. Snapshot
//! support lives in [`crate::snapshot`].

use flotilla_lattice::fleet::Fleet;
use flotilla_lattice::region::{CubeHull, HullModel};

use crate::report::TickReport;
use crate::tick::TickProcessor;
use crate::EngineError;

/// A fleet plus the processor that moves it.
pub struct Simulation<H: HullModel = CubeHull> {
    fleet: Fleet,
    processor: TickProcessor<H>,
    tick_counter: u64,
    last_report: TickReport,
}

impl<H: HullModel> Simulation<H> {
    /// Start a simulation at tick 0.
    pub fn new(fleet: Fleet, processor: TickProcessor<H>) -> Self {
        Self {
            fleet,
            processor,
            tick_counter: 0,
            last_report: TickReport::default(),
        }
    }

    /// Execute one tick.
    ///
    /// The tick counter only advances when the tick completes. On error the
    /// fleet keeps whatever was committed before the failing sub-tick.
    pub fn tick(&mut self) -> Result<&TickReport, EngineError> {
        let report = self.processor.process(&mut self.fleet)?;
        self.tick_counter += 1;
        self.last_report = report;
        Ok(&self.last_report)
    }

    /// Run `count` ticks in sequence.
    ///
    /// Returns the number of collision groups resolved across all of them.
    pub fn run_ticks(&mut self, count: u64) -> Result<u64, EngineError> {
        let mut collisions = 0u64;
        for _ in 0..count {
            collisions += u64::from(self.tick()?.solver_invocations);
        }
        Ok(collisions)
    }

    // -- accessors ----------------------------------------------------------

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// Mutable access to the fleet, for setup and scripted interventions
    /// between ticks.
    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    pub fn processor(&self) -> &TickProcessor<H> {
        &self.processor
    }

    /// Report of the most recent tick.
    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    pub(crate) fn replace_state(&mut self, fleet: Fleet, tick_counter: u64) {
        self.fleet = fleet;
        self.tick_counter = tick_counter;
        self.last_report = TickReport::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use flotilla_lattice::ship::{Ship, ShipId};
    use flotilla_lattice::vector::Vector;

    fn two_ship_fleet() -> Fleet {
        let mut fleet = Fleet::new();
        fleet
            .insert(Ship::new(ShipId(1), Vector::new(20, 20, 20), 50).with_velocity(Vector::new(1, 0, 0)))
            .unwrap();
        fleet
            .insert(Ship::new(ShipId(2), Vector::new(20, 40, 20), 50).with_velocity(Vector::new(0, -2, 0)))
            .unwrap();
        fleet
    }

    #[test]
    fn new_simulation_starts_at_zero() {
        let sim = Simulation::new(two_ship_fleet(), TickProcessor::default());
        assert_eq!(sim.tick_count(), 0);
        assert!(sim.last_report().is_quiet());
        assert_eq!(sim.fleet().len(), 2);
    }

    #[test]
    fn ticks_accumulate_movement() {
        let mut sim = Simulation::new(two_ship_fleet(), TickProcessor::default());
        let collisions = sim.run_ticks(4).unwrap();
        assert_eq!(collisions, 0);
        assert_eq!(sim.tick_count(), 4);
        assert_eq!(sim.fleet().ship(ShipId(1)).unwrap().position, Vector::new(24, 20, 20));
        assert_eq!(sim.fleet().ship(ShipId(2)).unwrap().position, Vector::new(20, 32, 20));
    }

    #[test]
    fn last_report_tracks_latest_tick() {
        let mut fleet = Fleet::new();
        fleet
            .insert(Ship::new(ShipId(1), Vector::new(98, 50, 50), 5).with_velocity(Vector::new(1, 0, 0)))
            .unwrap();
        let mut sim = Simulation::new(fleet, TickProcessor::default());

        assert!(sim.tick().unwrap().is_quiet());
        let report = sim.tick().unwrap();
        assert_eq!(report.destroyed(), vec![ShipId(1)]);
        assert!(sim.fleet().ship(ShipId(1)).unwrap().is_dead());

        // Nothing alive, nothing happens.
        assert!(sim.tick().unwrap().is_quiet());
        assert_eq!(sim.tick_count(), 3);
    }
}
