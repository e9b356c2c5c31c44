use crate::car_following::CarFollowingModel;
use crate::config::DriverConfig;
use crate::demand::DemandPattern;
use crate::headway::{Clock, HeadwayDistribution, HeadwayGenerator};
use crate::lane_change::{LaneChangeOutcome, LaneTopology, Situation};
use crate::mental::Perception;
use crate::{Driver, DriverId, Error, Result, SourceId};
use itertools::Itertools;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotmap::SlotMap;
use std::sync::Arc;

/// A location where vehicles enter the simulation.
struct DemandSource {
    /// Draws the headways between arrivals.
    generator: HeadwayGenerator<StdRng>,
    /// The time of the next arrival in s, if the demand pattern has one left.
    next_arrival: Option<f64>,
}

/// Hosts the demand sources and the drivers of a simulation.
#[derive(Default)]
pub struct Simulation {
    /// The current time in s.
    time: f64,
    /// The current frame of simulation.
    frame: usize,
    /// The demand sources.
    sources: SlotMap<SourceId, DemandSource>,
    /// The drivers being simulated.
    drivers: SlotMap<DriverId, Driver>,
}

impl Clock for Simulation {
    fn now(&self) -> f64 {
        self.time
    }
}

impl Simulation {
    /// Creates a new simulation.
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a demand source, which schedules its first arrival from the current time.
    pub fn add_source(
        &mut self,
        pattern: Arc<DemandPattern>,
        distribution: HeadwayDistribution,
        seed: u64,
    ) -> SourceId {
        let mut generator = HeadwayGenerator::new(pattern, distribution, StdRng::seed_from_u64(seed));
        let now = self.time;
        let next_arrival = generator.draw(&now).map(|headway| now + headway);
        self.sources.insert(DemandSource {
            generator,
            next_arrival,
        })
    }

    /// Removes a demand source.
    pub fn remove_source(&mut self, id: SourceId) {
        self.sources.remove(id);
    }

    /// The time of a source's next arrival, if any.
    pub fn next_arrival(&self, id: SourceId) -> Option<f64> {
        self.sources.get(id).and_then(|source| source.next_arrival)
    }

    /// Advances the simulation by `dt` seconds.
    ///
    /// Returns the arrivals in the elapsed interval as `(source, time)`, ordered by time.
    pub fn step(&mut self, dt: f64) -> Vec<(SourceId, f64)> {
        let end = self.time + dt;
        let mut arrivals = vec![];
        for (id, source) in &mut self.sources {
            while let Some(time) = source.next_arrival.filter(|time| *time <= end) {
                arrivals.push((id, time));
                source.next_arrival = source.generator.draw(&time).map(|headway| time + headway);
            }
        }
        self.time = end;
        self.frame += 1;
        if !arrivals.is_empty() {
            log::trace!("{} arrivals by t = {:.2}", arrivals.len(), end);
        }
        arrivals
            .into_iter()
            .sorted_by(|a, b| a.1.total_cmp(&b.1))
            .collect()
    }

    /// Gets the current time in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Adds a driver to the simulation.
    pub fn add_driver(&mut self, config: &DriverConfig) -> Result<DriverId> {
        self.drivers.try_insert_with_key(|id| Driver::new(id, config))
    }

    /// Removes a driver from the simulation.
    pub fn remove_driver(&mut self, id: DriverId) -> Option<Driver> {
        self.drivers.remove(id)
    }

    /// Gets a reference to the driver with the given ID.
    pub fn get_driver(&self, id: DriverId) -> Option<&Driver> {
        self.drivers.get(id)
    }

    /// Gets a mutable reference to the driver with the given ID.
    pub fn get_driver_mut(&mut self, id: DriverId) -> Option<&mut Driver> {
        self.drivers.get_mut(id)
    }

    /// Returns an iterator over all the drivers in the simulation.
    pub fn iter_drivers(&self) -> impl Iterator<Item = &Driver> {
        self.drivers.values()
    }

    /// Runs a planning step for one driver.
    pub fn plan<P, T, C>(
        &mut self,
        id: DriverId,
        perception: &P,
        situation: &Situation<'_, T>,
        car_following: &C,
    ) -> Result<LaneChangeOutcome>
    where
        P: Perception + ?Sized,
        T: LaneTopology + ?Sized,
        C: CarFollowingModel + ?Sized,
    {
        self.drivers
            .get_mut(id)
            .ok_or(Error::UnknownDriver(id))?
            .plan(perception, situation, car_following)
    }
}
