use std::path::PathBuf;

use anyhow::Result;
use tracing::{debug, info};

use crate::{
    island::Island,
    rng::{RngManager, SystemRng},
    snapshot::SnapshotWriter,
    stats::YearStats,
    systems::{
        AgingSystem, FeedingSystem, MigrationSystem, MortalitySystem, ProcreationSystem,
        RegrowthSystem,
    },
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    pub snapshot_interval_years: u32,
    pub snapshot_dir: PathBuf,
}

impl EngineSettings {
    /// Settings with snapshots disabled.
    pub fn new(scenario_name: impl Into<String>, seed: u64) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            seed,
            snapshot_interval_years: 0,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    /// The six phases of a simulated year, in order.
    pub fn annual_cycle(settings: EngineSettings) -> Self {
        Self::new(settings)
            .with_system(RegrowthSystem::new())
            .with_system(FeedingSystem::new())
            .with_system(ProcreationSystem::new())
            .with_system(MigrationSystem::new())
            .with_system(AgingSystem::new())
            .with_system(MortalitySystem::new())
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_years,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// Advances the island by `years` and returns the new year counter.
    pub fn run(&mut self, island: &mut Island, years: u32) -> Result<u32> {
        self.run_with_hook(island, years, |_| {})
    }

    /// Like [`Engine::run`], calling `hook` with each completed year's statistics.
    /// The hook sees a year before its snapshot is written.
    pub fn run_with_hook<F>(&mut self, island: &mut Island, years: u32, mut hook: F) -> Result<u32>
    where
        F: FnMut(&YearStats),
    {
        info!(
            scenario = %self.settings.scenario_name,
            from_year = island.year(),
            years,
            "simulating"
        );
        for _ in 0..years {
            let stats = self.step(island)?;
            hook(&stats);
            self.snapshot_writer
                .maybe_write(&stats, &self.settings.scenario_name)?;
        }
        info!(
            year = island.year(),
            animals = island.num_animals(),
            "simulation paused"
        );
        Ok(island.year())
    }

    fn step(&mut self, island: &mut Island) -> Result<YearStats> {
        island.ledger = Default::default();
        let ctx = SystemContext {
            year: island.year() + 1,
        };
        for system in &mut self.systems {
            let mut rng = self.rng.shared();
            system.run(&ctx, island, &mut rng)?;
            debug!(
                year = ctx.year,
                phase = system.name(),
                animals = island.num_animals(),
                "phase done"
            );
        }
        // a failed check leaves the year counter where it was
        island.verify()?;
        island.advance_year();

        let stats = YearStats::collect(island);
        debug!(
            year = stats.year,
            herbivores = stats.counts.herbivores,
            carnivores = stats.counts.carnivores,
            "year complete"
        );
        Ok(stats)
    }

    /// The shared random stream, for draws made outside the annual cycle.
    pub fn rng(&mut self) -> SystemRng<'_> {
        self.rng.shared()
    }
}

pub struct SystemContext {
    /// The year being simulated, starting at 1.
    pub year: u32,
}

/// One phase of the annual cycle.
pub trait System {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &SystemContext, island: &mut Island, rng: &mut SystemRng<'_>)
        -> Result<()>;
}
