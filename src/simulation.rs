//! The control surface for a simulation run.

use anyhow::Result;

use crate::{
    animal::Species,
    engine::{Engine, EngineBuilder, EngineSettings},
    error,
    island::{Island, PopulationRecord},
    landscape::{LandscapeOverrides, LandscapeTable, LandscapeType},
    params::{Parameters, SpeciesOverrides},
    stats::{self, CellCount, SpeciesCounts, YearStats},
};

/// An island plus the engine that advances it, with per-year history.
pub struct BioSim {
    island: Island,
    engine: Engine,
    history: Vec<YearStats>,
}

impl BioSim {
    /// Default parameters, snapshots disabled.
    pub fn new(map: &str, populations: &[PopulationRecord], seed: u64) -> error::Result<Self> {
        let island = Island::from_map(map)?;
        Self::with_settings(island, populations, EngineSettings::new("biosim", seed))
    }

    /// Builds the run around an already-configured island.
    pub fn with_settings(
        island: Island,
        populations: &[PopulationRecord],
        settings: EngineSettings,
    ) -> error::Result<Self> {
        let mut sim = Self {
            island,
            engine: EngineBuilder::annual_cycle(settings).build(),
            history: Vec::new(),
        };
        sim.add_population(populations)?;
        Ok(sim)
    }

    /// Convenience for callers holding parameter tables rather than an island.
    pub fn with_parameters(
        map: &str,
        params: Parameters,
        landscape: LandscapeTable,
        settings: EngineSettings,
    ) -> error::Result<Self> {
        let island = Island::with_parameters(map, params, landscape)?;
        Self::with_settings(island, &[], settings)
    }

    /// Returns how many animals were added.
    pub fn add_population(&mut self, records: &[PopulationRecord]) -> error::Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        self.island.add_population(records, &mut self.engine.rng())
    }

    /// Runs `num_years` further years and returns the new year counter.
    pub fn simulate(&mut self, num_years: u32) -> Result<u32> {
        let history = &mut self.history;
        self.engine
            .run_with_hook(&mut self.island, num_years, |stats| history.push(stats.clone()))
    }

    pub fn year(&self) -> u32 {
        self.island.year()
    }

    pub fn num_animals(&self) -> usize {
        self.island.num_animals()
    }

    pub fn num_animals_per_species(&self) -> SpeciesCounts {
        self.island.num_animals_per_species()
    }

    pub fn animal_distribution(&self) -> Vec<CellCount> {
        stats::animal_distribution(&self.island)
    }

    pub fn density(&self, species: Species) -> Vec<Vec<usize>> {
        stats::density(&self.island, species)
    }

    /// Statistics for the current state. The ledger covers the last simulated year.
    pub fn statistics(&self) -> YearStats {
        YearStats::collect(&self.island)
    }

    pub fn history(&self) -> &[YearStats] {
        &self.history
    }

    pub fn set_animal_parameters(
        &mut self,
        species: Species,
        overrides: &SpeciesOverrides,
    ) -> error::Result<()> {
        self.island.set_animal_parameters(species, overrides)
    }

    pub fn set_landscape_parameters(
        &mut self,
        landscape: LandscapeType,
        overrides: &LandscapeOverrides,
    ) -> error::Result<()> {
        self.island.set_landscape_parameters(landscape, overrides)
    }

    pub fn island(&self) -> &Island {
        &self.island
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BioSimError;
    use crate::island::AnimalRecord;

    const MAP: &str = "
        OOOOO
        OJJSO
        OOOOO
    ";

    fn herbivores(count: usize) -> Vec<PopulationRecord> {
        vec![PopulationRecord::new(
            1,
            1,
            vec![AnimalRecord::new(Species::Herbivore, 5, 20.0); count],
        )]
    }

    #[test]
    fn simulate_advances_year_and_records_history() {
        let mut sim = BioSim::new(MAP, &herbivores(20), 4).unwrap();
        assert_eq!(sim.year(), 0);
        assert_eq!(sim.simulate(3).unwrap(), 3);
        assert_eq!(sim.simulate(2).unwrap(), 5);
        let years: Vec<u32> = sim.history().iter().map(|s| s.year).collect();
        assert_eq!(years, vec![1, 2, 3, 4, 5]);
        assert_eq!(sim.statistics().counts, sim.num_animals_per_species());
    }

    #[test]
    fn zero_years_is_a_no_op() {
        let mut sim = BioSim::new(MAP, &herbivores(5), 4).unwrap();
        assert_eq!(sim.simulate(0).unwrap(), 0);
        assert!(sim.history().is_empty());
        assert_eq!(sim.num_animals(), 5);
    }

    #[test]
    fn distribution_and_density_agree() {
        let mut sim = BioSim::new(MAP, &herbivores(30), 11).unwrap();
        sim.simulate(4).unwrap();
        let herb_density = sim.density(Species::Herbivore);
        let distribution = sim.animal_distribution();
        assert_eq!(distribution.len(), 15);
        for cell in &distribution {
            assert_eq!(herb_density[cell.row][cell.col], cell.herbivores);
        }
        let total: usize = distribution.iter().map(|c| c.herbivores + c.carnivores).sum();
        assert_eq!(total, sim.num_animals());
    }

    #[test]
    fn parameters_are_rejected_once_years_have_run() {
        let overrides = SpeciesOverrides {
            gamma: Some(0.9),
            ..Default::default()
        };

        let mut empty = BioSim::new(MAP, &[], 1).unwrap();
        empty.simulate(3).unwrap();
        assert!(matches!(
            empty.set_animal_parameters(Species::Herbivore, &overrides),
            Err(BioSimError::Parameter(_))
        ));

        let mut doomed = BioSim::new(MAP, &[], 1).unwrap();
        let starving = SpeciesOverrides {
            eta: Some(1.0),
            ..Default::default()
        };
        doomed
            .set_animal_parameters(Species::Carnivore, &starving)
            .unwrap();
        let carns = vec![AnimalRecord::new(Species::Carnivore, 90, 1.0); 3];
        doomed
            .add_population(&[PopulationRecord::new(1, 2, carns)])
            .unwrap();
        doomed.simulate(2).unwrap();
        assert_eq!(doomed.num_animals(), 0);
        assert!(matches!(
            doomed.set_animal_parameters(Species::Herbivore, &overrides),
            Err(BioSimError::Parameter(_))
        ));
        let jungle = LandscapeOverrides {
            f_max: Some(10.0),
            alpha: None,
        };
        assert!(matches!(
            doomed.set_landscape_parameters(LandscapeType::Jungle, &jungle),
            Err(BioSimError::Parameter(_))
        ));
    }

    #[test]
    fn history_keeps_pace_when_a_snapshot_fails() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let mut settings = EngineSettings::new("blocked", 3);
        settings.snapshot_interval_years = 1;
        settings.snapshot_dir = blocker.path().to_path_buf();
        let island = Island::from_map(MAP).unwrap();
        let mut sim = BioSim::with_settings(island, &herbivores(5), settings).unwrap();

        assert!(sim.simulate(4).is_err());
        assert_eq!(sim.year(), 1);
        assert_eq!(sim.history().len(), 1);
        assert_eq!(sim.history()[0].year, sim.year());
    }

    #[test]
    fn parameters_are_rejected_after_seeding() {
        let mut sim = BioSim::new(MAP, &[], 1).unwrap();
        let overrides = SpeciesOverrides {
            gamma: Some(0.5),
            ..Default::default()
        };
        sim.set_animal_parameters(Species::Herbivore, &overrides)
            .unwrap();
        sim.add_population(&herbivores(2)).unwrap();
        assert!(matches!(
            sim.set_animal_parameters(Species::Herbivore, &overrides),
            Err(BioSimError::Parameter(_))
        ));
    }
}
