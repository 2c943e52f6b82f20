use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::{
    animal::Species,
    engine::EngineSettings,
    island::{Island, PopulationRecord},
    landscape::{LandscapeOverrides, LandscapeType},
    params::SpeciesOverrides,
    simulation::BioSim,
};

fn default_years() -> u32 {
    100
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub seed: u64,
    #[serde(default = "default_years")]
    pub years: u32,
    #[serde(default)]
    pub snapshot_interval_years: u32,
    pub map: String,
    #[serde(default)]
    pub parameters: ScenarioParameters,
    #[serde(default)]
    pub landscape: ScenarioLandscape,
    #[serde(default)]
    pub populations: Vec<PopulationRecord>,
    #[serde(default)]
    pub introductions: Vec<Introduction>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioParameters {
    #[serde(default)]
    pub herbivore: Option<SpeciesOverrides>,
    #[serde(default)]
    pub carnivore: Option<SpeciesOverrides>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioLandscape {
    #[serde(default)]
    pub jungle: Option<LandscapeOverrides>,
    #[serde(default)]
    pub savannah: Option<LandscapeOverrides>,
}

/// Animals added just before `year` is simulated.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Introduction {
    pub year: u32,
    pub populations: Vec<PopulationRecord>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Builds the island with overrides applied and the initial populations seeded.
    pub fn build_simulation(&self, settings: EngineSettings) -> Result<BioSim> {
        if let Some(intro) = self.introductions.iter().find(|intro| intro.year == 0) {
            bail!(
                "Introduction in scenario '{}' is scheduled for year {}; years start at 1",
                self.name,
                intro.year
            );
        }

        let mut island = Island::from_map(&self.map)
            .with_context(|| format!("Invalid map in scenario '{}'", self.name))?;

        let species = [
            (Species::Herbivore, &self.parameters.herbivore),
            (Species::Carnivore, &self.parameters.carnivore),
        ];
        for (species, overrides) in species {
            if let Some(overrides) = overrides {
                island
                    .set_animal_parameters(species, overrides)
                    .with_context(|| format!("Invalid {species} parameters"))?;
            }
        }

        let landscapes = [
            (LandscapeType::Jungle, &self.landscape.jungle),
            (LandscapeType::Savannah, &self.landscape.savannah),
        ];
        for (landscape, overrides) in landscapes {
            if let Some(overrides) = overrides {
                island
                    .set_landscape_parameters(landscape, overrides)
                    .with_context(|| format!("Invalid {landscape} parameters"))?;
            }
        }

        let sim = BioSim::with_settings(island, &self.populations, settings)
            .with_context(|| format!("Invalid populations in scenario '{}'", self.name))?;
        Ok(sim)
    }

    /// Default engine settings for this scenario.
    pub fn settings(&self) -> EngineSettings {
        let mut settings = EngineSettings::new(self.name.clone(), self.seed);
        settings.snapshot_interval_years = self.snapshot_interval_years;
        settings
    }

    pub fn years(&self, override_years: Option<u32>) -> u32 {
        override_years.unwrap_or(self.years)
    }

    /// Introductions due before `year` runs, in file order.
    pub fn introductions_for(&self, year: u32) -> impl Iterator<Item = &PopulationRecord> {
        self.introductions
            .iter()
            .filter(move |intro| intro.year == year)
            .flat_map(|intro| intro.populations.iter())
    }

    /// Runs `years` years, applying each introduction just before its year.
    pub fn run(&self, sim: &mut BioSim, years: u32) -> Result<u32> {
        let target = sim.year() + years;
        while sim.year() < target {
            let next = sim.year() + 1;
            let due: Vec<PopulationRecord> = self.introductions_for(next).cloned().collect();
            if !due.is_empty() {
                let added = sim
                    .add_population(&due)
                    .with_context(|| format!("Invalid introduction for year {next}"))?;
                info!(year = next, added, "introduced animals");
            }

            // run uninterrupted up to the next scheduled introduction
            let stop = self
                .introductions
                .iter()
                .map(|intro| intro.year)
                .filter(|&year| year > next && year <= target)
                .min()
                .map_or(target, |year| year - 1);
            sim.simulate(stop - sim.year())?;
        }
        Ok(sim.year())
    }
}
