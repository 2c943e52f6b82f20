use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use biosim::{animal::Species, scenario::ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "Island ecosystem simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/small_island.yaml")]
    scenario: PathBuf,

    /// Override year count (uses scenario default when omitted)
    #[arg(long)]
    years: Option<u32>,

    /// Override snapshot interval in years, 0 disables snapshots
    #[arg(long)]
    snapshot_interval: Option<u32>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let years = scenario.years(cli.years);

    let mut settings = scenario.settings();
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }
    if let Some(interval) = cli.snapshot_interval {
        settings.snapshot_interval_years = interval;
    }
    if let Some(dir) = cli.snapshot_dir {
        settings.snapshot_dir = dir;
    }

    let mut sim = scenario.build_simulation(settings)?;
    scenario.run(&mut sim, years)?;

    let counts = sim.num_animals_per_species();
    println!(
        "Scenario '{}' completed {} years. {}: {}, {}: {}",
        scenario.name,
        sim.year(),
        Species::Herbivore,
        counts.herbivores,
        Species::Carnivore,
        counts.carnivores
    );
    Ok(())
}
