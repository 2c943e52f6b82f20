pub mod animal;
pub mod cell;
pub mod engine;
pub mod error;
pub mod island;
pub mod landscape;
pub mod params;
pub mod rng;
pub mod scenario;
pub mod simulation;
pub mod snapshot;
pub mod spatial;
pub mod stats;
pub mod systems;

pub use animal::{Animal, Species};
pub use engine::{Engine, EngineBuilder, EngineSettings};
pub use error::BioSimError;
pub use island::{AnimalRecord, Island, PopulationRecord};
pub use scenario::{Scenario, ScenarioLoader};
pub use simulation::BioSim;
pub use stats::YearStats;
