mod aging;
mod feeding;
mod migration;
mod mortality;
mod procreation;
mod regrowth;

pub use aging::AgingSystem;
pub use feeding::FeedingSystem;
pub use migration::MigrationSystem;
pub use mortality::MortalitySystem;
pub use procreation::ProcreationSystem;
pub use regrowth::RegrowthSystem;

use std::cmp::Ordering;

use crate::animal::Animal;
use crate::params::SpeciesParams;

/// Stable sort, fittest first; ties keep their current order.
pub(crate) fn sort_fittest_first(animals: &mut [Animal], params: &SpeciesParams) {
    animals.sort_by(|a, b| by_fitness(b, a, params));
}

fn by_fitness(a: &Animal, b: &Animal, params: &SpeciesParams) -> Ordering {
    a.fitness(params).total_cmp(&b.fitness(params))
}
