use anyhow::Result;
use tracing::debug;

use crate::{
    animal::{Animal, Species},
    cell::Cell,
    engine::{System, SystemContext},
    island::Island,
    params::SpeciesParams,
    rng::SystemRng,
    spatial::GridShape,
};

/// What a migrating animal can see of a neighbouring cell. Captured for
/// every cell before any animal moves.
#[derive(Debug, Clone, Copy)]
struct CellView {
    passable: bool,
    fodder: f64,
    herbivores: usize,
    carnivores: usize,
    herbivore_weight: f64,
}

impl CellView {
    fn of(cell: &Cell) -> Self {
        Self {
            passable: cell.is_passable(),
            fodder: cell.fodder(),
            herbivores: cell.herbivores().len(),
            carnivores: cell.carnivores().len(),
            herbivore_weight: cell.herbivore_weight(),
        }
    }

    /// Food on offer per prospective resident.
    fn resource_ratio(&self, species: Species, params: &SpeciesParams) -> f64 {
        let (food, residents) = match species {
            Species::Herbivore => (self.fodder, self.herbivores),
            Species::Carnivore => (self.herbivore_weight, self.carnivores),
        };
        food / ((residents + 1) as f64 * params.f)
    }
}

/// Relative weights `exp(lambda * ratio)`, shifted by the largest exponent
/// so crowded prey cells cannot overflow to infinity.
fn propensities(
    views: &[CellView],
    targets: &[usize],
    species: Species,
    params: &SpeciesParams,
) -> Vec<f64> {
    let exponents: Vec<f64> = targets
        .iter()
        .map(|&index| params.lambda * views[index].resource_ratio(species, params))
        .collect();
    let peak = exponents.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    exponents.iter().map(|e| (e - peak).exp()).collect()
}

pub struct MigrationSystem;

impl MigrationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MigrationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MigrationSystem {
    fn name(&self) -> &str {
        "migration"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let shape = island.shape();
        let (cells, params, _) = island.split_mut();
        let views: Vec<CellView> = cells.iter().map(CellView::of).collect();

        // plan[cell][species] holds each resident's destination, if it moves
        let mut plan: Vec<[Vec<Option<usize>>; 2]> = Vec::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            let targets = eligible_targets(shape, &views, index);
            plan.push(Species::ALL.map(|species| {
                decide(cell, species, params.species(species), &views, &targets, rng)
            }));
        }

        let mut movers: Vec<(usize, Animal)> = Vec::new();
        for (cell, destinations) in cells.iter_mut().zip(plan) {
            for (species, destinations) in Species::ALL.into_iter().zip(destinations) {
                let residents = std::mem::take(cell.animals_mut(species));
                let mut staying = Vec::with_capacity(residents.len());
                for (animal, destination) in residents.into_iter().zip(destinations) {
                    match destination {
                        Some(target) => movers.push((target, animal)),
                        None => staying.push(animal),
                    }
                }
                *cell.animals_mut(species) = staying;
            }
        }

        let mut migrated = Vec::with_capacity(movers.len());
        for (target, animal) in movers {
            migrated.push(animal.species());
            cells[target].insert(animal);
        }
        for species in migrated {
            island.ledger.migrated.add(species, 1);
        }
        debug!(
            year = ctx.year,
            herbivores = island.ledger.migrated.herbivores,
            carnivores = island.ledger.migrated.carnivores,
            "migrations"
        );
        Ok(())
    }
}

fn eligible_targets(shape: GridShape, views: &[CellView], index: usize) -> Vec<usize> {
    let Some(pos) = shape.position(index) else {
        return Vec::new();
    };
    shape
        .neighbours(pos)
        .into_iter()
        .filter_map(|neighbour| shape.index(neighbour))
        .filter(|&neighbour| views[neighbour].passable)
        .collect()
}

fn decide(
    cell: &Cell,
    species: Species,
    params: &SpeciesParams,
    views: &[CellView],
    targets: &[usize],
    rng: &mut SystemRng<'_>,
) -> Vec<Option<usize>> {
    cell.animals(species)
        .iter()
        .map(|animal| choose_destination(animal, species, params, views, targets, rng))
        .collect()
}

fn choose_destination(
    animal: &Animal,
    species: Species,
    params: &SpeciesParams,
    views: &[CellView],
    targets: &[usize],
    rng: &mut SystemRng<'_>,
) -> Option<usize> {
    if !rng.chance(animal.migration_probability(params)) || targets.is_empty() {
        return None;
    }
    let weights = propensities(views, targets, species, params);
    rng.weighted_index(&weights).map(|choice| targets[choice])
}
