//! Read-only population statistics derived from the island state.

use serde::{Deserialize, Serialize};

use crate::animal::{Animal, Species};
use crate::island::Island;
use crate::params::SpeciesParams;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesCounts {
    pub herbivores: usize,
    pub carnivores: usize,
}

impl SpeciesCounts {
    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::Herbivore => self.herbivores,
            Species::Carnivore => self.carnivores,
        }
    }

    pub(crate) fn add(&mut self, species: Species, amount: usize) {
        match species {
            Species::Herbivore => self.herbivores += amount,
            Species::Carnivore => self.carnivores += amount,
        }
    }

    pub fn total(&self) -> usize {
        self.herbivores + self.carnivores
    }
}

/// Births, deaths and moves recorded during the most recent year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearLedger {
    pub births: SpeciesCounts,
    pub killed: SpeciesCounts,
    pub died: SpeciesCounts,
    pub migrated: SpeciesCounts,
}

impl YearLedger {
    /// Every animal removed from the island this year.
    pub fn deaths(&self) -> SpeciesCounts {
        SpeciesCounts {
            herbivores: self.killed.herbivores + self.died.herbivores,
            carnivores: self.killed.carnivores + self.died.carnivores,
        }
    }
}

/// Fixed-width histogram over `[0, max)` with an overflow bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bin_width: f64,
    pub counts: Vec<usize>,
    pub overflow: usize,
}

impl Histogram {
    pub fn new(max: f64, bin_width: f64) -> Self {
        let bins = (max / bin_width).ceil().max(1.0) as usize;
        Self {
            bin_width,
            counts: vec![0; bins],
            overflow: 0,
        }
    }

    pub fn record(&mut self, value: f64) {
        let bin = (value.max(0.0) / self.bin_width).floor() as usize;
        match self.counts.get_mut(bin) {
            Some(count) => *count += 1,
            None => self.overflow += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum::<usize>() + self.overflow
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub count: usize,
    pub mean_weight: f64,
    pub mean_age: f64,
    pub mean_fitness: f64,
    pub weight: Histogram,
    pub age: Histogram,
    pub fitness: Histogram,
}

impl SpeciesSummary {
    fn collect<'a>(animals: impl Iterator<Item = &'a Animal>, params: &SpeciesParams) -> Self {
        let mut summary = Self {
            count: 0,
            mean_weight: 0.0,
            mean_age: 0.0,
            mean_fitness: 0.0,
            weight: Histogram::new(60.0, 2.0),
            age: Histogram::new(60.0, 2.0),
            fitness: Histogram::new(1.0, 0.05),
        };
        for animal in animals {
            let phi = animal.fitness(params);
            summary.count += 1;
            summary.mean_weight += animal.weight();
            summary.mean_age += animal.age() as f64;
            summary.mean_fitness += phi;
            summary.weight.record(animal.weight());
            summary.age.record(animal.age() as f64);
            summary.fitness.record(phi);
        }
        if summary.count > 0 {
            let n = summary.count as f64;
            summary.mean_weight /= n;
            summary.mean_age /= n;
            summary.mean_fitness /= n;
        }
        summary
    }
}

/// Animal counts for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCount {
    pub row: usize,
    pub col: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearStats {
    pub year: u32,
    pub counts: SpeciesCounts,
    pub ledger: YearLedger,
    pub herbivores: SpeciesSummary,
    pub carnivores: SpeciesSummary,
}

impl YearStats {
    pub fn collect(island: &Island) -> Self {
        let params = island.parameters();
        let cells = island.cells();
        Self {
            year: island.year(),
            counts: island.num_animals_per_species(),
            ledger: island.ledger().clone(),
            herbivores: SpeciesSummary::collect(
                cells.iter().flat_map(|c| c.herbivores()),
                &params.herbivore,
            ),
            carnivores: SpeciesSummary::collect(
                cells.iter().flat_map(|c| c.carnivores()),
                &params.carnivore,
            ),
        }
    }
}

/// Per-cell counts in row-major order, including uninhabited cells.
pub fn animal_distribution(island: &Island) -> Vec<CellCount> {
    island
        .cells()
        .iter()
        .map(|cell| CellCount {
            row: cell.position().row,
            col: cell.position().col,
            herbivores: cell.herbivores().len(),
            carnivores: cell.carnivores().len(),
        })
        .collect()
}

/// Rows × cols matrix of counts for one species.
pub fn density(island: &Island, species: Species) -> Vec<Vec<usize>> {
    let shape = island.shape();
    let mut grid = vec![vec![0; shape.cols()]; shape.rows()];
    for cell in island.cells() {
        let pos = cell.position();
        grid[pos.row][pos.col] = cell.count(species);
    }
    grid
}
