//! The island grid: map parsing, population seeding and invariant checks.

use serde::{Deserialize, Serialize};

use crate::animal::{Animal, Species};
use crate::cell::Cell;
use crate::error::{BioSimError, Result};
use crate::landscape::{LandscapeOverrides, LandscapeTable, LandscapeType};
use crate::params::{Parameters, SpeciesOverrides};
use crate::rng::SystemRng;
use crate::spatial::{GridShape, Position};
use crate::stats::{SpeciesCounts, YearLedger};

/// One animal in a seeding record. `weight` is drawn from the birth
/// distribution when omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimalRecord {
    pub species: String,
    #[serde(default)]
    pub age: i64,
    #[serde(default)]
    pub weight: Option<f64>,
}

impl AnimalRecord {
    pub fn new(species: Species, age: i64, weight: f64) -> Self {
        Self {
            species: species.to_string(),
            age,
            weight: Some(weight),
        }
    }
}

/// Animals to place in the cell at `loc` (row, col).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    pub loc: (i64, i64),
    pub pop: Vec<AnimalRecord>,
}

impl PopulationRecord {
    pub fn new(row: i64, col: i64, pop: Vec<AnimalRecord>) -> Self {
        Self {
            loc: (row, col),
            pop,
        }
    }
}

struct ValidatedAnimal {
    index: usize,
    species: Species,
    age: u32,
    weight: Option<f64>,
}

pub struct Island {
    shape: GridShape,
    cells: Vec<Cell>,
    params: Parameters,
    landscape: LandscapeTable,
    year: u32,
    pub(crate) ledger: YearLedger,
}

impl Island {
    /// Parses the map with default parameters.
    pub fn from_map(map: &str) -> Result<Self> {
        Self::with_parameters(map, Parameters::default(), LandscapeTable::default())
    }

    pub fn with_parameters(map: &str, params: Parameters, landscape: LandscapeTable) -> Result<Self> {
        let rows: Vec<&str> = map.trim().lines().map(str::trim).collect();
        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(BioSimError::MapFormat("map is empty".to_string()));
        }

        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(BioSimError::MapFormat(format!(
                    "row {row} has {found} cells, expected {width}"
                )));
            }
        }

        let shape = GridShape::new(rows.len(), width);
        let mut cells = Vec::with_capacity(shape.cell_count());
        for (row, line) in rows.iter().enumerate() {
            for (col, letter) in line.chars().enumerate() {
                let kind = LandscapeType::from_letter(letter).ok_or_else(|| {
                    BioSimError::MapFormat(format!(
                        "unknown landscape letter '{letter}' at ({row}, {col})"
                    ))
                })?;
                let pos = Position::new(row, col);
                if shape.is_border(pos) && kind != LandscapeType::Ocean {
                    return Err(BioSimError::MapFormat(format!(
                        "border cell ({row}, {col}) is '{letter}', expected 'O'"
                    )));
                }
                cells.push(Cell::new(pos, kind, landscape.fodder_max(kind)));
            }
        }

        Ok(Self {
            shape,
            cells,
            params,
            landscape,
            year: 0,
            ledger: YearLedger::default(),
        })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.shape.index(pos).map(|index| &self.cells[index])
    }

    pub fn parameters(&self) -> &Parameters {
        &self.params
    }

    pub fn landscape_table(&self) -> &LandscapeTable {
        &self.landscape
    }

    /// Splits the borrow so phases can mutate cells while reading parameters.
    pub(crate) fn split_mut(&mut self) -> (&mut [Cell], &Parameters, &LandscapeTable) {
        (&mut self.cells, &self.params, &self.landscape)
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub(crate) fn advance_year(&mut self) {
        self.year += 1;
    }

    pub fn ledger(&self) -> &YearLedger {
        &self.ledger
    }

    pub fn num_animals(&self) -> usize {
        self.cells.iter().map(Cell::total_animals).sum()
    }

    pub fn num_animals_per_species(&self) -> SpeciesCounts {
        let mut counts = SpeciesCounts::default();
        for cell in &self.cells {
            counts.herbivores += cell.herbivores().len();
            counts.carnivores += cell.carnivores().len();
        }
        counts
    }

    pub fn set_animal_parameters(&mut self, species: Species, overrides: &SpeciesOverrides) -> Result<()> {
        self.ensure_not_started()?;
        self.params.species_mut(species).apply(species, overrides)
    }

    /// Resets every cell of the given type to the new capacity.
    pub fn set_landscape_parameters(
        &mut self,
        landscape: LandscapeType,
        overrides: &LandscapeOverrides,
    ) -> Result<()> {
        self.ensure_not_started()?;
        self.landscape.apply(landscape, overrides)?;
        let fodder_max = self.landscape.fodder_max(landscape);
        for cell in self.cells.iter_mut().filter(|c| c.landscape() == landscape) {
            cell.set_fodder(fodder_max);
        }
        Ok(())
    }

    /// Parameters are fixed once animals exist or any year has run.
    fn ensure_not_started(&self) -> Result<()> {
        if self.year > 0 {
            return Err(BioSimError::Parameter(format!(
                "parameters cannot change after the run has started (year {})",
                self.year
            )));
        }
        let existing = self.num_animals();
        if existing > 0 {
            return Err(BioSimError::Parameter(format!(
                "parameters cannot change once animals exist ({existing} on the island)"
            )));
        }
        Ok(())
    }

    /// Validates every record, then inserts all animals. Returns how many were added.
    pub fn add_population(&mut self, records: &[PopulationRecord], rng: &mut SystemRng<'_>) -> Result<usize> {
        let mut validated = Vec::new();
        for record in records {
            let index = self.seeding_index(record.loc)?;
            for animal in &record.pop {
                validated.push(validate_animal(index, animal)?);
            }
        }

        let added = validated.len();
        for animal in validated {
            let params = self.params.species(animal.species);
            let seeded = match animal.weight {
                Some(weight) => Animal::new(animal.species, animal.age, weight),
                None => Animal::with_drawn_weight(animal.species, animal.age, params, rng),
            };
            self.cells[animal.index].insert(seeded);
        }
        Ok(added)
    }

    fn seeding_index(&self, (row, col): (i64, i64)) -> Result<usize> {
        let invalid = |reason: &str| BioSimError::InvalidLocation {
            row,
            col,
            reason: reason.to_string(),
        };
        let pos = match (usize::try_from(row), usize::try_from(col)) {
            (Ok(row), Ok(col)) => Position::new(row, col),
            _ => return Err(invalid("negative coordinate")),
        };
        let index = self
            .shape
            .index(pos)
            .ok_or_else(|| invalid("outside the island"))?;
        let landscape = self.cells[index].landscape();
        if !landscape.is_passable() {
            return Err(invalid(&format!("{landscape} is not habitable")));
        }
        Ok(index)
    }

    /// Checks the state invariants that hold at every year boundary.
    pub fn verify(&self) -> Result<()> {
        for cell in &self.cells {
            let pos = cell.position();
            let fodder_max = self.landscape.fodder_max(cell.landscape());
            let fodder = cell.fodder();
            if !(0.0..=fodder_max).contains(&fodder) {
                return Err(BioSimError::Invariant(format!(
                    "cell ({}, {}) has fodder {fodder} outside [0, {fodder_max}]",
                    pos.row, pos.col
                )));
            }
            if !cell.is_passable() && cell.total_animals() > 0 {
                return Err(BioSimError::Invariant(format!(
                    "impassable cell ({}, {}) holds animals",
                    pos.row, pos.col
                )));
            }
            for animal in cell.herbivores().iter().chain(cell.carnivores()) {
                let weight = animal.weight();
                if !weight.is_finite() || weight <= 0.0 {
                    return Err(BioSimError::Invariant(format!(
                        "{} in cell ({}, {}) has weight {weight}",
                        animal.species(),
                        pos.row,
                        pos.col
                    )));
                }
            }
        }
        Ok(())
    }
}

fn validate_animal(index: usize, record: &AnimalRecord) -> Result<ValidatedAnimal> {
    let species: Species = record.species.parse()?;
    let age = u32::try_from(record.age).map_err(|_| {
        BioSimError::InvalidAnimal(format!("{species} has invalid age {}", record.age))
    })?;
    if let Some(weight) = record.weight {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(BioSimError::InvalidAnimal(format!(
                "{species} has invalid weight {weight}"
            )));
        }
    }
    Ok(ValidatedAnimal {
        index,
        species,
        age,
        weight: record.weight,
    })
}
