use serde::Serialize;

use crate::animal::{Animal, Species};
use crate::landscape::LandscapeType;
use crate::spatial::Position;

/// One island location with its fodder and residents.
#[derive(Debug, Clone, Serialize)]
pub struct Cell {
    position: Position,
    landscape: LandscapeType,
    fodder: f64,
    pub(crate) herbivores: Vec<Animal>,
    pub(crate) carnivores: Vec<Animal>,
}

impl Cell {
    pub fn new(position: Position, landscape: LandscapeType, fodder: f64) -> Self {
        Self {
            position,
            landscape,
            fodder,
            herbivores: Vec::new(),
            carnivores: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn landscape(&self) -> LandscapeType {
        self.landscape
    }

    pub fn is_passable(&self) -> bool {
        self.landscape.is_passable()
    }

    pub fn fodder(&self) -> f64 {
        self.fodder
    }

    pub(crate) fn set_fodder(&mut self, fodder: f64) {
        self.fodder = fodder;
    }

    pub fn herbivores(&self) -> &[Animal] {
        &self.herbivores
    }

    pub fn carnivores(&self) -> &[Animal] {
        &self.carnivores
    }

    pub fn animals(&self, species: Species) -> &[Animal] {
        match species {
            Species::Herbivore => &self.herbivores,
            Species::Carnivore => &self.carnivores,
        }
    }

    pub(crate) fn animals_mut(&mut self, species: Species) -> &mut Vec<Animal> {
        match species {
            Species::Herbivore => &mut self.herbivores,
            Species::Carnivore => &mut self.carnivores,
        }
    }

    pub fn count(&self, species: Species) -> usize {
        self.animals(species).len()
    }

    pub fn total_animals(&self) -> usize {
        self.herbivores.len() + self.carnivores.len()
    }

    pub fn herbivore_weight(&self) -> f64 {
        self.herbivores.iter().map(Animal::weight).sum()
    }

    pub(crate) fn insert(&mut self, animal: Animal) {
        self.animals_mut(animal.species()).push(animal);
    }
}
