//! Individual animals and the fitness function.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BioSimError;
use crate::params::SpeciesParams;
use crate::rng::SystemRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Herbivore,
    Carnivore,
}

impl Species {
    pub const ALL: [Species; 2] = [Species::Herbivore, Species::Carnivore];
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Species::Herbivore => f.write_str("Herbivore"),
            Species::Carnivore => f.write_str("Carnivore"),
        }
    }
}

impl FromStr for Species {
    type Err = BioSimError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Herbivore" => Ok(Species::Herbivore),
            "Carnivore" => Ok(Species::Carnivore),
            other => Err(BioSimError::InvalidAnimal(format!(
                "unknown species '{other}'"
            ))),
        }
    }
}

fn q_pos(x: f64, x_half: f64, phi: f64) -> f64 {
    1.0 / (1.0 + (phi * (x - x_half)).exp())
}

fn q_neg(x: f64, x_half: f64, phi: f64) -> f64 {
    1.0 / (1.0 + (-phi * (x - x_half)).exp())
}

/// Fitness in [0, 1]: falls with age, rises with weight.
pub fn fitness(age: u32, weight: f64, params: &SpeciesParams) -> f64 {
    if weight <= 0.0 {
        return 0.0;
    }
    q_pos(age as f64, params.a_half, params.phi_age) * q_neg(weight, params.w_half, params.phi_weight)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Animal {
    species: Species,
    age: u32,
    weight: f64,
}

impl Animal {
    /// Callers validate `weight > 0` at the seeding boundary.
    pub fn new(species: Species, age: u32, weight: f64) -> Self {
        Self {
            species,
            age,
            weight,
        }
    }

    /// Draws a birth weight; `None` when the draw is not viable.
    pub fn newborn(species: Species, params: &SpeciesParams, rng: &mut SystemRng<'_>) -> Option<Self> {
        let weight = rng.gaussian(params.w_birth, params.sigma_birth);
        (weight > 0.0).then(|| Self::new(species, 0, weight))
    }

    /// Redraws until the birth weight is positive.
    pub fn with_drawn_weight(
        species: Species,
        age: u32,
        params: &SpeciesParams,
        rng: &mut SystemRng<'_>,
    ) -> Self {
        loop {
            let weight = rng.gaussian(params.w_birth, params.sigma_birth);
            if weight > 0.0 {
                return Self::new(species, age, weight);
            }
        }
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn fitness(&self, params: &SpeciesParams) -> f64 {
        fitness(self.age, self.weight, params)
    }

    /// Eats up to the appetite from `available` and returns the amount eaten.
    pub fn graze(&mut self, available: f64, params: &SpeciesParams) -> f64 {
        let eaten = params.f.min(available).max(0.0);
        self.weight += params.beta * eaten;
        eaten
    }

    /// Eats up to `remaining_appetite` of a killed prey; returns the amount eaten.
    pub fn devour(&mut self, prey_weight: f64, remaining_appetite: f64, params: &SpeciesParams) -> f64 {
        let eaten = prey_weight.min(remaining_appetite).max(0.0);
        self.weight += params.beta * eaten;
        eaten
    }

    /// Lowers the weight by a birth's cost when the parent stays above the
    /// reproduction threshold, reporting whether the birth goes ahead.
    pub fn bear(&mut self, newborn_weight: f64, params: &SpeciesParams) -> bool {
        let remaining = self.weight - params.xi * newborn_weight;
        if remaining <= 0.0 || remaining < params.birth_weight_threshold() {
            return false;
        }
        self.weight = remaining;
        true
    }

    pub fn procreation_probability(&self, same_species: usize, params: &SpeciesParams) -> f64 {
        if same_species < 2 || self.weight < params.birth_weight_threshold() {
            return 0.0;
        }
        (params.gamma * self.fitness(params) * (same_species - 1) as f64).min(1.0)
    }

    pub fn migration_probability(&self, params: &SpeciesParams) -> f64 {
        params.mu * self.fitness(params)
    }

    pub fn grow_older(&mut self) {
        self.age = self.age.saturating_add(1);
    }

    pub fn lose_weight(&mut self, params: &SpeciesParams) {
        self.weight -= params.eta * self.weight;
    }

    pub fn death_probability(&self, params: &SpeciesParams) -> f64 {
        if self.weight <= 0.0 {
            1.0
        } else {
            params.omega * (1.0 - self.fitness(params))
        }
    }
}

/// Probability that a carnivore of fitness `hunter` kills prey of fitness `prey`.
pub fn kill_probability(hunter: f64, prey: f64, delta_phi_max: f64) -> f64 {
    let diff = hunter - prey;
    if diff <= 0.0 {
        0.0
    } else if diff < delta_phi_max {
        diff / delta_phi_max
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RngManager;
    use proptest::prelude::*;

    #[test]
    fn fitness_is_zero_without_weight() {
        let params = SpeciesParams::herbivore();
        assert_eq!(fitness(3, 0.0, &params), 0.0);
    }

    #[test]
    fn fitness_at_half_points_is_a_quarter() {
        let params = SpeciesParams::herbivore();
        let phi = fitness(40, 10.0, &params);
        assert!((phi - 0.25).abs() < 1e-12);
    }

    #[test]
    fn grazing_is_capped_by_appetite_and_supply() {
        let params = SpeciesParams::herbivore();
        let mut herb = Animal::new(Species::Herbivore, 0, 20.0);
        assert_eq!(herb.graze(800.0, &params), 10.0);
        assert!((herb.weight() - 29.0).abs() < 1e-12);
        assert_eq!(herb.graze(4.0, &params), 4.0);
        assert_eq!(herb.graze(0.0, &params), 0.0);
    }

    #[test]
    fn single_animal_never_procreates() {
        let params = SpeciesParams::herbivore();
        let herb = Animal::new(Species::Herbivore, 5, 80.0);
        assert_eq!(herb.procreation_probability(1, &params), 0.0);
        assert!(herb.procreation_probability(2, &params) > 0.0);
    }

    #[test]
    fn light_animals_do_not_procreate() {
        let params = SpeciesParams::herbivore();
        let herb = Animal::new(Species::Herbivore, 5, 30.0);
        assert_eq!(herb.procreation_probability(50, &params), 0.0);
    }

    #[test]
    fn birth_rejected_when_parent_would_drop_below_threshold() {
        let params = SpeciesParams::herbivore();
        let mut parent = Animal::new(Species::Herbivore, 5, 40.0);
        assert!(!parent.bear(8.0, &params));
        assert_eq!(parent.weight(), 40.0);

        let mut heavy = Animal::new(Species::Herbivore, 5, 60.0);
        assert!(heavy.bear(8.0, &params));
        assert!((heavy.weight() - 50.4).abs() < 1e-12);
    }

    #[test]
    fn kill_probability_saturates() {
        assert_eq!(kill_probability(0.2, 0.5, 10.0), 0.0);
        assert_eq!(kill_probability(0.5, 0.5, 10.0), 0.0);
        assert!((kill_probability(0.9, 0.4, 10.0) - 0.05).abs() < 1e-12);
        assert_eq!(kill_probability(0.9, 0.4, 0.5), 1.0);
        assert_eq!(kill_probability(0.9, 0.1, 0.5), 1.0);
    }

    #[test]
    fn weight_loss_and_death_probability() {
        let params = SpeciesParams::carnivore();
        let mut carn = Animal::new(Species::Carnivore, 2, 16.0);
        carn.lose_weight(&params);
        assert!((carn.weight() - 14.0).abs() < 1e-12);
        let expected = params.omega * (1.0 - carn.fitness(&params));
        assert!((carn.death_probability(&params) - expected).abs() < 1e-12);
    }

    #[test]
    fn newborns_are_viable_or_absent() {
        let params = SpeciesParams::herbivore();
        let mut manager = RngManager::new(5);
        let mut rng = manager.shared();
        for _ in 0..500 {
            if let Some(child) = Animal::newborn(Species::Herbivore, &params, &mut rng) {
                assert_eq!(child.age(), 0);
                assert!(child.weight() > 0.0);
            }
        }
    }

    #[test]
    fn species_parse_rejects_unknown_names() {
        assert_eq!("Carnivore".parse::<Species>().unwrap(), Species::Carnivore);
        assert!(matches!(
            "Omnivore".parse::<Species>(),
            Err(BioSimError::InvalidAnimal(_))
        ));
    }

    proptest! {
        #[test]
        fn fitness_stays_in_unit_interval(age in 0u32..200, weight in 0.0f64..500.0) {
            for params in [SpeciesParams::herbivore(), SpeciesParams::carnivore()] {
                let phi = fitness(age, weight, &params);
                prop_assert!((0.0..=1.0).contains(&phi));
            }
        }

        #[test]
        fn fitness_falls_with_age(age in 0u32..150, weight in 0.1f64..200.0) {
            let params = SpeciesParams::herbivore();
            prop_assert!(fitness(age + 1, weight, &params) <= fitness(age, weight, &params));
        }

        #[test]
        fn fitness_rises_with_weight(age in 0u32..150, weight in 0.1f64..200.0, delta in 0.0f64..50.0) {
            let params = SpeciesParams::carnivore();
            prop_assert!(fitness(age, weight + delta, &params) >= fitness(age, weight, &params));
        }
    }
}
