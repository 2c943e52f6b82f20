use anyhow::Result;
use tracing::{debug, trace};

use crate::{
    animal::{Animal, Species},
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

pub struct ProcreationSystem;

impl ProcreationSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcreationSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ProcreationSystem {
    fn name(&self) -> &str {
        "procreation"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let (cells, params, _) = island.split_mut();
        let mut births = Vec::new();
        for cell in cells.iter_mut() {
            for species in Species::ALL {
                let params = params.species(species);
                let parents = cell.animals_mut(species);
                let n = parents.len();
                if n < 2 {
                    continue;
                }

                let mut newborns = Vec::new();
                for parent in parents.iter_mut() {
                    let p_birth = parent.procreation_probability(n, params);
                    if p_birth <= 0.0 || !rng.chance(p_birth) {
                        continue;
                    }
                    match Animal::newborn(species, params, rng) {
                        Some(child) if parent.bear(child.weight(), params) => newborns.push(child),
                        _ => trace!(%species, weight = parent.weight(), "birth rejected"),
                    }
                }
                births.push((species, newborns.len()));
                parents.extend(newborns);
            }
        }

        for (species, count) in births {
            island.ledger.births.add(species, count);
        }
        debug!(
            year = ctx.year,
            herbivores = island.ledger.births.herbivores,
            carnivores = island.ledger.births.carnivores,
            "births"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::island::{AnimalRecord, PopulationRecord};
    use crate::rng::RngManager;
    use crate::spatial::Position;

    const MAP: &str = "OOOO\nOJJO\nOOOO";

    fn run_once(island: &mut Island, rng: &mut RngManager) {
        let ctx = SystemContext { year: 1 };
        ProcreationSystem::new()
            .run(&ctx, island, &mut rng.shared())
            .unwrap();
    }

    #[test]
    fn lone_animal_never_procreates() {
        let mut island = Island::from_map(MAP).unwrap();
        let mut rng = RngManager::new(8);
        let records = vec![
            PopulationRecord::new(1, 1, vec![AnimalRecord::new(Species::Herbivore, 5, 80.0)]),
            PopulationRecord::new(1, 2, vec![AnimalRecord::new(Species::Carnivore, 5, 80.0)]),
        ];
        island.add_population(&records, &mut rng.shared()).unwrap();

        for _ in 0..50 {
            run_once(&mut island, &mut rng);
        }
        assert_eq!(island.num_animals(), 2);
        assert_eq!(island.ledger().births.total(), 0);
    }

    #[test]
    fn heavy_crowd_gives_birth_and_pays_weight() {
        let mut island = Island::from_map(MAP).unwrap();
        let mut rng = RngManager::new(8);
        let herbs = vec![AnimalRecord::new(Species::Herbivore, 5, 80.0); 20];
        island
            .add_population(&[PopulationRecord::new(1, 1, herbs)], &mut rng.shared())
            .unwrap();

        run_once(&mut island, &mut rng);

        let cell = island.cell(Position::new(1, 1)).unwrap();
        let births = island.ledger().births.herbivores;
        assert!(births > 10, "expected most of the crowd to breed, got {births}");
        assert_eq!(cell.herbivores().len(), 20 + births);

        let newborns: Vec<_> = cell.herbivores().iter().filter(|h| h.age() == 0).collect();
        assert_eq!(newborns.len(), births);
        let parents_lost: f64 = cell
            .herbivores()
            .iter()
            .filter(|h| h.age() == 5)
            .map(|h| 80.0 - h.weight())
            .sum();
        let newborn_weight: f64 = newborns.iter().map(|h| h.weight()).sum();
        assert!((parents_lost - 1.2 * newborn_weight).abs() < 1e-6);
    }

    #[test]
    fn underweight_animals_do_not_breed() {
        let mut island = Island::from_map(MAP).unwrap();
        let mut rng = RngManager::new(8);
        let herbs = vec![AnimalRecord::new(Species::Herbivore, 5, 30.0); 30];
        island
            .add_population(&[PopulationRecord::new(1, 1, herbs)], &mut rng.shared())
            .unwrap();

        run_once(&mut island, &mut rng);
        assert_eq!(island.ledger().births.herbivores, 0);
        assert_eq!(island.num_animals(), 30);
    }
}
