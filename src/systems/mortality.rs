use anyhow::Result;
use tracing::debug;

use crate::{
    animal::Species,
    engine::{System, SystemContext},
    error::BioSimError,
    island::Island,
    rng::SystemRng,
    stats::SpeciesCounts,
};

/// Annual weight loss followed by the death check.
pub struct MortalitySystem;

impl MortalitySystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MortalitySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MortalitySystem {
    fn name(&self) -> &str {
        "mortality"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let (cells, params, _) = island.split_mut();
        let mut died = SpeciesCounts::default();
        let mut broken = None;
        for cell in cells.iter_mut() {
            for species in Species::ALL {
                let params = params.species(species);
                let before = cell.count(species);
                cell.animals_mut(species).retain_mut(|animal| {
                    animal.lose_weight(params);
                    let weight = animal.weight();
                    if weight.is_nan() || weight < 0.0 {
                        broken.get_or_insert(weight);
                        return false;
                    }
                    // zero weight dies without a draw
                    weight > 0.0 && !rng.chance(animal.death_probability(params))
                });
                died.add(species, before - cell.count(species));
            }
        }

        if let Some(weight) = broken {
            return Err(BioSimError::Invariant(format!(
                "weight loss produced weight {weight} in year {}",
                ctx.year
            ))
            .into());
        }

        island.ledger.died = died;
        debug!(
            year = ctx.year,
            herbivores = died.herbivores,
            carnivores = died.carnivores,
            "deaths"
        );
        Ok(())
    }
}
