use anyhow::Result;
use tracing::debug;

use super::sort_fittest_first;
use crate::{
    animal::{kill_probability, Animal},
    cell::Cell,
    engine::{System, SystemContext},
    island::Island,
    params::Parameters,
    rng::SystemRng,
};

/// Herbivores graze, then carnivores hunt, cell by cell.
pub struct FeedingSystem;

impl FeedingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FeedingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FeedingSystem {
    fn name(&self) -> &str {
        "feeding"
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        island: &mut Island,
        rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let (cells, params, _) = island.split_mut();
        let mut kills = 0;
        for cell in cells.iter_mut() {
            if !cell.herbivores.is_empty() {
                graze(cell, params);
                kills += hunt(cell, params, rng);
            }
        }
        island.ledger.killed.herbivores += kills;
        debug!(year = ctx.year, kills, "feeding done");
        Ok(())
    }
}

fn graze(cell: &mut Cell, params: &Parameters) {
    let herb = &params.herbivore;
    sort_fittest_first(&mut cell.herbivores, herb);
    let mut fodder = cell.fodder();
    for animal in cell.herbivores.iter_mut() {
        if fodder <= 0.0 {
            break;
        }
        fodder -= animal.graze(fodder, herb);
    }
    cell.set_fodder(fodder);
}

/// Returns the number of herbivores killed.
fn hunt(cell: &mut Cell, params: &Parameters, rng: &mut SystemRng<'_>) -> usize {
    if cell.carnivores.is_empty() {
        return 0;
    }
    let (herb, carn) = (&params.herbivore, &params.carnivore);
    sort_fittest_first(&mut cell.carnivores, carn);

    // prey fitness cannot change while carnivores hunt
    let mut prey: Vec<(f64, Animal)> = cell
        .herbivores
        .drain(..)
        .map(|animal| (animal.fitness(herb), animal))
        .collect();
    prey.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut kills = 0;
    for hunter in cell.carnivores.iter_mut() {
        let mut eaten = 0.0;
        let mut next = 0;
        while next < prey.len() && eaten < carn.f {
            let p_kill = kill_probability(hunter.fitness(carn), prey[next].0, carn.delta_phi_max);
            if rng.chance(p_kill) {
                let (_, victim) = prey.remove(next);
                eaten += hunter.devour(victim.weight(), carn.f - eaten, carn);
                kills += 1;
            } else {
                next += 1;
            }
        }
    }

    cell.herbivores = prey.into_iter().map(|(_, animal)| animal).collect();
    kills
}
