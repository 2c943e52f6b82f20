use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

pub struct AgingSystem;

impl AgingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AgingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AgingSystem {
    fn name(&self) -> &str {
        "aging"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        for cell in island.cells_mut() {
            cell.herbivores
                .iter_mut()
                .chain(cell.carnivores.iter_mut())
                .for_each(|animal| animal.grow_older());
        }
        Ok(())
    }
}
