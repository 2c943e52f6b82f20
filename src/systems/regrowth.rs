use anyhow::Result;

use crate::{
    engine::{System, SystemContext},
    island::Island,
    rng::SystemRng,
};

pub struct RegrowthSystem;

impl RegrowthSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RegrowthSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RegrowthSystem {
    fn name(&self) -> &str {
        "regrowth"
    }

    fn run(
        &mut self,
        _ctx: &SystemContext,
        island: &mut Island,
        _rng: &mut SystemRng<'_>,
    ) -> Result<()> {
        let (cells, _, landscape) = island.split_mut();
        for cell in cells.iter_mut() {
            let props = landscape.properties(cell.landscape());
            let fodder = props.regrowth.regrow(cell.fodder(), props.fodder_max);
            cell.set_fodder(fodder);
        }
        Ok(())
    }
}
