//! Terrain types and the per-simulation landscape table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BioSimError, Result};

/// Terrain of a single island cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LandscapeType {
    Jungle,
    Savannah,
    Desert,
    Mountain,
    Ocean,
}

impl LandscapeType {
    pub const ALL: [LandscapeType; 5] = [
        LandscapeType::Jungle,
        LandscapeType::Savannah,
        LandscapeType::Desert,
        LandscapeType::Mountain,
        LandscapeType::Ocean,
    ];

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'J' => Some(LandscapeType::Jungle),
            'S' => Some(LandscapeType::Savannah),
            'D' => Some(LandscapeType::Desert),
            'M' => Some(LandscapeType::Mountain),
            'O' => Some(LandscapeType::Ocean),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            LandscapeType::Jungle => 'J',
            LandscapeType::Savannah => 'S',
            LandscapeType::Desert => 'D',
            LandscapeType::Mountain => 'M',
            LandscapeType::Ocean => 'O',
        }
    }

    /// Animals may stand on and migrate into passable cells only.
    pub fn is_passable(self) -> bool {
        !matches!(self, LandscapeType::Mountain | LandscapeType::Ocean)
    }

    pub fn is_vegetated(self) -> bool {
        matches!(self, LandscapeType::Jungle | LandscapeType::Savannah)
    }
}

impl fmt::Display for LandscapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LandscapeType::Jungle => "Jungle",
            LandscapeType::Savannah => "Savannah",
            LandscapeType::Desert => "Desert",
            LandscapeType::Mountain => "Mountain",
            LandscapeType::Ocean => "Ocean",
        };
        f.write_str(name)
    }
}

/// How a cell's fodder evolves at the start of each year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum RegrowthRule {
    /// Fodder is reset to `fodder_max`.
    Reset,
    /// Fodder grows by `alpha * (fodder_max - fodder)`.
    Logistic { alpha: f64 },
    /// Fodder is always zero.
    Barren,
}

impl RegrowthRule {
    pub fn regrow(self, fodder: f64, fodder_max: f64) -> f64 {
        match self {
            RegrowthRule::Reset => fodder_max,
            RegrowthRule::Logistic { alpha } => {
                (fodder + alpha * (fodder_max - fodder)).min(fodder_max)
            }
            RegrowthRule::Barren => 0.0,
        }
    }
}

/// Resolved attributes of one landscape type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LandscapeProperties {
    pub fodder_max: f64,
    pub passable: bool,
    pub regrowth: RegrowthRule,
}

/// Partial override of a vegetated landscape's parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LandscapeOverrides {
    #[serde(default)]
    pub f_max: Option<f64>,
    #[serde(default)]
    pub alpha: Option<f64>,
}

fn default_jungle_f_max() -> f64 {
    800.0
}

fn default_savannah_f_max() -> f64 {
    300.0
}

fn default_savannah_alpha() -> f64 {
    0.3
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeTable {
    jungle_f_max: f64,
    savannah_f_max: f64,
    savannah_alpha: f64,
}

impl Default for LandscapeTable {
    fn default() -> Self {
        Self {
            jungle_f_max: default_jungle_f_max(),
            savannah_f_max: default_savannah_f_max(),
            savannah_alpha: default_savannah_alpha(),
        }
    }
}

impl LandscapeTable {
    pub fn properties(&self, landscape: LandscapeType) -> LandscapeProperties {
        let (fodder_max, regrowth) = match landscape {
            LandscapeType::Jungle => (self.jungle_f_max, RegrowthRule::Reset),
            LandscapeType::Savannah => (
                self.savannah_f_max,
                RegrowthRule::Logistic {
                    alpha: self.savannah_alpha,
                },
            ),
            LandscapeType::Desert | LandscapeType::Mountain | LandscapeType::Ocean => {
                (0.0, RegrowthRule::Barren)
            }
        };
        LandscapeProperties {
            fodder_max,
            passable: landscape.is_passable(),
            regrowth,
        }
    }

    pub fn fodder_max(&self, landscape: LandscapeType) -> f64 {
        self.properties(landscape).fodder_max
    }

    /// Validates every supplied value before applying any of them.
    pub fn apply(&mut self, landscape: LandscapeType, overrides: &LandscapeOverrides) -> Result<()> {
        if let Some(f_max) = overrides.f_max {
            check_non_negative(landscape, "f_max", f_max)?;
        }
        if let Some(alpha) = overrides.alpha {
            check_non_negative(landscape, "alpha", alpha)?;
            if alpha > 1.0 {
                return Err(BioSimError::Parameter(format!(
                    "{landscape}: alpha must lie in [0, 1], got {alpha}"
                )));
            }
        }

        match landscape {
            LandscapeType::Jungle => {
                if overrides.alpha.is_some() {
                    return Err(BioSimError::Parameter(
                        "Jungle has no alpha parameter".to_string(),
                    ));
                }
                if let Some(f_max) = overrides.f_max {
                    self.jungle_f_max = f_max;
                }
            }
            LandscapeType::Savannah => {
                if let Some(f_max) = overrides.f_max {
                    self.savannah_f_max = f_max;
                }
                if let Some(alpha) = overrides.alpha {
                    self.savannah_alpha = alpha;
                }
            }
            other => {
                return Err(BioSimError::Parameter(format!(
                    "{other} has no configurable parameters"
                )));
            }
        }
        Ok(())
    }
}

fn check_non_negative(landscape: LandscapeType, key: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(BioSimError::Parameter(format!(
            "{landscape}: {key} must be a non-negative number, got {value}"
        )));
    }
    Ok(())
}
