use serde::{Deserialize, Serialize};

use crate::animal::Species;
use crate::error::{BioSimError, Result};

/// Biological constants shared by every animal of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesParams {
    pub w_birth: f64,
    pub sigma_birth: f64,
    pub beta: f64,
    pub eta: f64,
    pub a_half: f64,
    pub phi_age: f64,
    pub w_half: f64,
    pub phi_weight: f64,
    pub mu: f64,
    pub gamma: f64,
    pub zeta: f64,
    pub xi: f64,
    pub omega: f64,
    /// Appetite.
    #[serde(rename = "F")]
    pub f: f64,
    #[serde(rename = "DeltaPhiMax")]
    pub delta_phi_max: f64,
    pub lambda: f64,
}

impl SpeciesParams {
    pub fn herbivore() -> Self {
        Self {
            w_birth: 8.0,
            sigma_birth: 1.5,
            beta: 0.9,
            eta: 0.05,
            a_half: 40.0,
            phi_age: 0.6,
            w_half: 10.0,
            phi_weight: 0.1,
            mu: 0.25,
            gamma: 0.2,
            zeta: 3.5,
            xi: 1.2,
            omega: 0.4,
            f: 10.0,
            delta_phi_max: 10.0,
            lambda: 1.0,
        }
    }

    pub fn carnivore() -> Self {
        Self {
            w_birth: 6.0,
            sigma_birth: 1.0,
            beta: 0.75,
            eta: 0.125,
            a_half: 40.0,
            phi_age: 0.3,
            w_half: 4.0,
            phi_weight: 0.4,
            mu: 0.4,
            gamma: 0.8,
            zeta: 3.5,
            xi: 1.1,
            omega: 0.8,
            f: 50.0,
            delta_phi_max: 10.0,
            lambda: 1.0,
        }
    }

    /// Minimum weight an animal needs before it may attempt to give birth.
    pub fn birth_weight_threshold(&self) -> f64 {
        self.zeta * (self.w_birth + self.sigma_birth)
    }

    /// Applies the overrides atomically: on error nothing changes.
    pub fn apply(&mut self, species: Species, overrides: &SpeciesOverrides) -> Result<()> {
        let mut updated = self.clone();
        for (key, value, slot) in updated.slots(overrides) {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(BioSimError::Parameter(format!(
                        "{species}: {key} must be a non-negative number, got {value}"
                    )));
                }
                *slot = value;
            }
        }
        if updated.eta > 1.0 {
            return Err(BioSimError::Parameter(format!(
                "{species}: eta must lie in [0, 1], got {}",
                updated.eta
            )));
        }
        if updated.f <= 0.0 {
            return Err(BioSimError::Parameter(format!(
                "{species}: F must be strictly positive, got {}",
                updated.f
            )));
        }
        if updated.delta_phi_max <= 0.0 {
            return Err(BioSimError::Parameter(format!(
                "{species}: DeltaPhiMax must be strictly positive, got {}",
                updated.delta_phi_max
            )));
        }
        *self = updated;
        Ok(())
    }

    fn slots<'a>(
        &'a mut self,
        o: &SpeciesOverrides,
    ) -> [(&'static str, Option<f64>, &'a mut f64); 16] {
        [
            ("w_birth", o.w_birth, &mut self.w_birth),
            ("sigma_birth", o.sigma_birth, &mut self.sigma_birth),
            ("beta", o.beta, &mut self.beta),
            ("eta", o.eta, &mut self.eta),
            ("a_half", o.a_half, &mut self.a_half),
            ("phi_age", o.phi_age, &mut self.phi_age),
            ("w_half", o.w_half, &mut self.w_half),
            ("phi_weight", o.phi_weight, &mut self.phi_weight),
            ("mu", o.mu, &mut self.mu),
            ("gamma", o.gamma, &mut self.gamma),
            ("zeta", o.zeta, &mut self.zeta),
            ("xi", o.xi, &mut self.xi),
            ("omega", o.omega, &mut self.omega),
            ("F", o.f, &mut self.f),
            ("DeltaPhiMax", o.delta_phi_max, &mut self.delta_phi_max),
            ("lambda", o.lambda, &mut self.lambda),
        ]
    }
}

/// Partial set of species parameters, as read from a scenario file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpeciesOverrides {
    #[serde(default)]
    pub w_birth: Option<f64>,
    #[serde(default)]
    pub sigma_birth: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
    #[serde(default)]
    pub eta: Option<f64>,
    #[serde(default)]
    pub a_half: Option<f64>,
    #[serde(default)]
    pub phi_age: Option<f64>,
    #[serde(default)]
    pub w_half: Option<f64>,
    #[serde(default)]
    pub phi_weight: Option<f64>,
    #[serde(default)]
    pub mu: Option<f64>,
    #[serde(default)]
    pub gamma: Option<f64>,
    #[serde(default)]
    pub zeta: Option<f64>,
    #[serde(default)]
    pub xi: Option<f64>,
    #[serde(default)]
    pub omega: Option<f64>,
    #[serde(default, rename = "F")]
    pub f: Option<f64>,
    #[serde(default, rename = "DeltaPhiMax")]
    pub delta_phi_max: Option<f64>,
    #[serde(default)]
    pub lambda: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameters {
    pub herbivore: SpeciesParams,
    pub carnivore: SpeciesParams,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            herbivore: SpeciesParams::herbivore(),
            carnivore: SpeciesParams::carnivore(),
        }
    }
}

impl Parameters {
    pub fn species(&self, species: Species) -> &SpeciesParams {
        match species {
            Species::Herbivore => &self.herbivore,
            Species::Carnivore => &self.carnivore,
        }
    }

    pub fn species_mut(&mut self, species: Species) -> &mut SpeciesParams {
        match species {
            Species::Herbivore => &mut self.herbivore,
            Species::Carnivore => &mut self.carnivore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn herbivore_birth_threshold() {
        let params = SpeciesParams::herbivore();
        assert!((params.birth_weight_threshold() - 33.25).abs() < 1e-12);
    }

    #[test]
    fn overrides_apply_partially() {
        let mut params = SpeciesParams::carnivore();
        let overrides = SpeciesOverrides {
            f: Some(40.0),
            mu: Some(0.1),
            ..Default::default()
        };
        params.apply(Species::Carnivore, &overrides).unwrap();
        assert_eq!(params.f, 40.0);
        assert_eq!(params.mu, 0.1);
        assert_eq!(params.gamma, 0.8);
    }

    #[test]
    fn negative_values_are_rejected_without_side_effects() {
        let mut params = SpeciesParams::herbivore();
        let overrides = SpeciesOverrides {
            beta: Some(0.5),
            gamma: Some(-0.2),
            ..Default::default()
        };
        let err = params.apply(Species::Herbivore, &overrides).unwrap_err();
        assert!(err.to_string().contains("gamma"));
        assert_eq!(params, SpeciesParams::herbivore());
    }

    #[test]
    fn eta_and_delta_phi_max_bounds() {
        let mut params = SpeciesParams::herbivore();
        let eta = SpeciesOverrides {
            eta: Some(1.5),
            ..Default::default()
        };
        assert!(params.apply(Species::Herbivore, &eta).is_err());

        let delta = SpeciesOverrides {
            delta_phi_max: Some(0.0),
            ..Default::default()
        };
        assert!(params.apply(Species::Herbivore, &delta).is_err());
    }

    #[test]
    fn appetite_must_be_positive() {
        let mut params = SpeciesParams::carnivore();
        let starved = SpeciesOverrides {
            f: Some(0.0),
            ..Default::default()
        };
        let err = params.apply(Species::Carnivore, &starved).unwrap_err();
        assert!(err.to_string().contains("F must be strictly positive"));
        assert_eq!(params.f, 50.0);
    }

    #[test]
    fn overrides_read_original_key_names() {
        let overrides: SpeciesOverrides =
            serde_yaml::from_str("F: 20.0\nDeltaPhiMax: 5.0\nomega: 0.3\n").unwrap();
        assert_eq!(overrides.f, Some(20.0));
        assert_eq!(overrides.delta_phi_max, Some(5.0));
        assert_eq!(overrides.omega, Some(0.3));
        assert!(serde_yaml::from_str::<SpeciesOverrides>("phi: 1.0\n").is_err());
    }
}
