use crate::domain::Domain;
use crate::parameters::ParameterSet;
use crate::roots::{find_roots, RootSearchSettings};
use crate::stability::classify;
use crate::traits::VectorField;
use anyhow::{bail, Context, Result};
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibriumSettings {
    pub search: RootSearchSettings,
    /// Step of the symmetric finite differences used for the Jacobian.
    pub jacobian_step: f64,
}

impl Default for EquilibriumSettings {
    fn default() -> Self {
        Self {
            search: RootSearchSettings::default(),
            jacobian_step: 1e-5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    pub coordinates: Vec<f64>,
    pub stable: bool,
    #[serde(default)]
    pub eigenvalues: Vec<Complex<f64>>,
}

/// Discovers the equilibria of `field` inside `domain` and classifies each one.
///
/// Each call is independent: nothing is cached between parameter sets.
pub fn find_equilibria<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    domain: &Domain,
    settings: &EquilibriumSettings,
) -> Result<Vec<Equilibrium>> {
    if !(settings.jacobian_step > 0.0) {
        bail!("jacobian_step must be positive.");
    }

    let roots = find_roots(field, params, domain, &settings.search)?;
    let mut equilibria = Vec::with_capacity(roots.len());
    for coordinates in roots {
        let linearization = classify(field, params, &coordinates, settings.jacobian_step)
            .with_context(|| format!("Failed to classify equilibrium at {coordinates:?}."))?;
        equilibria.push(Equilibrium {
            coordinates,
            stable: linearization.stable,
            eigenvalues: linearization.eigenvalues,
        });
    }

    debug!(
        count = equilibria.len(),
        stable = equilibria.iter().filter(|e| e.stable).count(),
        "equilibria classified"
    );
    Ok(equilibria)
}
