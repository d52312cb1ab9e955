//! Brute-force parameter sweeps of the equilibrium set.
//!
//! Unlike pseudo-arclength continuation, every sweep value is solved from
//! scratch on a private copy of the parameters, so folds show up as changes in
//! the equilibrium count between neighbouring entries.

use crate::domain::Domain;
use crate::equilibrium::{find_equilibria, Equilibrium, EquilibriumSettings};
use crate::parameters::ParameterSet;
use crate::traits::VectorField;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BifurcationEntry {
    pub param_value: f64,
    pub equilibria: Vec<Equilibrium>,
}

impl BifurcationEntry {
    /// `(total, stable)` equilibrium counts.
    pub fn signature(&self) -> (usize, usize) {
        let stable = self.equilibria.iter().filter(|e| e.stable).count();
        (self.equilibria.len(), stable)
    }
}

/// Equilibrium sets in sweep order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BifurcationRecord {
    pub param_name: String,
    pub entries: Vec<BifurcationEntry>,
}

impl BifurcationRecord {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn param_values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.param_value).collect()
    }

    /// Indices whose `(total, stable)` signature differs from the previous entry.
    pub fn transitions(&self) -> Vec<usize> {
        self.entries
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[0].signature() != pair[1].signature())
            .map(|(idx, _)| idx + 1)
            .collect()
    }
}

/// Solves for equilibria at each of `values` of `param_name`, in the given order.
///
/// `base` is never modified. Fails with the underlying
/// [`ParameterError`](crate::parameters::ParameterError) if a value violates the
/// parameter's constraints.
pub fn scan_parameter<F: VectorField>(
    field: &F,
    base: &ParameterSet,
    param_name: &str,
    values: &[f64],
    domain: &Domain,
    settings: &EquilibriumSettings,
) -> Result<BifurcationRecord> {
    if base.get(param_name).is_none() {
        bail!("Unknown sweep parameter `{}`.", param_name);
    }

    let mut entries = Vec::with_capacity(values.len());
    for (idx, &value) in values.iter().enumerate() {
        let params = base.with_value(param_name, value)?;
        let equilibria = find_equilibria(field, &params, domain, settings)
            .with_context(|| format!("Equilibrium search failed at {param_name} = {value}."))?;
        trace!(idx, value, count = equilibria.len(), "sweep step");
        entries.push(BifurcationEntry {
            param_value: value,
            equilibria,
        });
    }

    let record = BifurcationRecord {
        param_name: param_name.to_string(),
        entries,
    };
    debug!(
        param = param_name,
        steps = record.len(),
        transitions = record.transitions().len(),
        "parameter sweep complete"
    );
    Ok(record)
}

/// Values `start + i * step` strictly below `stop`, computed without
/// accumulating rounding error.
pub fn arange(start: f64, stop: f64, step: f64) -> Result<Vec<f64>> {
    if !(step > 0.0) {
        bail!("step must be positive.");
    }
    if !start.is_finite() || !stop.is_finite() {
        bail!("range bounds must be finite.");
    }
    let count = ((stop - start) / step).ceil().max(0.0) as usize;
    Ok((0..count)
        .map(|i| start + step * i as f64)
        .filter(|&v| v < stop)
        .collect())
}
