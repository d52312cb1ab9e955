//! Multi-start root finding over a bounded domain.
//!
//! Every probe point of a regular grid seeds a Nelder-Mead run on
//! `|f(x)|^2`. Results are rounded to a fixed number of decimals, filtered by
//! domain and residual, and deduplicated on the rounded key. Probes that fail
//! any filter are dropped without error.

use crate::domain::Domain;
use crate::optimize::{nelder_mead, NelderMeadSettings};
use crate::parameters::ParameterSet;
use crate::traits::VectorField;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootSearchSettings {
    /// Probe values per axis, evenly spaced on `[0, 1]`.
    pub samples: usize,
    /// Decimal digits kept when rounding converged points.
    pub decimals: u32,
    /// Largest `|f(x)|^2` accepted at a rounded point.
    pub cost_tolerance: f64,
    pub minimizer: NelderMeadSettings,
}

impl Default for RootSearchSettings {
    fn default() -> Self {
        Self {
            samples: 21,
            decimals: 5,
            cost_tolerance: 1e-7,
            minimizer: NelderMeadSettings::default(),
        }
    }
}

impl RootSearchSettings {
    fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            bail!("samples must be at least 2.");
        }
        if self.decimals > 12 {
            bail!("decimals must be at most 12.");
        }
        if self.cost_tolerance <= 0.0 {
            bail!("cost_tolerance must be positive.");
        }
        Ok(())
    }
}

/// Squared Euclidean norm of the field, the function each probe minimizes.
pub fn residual_cost<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    point: &[f64],
    buffer: &mut [f64],
) -> f64 {
    field.evaluate(point, params, buffer);
    buffer.iter().map(|v| v * v).sum()
}

/// Returns the deduplicated candidate zeros of `field` inside `domain`, in the
/// order they were first discovered.
pub fn find_roots<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    domain: &Domain,
    settings: &RootSearchSettings,
) -> Result<Vec<Vec<f64>>> {
    let dim = field.dimension();
    if dim == 0 {
        bail!("System has zero dimension.");
    }
    if domain.dimension() != dim {
        bail!(
            "Domain dimension mismatch. Expected {}, got {}.",
            dim,
            domain.dimension()
        );
    }
    settings.validate()?;

    let scale = 10_i64.pow(settings.decimals);
    let probes = domain.grid(settings.samples);
    let mut keys: Vec<Vec<i64>> = Vec::new();
    let mut buffer = vec![0.0; dim];

    for start in &probes {
        let minimum = nelder_mead(
            |x| {
                let mut out = vec![0.0; dim];
                residual_cost(field, params, x, &mut out)
            },
            start,
            &settings.minimizer,
        )?;

        let Some(key) = round_key(&minimum.x, scale) else {
            trace!(?start, x = ?minimum.x, "probe diverged");
            continue;
        };
        if !domain.contains_key(&key, scale) {
            trace!(?start, ?key, "candidate outside domain");
            continue;
        }
        let point = key_to_point(&key, scale);
        let cost = residual_cost(field, params, &point, &mut buffer);
        if !(cost < settings.cost_tolerance) {
            trace!(?start, ?point, cost, "candidate above cost tolerance");
            continue;
        }
        if keys.contains(&key) {
            continue;
        }
        trace!(?start, ?point, cost, "candidate accepted");
        keys.push(key);
    }

    debug!(probes = probes.len(), roots = keys.len(), "root search complete");
    Ok(keys.iter().map(|key| key_to_point(key, scale)).collect())
}

/// Rounds each coordinate to a fixed-point integer key; `None` if any
/// coordinate is not finite or overflows.
fn round_key(point: &[f64], scale: i64) -> Option<Vec<i64>> {
    point
        .iter()
        .map(|&x| {
            let scaled = (x * scale as f64).round();
            if scaled.is_finite() && scaled.abs() < i64::MAX as f64 {
                Some(scaled as i64)
            } else {
                None
            }
        })
        .collect()
}

fn key_to_point(key: &[i64], scale: i64) -> Vec<f64> {
    key.iter().map(|&k| k as f64 / scale as f64).collect()
}
