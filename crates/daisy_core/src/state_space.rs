//! Uniform samples of the raw vector field, used as state-space backgrounds
//! (rate curves in 1D, arrow/streamline grids in 2D).

use crate::domain::linspace;
use crate::parameters::ParameterSet;
use crate::traits::VectorField;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_INTERVAL_RESOLUTION: usize = 101;
pub const DEFAULT_PLANE_RESOLUTION: usize = 100;

/// `dA/dt` along `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSample {
    pub x: Vec<f64>,
    pub rate: Vec<f64>,
}

/// Rates on a `resolution x resolution` grid over `[0, 1]^2`, row-major with
/// the second coordinate varying fastest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneSample {
    pub resolution: usize,
    pub axis: Vec<f64>,
    pub rate_x: Vec<f64>,
    pub rate_y: Vec<f64>,
}

impl PlaneSample {
    /// Rates at grid node `(i, j)`, i.e. state `(axis[i], axis[j])`.
    pub fn at(&self, i: usize, j: usize) -> Option<(f64, f64)> {
        if i >= self.resolution || j >= self.resolution {
            return None;
        }
        let idx = i * self.resolution + j;
        Some((self.rate_x[idx], self.rate_y[idx]))
    }
}

pub fn sample_interval<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    resolution: usize,
) -> Result<IntervalSample> {
    if field.dimension() != 1 {
        bail!("Interval sampling requires a one-dimensional field.");
    }
    if resolution < 2 {
        bail!("resolution must be at least 2.");
    }
    let x = linspace(0.0, 1.0, resolution);
    let mut out = [0.0];
    let rate = x
        .iter()
        .map(|&xi| {
            field.evaluate(&[xi], params, &mut out);
            out[0]
        })
        .collect();
    Ok(IntervalSample { x, rate })
}

pub fn sample_plane<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    resolution: usize,
) -> Result<PlaneSample> {
    if field.dimension() != 2 {
        bail!("Plane sampling requires a two-dimensional field.");
    }
    if resolution < 2 {
        bail!("resolution must be at least 2.");
    }
    let axis = linspace(0.0, 1.0, resolution);
    let mut rate_x = Vec::with_capacity(resolution * resolution);
    let mut rate_y = Vec::with_capacity(resolution * resolution);
    let mut out = [0.0; 2];
    for &x in &axis {
        for &y in &axis {
            field.evaluate(&[x, y], params, &mut out);
            rate_x.push(out[0]);
            rate_y.push(out[1]);
        }
    }
    Ok(PlaneSample {
        resolution,
        axis,
        rate_x,
        rate_y,
    })
}
