//! Derivative-free local minimization.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Relative perturbation used to build the initial simplex.
const NONZERO_DELTA: f64 = 0.05;
/// Absolute perturbation for coordinates that start at zero.
const ZERO_DELTA: f64 = 0.00025;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NelderMeadSettings {
    /// Iteration cap; `None` means `200 * dimension`.
    pub max_iterations: Option<usize>,
    /// Largest allowed vertex offset from the best vertex at convergence.
    pub x_tolerance: f64,
    /// Largest allowed cost spread across the simplex at convergence.
    pub f_tolerance: f64,
}

impl Default for NelderMeadSettings {
    fn default() -> Self {
        Self {
            max_iterations: None,
            x_tolerance: 1e-8,
            f_tolerance: 1e-4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    pub x: Vec<f64>,
    pub cost: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Minimizes `f` from `x0` with the Nelder-Mead simplex method.
///
/// Fully deterministic: the initial simplex depends only on `x0` and ties are
/// broken by a stable sort. NaN costs are treated as `+inf`, so the simplex
/// walks back from regions where `f` is undefined.
pub fn nelder_mead<F>(f: F, x0: &[f64], settings: &NelderMeadSettings) -> Result<Minimum>
where
    F: Fn(&[f64]) -> f64,
{
    let n = x0.len();
    if n == 0 {
        bail!("Initial guess must have positive dimension.");
    }
    if settings.x_tolerance <= 0.0 || settings.f_tolerance <= 0.0 {
        bail!("Minimizer tolerances must be positive.");
    }
    let max_iterations = settings.max_iterations.unwrap_or(200 * n);

    let cost = |x: &[f64]| {
        let value = f(x);
        if value.is_nan() {
            f64::INFINITY
        } else {
            value
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(x0.to_vec());
    for i in 0..n {
        let mut vertex = x0.to_vec();
        vertex[i] = if vertex[i] != 0.0 {
            (1.0 + NONZERO_DELTA) * vertex[i]
        } else {
            ZERO_DELTA
        };
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| cost(v)).collect();
    sort_simplex(&mut simplex, &mut values);

    let mut iterations = 0usize;
    let mut converged = false;
    while iterations < max_iterations {
        if has_converged(&simplex, &values, settings) {
            converged = true;
            break;
        }

        let mut centroid = vec![0.0; n];
        for vertex in &simplex[..n] {
            for j in 0..n {
                centroid[j] += vertex[j];
            }
        }
        for c in &mut centroid {
            *c /= n as f64;
        }

        let worst = simplex[n].clone();
        let along = |t: f64| -> Vec<f64> {
            // centroid + t * (centroid - worst)
            centroid
                .iter()
                .zip(&worst)
                .map(|(c, w)| c + t * (c - w))
                .collect()
        };

        let x_r = along(1.0);
        let f_r = cost(&x_r);
        let mut shrink = false;

        if f_r < values[0] {
            let x_e = along(2.0);
            let f_e = cost(&x_e);
            if f_e < f_r {
                simplex[n] = x_e;
                values[n] = f_e;
            } else {
                simplex[n] = x_r;
                values[n] = f_r;
            }
        } else if f_r < values[n - 1] {
            simplex[n] = x_r;
            values[n] = f_r;
        } else if f_r < values[n] {
            let x_c = along(0.5);
            let f_c = cost(&x_c);
            if f_c <= f_r {
                simplex[n] = x_c;
                values[n] = f_c;
            } else {
                shrink = true;
            }
        } else {
            let x_cc = along(-0.5);
            let f_cc = cost(&x_cc);
            if f_cc < values[n] {
                simplex[n] = x_cc;
                values[n] = f_cc;
            } else {
                shrink = true;
            }
        }

        if shrink {
            let best = simplex[0].clone();
            for i in 1..=n {
                for j in 0..n {
                    simplex[i][j] = best[j] + 0.5 * (simplex[i][j] - best[j]);
                }
                values[i] = cost(&simplex[i]);
            }
        }

        iterations += 1;
        sort_simplex(&mut simplex, &mut values);
    }

    if !converged {
        converged = has_converged(&simplex, &values, settings);
    }

    Ok(Minimum {
        x: simplex[0].clone(),
        cost: values[0],
        iterations,
        converged,
    })
}

fn has_converged(simplex: &[Vec<f64>], values: &[f64], settings: &NelderMeadSettings) -> bool {
    let best = &simplex[0];
    let x_spread = simplex[1..]
        .iter()
        .flat_map(|v| v.iter().zip(best).map(|(a, b)| (a - b).abs()))
        .fold(0.0_f64, f64::max);
    let f_spread = values[1..]
        .iter()
        .map(|v| (v - values[0]).abs())
        .fold(0.0_f64, f64::max);
    x_spread <= settings.x_tolerance && f_spread <= settings.f_tolerance
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}
