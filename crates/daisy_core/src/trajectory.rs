//! Fixed-step time integration and the stepping driver used by animations.

use crate::parameters::ParameterSet;
use crate::solvers::ForwardEuler;
use crate::traits::{Steppable, VectorField};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub t: f64,
    pub state: Vec<f64>,
}

/// Append-only time series of states.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, t: f64, state: &[f64]) {
        self.samples.push(TrajectorySample {
            t,
            state: state.to_vec(),
        });
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    /// One coordinate over time, e.g. the white-daisy area.
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.samples
            .iter()
            .map(|s| s.state.get(index).copied().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Integrates `n_steps` forward Euler steps from `state0` at `t = 0`.
///
/// The result holds `n_steps + 1` samples, the first being the initial state.
pub fn integrate<F: VectorField>(
    field: &F,
    params: &ParameterSet,
    state0: &[f64],
    dt: f64,
    n_steps: usize,
) -> Result<Trajectory> {
    let dim = field.dimension();
    if state0.len() != dim {
        bail!(
            "Initial state dimension mismatch. Expected {}, got {}.",
            dim,
            state0.len()
        );
    }
    if !(dt > 0.0) {
        bail!("Step size dt must be positive.");
    }

    let mut stepper = ForwardEuler::new(dim);
    let mut trajectory = Trajectory {
        samples: Vec::with_capacity(n_steps + 1),
    };
    let mut t = 0.0;
    let mut state = state0.to_vec();
    trajectory.push(t, &state);
    for _ in 0..n_steps {
        stepper.step(field, params, &mut t, &mut state, dt);
        trajectory.push(t, &state);
    }
    Ok(trajectory)
}

/// Incremental integration state: current time, state and rate, plus the
/// trajectory recorded so far. One per run; `restart` discards the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evolution {
    t: f64,
    state: Vec<f64>,
    rate: Vec<f64>,
    trajectory: Trajectory,
}

impl Evolution {
    pub fn new<F: VectorField>(field: &F, params: &ParameterSet, state0: &[f64]) -> Result<Self> {
        if state0.len() != field.dimension() {
            bail!(
                "Initial state dimension mismatch. Expected {}, got {}.",
                field.dimension(),
                state0.len()
            );
        }
        let mut rate = vec![0.0; state0.len()];
        field.evaluate(state0, params, &mut rate);
        let mut trajectory = Trajectory::new();
        trajectory.push(0.0, state0);
        Ok(Self {
            t: 0.0,
            state: state0.to_vec(),
            rate,
            trajectory,
        })
    }

    pub fn t(&self) -> f64 {
        self.t
    }

    pub fn state(&self) -> &[f64] {
        &self.state
    }

    /// Rate of change at the current state.
    pub fn rate(&self) -> &[f64] {
        &self.rate
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Advances one Euler step and records the new sample.
    pub fn advance<F: VectorField>(&mut self, field: &F, params: &ParameterSet, dt: f64) {
        for (x, v) in self.state.iter_mut().zip(&self.rate) {
            *x += v * dt;
        }
        self.t += dt;
        field.evaluate(&self.state, params, &mut self.rate);
        self.trajectory.push(self.t, &self.state);
    }

    /// Starts over from `state0` at `t = 0`, dropping the recorded trajectory.
    pub fn restart<F: VectorField>(
        &mut self,
        field: &F,
        params: &ParameterSet,
        state0: &[f64],
    ) -> Result<()> {
        *self = Self::new(field, params, state0)?;
        Ok(())
    }
}
