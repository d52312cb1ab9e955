use crate::parameters::ParameterSet;
use crate::traits::{Steppable, VectorField};

/// Explicit (forward) Euler: `x' = x + f(x) * dt`.
///
/// No step-size control and no range checks; a large `dt` may leave the domain
/// or diverge, which is the caller's concern.
pub struct ForwardEuler {
    rate: Vec<f64>,
}

impl ForwardEuler {
    pub fn new(dim: usize) -> Self {
        Self {
            rate: vec![0.0; dim],
        }
    }

    /// Rate evaluated at the start of the most recent step.
    pub fn last_rate(&self) -> &[f64] {
        &self.rate
    }
}

impl Steppable for ForwardEuler {
    fn step(
        &mut self,
        field: &impl VectorField,
        params: &ParameterSet,
        t: &mut f64,
        state: &mut [f64],
        dt: f64,
    ) {
        if self.rate.len() != state.len() {
            self.rate.resize(state.len(), 0.0);
        }
        field.evaluate(state, params, &mut self.rate);
        for (x, v) in state.iter_mut().zip(&self.rate) {
            *x += v * dt;
        }
        *t += dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Decay;

    impl VectorField for Decay {
        fn dimension(&self) -> usize {
            1
        }

        fn evaluate(&self, state: &[f64], _params: &ParameterSet, out: &mut [f64]) {
            out[0] = -state[0];
        }
    }

    #[test]
    fn single_step_matches_hand_computation() {
        let mut stepper = ForwardEuler::new(1);
        let mut t = 0.0;
        let mut state = [1.0];
        stepper.step(&Decay, &ParameterSet::new(), &mut t, &mut state, 0.1);
        assert_eq!(state[0], 0.9);
        assert_eq!(t, 0.1);
        assert_eq!(stepper.last_rate(), &[-1.0]);
    }

    #[test]
    fn oversized_step_overshoots_without_complaint() {
        let mut stepper = ForwardEuler::new(1);
        let mut t = 0.0;
        let mut state = [1.0];
        for _ in 0..10 {
            stepper.step(&Decay, &ParameterSet::new(), &mut t, &mut state, 3.0);
        }
        // Amplification factor |1 - dt| = 2 per step.
        assert_eq!(state[0], 1024.0);
    }
}
