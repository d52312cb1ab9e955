use crate::parameters::ParameterSet;

/// A parametrized autonomous vector field `dx/dt = f(x; p)`.
pub trait VectorField {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the instantaneous rate of change.
    /// state: current state
    /// params: fully resolved parameter set
    /// out: buffer to write dx/dt
    ///
    /// Must stay finite-or-NaN (never panic) for states outside the nominal domain,
    /// since probes and finite differences step slightly past its boundary.
    fn evaluate(&self, state: &[f64], params: &ParameterSet, out: &mut [f64]);
}

impl<F: VectorField + ?Sized> VectorField for &F {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn evaluate(&self, state: &[f64], params: &ParameterSet, out: &mut [f64]) {
        (**self).evaluate(state, params, out)
    }
}

/// A trait for solvers that can step a field forward in time.
pub trait Steppable {
    /// Performs one step of size dt.
    /// t: current time (updated after step)
    /// state: current state (updated after step)
    /// dt: step size
    fn step(
        &mut self,
        field: &impl VectorField,
        params: &ParameterSet,
        t: &mut f64,
        state: &mut [f64],
        dt: f64,
    );
}
