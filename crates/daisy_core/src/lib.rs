pub mod bifurcation;
pub mod daisyworld;
pub mod domain;
pub mod equilibrium;
pub mod optimize;
pub mod parameters;
pub mod roots;
pub mod solvers;
pub mod stability;
pub mod state_space;
pub mod trajectory;
/// The `daisy_core` crate provides the numerical engine for the Daisyworld model.
/// Every computation takes its `ParameterSet` explicitly and keeps no state
/// between calls.
///
/// Key components:
/// - **Traits**: `VectorField` (parametrized dx/dt), `Steppable` (time steppers).
/// - **Daisyworld**: one- and two-species radiative-balance fields with their default parameters.
/// - **Roots / Stability / Equilibrium**: multi-start Nelder-Mead root search, finite-difference
///   Jacobians and eigenvalue-sign classification.
/// - **Trajectory**: forward Euler integration and the incremental `Evolution` driver.
/// - **Bifurcation**: parameter sweeps of the equilibrium set.
pub mod traits;

pub use daisyworld::{Daisyworld, OneDaisy, TwoDaisy};
pub use domain::Domain;
pub use equilibrium::{find_equilibria, Equilibrium, EquilibriumSettings};
pub use parameters::{Parameter, ParameterError, ParameterSet};
pub use traits::VectorField;
