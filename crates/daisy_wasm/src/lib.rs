//! WASM bindings for the Daisyworld engine.
//!
//! The browser front-end owns rendering and controls; this crate only converts
//! between JS values and `daisy_core` types.

mod analysis;
mod equilibrium;
mod system;

pub use analysis::WasmBifurcationRunner;
pub use system::WasmDaisyworld;
