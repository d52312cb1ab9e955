//! Core WASM model wrapper: parameters and the stepping driver.

use daisy_core::daisyworld::Daisyworld;
use daisy_core::parameters::ParameterSet;
use daisy_core::trajectory::Evolution;
use daisy_core::traits::VectorField;
use js_sys::Float64Array;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

/// Time step of the original animation loop.
pub(crate) const DEFAULT_DT: f64 = 0.025;

#[wasm_bindgen]
pub struct WasmDaisyworld {
    pub(crate) model: Daisyworld,
    pub(crate) params: ParameterSet,
    evolution: Evolution,
}

/// Current point of the running evolution.
#[derive(Serialize)]
struct EvolutionSnapshot<'a> {
    t: f64,
    state: &'a [f64],
    rate: &'a [f64],
}

pub(crate) fn parse_model(kind: &str) -> Result<Daisyworld, String> {
    match kind {
        "one" | "1d" => Ok(Daisyworld::one()),
        "two" | "2d" => Ok(Daisyworld::two()),
        other => Err(format!("Unknown model `{other}`; expected \"one\" or \"two\".")),
    }
}

impl WasmDaisyworld {
    pub(crate) fn build(model: Daisyworld) -> Result<Self, String> {
        let params = model.default_parameters();
        let state0 = model.initial_state(&params);
        let evolution = Evolution::new(&model, &params, &state0).map_err(|e| e.to_string())?;
        Ok(Self {
            model,
            params,
            evolution,
        })
    }

    /// Applies positional parameter values; on failure nothing changes.
    pub(crate) fn apply_parameter_values(&mut self, values: &[f64]) -> Result<(), String> {
        self.params
            .set_values(values)
            .map_err(|e| format!("Invalid parameters: {e}"))?;
        self.restart_evolution()
    }

    fn restart_evolution(&mut self) -> Result<(), String> {
        let state0 = self.model.initial_state(&self.params);
        self.evolution
            .restart(&self.model, &self.params, &state0)
            .map_err(|e| e.to_string())
    }
}

#[wasm_bindgen]
impl WasmDaisyworld {
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str) -> Result<WasmDaisyworld, JsValue> {
        console_error_panic_hook::set_once();

        let model = parse_model(kind).map_err(|e| JsValue::from_str(&e))?;
        Self::build(model).map_err(|e| JsValue::from_str(&e))
    }

    pub fn dimension(&self) -> usize {
        self.model.dimension()
    }

    /// Full parameter descriptors (key, label, symbol, value, default, range flag).
    pub fn get_parameters(&self) -> Result<JsValue, JsValue> {
        let list: Vec<_> = self.params.iter().collect();
        to_value(&list).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn get_parameter_values(&self) -> Vec<f64> {
        self.params.values()
    }

    /// Sets every parameter in declaration order and restarts the evolution
    /// from the new initial areas. A rejected update leaves everything as it was.
    pub fn set_parameter_values(&mut self, values: Vec<f64>) -> Result<(), JsValue> {
        self.apply_parameter_values(&values)
            .map_err(|e| JsValue::from_str(&e))
    }

    pub fn reset_parameters(&mut self) -> Result<(), JsValue> {
        self.params.reset();
        self.restart_evolution().map_err(|e| JsValue::from_str(&e))
    }

    pub fn evaluate(&self, state: Vec<f64>) -> Result<Float64Array, JsValue> {
        let dim = self.model.dimension();
        if state.len() != dim {
            return Err(JsValue::from_str("State dimension mismatch."));
        }
        let mut out = vec![0.0; dim];
        self.model.evaluate(&state, &self.params, &mut out);
        Ok(Float64Array::from(out.as_slice()))
    }

    /// One Euler step of the running evolution; `dt <= 0` uses the default step.
    pub fn step(&mut self, dt: f64) {
        let dt = if dt > 0.0 { dt } else { DEFAULT_DT };
        self.evolution.advance(&self.model, &self.params, dt);
    }

    pub fn get_state(&self) -> Vec<f64> {
        self.evolution.state().to_vec()
    }

    pub fn get_t(&self) -> f64 {
        self.evolution.t()
    }

    pub fn get_rate(&self) -> Vec<f64> {
        self.evolution.rate().to_vec()
    }

    pub fn get_snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = EvolutionSnapshot {
            t: self.evolution.t(),
            state: self.evolution.state(),
            rate: self.evolution.rate(),
        };
        to_value(&snapshot).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// The samples recorded since the last restart.
    pub fn get_trajectory(&self) -> Result<JsValue, JsValue> {
        to_value(self.evolution.trajectory())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.restart_evolution().map_err(|e| JsValue::from_str(&e))
    }
}
