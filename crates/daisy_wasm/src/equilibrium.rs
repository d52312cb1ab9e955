//! Equilibrium search and local linearization.

use crate::system::WasmDaisyworld;
use daisy_core::equilibrium::{find_equilibria, EquilibriumSettings};
use daisy_core::stability::classify;
use daisy_core::traits::VectorField;
use serde::de::DeserializeOwned;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Decodes optional settings; `undefined` and `null` mean defaults.
pub(crate) fn decode_settings<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    from_value(value).map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))
}

#[wasm_bindgen]
impl WasmDaisyworld {
    /// Every equilibrium inside the model's domain under the current parameters.
    pub fn find_equilibria(&self, settings: JsValue) -> Result<JsValue, JsValue> {
        let settings: EquilibriumSettings = decode_settings(settings)?;
        let equilibria = find_equilibria(&self.model, &self.params, &self.model.domain(), &settings)
            .map_err(|e| JsValue::from_str(&format!("Equilibrium search failed: {}", e)))?;

        to_value(&equilibria).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Jacobian, eigenvalues and stability verdict at an arbitrary point.
    pub fn linearize(&self, point: Vec<f64>, jacobian_step: f64) -> Result<JsValue, JsValue> {
        if point.len() != self.model.dimension() {
            return Err(JsValue::from_str("Point dimension mismatch."));
        }
        let step = if jacobian_step > 0.0 {
            jacobian_step
        } else {
            EquilibriumSettings::default().jacobian_step
        };
        let linearization = classify(&self.model, &self.params, &point, step)
            .map_err(|e| JsValue::from_str(&format!("Linearization failed: {}", e)))?;

        to_value(&linearization).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use daisy_core::equilibrium::Equilibrium;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn finds_one_daisy_equilibria_with_default_settings() {
        let world = WasmDaisyworld::new("one").expect("world");
        let value = world.find_equilibria(JsValue::UNDEFINED).expect("equilibria");
        let equilibria: Vec<Equilibrium> = from_value(value).expect("decode");
        assert_eq!(equilibria.len(), 2);
        assert!(!equilibria[0].stable);
        assert!(equilibria[1].stable);
    }

    #[wasm_bindgen_test]
    fn rejects_malformed_settings() {
        let world = WasmDaisyworld::new("one").expect("world");
        assert!(world.find_equilibria(JsValue::from_str("fast")).is_err());
    }

    #[wasm_bindgen_test]
    fn linearize_checks_dimension() {
        let world = WasmDaisyworld::new("two").expect("world");
        assert!(world.linearize(vec![0.1], 0.0).is_err());
        assert!(world.linearize(vec![0.0, 0.0], 0.0).is_ok());
    }
}
