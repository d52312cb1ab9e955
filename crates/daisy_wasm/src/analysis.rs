//! Trajectories, state-space samples and parameter sweeps.

use crate::equilibrium::decode_settings;
use crate::system::{parse_model, WasmDaisyworld, DEFAULT_DT};
use daisy_core::bifurcation::{scan_parameter, BifurcationEntry, BifurcationRecord};
use daisy_core::daisyworld::Daisyworld;
use daisy_core::equilibrium::{find_equilibria, EquilibriumSettings};
use daisy_core::parameters::ParameterSet;
use daisy_core::state_space::{
    sample_interval, sample_plane, DEFAULT_INTERVAL_RESOLUTION, DEFAULT_PLANE_RESOLUTION,
};
use daisy_core::trajectory::integrate;
use daisy_core::traits::VectorField;
use serde::Serialize;
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
impl WasmDaisyworld {
    /// Batch Euler run from the parameters' initial areas, or from
    /// `initial_state` when one is given.
    pub fn integrate(
        &self,
        dt: f64,
        n_steps: u32,
        initial_state: Option<Vec<f64>>,
    ) -> Result<JsValue, JsValue> {
        let dt = if dt > 0.0 { dt } else { DEFAULT_DT };
        let state0 = initial_state.unwrap_or_else(|| self.model.initial_state(&self.params));
        let trajectory = integrate(&self.model, &self.params, &state0, dt, n_steps as usize)
            .map_err(|e| JsValue::from_str(&format!("Integration failed: {}", e)))?;

        to_value(&trajectory).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Rate curve (one species) or rate grid (two species); `0` picks the
    /// default resolution.
    pub fn sample_state_space(&self, resolution: u32) -> Result<JsValue, JsValue> {
        let resolution = resolution as usize;
        let result = match self.model.dimension() {
            1 => {
                let n = if resolution == 0 {
                    DEFAULT_INTERVAL_RESOLUTION
                } else {
                    resolution
                };
                sample_interval(&self.model, &self.params, n).and_then(|sample| {
                    to_value(&sample).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
                })
            }
            _ => {
                let n = if resolution == 0 {
                    DEFAULT_PLANE_RESOLUTION
                } else {
                    resolution
                };
                sample_plane(&self.model, &self.params, n).and_then(|sample| {
                    to_value(&sample).map_err(|e| anyhow::anyhow!("Serialization error: {}", e))
                })
            }
        };
        result.map_err(|e| JsValue::from_str(&format!("State-space sampling failed: {}", e)))
    }

    /// Full sweep in one call. Prefer `WasmBifurcationRunner` for long sweeps.
    pub fn scan_parameter(
        &self,
        param_name: &str,
        values: Vec<f64>,
        settings: JsValue,
    ) -> Result<JsValue, JsValue> {
        let settings: EquilibriumSettings = decode_settings(settings)?;
        let record = scan_parameter(
            &self.model,
            &self.params,
            param_name,
            &values,
            &self.model.domain(),
            &settings,
        )
        .map_err(|e| JsValue::from_str(&format!("Parameter sweep failed: {}", e)))?;

        to_value(&record).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

/// Progress payload for the stepped sweep.
#[derive(Serialize)]
struct SweepProgress {
    done: bool,
    current_step: usize,
    max_steps: usize,
}

struct SweepState {
    model: Daisyworld,
    base: ParameterSet,
    param_name: String,
    values: Vec<f64>,
    settings: EquilibriumSettings,
    entries: Vec<BifurcationEntry>,
}

impl SweepState {
    fn new(
        model: Daisyworld,
        base: ParameterSet,
        param_name: &str,
        values: Vec<f64>,
        settings: EquilibriumSettings,
    ) -> Result<Self, String> {
        if base.get(param_name).is_none() {
            return Err(format!("Unknown sweep parameter `{param_name}`."));
        }
        Ok(Self {
            model,
            base,
            param_name: param_name.to_string(),
            entries: Vec::with_capacity(values.len()),
            values,
            settings,
        })
    }

    fn is_done(&self) -> bool {
        self.entries.len() >= self.values.len()
    }

    /// Solves up to `batch_size` further sweep values.
    fn advance(&mut self, batch_size: usize) -> Result<(), String> {
        let domain = self.model.domain();
        for _ in 0..batch_size {
            let Some(&value) = self.values.get(self.entries.len()) else {
                break;
            };
            let params = self
                .base
                .with_value(&self.param_name, value)
                .map_err(|e| format!("Invalid sweep value: {e}"))?;
            let equilibria = find_equilibria(&self.model, &params, &domain, &self.settings)
                .map_err(|e| format!("Equilibrium search failed at {} = {}: {}", self.param_name, value, e))?;
            self.entries.push(BifurcationEntry {
                param_value: value,
                equilibria,
            });
        }
        Ok(())
    }

    fn progress(&self) -> SweepProgress {
        SweepProgress {
            done: self.is_done(),
            current_step: self.entries.len(),
            max_steps: self.values.len(),
        }
    }

    fn record(&self) -> BifurcationRecord {
        BifurcationRecord {
            param_name: self.param_name.clone(),
            entries: self.entries.clone(),
        }
    }
}

/// Parameter sweep that can be advanced in batches between animation frames.
#[wasm_bindgen]
pub struct WasmBifurcationRunner {
    state: Option<SweepState>,
}

#[wasm_bindgen]
impl WasmBifurcationRunner {
    #[wasm_bindgen(constructor)]
    pub fn new(
        kind: &str,
        param_values: Vec<f64>,
        param_name: &str,
        sweep_values: Vec<f64>,
        settings: JsValue,
    ) -> Result<WasmBifurcationRunner, JsValue> {
        console_error_panic_hook::set_once();

        let model = parse_model(kind).map_err(|e| JsValue::from_str(&e))?;
        let mut base = model.default_parameters();
        base.set_values(&param_values)
            .map_err(|e| JsValue::from_str(&format!("Invalid parameters: {}", e)))?;
        let settings: EquilibriumSettings = decode_settings(settings)?;
        let state = SweepState::new(model, base, param_name, sweep_values, settings)
            .map_err(|e| JsValue::from_str(&e))?;

        Ok(WasmBifurcationRunner { state: Some(state) })
    }

    pub fn is_done(&self) -> bool {
        self.state.as_ref().map_or(true, |state| state.is_done())
    }

    pub fn run_steps(&mut self, batch_size: u32) -> Result<JsValue, JsValue> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        state
            .advance(batch_size as usize)
            .map_err(|e| JsValue::from_str(&e))?;

        to_value(&state.progress())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    pub fn get_progress(&self) -> Result<JsValue, JsValue> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        to_value(&state.progress())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }

    /// Entries solved so far, in sweep order.
    pub fn get_result(&self) -> Result<JsValue, JsValue> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| JsValue::from_str("Runner not initialized"))?;

        to_value(&state.record()).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_daisy_sweep(values: Vec<f64>) -> SweepState {
        let model = Daisyworld::one();
        SweepState::new(
            model,
            model.default_parameters(),
            "L",
            values,
            EquilibriumSettings::default(),
        )
        .expect("sweep")
    }

    #[test]
    fn batched_sweep_matches_single_call() {
        let values = vec![0.5, 1.0, 1.7];
        let mut sweep = one_daisy_sweep(values.clone());
        sweep.advance(2).expect("first batch");
        assert!(!sweep.is_done());
        assert_eq!(sweep.progress().current_step, 2);
        sweep.advance(2).expect("second batch");
        assert!(sweep.is_done());

        let model = Daisyworld::one();
        let direct = scan_parameter(
            &model,
            &model.default_parameters(),
            "L",
            &values,
            &model.domain(),
            &EquilibriumSettings::default(),
        )
        .expect("scan");
        assert_eq!(sweep.record(), direct);
    }

    #[test]
    fn sweep_stops_at_invalid_value() {
        let model = Daisyworld::one();
        let mut sweep = SweepState::new(
            model,
            model.default_parameters(),
            "A0",
            vec![0.5, 1.2],
            EquilibriumSettings::default(),
        )
        .expect("sweep");
        let err = sweep.advance(5).expect_err("A0 out of range");
        assert!(err.contains("Invalid sweep value"));
        assert_eq!(sweep.progress().current_step, 1);
    }

    #[test]
    fn sweep_rejects_unknown_parameter() {
        let model = Daisyworld::two();
        let result = SweepState::new(
            model,
            model.default_parameters(),
            "A0",
            vec![0.5],
            EquilibriumSettings::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_sweep_is_done_immediately() {
        let sweep = one_daisy_sweep(Vec::new());
        assert!(sweep.is_done());
        assert!(sweep.record().is_empty());
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_value_tests {
    use super::*;
    use daisy_core::trajectory::Trajectory;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn integrate_includes_initial_sample() {
        let world = WasmDaisyworld::new("one").expect("world");
        let value = world.integrate(0.025, 10, None).expect("trajectory");
        let trajectory: Trajectory = from_value(value).expect("decode");
        assert_eq!(trajectory.len(), 11);
        assert_eq!(trajectory.samples()[0].state, vec![0.92]);
    }

    #[wasm_bindgen_test]
    fn integrate_rejects_wrong_initial_dimension() {
        let world = WasmDaisyworld::new("two").expect("world");
        assert!(world.integrate(0.025, 10, Some(vec![0.5])).is_err());
    }

    #[wasm_bindgen_test]
    fn scan_reports_unknown_parameter() {
        let world = WasmDaisyworld::new("one").expect("world");
        let err = world
            .scan_parameter("Q", vec![1.0], JsValue::NULL)
            .expect_err("unknown");
        assert!(err.as_string().unwrap_or_default().contains("Unknown sweep parameter"));
    }

    #[wasm_bindgen_test]
    fn runner_reports_progress() {
        let params = Daisyworld::one().default_parameters().values();
        let mut runner =
            WasmBifurcationRunner::new("one", params, "L", vec![0.5, 1.0], JsValue::UNDEFINED)
                .expect("runner");
        runner.run_steps(1).expect("batch");
        assert!(!runner.is_done());
        runner.run_steps(1).expect("batch");
        assert!(runner.is_done());
        let record: BifurcationRecord = from_value(runner.get_result().expect("result")).expect("decode");
        assert_eq!(record.len(), 2);
    }
}
