//! The Daisyworld climate-feedback model.
//!
//! Daisies of different albedo cover fractions of a planet. The planet's mixed
//! albedo sets its radiative-balance temperature, each daisy population sees a
//! local temperature shifted by insulation, and growth follows a parabola
//! peaked at the ideal temperature:
//!
//! ```text
//! ap  = sum(A_i * a_i) + (1 - sum(A_i)) * ag
//! Te  = (L * (S / sigma) * (1 - ap))^(1/4)
//! T_i = (R * L * (S / sigma) * (ap - a_i) + Te^4)^(1/4)
//! b_i = 1 - 0.003265 * ((273.15 + Ti) - T_i)^2
//! dA_i/dt = A_i * ((1 - sum(A_j)) * b_i - gamma)
//! ```

use crate::domain::Domain;
use crate::parameters::{Parameter, ParameterSet};
use crate::traits::VectorField;
use serde::{Deserialize, Serialize};

/// Curvature of the growth parabola, per K^2.
const GROWTH_CURVATURE: f64 = 0.003265;
const CELSIUS_TO_KELVIN: f64 = 273.15;

/// Parameters shared by every daisy population, resolved once per evaluation.
#[derive(Debug, Clone, Copy)]
struct Climate {
    luminosity: f64,
    ground_albedo: f64,
    insulation: f64,
    flux: f64,
    ideal_temperature: f64,
    death_rate: f64,
}

impl Climate {
    /// Missing parameters resolve to NaN so a malformed set yields NaN rates
    /// instead of a panic.
    fn resolve(params: &ParameterSet) -> Self {
        let get = |key: &str| params.value(key).unwrap_or(f64::NAN);
        Self {
            luminosity: get("L"),
            ground_albedo: get("ag"),
            insulation: get("R"),
            flux: get("S") / get("sigma"),
            ideal_temperature: get("Ti"),
            death_rate: get("gamma"),
        }
    }

    fn planet_albedo(&self, areas: &[f64], albedos: &[f64]) -> f64 {
        let covered: f64 = areas.iter().sum();
        let mixed: f64 = areas.iter().zip(albedos).map(|(a, alb)| a * alb).sum();
        mixed + (1.0 - covered) * self.ground_albedo
    }

    fn growth_rate(&self, planet_albedo: f64, daisy_albedo: f64) -> f64 {
        // Te^4 goes through the root so a negative radicand stays NaN.
        let te4 = (self.luminosity * self.flux * (1.0 - planet_albedo))
            .powf(0.25)
            .powi(4);
        let local = (self.insulation * self.luminosity * self.flux * (planet_albedo - daisy_albedo)
            + te4)
            .powf(0.25);
        let offset = (CELSIUS_TO_KELVIN + self.ideal_temperature) - local;
        1.0 - GROWTH_CURVATURE * offset * offset
    }

    fn rates(&self, areas: &[f64], albedos: &[f64], out: &mut [f64]) {
        let ap = self.planet_albedo(areas, albedos);
        let bare = 1.0 - areas.iter().sum::<f64>();
        for ((rate, &area), &albedo) in out.iter_mut().zip(areas).zip(albedos) {
            let growth = self.growth_rate(ap, albedo);
            *rate = area * (bare * growth - self.death_rate);
        }
    }
}

/// A single daisy species on bare ground. State: `[A]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OneDaisy;

impl OneDaisy {
    pub fn default_parameters() -> ParameterSet {
        ParameterSet::new()
            .with(Parameter::unit("A0", "Initial Daisy Area", "A(t=0)", 0.92))
            .with(Parameter::new("L", "Luminosity", "L", 1.0))
            .with(Parameter::unit("ai", "Daisy Albedo", "a_i", 0.75))
            .with(Parameter::unit("ag", "Ground Albedo", "a_g", 0.5))
            .with(Parameter::unit("R", "Insulation Constant", "R", 0.2))
            .with(Parameter::new("S", "Solar Constant", "S", 917.0))
            .with(Parameter::new("sigma", "Stefan-Boltzmann Constant", "σ", 5.67e-8))
            .with(Parameter::new("Ti", "Ideal Growth Temperature", "T_i", 22.5))
            .with(Parameter::unit("gamma", "Death Rate", "γ", 0.3))
    }
}

impl VectorField for OneDaisy {
    fn dimension(&self) -> usize {
        1
    }

    fn evaluate(&self, state: &[f64], params: &ParameterSet, out: &mut [f64]) {
        let albedo = [params.value("ai").unwrap_or(f64::NAN)];
        Climate::resolve(params).rates(&state[..1], &albedo, &mut out[..1]);
    }
}

/// Competing black and white daisies. State: `[Ab, Aw]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TwoDaisy;

impl TwoDaisy {
    pub fn default_parameters() -> ParameterSet {
        ParameterSet::new()
            .with(Parameter::unit("Ab0", "Initial Black Daisy Area", "Ab(t=0)", 0.87))
            .with(Parameter::unit("Aw0", "Initial White Daisy Area", "Aw(t=0)", 0.11))
            .with(Parameter::new("L", "Luminosity", "L", 1.0))
            .with(Parameter::unit("ab", "Black Daisy Albedo", "a_b", 0.25))
            .with(Parameter::unit("aw", "White Daisy Albedo", "a_w", 0.75))
            .with(Parameter::unit("ag", "Ground Albedo", "a_g", 0.5))
            .with(Parameter::unit("R", "Insulation Constant", "R", 0.2))
            .with(Parameter::new("S", "Solar Constant", "S", 917.0))
            .with(Parameter::new("sigma", "Stefan-Boltzmann Constant", "σ", 5.67e-8))
            .with(Parameter::new("Ti", "Ideal Growth Temperature", "T_i", 22.5))
            .with(Parameter::unit("gamma", "Death Rate", "γ", 0.3))
            .with_sum_constraint(&["Ab0", "Aw0"])
    }
}

impl VectorField for TwoDaisy {
    fn dimension(&self) -> usize {
        2
    }

    fn evaluate(&self, state: &[f64], params: &ParameterSet, out: &mut [f64]) {
        let albedos = [
            params.value("ab").unwrap_or(f64::NAN),
            params.value("aw").unwrap_or(f64::NAN),
        ];
        Climate::resolve(params).rates(&state[..2], &albedos, &mut out[..2]);
    }
}

/// Either Daisyworld variant, chosen at run time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Daisyworld {
    One(OneDaisy),
    Two(TwoDaisy),
}

impl Daisyworld {
    pub fn one() -> Self {
        Daisyworld::One(OneDaisy)
    }

    pub fn two() -> Self {
        Daisyworld::Two(TwoDaisy)
    }

    /// The feasible region: `[0, 1]` for one species, the simplex for two.
    pub fn domain(&self) -> Domain {
        match self {
            Daisyworld::One(_) => Domain::unit_interval(),
            Daisyworld::Two(_) => Domain::simplex(2),
        }
    }

    pub fn default_parameters(&self) -> ParameterSet {
        match self {
            Daisyworld::One(_) => OneDaisy::default_parameters(),
            Daisyworld::Two(_) => TwoDaisy::default_parameters(),
        }
    }

    /// Reads the initial-area parameters into a state vector.
    pub fn initial_state(&self, params: &ParameterSet) -> Vec<f64> {
        let keys: &[&str] = match self {
            Daisyworld::One(_) => &["A0"],
            Daisyworld::Two(_) => &["Ab0", "Aw0"],
        };
        keys.iter()
            .map(|key| params.value(key).unwrap_or(f64::NAN))
            .collect()
    }
}

impl VectorField for Daisyworld {
    fn dimension(&self) -> usize {
        match self {
            Daisyworld::One(m) => m.dimension(),
            Daisyworld::Two(m) => m.dimension(),
        }
    }

    fn evaluate(&self, state: &[f64], params: &ParameterSet, out: &mut [f64]) {
        match self {
            Daisyworld::One(m) => m.evaluate(state, params, out),
            Daisyworld::Two(m) => m.evaluate(state, params, out),
        }
    }
}
