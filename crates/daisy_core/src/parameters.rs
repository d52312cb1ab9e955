//! Named model parameters with unit-interval constraints.
//!
//! A [`ParameterSet`] is an ordered collection of [`Parameter`]s plus optional
//! sum constraints (e.g. two initial area fractions sharing one surface).
//! All mutating operations validate first and commit only when the whole
//! update is admissible, so a rejected update leaves the set untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure raised when a parameter update violates a declared constraint.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("unknown parameter `{key}`")]
    UnknownParameter { key: String },

    #[error("parameter `{key}` must lie in [0, 1], got {value}")]
    OutOfUnitRange { key: String, value: f64 },

    #[error("parameters {} must sum to at most 1, got {sum}", .keys.join(" + "))]
    SumExceedsUnity { keys: Vec<String>, sum: f64 },

    #[error("expected {expected} parameter values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Lookup key used by vector fields (`"L"`, `"gamma"`, ...).
    pub key: String,
    /// Human-readable label.
    pub name: String,
    /// Short symbol for compact displays.
    pub short: String,
    pub value: f64,
    pub default: f64,
    /// When set, `value` must stay within `[0, 1]`.
    pub unit_range: bool,
}

impl Parameter {
    pub fn new(key: &str, name: &str, short: &str, value: f64) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            short: short.to_string(),
            value,
            default: value,
            unit_range: false,
        }
    }

    /// A parameter constrained to the closed unit interval.
    pub fn unit(key: &str, name: &str, short: &str, value: f64) -> Self {
        Self {
            unit_range: true,
            ..Self::new(key, name, short, value)
        }
    }

    fn check(&self, value: f64) -> Result<(), ParameterError> {
        if self.unit_range && !(0.0..=1.0).contains(&value) {
            return Err(ParameterError::OutOfUnitRange {
                key: self.key.clone(),
                value,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
    /// Groups of keys whose values must sum to at most one.
    sum_constraints: Vec<Vec<String>>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter, replacing any existing one with the same key.
    pub fn with(mut self, parameter: Parameter) -> Self {
        match self.position(&parameter.key) {
            Some(idx) => self.parameters[idx] = parameter,
            None => self.parameters.push(parameter),
        }
        self
    }

    /// Declares that the listed parameters share a unit budget.
    pub fn with_sum_constraint(mut self, keys: &[&str]) -> Self {
        self.sum_constraints
            .push(keys.iter().map(|k| k.to_string()).collect());
        self
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn get(&self, key: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.key == key)
    }

    pub fn value(&self, key: &str) -> Option<f64> {
        self.get(key).map(|p| p.value)
    }

    /// Current values in declaration order.
    pub fn values(&self) -> Vec<f64> {
        self.parameters.iter().map(|p| p.value).collect()
    }

    pub fn set_value(&mut self, key: &str, value: f64) -> Result<(), ParameterError> {
        self.update(&[(key, value)])
    }

    /// Sets every value positionally. Nothing is applied unless all values pass.
    pub fn set_values(&mut self, values: &[f64]) -> Result<(), ParameterError> {
        if values.len() != self.parameters.len() {
            return Err(ParameterError::LengthMismatch {
                expected: self.parameters.len(),
                actual: values.len(),
            });
        }
        let mut staged = self.clone();
        for (param, &value) in staged.parameters.iter_mut().zip(values) {
            param.check(value)?;
            param.value = value;
        }
        staged.check_sums()?;
        *self = staged;
        Ok(())
    }

    /// Sets a batch of named values. Nothing is applied unless all values pass.
    pub fn update(&mut self, updates: &[(&str, f64)]) -> Result<(), ParameterError> {
        let mut staged = self.clone();
        for &(key, value) in updates {
            let idx = staged
                .position(key)
                .ok_or_else(|| ParameterError::UnknownParameter {
                    key: key.to_string(),
                })?;
            let param = &mut staged.parameters[idx];
            param.check(value)?;
            param.value = value;
        }
        staged.check_sums()?;
        *self = staged;
        Ok(())
    }

    /// Returns a copy with one value overridden, leaving `self` unchanged.
    pub fn with_value(&self, key: &str, value: f64) -> Result<Self, ParameterError> {
        let mut copy = self.clone();
        copy.set_value(key, value)?;
        Ok(copy)
    }

    pub fn reset(&mut self) {
        for param in &mut self.parameters {
            param.value = param.default;
        }
    }

    /// Checks every declared constraint against the current values.
    pub fn validate(&self) -> Result<(), ParameterError> {
        for param in &self.parameters {
            param.check(param.value)?;
        }
        self.check_sums()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.key == key)
    }

    fn check_sums(&self) -> Result<(), ParameterError> {
        for keys in &self.sum_constraints {
            let mut sum = 0.0;
            for key in keys {
                sum += self
                    .value(key)
                    .ok_or_else(|| ParameterError::UnknownParameter { key: key.clone() })?;
            }
            if !(0.0..=1.0).contains(&sum) {
                return Err(ParameterError::SumExceedsUnity {
                    keys: keys.clone(),
                    sum,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn areas() -> ParameterSet {
        ParameterSet::new()
            .with(Parameter::unit("Ab0", "Initial Black Daisy Area", "Ab0", 0.4))
            .with(Parameter::unit("Aw0", "Initial White Daisy Area", "Aw0", 0.3))
            .with(Parameter::new("L", "Luminosity", "L", 1.0))
            .with_sum_constraint(&["Ab0", "Aw0"])
    }

    #[test]
    fn set_value_rejects_out_of_range_and_keeps_state() {
        let mut params = areas();
        let err = params.set_value("Ab0", 1.5).expect_err("expected range error");
        assert_eq!(
            err,
            ParameterError::OutOfUnitRange {
                key: "Ab0".to_string(),
                value: 1.5
            }
        );
        assert_eq!(params.value("Ab0"), Some(0.4));
        assert!(err.to_string().contains("Ab0"));
    }

    #[test]
    fn unconstrained_parameter_accepts_any_value() {
        let mut params = areas();
        params.set_value("L", 12.0).expect("luminosity is unconstrained");
        assert_eq!(params.value("L"), Some(12.0));
    }

    #[test]
    fn unit_range_boundaries_are_inclusive() {
        let mut params = areas();
        params.set_value("Ab0", 0.0).expect("zero is allowed");
        params.set_value("Aw0", 1.0).expect("one is allowed");
    }

    #[test]
    fn nan_is_rejected_for_unit_parameters() {
        let mut params = areas();
        assert!(params.set_value("Aw0", f64::NAN).is_err());
    }

    #[test]
    fn bulk_set_is_all_or_nothing() {
        let mut params = areas();
        let err = params
            .set_values(&[0.2, -0.1, 3.0])
            .expect_err("second value is out of range");
        assert!(matches!(err, ParameterError::OutOfUnitRange { ref key, .. } if key == "Aw0"));
        assert_eq!(params.values(), vec![0.4, 0.3, 1.0]);

        params.set_values(&[0.2, 0.1, 3.0]).expect("valid batch");
        assert_eq!(params.values(), vec![0.2, 0.1, 3.0]);
    }

    #[test]
    fn sum_constraint_rejects_batch_without_partial_commit() {
        let mut params = areas();
        let err = params
            .update(&[("L", 2.0), ("Ab0", 0.8)])
            .expect_err("0.8 + 0.3 exceeds one");
        match err {
            ParameterError::SumExceedsUnity { keys, sum } => {
                assert_eq!(keys, vec!["Ab0".to_string(), "Aw0".to_string()]);
                assert!((sum - 1.1).abs() < 1e-12);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(params.value("L"), Some(1.0));
        assert_eq!(params.value("Ab0"), Some(0.4));
    }

    #[test]
    fn update_reports_unknown_keys() {
        let mut params = areas();
        let err = params.update(&[("nope", 1.0)]).expect_err("unknown key");
        assert_eq!(
            err,
            ParameterError::UnknownParameter {
                key: "nope".to_string()
            }
        );
    }

    #[test]
    fn set_values_checks_length() {
        let mut params = areas();
        let err = params.set_values(&[0.1]).expect_err("too few values");
        assert_eq!(
            err,
            ParameterError::LengthMismatch {
                expected: 3,
                actual: 1
            }
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut params = areas();
        params.set_values(&[0.1, 0.1, 5.0]).expect("valid batch");
        params.reset();
        assert_eq!(params.values(), vec![0.4, 0.3, 1.0]);
    }

    #[test]
    fn with_value_leaves_original_untouched() {
        let params = areas();
        let copy = params.with_value("L", 1.3).expect("valid override");
        assert_eq!(copy.value("L"), Some(1.3));
        assert_eq!(params.value("L"), Some(1.0));
    }

    #[test]
    fn with_replaces_existing_key_in_place() {
        let params = areas().with(Parameter::new("L", "Luminosity", "L", 0.7));
        assert_eq!(params.len(), 3);
        assert_eq!(params.values(), vec![0.4, 0.3, 0.7]);
    }

    #[test]
    fn validate_flags_invalid_construction() {
        let params = ParameterSet::new().with(Parameter::unit("x", "X", "x", 2.0));
        assert!(params.validate().is_err());
        assert!(areas().validate().is_ok());
    }
}
