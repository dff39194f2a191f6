//! Generation parameter registry, validation, and type correction.
//!
//! Only the parameters listed in [`PARAMETERS`] may be used as grid axes
//! or forwarded to the image model. Integer parameters are rounded half to
//! even and must be at least 1; real parameters are passed through after
//! their bounds (if any) are checked.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub const NUM_INFERENCE_STEPS: &str = "num_inference_steps";
pub const SEED: &str = "seed";
pub const OUTPUT_QUALITY: &str = "output_quality";
pub const GUIDANCE_SCALE: &str = "guidance_scale";
pub const PROMPT_STRENGTH: &str = "prompt_strength";

/// Default denoising steps when no axis sets them.
pub const DEFAULT_NUM_INFERENCE_STEPS: i64 = 50;
/// Default classifier-free guidance scale.
pub const DEFAULT_GUIDANCE_SCALE: f64 = 7.5;
/// Default prompt strength.
pub const DEFAULT_PROMPT_STRENGTH: f64 = 0.8;

/// How computed and submitted values for a parameter are coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Rounded to the nearest whole number, must be `>= 1`.
    Integer,
    /// Floating point, optionally bounded.
    Real,
}

/// A recognised model parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterSpec {
    pub name: &'static str,
    pub kind: ParameterKind,
    /// Inclusive lower bound, if any.
    pub min: Option<f64>,
    /// Inclusive upper bound, if any.
    pub max: Option<f64>,
}

/// The fixed set of parameters that can be varied along an axis.
pub const PARAMETERS: &[ParameterSpec] = &[
    ParameterSpec {
        name: NUM_INFERENCE_STEPS,
        kind: ParameterKind::Integer,
        min: Some(1.0),
        max: None,
    },
    ParameterSpec {
        name: SEED,
        kind: ParameterKind::Integer,
        min: Some(1.0),
        max: None,
    },
    ParameterSpec {
        name: OUTPUT_QUALITY,
        kind: ParameterKind::Integer,
        min: Some(1.0),
        max: None,
    },
    ParameterSpec {
        name: GUIDANCE_SCALE,
        kind: ParameterKind::Real,
        min: Some(0.0),
        max: Some(20.0),
    },
    ParameterSpec {
        name: PROMPT_STRENGTH,
        kind: ParameterKind::Real,
        min: None,
        max: None,
    },
];

/// Look up a parameter by name.
pub fn lookup_parameter(name: &str) -> Result<&'static ParameterSpec, CoreError> {
    PARAMETERS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| CoreError::Validation(format!("Invalid parameter: {name}")))
}

/// Whether `name` is in the registry.
pub fn is_known_parameter(name: &str) -> bool {
    PARAMETERS.iter().any(|p| p.name == name)
}

// ---------------------------------------------------------------------------
// Typed values
// ---------------------------------------------------------------------------

/// A coerced parameter value, serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Real(f64),
}

impl ParamValue {
    pub fn as_f64(self) -> f64 {
        match self {
            ParamValue::Integer(v) => v as f64,
            ParamValue::Real(v) => v,
        }
    }
}

/// Typed model input, ordered by name so request bodies are deterministic.
pub type ModelParams = BTreeMap<String, ParamValue>;

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Read a raw value as a finite number. Accepts JSON numbers and numeric
/// strings.
fn numeric(name: &str, raw: &Value) -> Result<f64, CoreError> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(CoreError::Validation(format!(
            "{name} must be a number, got {raw}"
        ))),
    }
}

fn check_bounds(spec: &ParameterSpec, value: f64) -> Result<(), CoreError> {
    let in_range =
        spec.min.map_or(true, |min| value >= min) && spec.max.map_or(true, |max| value <= max);
    if in_range {
        return Ok(());
    }
    let message = match (spec.min, spec.max) {
        (Some(min), Some(max)) => format!("{} must be between {min} and {max}.", spec.name),
        (Some(min), None) => format!("{} must be greater than or equal to {min}.", spec.name),
        (None, Some(max)) => format!("{} must be less than or equal to {max}.", spec.name),
        (None, None) => unreachable!("unbounded parameters are always in range"),
    };
    Err(CoreError::Validation(message))
}

/// Coerce a raw value to the parameter's kind and check its bounds.
pub fn coerce_value(spec: &ParameterSpec, raw: &Value) -> Result<ParamValue, CoreError> {
    let number = numeric(spec.name, raw)?;
    match spec.kind {
        ParameterKind::Integer => {
            let rounded = number.round_ties_even();
            check_bounds(spec, rounded)?;
            Ok(ParamValue::Integer(rounded as i64))
        }
        ParameterKind::Real => {
            check_bounds(spec, number)?;
            Ok(ParamValue::Real(number))
        }
    }
}

/// Reject unknown names and out-of-bounds or non-numeric values.
pub fn validate_params(params: &Map<String, Value>) -> Result<(), CoreError> {
    for (name, raw) in params {
        let spec = lookup_parameter(name)?;
        coerce_value(spec, raw)?;
    }
    Ok(())
}

/// Convert raw values to their typed form.
pub fn correct_param_types(params: &Map<String, Value>) -> Result<ModelParams, CoreError> {
    params
        .iter()
        .map(|(name, raw)| {
            let spec = lookup_parameter(name)?;
            Ok((name.clone(), coerce_value(spec, raw)?))
        })
        .collect()
}

/// Fill in model defaults for anything the axes did not set. `seed` falls
/// back to the proof's own seed.
pub fn with_defaults(mut params: ModelParams, seed: i64) -> ModelParams {
    params
        .entry(NUM_INFERENCE_STEPS.to_string())
        .or_insert(ParamValue::Integer(DEFAULT_NUM_INFERENCE_STEPS));
    params
        .entry(GUIDANCE_SCALE.to_string())
        .or_insert(ParamValue::Real(DEFAULT_GUIDANCE_SCALE));
    params
        .entry(PROMPT_STRENGTH.to_string())
        .or_insert(ParamValue::Real(DEFAULT_PROMPT_STRENGTH));
    params
        .entry(SEED.to_string())
        .or_insert(ParamValue::Integer(seed));
    params
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
