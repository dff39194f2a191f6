//! Axis range calculation.
//!
//! An axis is sampled at `count` evenly spaced points between `start` and
//! `end` inclusive. Integer parameters are rounded half to even and then
//! raised to at least 1, so a range starting below 1 is silently clamped at
//! the low end rather than rejected.

use crate::error::CoreError;
use crate::params::{lookup_parameter, ParameterKind, ParameterSpec};

/// One axis of a proof grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub parameter: &'static ParameterSpec,
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl AxisRange {
    /// Build an axis for a registered parameter. `count` must be at least 1.
    pub fn new(name: &str, start: f64, end: f64, count: usize) -> Result<Self, CoreError> {
        let parameter = lookup_parameter(name)?;
        if count == 0 {
            return Err(CoreError::Validation(
                "Range count must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            parameter,
            start,
            end,
            count,
        })
    }

    /// The sampled values for this axis.
    pub fn values(&self) -> Result<Vec<f64>, CoreError> {
        calculate_range(self.start, self.end, self.count, self.parameter)
    }
}

/// Produce `count` evenly spaced values from `start` to `end`.
///
/// - `count == 1` yields `[start]`.
/// - `start == end` yields a constant sequence.
/// - The last value is exactly `end`.
pub fn calculate_range(
    start: f64,
    end: f64,
    count: usize,
    parameter: &ParameterSpec,
) -> Result<Vec<f64>, CoreError> {
    if count == 0 {
        return Err(CoreError::Validation(
            "Range count must be at least 1".to_string(),
        ));
    }
    if !start.is_finite() || !end.is_finite() || !(end - start).is_finite() {
        return Err(CoreError::Validation(format!(
            "Range bounds for {} must be finite numbers",
            parameter.name
        )));
    }

    let values: Vec<f64> = if count == 1 {
        vec![start]
    } else {
        let step = (end - start) / (count - 1) as f64;
        (0..count)
            .map(|i| {
                if i == count - 1 {
                    end
                } else {
                    start + i as f64 * step
                }
            })
            .collect()
    };

    Ok(match parameter.kind {
        ParameterKind::Integer => values.into_iter().map(round_to_positive_integer).collect(),
        ParameterKind::Real => values,
    })
}

/// Round half to even, then clamp to a minimum of 1.
pub fn round_to_positive_integer(value: f64) -> f64 {
    value.round_ties_even().max(1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{GUIDANCE_SCALE, NUM_INFERENCE_STEPS, SEED};

    fn real() -> &'static ParameterSpec {
        lookup_parameter(GUIDANCE_SCALE).unwrap()
    }

    fn integer() -> &'static ParameterSpec {
        lookup_parameter(NUM_INFERENCE_STEPS).unwrap()
    }

    #[test]
    fn single_value_is_start() {
        assert_eq!(calculate_range(3.0, 9.0, 1, real()).unwrap(), vec![3.0]);
    }

    #[test]
    fn zero_count_is_rejected() {
        assert!(calculate_range(1.0, 2.0, 0, real()).is_err());
        assert!(AxisRange::new(SEED, 1.0, 2.0, 0).is_err());
    }

    #[test]
    fn constant_range() {
        assert_eq!(
            calculate_range(5.0, 5.0, 4, real()).unwrap(),
            vec![5.0, 5.0, 5.0, 5.0]
        );
    }

    #[test]
    fn integer_midpoint_rounds_half_to_even() {
        assert_eq!(
            calculate_range(1.0, 50.0, 3, integer()).unwrap(),
            vec![1.0, 26.0, 50.0]
        );
    }

    #[test]
    fn integer_values_clamped_to_one() {
        let values = calculate_range(-10.0, 3.0, 6, integer()).unwrap();
        assert_eq!(values.len(), 6);
        for v in &values {
            assert!(*v >= 1.0, "{v} should be clamped to >= 1");
            assert_eq!(v.fract(), 0.0, "{v} should be whole");
        }
        assert_eq!(values[0], 1.0);
        assert_eq!(values[5], 3.0);
    }

    #[test]
    fn real_range_endpoints_and_monotonic() {
        for count in 2..=10 {
            let values = calculate_range(0.1, 10.0, count, real()).unwrap();
            assert_eq!(values.len(), count);
            assert_eq!(values[0], 0.1);
            assert!((values[count - 1] - 10.0).abs() < 1e-9);
            assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn real_range_descending() {
        let values = calculate_range(10.0, 0.0, 5, real()).unwrap();
        assert_eq!(values, vec![10.0, 7.5, 5.0, 2.5, 0.0]);
    }

    #[test]
    fn real_values_are_not_clamped() {
        let values = calculate_range(-5.0, 30.0, 2, real()).unwrap();
        assert_eq!(values, vec![-5.0, 30.0]);
    }

    #[test]
    fn non_finite_bounds_rejected() {
        assert!(calculate_range(f64::NAN, 1.0, 3, real()).is_err());
        assert!(calculate_range(f64::NEG_INFINITY, 1.0, 3, real()).is_err());
        assert!(calculate_range(-1e308, 1e308, 3, real()).is_err());
    }

    #[test]
    fn axis_values_use_parameter_kind() {
        let axis = AxisRange::new(SEED, 0.0, 4.0, 3).unwrap();
        assert_eq!(axis.values().unwrap(), vec![1.0, 2.0, 4.0]);
    }
}
