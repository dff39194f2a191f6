//! Proof submission validation and storage layout.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::params::is_known_parameter;
use crate::types::ProofId;

pub const MIN_GRID_SIZE: i64 = 1;
pub const MAX_GRID_SIZE: i64 = 10;

/// Subdirectory of the data directory holding one folder per proof.
pub const PROOFS_DIR: &str = "proofs";

/// The fields a user submits to create a proof sheet.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProofSubmission {
    pub prompt: String,
    pub grid_size: i64,
    pub seed: i64,
    pub x_param: String,
    pub x_range_start: f64,
    pub x_range_end: f64,
    pub y_param: String,
    pub y_range_start: f64,
    pub y_range_end: f64,
}

impl ProofSubmission {
    /// Every problem with the submission, in display order. Empty when valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !is_known_parameter(&self.x_param) || !is_known_parameter(&self.y_param) {
            errors.push("Invalid parameters selected for axes.".to_string());
        } else if self.x_param == self.y_param {
            errors.push("X and Y axes must use different parameters.".to_string());
        }
        if self.prompt.trim().is_empty() {
            errors.push("Prompt must not be empty.".to_string());
        }
        if let Some(message) = range_error("X", self.x_range_start, self.x_range_end) {
            errors.push(message);
        }
        if let Some(message) = range_error("Y", self.y_range_start, self.y_range_end) {
            errors.push(message);
        }
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&self.grid_size) {
            errors.push(format!(
                "Grid Size must be between {MIN_GRID_SIZE} and {MAX_GRID_SIZE}."
            ));
        }
        errors
    }
}

/// Bounds must be finite and ordered, with a finite width between them.
fn range_error(axis: &str, start: f64, end: f64) -> Option<String> {
    if !start.is_finite() || !end.is_finite() || !(end - start).is_finite() {
        Some(format!(
            "{axis} Range Start and {axis} Range End must be finite numbers."
        ))
    } else if start >= end {
        Some(format!(
            "{axis} Range Start must be less than {axis} Range End."
        ))
    } else {
        None
    }
}

/// `{data_dir}/proofs/{id}`
pub fn proof_folder(data_dir: &Path, id: ProofId) -> PathBuf {
    data_dir.join(PROOFS_DIR).join(id.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProofSubmission {
        ProofSubmission {
            prompt: "A beautiful landscape".to_string(),
            grid_size: 3,
            seed: 42,
            x_param: "num_inference_steps".to_string(),
            x_range_start: 1.0,
            x_range_end: 50.0,
            y_param: "guidance_scale".to_string(),
            y_range_start: 0.1,
            y_range_end: 10.0,
        }
    }

    #[test]
    fn valid_submission_passes() {
        assert!(valid().validation_errors().is_empty());
    }

    #[test]
    fn unknown_axis_rejected() {
        let mut s = valid();
        s.y_param = "cfg".to_string();
        assert_eq!(
            s.validation_errors(),
            vec!["Invalid parameters selected for axes."]
        );
    }

    #[test]
    fn identical_axes_rejected() {
        let mut s = valid();
        s.y_param = s.x_param.clone();
        assert_eq!(s.validation_errors().len(), 1);
    }

    #[test]
    fn collects_all_errors() {
        let mut s = valid();
        s.x_range_start = 60.0;
        s.y_range_end = s.y_range_start;
        s.grid_size = 11;
        let errors = s.validation_errors();
        assert_eq!(
            errors,
            vec![
                "X Range Start must be less than X Range End.",
                "Y Range Start must be less than Y Range End.",
                "Grid Size must be between 1 and 10.",
            ]
        );
    }

    #[test]
    fn non_finite_ranges_rejected() {
        let mut s = valid();
        s.x_range_start = f64::NEG_INFINITY;
        s.y_range_end = f64::NAN;
        assert_eq!(
            s.validation_errors(),
            vec![
                "X Range Start and X Range End must be finite numbers.",
                "Y Range Start and Y Range End must be finite numbers.",
            ]
        );
    }

    #[test]
    fn range_width_must_be_finite() {
        let mut s = valid();
        s.y_range_start = -1e308;
        s.y_range_end = 1e308;
        assert_eq!(
            s.validation_errors(),
            vec!["Y Range Start and Y Range End must be finite numbers."]
        );
    }

    #[test]
    fn grid_size_zero_rejected() {
        let mut s = valid();
        s.grid_size = 0;
        assert_eq!(s.validation_errors().len(), 1);
    }

    #[test]
    fn folder_layout() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            proof_folder(Path::new("data"), id),
            PathBuf::from("data/proofs/00000000-0000-0000-0000-000000000000")
        );
    }
}
