//! The proof submission form.

use proofsheet_core::params::{GUIDANCE_SCALE, NUM_INFERENCE_STEPS, PARAMETERS};
use proofsheet_core::proof::{MAX_GRID_SIZE, MIN_GRID_SIZE};

/// `<option>` list for an axis select with `selected` preselected.
fn parameter_options(selected: &str) -> String {
    PARAMETERS
        .iter()
        .map(|p| {
            let marker = if p.name == selected { " selected" } else { "" };
            format!(r#"<option value="{0}"{marker}>{0}</option>"#, p.name)
        })
        .collect()
}

fn number_input(name: &str, placeholder: &str, value: &str) -> String {
    format!(
        r#"<input name="{name}" type="number" step="any" placeholder="{placeholder}" value="{value}" required>"#
    )
}

/// Form posting to `/create_proof`; the response is prepended to
/// `#proofs-container`.
pub fn proof_form() -> String {
    format!(
        r##"<form hx-post="/create_proof" hx-target="#proofs-container" hx-swap="afterbegin" hx-trigger="submit">
<fieldset role="group">
<input name="prompt" placeholder="Enter a prompt" value="A beautiful landscape" required>
<input name="grid_size" type="number" min="{MIN_GRID_SIZE}" max="{MAX_GRID_SIZE}" value="3" required>
<input name="seed" type="number" value="42" required>
</fieldset>
<fieldset role="group">
<select name="x_param" required>{x_options}</select>
{x_start}
{x_end}
</fieldset>
<fieldset role="group">
<select name="y_param" required>{y_options}</select>
{y_start}
{y_end}
</fieldset>
<button>Generate</button>
</form>"##,
        x_options = parameter_options(NUM_INFERENCE_STEPS),
        x_start = number_input("x_range_start", "X Range Start", "1"),
        x_end = number_input("x_range_end", "X Range End", "50"),
        y_options = parameter_options(GUIDANCE_SCALE),
        y_start = number_input("y_range_start", "Y Range Start", "0.1"),
        y_end = number_input("y_range_end", "Y Range End", "10.0"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_default_to_different_parameters() {
        let html = proof_form();
        assert!(html.contains(r#"<option value="num_inference_steps" selected>"#));
        assert!(html.contains(r#"<option value="guidance_scale" selected>"#));
        assert_eq!(html.matches("<option").count(), PARAMETERS.len() * 2);
    }
}
