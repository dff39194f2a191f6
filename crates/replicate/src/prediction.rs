//! Prediction payloads returned by the Replicate API.

use serde::Deserialize;

/// Lifecycle status of a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    Aborted,
}

impl PredictionStatus {
    /// Whether the prediction will not change any more.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PredictionStatus::Succeeded
                | PredictionStatus::Failed
                | PredictionStatus::Canceled
                | PredictionStatus::Aborted
        )
    }
}

/// Links returned alongside a prediction.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionUrls {
    /// URL to poll for the prediction's current state.
    pub get: String,
    #[serde(default)]
    pub cancel: Option<String>,
}

/// A prediction as returned by `POST /predictions` and `GET /predictions/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    /// Model output; for image models a URL or a list of URLs.
    #[serde(default)]
    pub output: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

impl Prediction {
    /// File URLs in the output, in order.
    pub fn output_urls(&self) -> Vec<String> {
        self.output.as_ref().map(output_urls).unwrap_or_default()
    }

    /// Error text reported by the model, if any.
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Extract URLs from a model output that is either a string or an array of
/// strings.
pub fn output_urls(output: &serde_json::Value) -> Vec<String> {
    match output {
        serde_json::Value::String(url) => vec![url.clone()],
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_succeeded_prediction() {
        let prediction: Prediction = serde_json::from_value(json!({
            "id": "abc123",
            "status": "succeeded",
            "output": ["https://replicate.delivery/out-0.png"],
            "error": null,
            "urls": {
                "get": "https://api.replicate.com/v1/predictions/abc123",
                "cancel": "https://api.replicate.com/v1/predictions/abc123/cancel"
            }
        }))
        .unwrap();

        assert_eq!(prediction.status, PredictionStatus::Succeeded);
        assert!(prediction.status.is_terminal());
        assert_eq!(
            prediction.output_urls(),
            vec!["https://replicate.delivery/out-0.png"]
        );
        assert_eq!(prediction.error_message(), None);
    }

    #[test]
    fn parses_in_progress_prediction_without_output() {
        let prediction: Prediction = serde_json::from_value(json!({
            "id": "abc123",
            "status": "processing",
            "urls": { "get": "https://api.replicate.com/v1/predictions/abc123" }
        }))
        .unwrap();

        assert!(!prediction.status.is_terminal());
        assert!(prediction.output_urls().is_empty());
    }

    #[test]
    fn single_string_output() {
        assert_eq!(output_urls(&json!("https://x/y.png")), vec!["https://x/y.png"]);
        assert!(output_urls(&json!({"url": "nope"})).is_empty());
    }

    #[test]
    fn failed_prediction_error_text() {
        let prediction: Prediction = serde_json::from_value(json!({
            "id": "abc123",
            "status": "failed",
            "error": "NSFW content detected"
        }))
        .unwrap();
        assert_eq!(
            prediction.error_message().as_deref(),
            Some("NSFW content detected")
        );
    }
}
