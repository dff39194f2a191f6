//! REST client for the Replicate predictions API.
//!
//! Wraps prediction creation, polling, and output download using
//! [`reqwest`].

use std::time::Duration;

use crate::prediction::{Prediction, PredictionStatus};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.replicate.com/v1";
/// Default model, as `owner/name`.
pub const DEFAULT_MODEL: &str = "black-forest-labs/flux-dev";
/// Delay between prediction status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Polls before giving up on a prediction.
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 300;

/// Connection settings for [`ReplicateClient`].
#[derive(Debug, Clone)]
pub struct ReplicateConfig {
    /// Base URL, e.g. `https://api.replicate.com/v1`.
    pub api_url: String,
    pub api_token: String,
    /// Model identifier as `owner/name`.
    pub model: String,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl ReplicateConfig {
    /// Config with default URL, model and polling for the given token.
    pub fn new(api_token: String) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token,
            model: DEFAULT_MODEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
        }
    }
}

/// Errors from the Replicate API layer.
#[derive(Debug, thiserror::Error)]
pub enum ReplicateError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Replicate returned a non-2xx status code.
    #[error("Replicate API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The prediction settled without succeeding.
    #[error("Prediction {id} ended with status {status:?}: {message}")]
    PredictionFailed {
        id: String,
        status: PredictionStatus,
        message: String,
    },

    /// The prediction was still running after the configured number of polls.
    #[error("Prediction {id} did not finish after {attempts} polls")]
    Timeout { id: String, attempts: u32 },

    /// The prediction succeeded but produced no file URLs.
    #[error("Prediction {id} returned no output")]
    EmptyOutput { id: String },
}

/// HTTP client for one Replicate model.
pub struct ReplicateClient {
    client: reqwest::Client,
    config: ReplicateConfig,
}

impl ReplicateClient {
    pub fn new(config: ReplicateConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Start a prediction for the configured model.
    ///
    /// Sends `POST /models/{model}/predictions` with `Prefer: wait`, so fast
    /// models may already be settled in the response.
    pub async fn create_prediction(
        &self,
        input: &serde_json::Value,
    ) -> Result<Prediction, ReplicateError> {
        let body = serde_json::json!({ "input": input });

        let response = self
            .client
            .post(format!(
                "{}/models/{}/predictions",
                self.config.api_url, self.config.model
            ))
            .bearer_auth(&self.config.api_token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of a prediction from its `urls.get` link.
    pub async fn get_prediction(&self, url: &str) -> Result<Prediction, ReplicateError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Poll until the prediction settles. Fails unless it succeeded.
    pub async fn wait_for_prediction(
        &self,
        mut prediction: Prediction,
    ) -> Result<Prediction, ReplicateError> {
        let mut attempts = 0;
        while !prediction.status.is_terminal() {
            if attempts >= self.config.max_poll_attempts {
                return Err(ReplicateError::Timeout {
                    id: prediction.id,
                    attempts,
                });
            }
            let Some(url) = prediction.urls.as_ref().map(|u| u.get.clone()) else {
                return Err(ReplicateError::PredictionFailed {
                    id: prediction.id,
                    status: prediction.status,
                    message: "prediction has no status URL".to_string(),
                });
            };

            tokio::time::sleep(self.config.poll_interval).await;
            attempts += 1;
            prediction = self.get_prediction(&url).await?;
            tracing::debug!(
                prediction_id = %prediction.id,
                status = ?prediction.status,
                attempts,
                "Polled prediction",
            );
        }

        if prediction.status != PredictionStatus::Succeeded {
            let message = prediction
                .error_message()
                .unwrap_or_else(|| "no error message".to_string());
            return Err(ReplicateError::PredictionFailed {
                id: prediction.id,
                status: prediction.status,
                message,
            });
        }
        Ok(prediction)
    }

    /// Run the model to completion and return the URL of its first output
    /// file.
    pub async fn run(&self, input: &serde_json::Value) -> Result<String, ReplicateError> {
        let prediction = self.create_prediction(input).await?;
        tracing::debug!(
            prediction_id = %prediction.id,
            status = ?prediction.status,
            "Prediction created",
        );

        let prediction = self.wait_for_prediction(prediction).await?;
        first_output(prediction)
    }

    /// Download an output file.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, ReplicateError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ReplicateError::ApiError`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ReplicateError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ReplicateError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ReplicateError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

/// The first output file URL of a settled prediction.
fn first_output(prediction: Prediction) -> Result<String, ReplicateError> {
    prediction
        .output_urls()
        .into_iter()
        .next()
        .ok_or(ReplicateError::EmptyOutput { id: prediction.id })
}
