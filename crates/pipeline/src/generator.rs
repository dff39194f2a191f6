//! The image generation seam.
//!
//! The dispatcher only knows about [`ImageGenerator`]; production wires in
//! [`ReplicateClient`], tests use in-process fakes.

use async_trait::async_trait;
use proofsheet_core::params::ModelParams;
use proofsheet_replicate::api::ReplicateClient;

use crate::error::GenerationError;

/// Output format requested from the hosted model.
const OUTPUT_FORMAT: &str = "png";

/// Produces the raw bytes of one image.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &ModelParams)
        -> Result<Vec<u8>, GenerationError>;
}

/// Build the model input: the prompt plus every typed parameter.
pub fn model_input(prompt: &str, params: &ModelParams) -> serde_json::Value {
    let mut input = serde_json::Map::new();
    input.insert("prompt".to_string(), serde_json::Value::from(prompt));
    input.insert(
        "output_format".to_string(),
        serde_json::Value::from(OUTPUT_FORMAT),
    );
    for (name, value) in params {
        input.insert(name.clone(), serde_json::json!(value));
    }
    serde_json::Value::Object(input)
}

#[async_trait]
impl ImageGenerator for ReplicateClient {
    async fn generate(
        &self,
        prompt: &str,
        params: &ModelParams,
    ) -> Result<Vec<u8>, GenerationError> {
        let input = model_input(prompt, params);
        let url = self.run(&input).await?;
        tracing::debug!(%url, "Downloading generated image");
        Ok(self.download(&url).await?)
    }
}
