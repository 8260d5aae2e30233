//! rembg HTTP backend
//!
//! Sends the encoded image to a running rembg server (`rembg s`) and returns
//! the response body untouched. The server owns model loading and inference.

use crate::{
    config::RemoverConfig,
    error::{RemovalError, Result},
    remover::{BackgroundRemover, TransformError},
};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tokio::runtime::Runtime;

const BACKEND_NAME: &str = "rembg";

/// Background remover backed by a rembg HTTP server
///
/// Requests are driven on a private current-thread runtime, so the remover
/// must not be called from inside another tokio runtime.
pub struct RembgRemover {
    client: Client,
    runtime: Runtime,
    endpoint: String,
    model: String,
}

impl RembgRemover {
    /// Create a remover for `endpoint` using the rembg model `model`
    ///
    /// # Errors
    /// - Endpoint is not an http(s) URL or model name is empty
    /// - Async runtime or HTTP client cannot be created
    pub fn new<E: Into<String>, M: Into<String>>(endpoint: E, model: M) -> Result<Self> {
        let endpoint = endpoint.into();
        let model = model.into();

        RemoverConfig::Rembg {
            endpoint: endpoint.clone(),
            model: model.clone(),
        }
        .validate()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RemovalError::internal(format!("Failed to start async runtime: {e}")))?;

        let client = {
            let _enter = runtime.enter();
            Client::builder()
                .user_agent(concat!("bgremove-runner/", env!("CARGO_PKG_VERSION")))
                .build()
                .map_err(|e| RemovalError::internal(format!("Failed to create HTTP client: {e}")))?
        };

        Ok(Self {
            client,
            runtime,
            endpoint,
            model,
        })
    }

    /// Endpoint requests are posted to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// rembg model requested from the server
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_image(&self, image: &[u8]) -> std::result::Result<Vec<u8>, TransformError> {
        let part = Part::bytes(image.to_vec()).file_name("image");
        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone());

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                TransformError::unavailable(
                    BACKEND_NAME,
                    format!("request to {} failed: {e}", self.endpoint),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransformError::failed(
                BACKEND_NAME,
                format!("HTTP {status}: {}", body.trim()),
            ));
        }

        let body = response.bytes().await.map_err(|e| {
            TransformError::failed(BACKEND_NAME, format!("failed to read response body: {e}"))
        })?;

        Ok(body.to_vec())
    }
}

impl BackgroundRemover for RembgRemover {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn remove_background(&self, image: &[u8]) -> std::result::Result<Vec<u8>, TransformError> {
        tracing::debug!(endpoint = %self.endpoint, model = %self.model, bytes = image.len(), "Posting image to rembg");
        self.runtime.block_on(self.post_image(image))
    }
}
