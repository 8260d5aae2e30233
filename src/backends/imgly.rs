//! In-process backend using the imgly-bgremove crate
//!
//! Model files are downloaded into the imgly cache on first use; later runs
//! reuse the cached copy.

use crate::{
    error::{RemovalError, Result},
    remover::{BackgroundRemover, TransformError},
};
use imgly_bgremove::{
    remove_background_from_bytes, ModelCache, ModelDownloader, ModelSource, ModelSpec,
    OutputFormat, RemovalConfig,
};
use tokio::runtime::Runtime;

const BACKEND_NAME: &str = "imgly";

/// Background remover running imgly's ISNet/BiRefNet models locally
pub struct ImglyRemover {
    runtime: Runtime,
    model_url: String,
    config: RemovalConfig,
}

impl ImglyRemover {
    /// Create a remover for the model repository at `model_url`
    ///
    /// # Errors
    /// - Async runtime cannot be created
    /// - imgly rejects the derived configuration
    pub fn new<S: Into<String>>(model_url: S) -> Result<Self> {
        let model_url = model_url.into();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| RemovalError::internal(format!("Failed to start async runtime: {e}")))?;

        let model_spec = ModelSpec {
            source: ModelSource::Downloaded(ModelCache::url_to_model_id(&model_url)),
            variant: None,
        };
        let config = RemovalConfig::builder()
            .model_spec(model_spec)
            .output_format(OutputFormat::Png)
            .build()
            .map_err(|e| RemovalError::invalid_config(e.to_string()))?;

        Ok(Self {
            runtime,
            model_url,
            config,
        })
    }

    async fn ensure_model(&self) -> std::result::Result<(), TransformError> {
        let downloader = ModelDownloader::new()
            .map_err(|e| TransformError::unavailable(BACKEND_NAME, e.to_string()))?;

        // Returns immediately when the model is already cached
        downloader
            .download_model(&self.model_url, false)
            .await
            .map_err(|e| {
                TransformError::unavailable(
                    BACKEND_NAME,
                    format!("failed to fetch model {}: {e}", self.model_url),
                )
            })?;
        Ok(())
    }

    async fn remove(&self, image: &[u8]) -> std::result::Result<Vec<u8>, TransformError> {
        self.ensure_model().await?;

        let result = remove_background_from_bytes(image, &self.config)
            .await
            .map_err(|e| TransformError::failed(BACKEND_NAME, e.to_string()))?;

        result
            .to_bytes(OutputFormat::Png, 100)
            .map_err(|e| TransformError::failed(BACKEND_NAME, format!("failed to encode PNG: {e}")))
    }
}

impl BackgroundRemover for ImglyRemover {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn remove_background(&self, image: &[u8]) -> std::result::Result<Vec<u8>, TransformError> {
        tracing::debug!(model_url = %self.model_url, bytes = image.len(), "Running imgly background removal");
        self.runtime.block_on(self.remove(image))
    }
}
