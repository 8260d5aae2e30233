//! Background removal backends
//!
//! - rembg backend (HTTP client for a rembg server, always available)
//! - imgly backend (in-process ONNX inference, `imgly` feature)

pub mod rembg;

#[cfg(feature = "imgly")]
pub mod imgly;

// Test utilities for backend testing
#[cfg(test)]
pub mod test_utils;

pub use self::rembg::RembgRemover;

#[cfg(feature = "imgly")]
pub use self::imgly::ImglyRemover;

use crate::{config::RemoverConfig, error::Result, remover::BackgroundRemover};

/// Create the remover described by `config`
///
/// # Errors
/// - Invalid backend parameters
/// - Backend runtime or client cannot be created
pub fn create_remover(config: &RemoverConfig) -> Result<Box<dyn BackgroundRemover>> {
    config.validate()?;

    let remover: Box<dyn BackgroundRemover> = match config {
        RemoverConfig::Rembg { endpoint, model } => {
            Box::new(RembgRemover::new(endpoint.as_str(), model.as_str())?)
        },
        #[cfg(feature = "imgly")]
        RemoverConfig::Imgly { model_url } => Box::new(ImglyRemover::new(model_url.as_str())?),
    };

    tracing::debug!(backend = remover.name(), "Created background remover");
    Ok(remover)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_default_remover() {
        let remover = create_remover(&RemoverConfig::default()).unwrap();
        assert_eq!(remover.name(), "rembg");
    }

    #[test]
    fn test_create_remover_rejects_invalid_config() {
        let config = RemoverConfig::Rembg {
            endpoint: "not a url".to_string(),
            model: "u2net".to_string(),
        };
        assert!(create_remover(&config).is_err());
    }
}
