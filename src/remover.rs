//! Background removal capability abstraction
//!
//! The runner never looks inside an image. It hands encoded bytes to a
//! [`BackgroundRemover`] and gets encoded bytes back, so the actual
//! segmentation can live in a remote service, another crate, or a test mock.

use thiserror::Error;

/// Failures raised by a background removal capability
#[derive(Error, Debug)]
pub enum TransformError {
    /// The capability ran but could not process the payload
    #[error("{backend}: {message}")]
    Failed { backend: String, message: String },

    /// The capability could not be reached or loaded
    #[error("{backend} is unavailable: {message}")]
    Unavailable { backend: String, message: String },
}

impl TransformError {
    /// Create a new processing failure for `backend`
    pub fn failed<B: Into<String>, S: Into<String>>(backend: B, msg: S) -> Self {
        Self::Failed {
            backend: backend.into(),
            message: msg.into(),
        }
    }

    /// Create a new availability failure for `backend`
    pub fn unavailable<B: Into<String>, S: Into<String>>(backend: B, msg: S) -> Self {
        Self::Unavailable {
            backend: backend.into(),
            message: msg.into(),
        }
    }
}

/// Trait for background removal capabilities
pub trait BackgroundRemover {
    /// Short backend name used in logs and error messages
    fn name(&self) -> &str;

    /// Remove the background from an encoded image
    ///
    /// Returns the encoded result exactly as the capability produced it.
    ///
    /// # Errors
    /// - Payload is not an image the capability understands
    /// - Capability failed internally
    /// - Capability could not be reached
    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, TransformError>;
}

impl<T: BackgroundRemover + ?Sized> BackgroundRemover for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, TransformError> {
        (**self).remove_background(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Reverse;

    impl BackgroundRemover for Reverse {
        fn name(&self) -> &str {
            "reverse"
        }

        fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, TransformError> {
            Ok(image.iter().rev().copied().collect())
        }
    }

    #[test]
    fn test_boxed_remover_delegates() {
        let remover: Box<dyn BackgroundRemover> = Box::new(Reverse);
        assert_eq!(remover.name(), "reverse");
        assert_eq!(remover.remove_background(&[1, 2, 3]).unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_transform_error_display() {
        let err = TransformError::failed("rembg", "HTTP 400: unsupported image");
        assert_eq!(err.to_string(), "rembg: HTTP 400: unsupported image");

        let err = TransformError::unavailable("rembg", "connection refused");
        assert_eq!(err.to_string(), "rembg is unavailable: connection refused");
    }
}
