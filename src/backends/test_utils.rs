//! Test utilities and a mock remover
//!
//! Provides a `BackgroundRemover` implementation that records every call,
//! so runner behaviour can be verified without a rembg server or a model.

use crate::remover::{BackgroundRemover, TransformError};
use std::sync::{Arc, Mutex};

/// Prefix the default mock puts in front of the input bytes
pub const MOCK_OUTPUT_PREFIX: &[u8] = b"MOCK-RGBA:";

#[derive(Debug, Clone)]
enum MockBehavior {
    /// Prefix the input, deterministic per input
    Tag,
    /// Always return these bytes
    Fixed(Vec<u8>),
    /// Always fail with this message
    Fail(String),
}

/// Mock remover for testing
#[derive(Debug, Clone)]
pub struct MockRemover {
    behavior: MockBehavior,
    /// Payloads received, shared between clones
    call_history: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockRemover {
    /// Create a mock that returns `MOCK_OUTPUT_PREFIX` followed by the input
    #[must_use]
    pub fn new() -> Self {
        Self {
            behavior: MockBehavior::Tag,
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that always returns `output`
    #[must_use]
    pub fn with_output(output: Vec<u8>) -> Self {
        let mut remover = Self::new();
        remover.behavior = MockBehavior::Fixed(output);
        remover
    }

    /// Create a mock that fails every call
    #[must_use]
    pub fn new_failing<S: Into<String>>(message: S) -> Self {
        let mut remover = Self::new();
        remover.behavior = MockBehavior::Fail(message.into());
        remover
    }

    /// Expected output of the default mock for `input`
    #[must_use]
    pub fn tagged(input: &[u8]) -> Vec<u8> {
        let mut output = MOCK_OUTPUT_PREFIX.to_vec();
        output.extend_from_slice(input);
        output
    }

    /// Number of times `remove_background` was called
    pub fn call_count(&self) -> usize {
        self.call_history.lock().unwrap().len()
    }

    /// Payloads received so far
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.call_history.lock().unwrap().clone()
    }
}

impl Default for MockRemover {
    fn default() -> Self {
        Self::new()
    }
}

impl BackgroundRemover for MockRemover {
    fn name(&self) -> &str {
        "mock"
    }

    fn remove_background(&self, image: &[u8]) -> Result<Vec<u8>, TransformError> {
        self.call_history.lock().unwrap().push(image.to_vec());

        match &self.behavior {
            MockBehavior::Tag => Ok(Self::tagged(image)),
            MockBehavior::Fixed(output) => Ok(output.clone()),
            MockBehavior::Fail(message) => Err(TransformError::failed("mock", message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_records_calls_across_clones() {
        let mock = MockRemover::new();
        let handle = mock.clone();

        let output = mock.remove_background(b"abc").unwrap();
        assert_eq!(output, b"MOCK-RGBA:abc");
        assert_eq!(handle.call_count(), 1);
        assert_eq!(handle.received(), vec![b"abc".to_vec()]);
    }

    #[test]
    fn test_failing_mock() {
        let mock = MockRemover::new_failing("cannot identify image file");
        let err = mock.remove_background(b"garbage").unwrap_err();
        assert_eq!(err.to_string(), "mock: cannot identify image file");
        assert_eq!(mock.call_count(), 1);
    }
}
