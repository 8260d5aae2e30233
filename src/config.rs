//! Configuration types for background removal runs

use crate::error::{RemovalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Input image used when no path is configured
pub const DEFAULT_INPUT_PATH: &str = "assets/varco.png";

/// Output image used when no path is configured
pub const DEFAULT_OUTPUT_PATH: &str = "assets/varco_transparent.png";

/// Default rembg server endpoint (`rembg s` listens on port 7000)
pub const DEFAULT_REMBG_ENDPOINT: &str = "http://localhost:7000/api/remove";

/// Default rembg model
pub const DEFAULT_REMBG_MODEL: &str = "u2net";

/// Default model repository for the in-process backend
#[cfg(feature = "imgly")]
pub const DEFAULT_IMGLY_MODEL_URL: &str = "https://huggingface.co/imgly/isnet-general-onnx";

/// Paths for a single background removal run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Source image location
    pub input_path: PathBuf,

    /// Destination image location
    pub output_path: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
        }
    }
}

impl RunnerConfig {
    /// Create a new configuration builder
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bgremove_runner::RunnerConfig;
    ///
    /// let config = RunnerConfig::builder()
    ///     .input_path("photo.jpg")
    ///     .output_path("photo_transparent.png")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(config.input_path.to_str(), Some("photo.jpg"));
    /// ```
    #[must_use]
    pub fn builder() -> RunnerConfigBuilder {
        RunnerConfigBuilder::default()
    }

    /// Validate the configured paths
    ///
    /// # Errors
    /// - Input or output path is empty
    /// - Input and output refer to the same file
    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(RemovalError::invalid_config("input path is empty"));
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(RemovalError::invalid_config("output path is empty"));
        }

        self.ensure_distinct_files()
    }

    /// Reject an output path that names the input file
    ///
    /// Paths are compared as written and, when both files exist, after
    /// resolving `..` components and symlinks.
    ///
    /// # Errors
    /// - Input and output refer to the same file
    pub fn ensure_distinct_files(&self) -> Result<()> {
        if self.input_path == self.output_path
            || resolves_to_same_file(&self.input_path, &self.output_path)
        {
            return Err(RemovalError::invalid_config(format!(
                "input and output both point to '{}'",
                self.input_path.display()
            )));
        }

        Ok(())
    }
}

fn resolves_to_same_file(input: &Path, output: &Path) -> bool {
    // An output that does not exist yet cannot be the input
    match (std::fs::canonicalize(input), std::fs::canonicalize(output)) {
        (Ok(input), Ok(output)) => input == output,
        _ => false,
    }
}

/// Builder for `RunnerConfig`
#[derive(Debug, Default)]
pub struct RunnerConfigBuilder {
    config: RunnerConfig,
}

impl RunnerConfigBuilder {
    /// Set the input image path
    #[must_use]
    pub fn input_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.input_path = path.into();
        self
    }

    /// Set the output image path
    #[must_use]
    pub fn output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    /// - Any rule checked by [`RunnerConfig::validate`]
    pub fn build(self) -> Result<RunnerConfig> {
        let config = self.config;
        config.validate()?;
        Ok(config)
    }
}

/// Which capability performs the background removal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case", deny_unknown_fields)]
pub enum RemoverConfig {
    /// A rembg HTTP server
    Rembg {
        /// Full URL of the `/api/remove` endpoint
        endpoint: String,
        /// rembg model name (u2net, isnet-general-use, ...)
        model: String,
    },

    /// In-process removal with the imgly-bgremove crate
    #[cfg(feature = "imgly")]
    Imgly {
        /// Model repository URL, downloaded and cached on first use
        model_url: String,
    },
}

impl Default for RemoverConfig {
    fn default() -> Self {
        Self::Rembg {
            endpoint: DEFAULT_REMBG_ENDPOINT.to_string(),
            model: DEFAULT_REMBG_MODEL.to_string(),
        }
    }
}

impl RemoverConfig {
    /// Backend name as used in configuration files and on the command line
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Rembg { .. } => "rembg",
            #[cfg(feature = "imgly")]
            Self::Imgly { .. } => "imgly",
        }
    }

    /// Validate backend parameters
    ///
    /// # Errors
    /// - Endpoint or model URL is not an http(s) URL
    /// - Model name is empty
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Rembg { endpoint, model } => {
                validate_http_url("rembg endpoint", endpoint)?;
                if model.trim().is_empty() {
                    return Err(RemovalError::invalid_config("rembg model name is empty"));
                }
                Ok(())
            },
            #[cfg(feature = "imgly")]
            Self::Imgly { model_url } => validate_http_url("imgly model URL", model_url),
        }
    }
}

fn validate_http_url(what: &str, url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(RemovalError::invalid_config(format!(
            "{what} must be an http(s) URL, got '{url}'"
        )))
    }
}

/// Complete configuration as read from a JSON file
///
/// ```json
/// {
///   "input_path": "assets/varco.png",
///   "output_path": "assets/varco_transparent.png",
///   "remover": { "backend": "rembg", "endpoint": "http://localhost:7000/api/remove", "model": "u2net" }
/// }
/// ```
///
/// Missing keys take their defaults; unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigDocument", into = "ConfigDocument")]
pub struct AppConfig {
    pub runner: RunnerConfig,
    pub remover: RemoverConfig,
}

/// On-disk layout of [`AppConfig`]
#[derive(Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigDocument {
    input_path: PathBuf,
    output_path: PathBuf,
    remover: RemoverConfig,
}

impl Default for ConfigDocument {
    fn default() -> Self {
        AppConfig::default().into()
    }
}

impl From<ConfigDocument> for AppConfig {
    fn from(doc: ConfigDocument) -> Self {
        Self {
            runner: RunnerConfig {
                input_path: doc.input_path,
                output_path: doc.output_path,
            },
            remover: doc.remover,
        }
    }
}

impl From<AppConfig> for ConfigDocument {
    fn from(config: AppConfig) -> Self {
        Self {
            input_path: config.runner.input_path,
            output_path: config.runner.output_path,
            remover: config.remover,
        }
    }
}

impl AppConfig {
    /// Parse and validate a JSON configuration document
    ///
    /// # Errors
    /// - Malformed JSON or unknown backend
    /// - Any rule checked by the runner or remover validation
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RemovalError::invalid_config(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    ///
    /// # Errors
    /// - File cannot be read
    /// - Any error from [`AppConfig::from_json_str`]
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            RemovalError::invalid_config(format!(
                "failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_json_str(&json)
    }

    /// Validate both sections
    ///
    /// # Errors
    /// - Any rule checked by the runner or remover validation
    pub fn validate(&self) -> Result<()> {
        self.runner.validate()?;
        self.remover.validate()
    }
}
