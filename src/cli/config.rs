//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliBackend};
use crate::{
    config::{AppConfig, RemoverConfig},
    error::Result,
};

#[cfg(feature = "imgly")]
use crate::config::DEFAULT_IMGLY_MODEL_URL;

/// Convert CLI arguments to an `AppConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build the configuration: defaults, then the config file, then flags
    pub(crate) fn from_cli(cli: &Cli) -> Result<AppConfig> {
        let mut config = match &cli.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };

        if let Some(input) = &cli.input {
            config.runner.input_path.clone_from(input);
        }
        if let Some(output) = &cli.output {
            config.runner.output_path.clone_from(output);
        }

        config.remover = Self::resolve_remover(cli, config.remover);
        config.validate()?;

        Ok(config)
    }

    fn resolve_remover(cli: &Cli, current: RemoverConfig) -> RemoverConfig {
        let backend = cli.backend.unwrap_or(match current {
            RemoverConfig::Rembg { .. } => CliBackend::Rembg,
            #[cfg(feature = "imgly")]
            RemoverConfig::Imgly { .. } => CliBackend::Imgly,
        });

        match backend {
            CliBackend::Rembg => {
                let (endpoint, model) = match current {
                    RemoverConfig::Rembg { endpoint, model } => (endpoint, model),
                    #[cfg(feature = "imgly")]
                    RemoverConfig::Imgly { .. } => (
                        crate::config::DEFAULT_REMBG_ENDPOINT.to_string(),
                        crate::config::DEFAULT_REMBG_MODEL.to_string(),
                    ),
                };
                RemoverConfig::Rembg {
                    endpoint: cli.endpoint.clone().unwrap_or(endpoint),
                    model: cli.model.clone().unwrap_or(model),
                }
            },
            #[cfg(feature = "imgly")]
            CliBackend::Imgly => {
                if cli.endpoint.is_some() || cli.model.is_some() {
                    tracing::warn!("--endpoint and --model only apply to the rembg backend");
                }
                let model_url = match current {
                    RemoverConfig::Imgly { model_url } => model_url,
                    RemoverConfig::Rembg { .. } => DEFAULT_IMGLY_MODEL_URL.to_string(),
                };
                RemoverConfig::Imgly {
                    model_url: cli.model_url.clone().unwrap_or(model_url),
                }
            },
        }
    }
}
