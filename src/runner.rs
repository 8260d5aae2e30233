//! Single-shot background removal runner
//!
//! One straight-line sequence: read the input payload, hand it to the
//! remover, write whatever comes back. Any failure stops the run.

use crate::{
    config::RunnerConfig,
    error::{RemovalError, Result},
    remover::BackgroundRemover,
    services::PayloadIOService,
};
use instant::{Duration, Instant};
use std::io::Write;
use std::path::PathBuf;

/// Console line printed after a successful run
pub const SUCCESS_MESSAGE: &str = "Background removed successfully.";

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Size of the payload read from the input file
    pub input_bytes: usize,
    /// Size of the payload written to the output file
    pub output_bytes: usize,
    /// Name of the remover that processed the payload
    pub backend: String,
    pub elapsed: Duration,
}

/// Runs read → remove background → write for one configured pair of paths
pub struct BackgroundRemovalRunner {
    config: RunnerConfig,
    remover: Box<dyn BackgroundRemover>,
}

impl BackgroundRemovalRunner {
    /// Create a runner with a validated configuration
    ///
    /// # Errors
    /// - Invalid paths in `config`
    pub fn new(config: RunnerConfig, remover: Box<dyn BackgroundRemover>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, remover })
    }

    /// Paths this runner reads from and writes to
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute the run
    ///
    /// The output file only appears once the remover has succeeded and all
    /// bytes are on disk. Returned bytes are written unmodified.
    ///
    /// # Errors
    /// - [`RemovalError::InputRead`] if the input cannot be read
    /// - [`RemovalError::InvalidConfig`] if the output resolves to the input
    /// - [`RemovalError::Transform`] if the remover fails
    /// - [`RemovalError::OutputWrite`] if the output cannot be written
    pub fn run(&self) -> Result<RunReport> {
        let span = tracing::info_span!(
            "remove_background",
            input = %self.config.input_path.display(),
            output = %self.config.output_path.display(),
            backend = self.remover.name()
        );
        let _guard = span.enter();
        let start = Instant::now();

        let payload = PayloadIOService::read_payload(&self.config.input_path)?;
        // Files may have appeared since validation
        self.config.ensure_distinct_files()?;

        let output = self.remover.remove_background(&payload).map_err(|e| {
            tracing::debug!(error = %e, "Remover failed");
            RemovalError::from(e)
        })?;
        tracing::debug!(bytes = output.len(), "Remover returned payload");

        PayloadIOService::write_payload(&self.config.output_path, &output)?;

        let elapsed = start.elapsed();
        tracing::info!(
            input_bytes = payload.len(),
            output_bytes = output.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Background removal completed"
        );

        Ok(RunReport {
            input_path: self.config.input_path.clone(),
            output_path: self.config.output_path.clone(),
            input_bytes: payload.len(),
            output_bytes: output.len(),
            backend: self.remover.name().to_string(),
            elapsed,
        })
    }

    /// Execute the run and print its outcome line to `out`
    ///
    /// Returns whether the run succeeded. Only failures to write to `out`
    /// are returned as errors.
    ///
    /// # Errors
    /// - Writing to `out` failed
    pub fn run_and_report<W: Write>(&self, out: &mut W) -> std::io::Result<bool> {
        let outcome = self.run();
        report_outcome(&outcome, out)?;
        Ok(outcome.is_ok())
    }
}

/// Print the single console line for a run outcome
///
/// # Errors
/// - Writing to `out` failed
pub fn report_outcome<W: Write>(outcome: &Result<RunReport>, out: &mut W) -> std::io::Result<()> {
    match outcome {
        Ok(_) => writeln!(out, "{SUCCESS_MESSAGE}"),
        Err(e) => {
            tracing::debug!(stage = %e.stage(), "Background removal failed");
            writeln!(out, "Error: {e}")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_utils::MockRemover;
    use tempfile::TempDir;

    fn runner_in(dir: &TempDir, remover: MockRemover) -> BackgroundRemovalRunner {
        let config = RunnerConfig::builder()
            .input_path(dir.path().join("varco.png"))
            .output_path(dir.path().join("varco_transparent.png"))
            .build()
            .unwrap();
        BackgroundRemovalRunner::new(config, Box::new(remover)).unwrap()
    }

    #[test]
    fn test_run_writes_remover_output() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("varco.png"), b"input-image").unwrap();
        let mock = MockRemover::new();
        let runner = runner_in(&dir, mock.clone());

        let report = runner.run().unwrap();

        let written = std::fs::read(dir.path().join("varco_transparent.png")).unwrap();
        assert_eq!(written, MockRemover::tagged(b"input-image"));
        assert_eq!(report.input_bytes, 11);
        assert_eq!(report.output_bytes, written.len());
        assert_eq!(report.backend, "mock");
        assert_eq!(mock.received(), vec![b"input-image".to_vec()]);
    }

    #[test]
    fn test_run_writes_bytes_unrelated_to_input() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("varco.png"), b"input-image").unwrap();
        let cutout = b"\x89PNG\r\n\x1a\nRGBA cutout".to_vec();
        let mock = MockRemover::with_output(cutout.clone());
        let runner = runner_in(&dir, mock.clone());

        let report = runner.run().unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("varco_transparent.png")).unwrap(),
            cutout
        );
        assert_eq!(report.input_bytes, 11);
        assert_eq!(report.output_bytes, cutout.len());
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_output_aliasing_input_is_refused_at_run_time() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.png");
        let alias = dir.path().join("sub").join("..").join("in.png");
        // Neither file exists yet, so construction succeeds
        let config = RunnerConfig::builder()
            .input_path(&input)
            .output_path(&alias)
            .build()
            .unwrap();
        let mock = MockRemover::new();
        let runner = BackgroundRemovalRunner::new(config, Box::new(mock.clone())).unwrap();

        std::fs::write(&input, b"source image").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let err = runner.run().unwrap_err();

        assert!(matches!(err, RemovalError::InvalidConfig(_)));
        assert_eq!(mock.call_count(), 0);
        assert_eq!(std::fs::read(&input).unwrap(), b"source image");
    }

    #[test]
    fn test_missing_input_skips_remover() {
        let dir = TempDir::new().unwrap();
        let mock = MockRemover::new();
        let runner = runner_in(&dir, mock.clone());

        let err = runner.run().unwrap_err();

        assert!(matches!(err, RemovalError::InputRead { .. }));
        assert_eq!(mock.call_count(), 0);
        assert!(!dir.path().join("varco_transparent.png").exists());
    }

    #[test]
    fn test_remover_failure_leaves_output_untouched() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("varco.png"), b"input-image").unwrap();
        std::fs::write(dir.path().join("varco_transparent.png"), b"previous").unwrap();
        let runner = runner_in(&dir, MockRemover::new_failing("unsupported image"));

        let err = runner.run().unwrap_err();

        assert!(matches!(err, RemovalError::Transform(_)));
        assert_eq!(
            std::fs::read(dir.path().join("varco_transparent.png")).unwrap(),
            b"previous"
        );
    }

    #[test]
    fn test_report_outcome_lines() {
        let mut out = Vec::new();
        let ok: Result<RunReport> = Ok(RunReport {
            input_path: PathBuf::from("a.png"),
            output_path: PathBuf::from("b.png"),
            input_bytes: 1,
            output_bytes: 1,
            backend: "mock".to_string(),
            elapsed: Duration::from_millis(5),
        });
        report_outcome(&ok, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Background removed successfully.\n");

        let mut out = Vec::new();
        let failed: Result<RunReport> = Err(RemovalError::input_read(
            "a.png",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        ));
        report_outcome(&failed, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: Failed to read input 'a.png': No such file or directory\n"
        );
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = RunnerConfig {
            input_path: PathBuf::from("same.png"),
            output_path: PathBuf::from("same.png"),
        };
        let result = BackgroundRemovalRunner::new(config, Box::new(MockRemover::new()));
        assert!(result.is_err());
    }
}
