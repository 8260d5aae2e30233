//! Payload I/O operations service
//!
//! Keeps file handling out of the runner so the orchestration can be tested
//! against temporary directories and mock removers.

use crate::error::{RemovalError, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Service for reading and writing encoded image payloads
pub struct PayloadIOService;

impl PayloadIOService {
    /// Read an entire image file into memory
    ///
    /// The bytes are returned as-is; no format detection happens here.
    ///
    /// # Errors
    /// - File does not exist or cannot be read
    /// - File is empty
    ///
    /// # Examples
    /// ```rust,no_run
    /// use bgremove_runner::services::PayloadIOService;
    ///
    /// let payload = PayloadIOService::read_payload("input.jpg")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn read_payload<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path_ref = path.as_ref();

        let payload =
            std::fs::read(path_ref).map_err(|e| RemovalError::input_read(path_ref, e))?;

        if payload.is_empty() {
            return Err(RemovalError::input_read(
                path_ref,
                std::io::Error::new(std::io::ErrorKind::InvalidData, "file is empty"),
            ));
        }

        tracing::debug!(path = %path_ref.display(), bytes = payload.len(), "Read input payload");
        Ok(payload)
    }

    /// Write a payload to `path`, replacing any existing file
    ///
    /// Bytes go to a temporary file next to the destination which is renamed
    /// into place once fully written. A failed write leaves the destination
    /// untouched. A symlink at `path` is written through to its target.
    ///
    /// # Errors
    /// - Existing destination is read-only
    /// - Parent directory cannot be created
    /// - Temporary file cannot be created, written, or renamed
    pub fn write_payload<P: AsRef<Path>>(path: P, payload: &[u8]) -> Result<()> {
        let path_ref = path.as_ref();
        let destination = Self::resolve_destination(path_ref)?;
        let parent = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        std::fs::create_dir_all(parent).map_err(|e| RemovalError::output_write(path_ref, e))?;

        let mut staged =
            NamedTempFile::new_in(parent).map_err(|e| RemovalError::output_write(path_ref, e))?;
        staged
            .write_all(payload)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| RemovalError::output_write(path_ref, e))?;

        // NamedTempFile is created 0600; give the result ordinary file permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            staged
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| RemovalError::output_write(path_ref, e))?;
        }

        staged
            .persist(&destination)
            .map_err(|e| RemovalError::output_write(path_ref, e.error))?;

        tracing::debug!(
            path = %path_ref.display(),
            target = %destination.display(),
            bytes = payload.len(),
            "Wrote output payload"
        );
        Ok(())
    }

    /// File the rename must replace: the symlink target if `path` is a
    /// symlink, otherwise `path` itself
    fn resolve_destination(path: &Path) -> Result<PathBuf> {
        let destination = match std::fs::symlink_metadata(path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                std::fs::canonicalize(path).map_err(|e| RemovalError::output_write(path, e))?
            },
            _ => path.to_path_buf(),
        };

        // Renaming only needs a writable directory, so check the file itself
        if let Ok(meta) = std::fs::metadata(&destination) {
            if meta.permissions().readonly() {
                return Err(RemovalError::output_write(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::PermissionDenied,
                        "existing file is read-only",
                    ),
                ));
            }
        }

        Ok(destination)
    }
}
