//! Output file writer.
//!
//! Each destination is written in a single call that replaces the whole
//! file. Dry-run mode reports what would be written instead.

use crate::error::WriteError;
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Path where content would have been written.
        path: PathBuf,
        /// Number of bytes that would have been written.
        bytes: usize,
    },
}

/// File writer with dry-run support.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileWriter {
    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Create the destination's parent directory chain if it is missing.
    pub fn ensure_parent(&self, path: &Path) -> Result<(), WriteError> {
        if self.dry_run {
            return Ok(());
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        Ok(())
    }

    /// Write content to a file, replacing what was there.
    ///
    /// The parent directory must exist; see [`FileWriter::ensure_parent`].
    pub fn write(&self, path: &Path, content: &str) -> Result<WriteResult, WriteError> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                path: path.to_path_buf(),
                bytes: content.len(),
            });
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the size of the rendered content.
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } | WriteResult::DryRun { bytes, .. } => *bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.ts");
        let content = "export type Maybe<T> = T | null;\n";

        let result = FileWriter::new(false).write(&path, content).unwrap();

        assert!(matches!(result, WriteResult::Written { .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn test_write_replaces_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("types.ts");
        std::fs::write(&path, "a much longer previous generation\n").unwrap();

        FileWriter::new(false).write(&path, "short\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "short\n");
    }

    #[test]
    fn test_ensure_parent_creates_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("src/gql/types.ts");
        let writer = FileWriter::new(false);

        writer.ensure_parent(&path).unwrap();
        assert!(dir.path().join("src/gql").is_dir());
        assert!(!path.exists());

        let result = writer.write(&path, "x").unwrap();
        assert!(result.was_written());
        assert!(path.exists());
    }

    #[test]
    fn test_write_without_parent_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing/types.ts");

        let err = FileWriter::new(false).write(&path, "x").unwrap_err();

        assert!(matches!(err, WriteError::WriteFile { .. }));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/types.ts");

        let writer = FileWriter::new(true);
        writer.ensure_parent(&path).unwrap();
        let result = writer.write(&path, "12345").unwrap();

        assert_eq!(
            result,
            WriteResult::DryRun {
                path: path.clone(),
                bytes: 5
            }
        );
        assert!(!result.was_written());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn test_write_result_accessors() {
        let path = PathBuf::from("/test/types.ts");

        let written = WriteResult::Written {
            path: path.clone(),
            bytes: 100,
        };
        assert_eq!(written.path(), path.as_path());
        assert_eq!(written.bytes(), 100);

        let dry_run = WriteResult::DryRun {
            path: path.clone(),
            bytes: 7,
        };
        assert_eq!(dry_run.path(), path.as_path());
        assert_eq!(dry_run.bytes(), 7);
    }
}
