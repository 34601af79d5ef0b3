//! Where the config document lives.
//!
//! The registry only ever reads and writes the whole document, so a source is
//! a handful of whole-file operations plus the byte length used for staleness.

use crate::error::{StoreError, StoreErrorExt};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Whole-document persistence used by the configuration registry.
pub trait ConfigSource: Debug + Send + Sync {
    /// Reads the full document text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::FileNotFound`] if the document does not exist.
    fn read_all(&self) -> Result<String, StoreError>;

    /// Replaces the full document text.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the text cannot be persisted.
    fn write_all(&self, text: &str) -> Result<(), StoreError>;

    /// Current byte length of the document; an absent document has length `0`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the length cannot be determined.
    fn size(&self) -> Result<u64, StoreError>;

    /// Creates an empty document if none exists. Returns whether it already existed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the document cannot be created.
    fn exists_or_create(&self) -> Result<bool, StoreError>;

    /// Removes the document. Removing an absent document is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the document exists but cannot be removed.
    fn remove(&self) -> Result<(), StoreError>;

    /// Short description for diagnostics.
    fn location(&self) -> String;
}

/// A config document stored in a single file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        name.push(".tilttmp");
        self.path.with_file_name(name)
    }
}

impl ConfigSource for FileSource {
    fn read_all(&self) -> Result<String, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::FileNotFound {
                    message: self.path.display().to_string().into(),
                    context: None,
                });
            },
            Err(err) => {
                return Err(StoreError::Io {
                    source: err,
                    context: Some(format!("Read failed: {}", self.path.display()).into()),
                });
            },
        };

        match String::from_utf8(bytes) {
            Ok(text) => Ok(text),
            Err(err) => {
                warn!(
                    target: "tilt::registry",
                    path = %self.path.display(),
                    offset = err.utf8_error().valid_up_to(),
                    "Config is not valid UTF-8, replacing invalid bytes"
                );
                Ok(String::from_utf8_lossy(err.as_bytes()).into_owned())
            },
        }
    }

    /// Writes to a temporary sibling, syncs it, then renames it over the target.
    fn write_all(&self, text: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }

        let temp = self.tmp_path();
        {
            let mut file = fs::File::create(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(text.as_bytes()).context("Write failed")?;
            file.sync_all().context("Sync failed")?;
        }

        fs::rename(&temp, &self.path).context(format!(
            "Swap failed: {} -> {}",
            temp.display(),
            self.path.display()
        ))?;

        debug!(target: "tilt::registry", path = %self.path.display(), bytes = text.len(), "Config written");
        Ok(())
    }

    fn size(&self) -> Result<u64, StoreError> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(0),
            Err(err) => Err(StoreError::Io {
                source: err,
                context: Some(format!("Metadata failed: {}", self.path.display()).into()),
            }),
        }
    }

    fn exists_or_create(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(true);
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Failed to create {}", parent.display()))?;
        }
        fs::File::create(&self.path)
            .context(format!("Failed to create {}", self.path.display()))?;
        debug!(target: "tilt::registry", path = %self.path.display(), "Created empty config file");
        Ok(false)
    }

    fn remove(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io {
                source: err,
                context: Some(format!("Delete failed: {}", self.path.display()).into()),
            }),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// An in-memory document. Clones share the same contents, so a test can keep
/// one handle to simulate external edits while the registry owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(text: impl Into<String>) -> Self {
        Self { contents: Arc::new(Mutex::new(Some(text.into()))) }
    }

    /// Replaces the contents from outside the registry.
    pub fn replace(&self, text: impl Into<String>) {
        *self.contents.lock() = Some(text.into());
    }

    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl ConfigSource for MemorySource {
    fn read_all(&self) -> Result<String, StoreError> {
        self.contents.lock().clone().ok_or_else(|| StoreError::FileNotFound {
            message: "memory".into(),
            context: None,
        })
    }

    fn write_all(&self, text: &str) -> Result<(), StoreError> {
        *self.contents.lock() = Some(text.to_owned());
        Ok(())
    }

    fn size(&self) -> Result<u64, StoreError> {
        Ok(self.contents.lock().as_ref().map_or(0, |text| text.len() as u64))
    }

    fn exists_or_create(&self) -> Result<bool, StoreError> {
        let mut contents = self.contents.lock();
        if contents.is_some() {
            return Ok(true);
        }
        *contents = Some(String::new());
        Ok(false)
    }

    fn remove(&self) -> Result<(), StoreError> {
        *self.contents.lock() = None;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_source_reports_zero_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("ftc.config"));

        assert_eq!(source.size().unwrap(), 0);
        assert!(matches!(source.read_all(), Err(StoreError::FileNotFound { .. })));
    }

    #[test]
    fn file_source_creates_missing_file_once() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("nested/ftc.config"));

        assert!(!source.exists_or_create().unwrap());
        assert!(source.exists_or_create().unwrap());
        assert_eq!(source.read_all().unwrap(), "");
    }

    #[test]
    fn file_source_write_replaces_contents() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("ftc.config"));

        source.write_all("first").unwrap();
        source.write_all("second!").unwrap();

        assert_eq!(source.read_all().unwrap(), "second!");
        assert_eq!(source.size().unwrap(), 7);
        assert!(!source.tmp_path().exists());
    }

    #[test]
    fn file_source_remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("ftc.config"));

        source.write_all("x").unwrap();
        source.remove().unwrap();
        source.remove().unwrap();
        assert!(!source.path().exists());
    }

    #[test]
    fn file_source_reads_invalid_utf8_lossily() {
        let dir = TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("ftc.config"));
        fs::write(source.path(), b"A.name=s_caf\xE9\n").unwrap();

        assert_eq!(source.read_all().unwrap(), "A.name=s_caf\u{FFFD}\n");
    }

    #[test]
    fn memory_source_clones_share_contents() {
        let source = MemorySource::new();
        let handle = source.clone();

        assert_eq!(source.size().unwrap(), 0);
        handle.replace("abc");
        assert_eq!(source.read_all().unwrap(), "abc");
        assert_eq!(source.size().unwrap(), 3);
    }
}
