use crate::document::{ConfigDocument, Diagnostic, parse_blocks};
use crate::error::StoreError;
use crate::program::ProgramConfig;
use crate::source::{ConfigSource, FileSource};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

/// Owns the config document and keeps it in step with its source.
///
/// The document is loaded lazily on first access. Staleness is judged by the
/// source's byte length alone: an external edit that keeps the length
/// unchanged is not noticed.
///
/// After a failed load the registry serves an empty document but refuses to
/// save it until a later [`reload`](Self::reload) succeeds.
#[derive(Debug)]
pub struct ConfigurationRegistry {
    source: Box<dyn ConfigSource>,
    document: Option<ConfigDocument>,
    load_failed: bool,
    recorded_len: u64,
    diagnostics: Vec<Diagnostic>,
}

impl ConfigurationRegistry {
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            document: None,
            load_failed: false,
            recorded_len: 0,
            diagnostics: Vec::new(),
        }
    }

    /// A registry backed by the file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::new(FileSource::new(path))
    }

    #[must_use]
    pub fn source(&self) -> &dyn ConfigSource {
        self.source.as_ref()
    }

    /// Whether the document has been read from the source successfully.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.document.is_some() && !self.load_failed
    }

    /// Whether the last load attempt failed.
    #[must_use]
    pub const fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Byte length recorded at the last load or save.
    #[must_use]
    pub const fn recorded_len(&self) -> u64 {
        self.recorded_len
    }

    /// Diagnostics from the most recent parse.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// `true` iff the source's current length differs from the recorded one.
    #[must_use]
    pub fn is_outdated(&self) -> bool {
        match self.source.size() {
            Ok(len) => len != self.recorded_len,
            Err(err) => {
                warn!(target: "tilt::registry", location = %self.source.location(), %err, "Cannot stat config");
                false
            },
        }
    }

    /// The loaded document, loading it first if needed.
    ///
    /// A load failure is logged and leaves an empty document that cannot be saved.
    pub fn document(&mut self) -> &mut ConfigDocument {
        if self.document.is_none() {
            let loaded = self.reload();
            if let Err(err) = loaded {
                error!(target: "tilt::registry", location = %self.source.location(), %err, "Failed to load config");
            }
        }
        self.document.get_or_insert_with(ConfigDocument::new)
    }

    /// The program config for `name`, created empty when unseen. Never fails.
    pub fn get_program(&mut self, name: &str) -> &mut ProgramConfig {
        self.document().program_mut(name)
    }

    /// All program configs in name order.
    pub fn programs(&mut self) -> Vec<&ProgramConfig> {
        self.document().programs().collect()
    }

    /// Discards the in-memory document and parses the source again. A missing
    /// source is created empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the source cannot be created, measured or read.
    /// The document is left empty and saving is refused until a reload succeeds.
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.diagnostics.clear();

        let (len, text) = match self.read_source() {
            Ok(read) => read,
            Err(err) => {
                self.document = Some(ConfigDocument::new());
                self.load_failed = true;
                return Err(err);
            },
        };

        let outcome = parse_blocks(&text);
        self.diagnostics.clone_from(&outcome.diagnostics);
        let document = ConfigDocument::from_outcome(outcome);
        debug!(
            target: "tilt::registry",
            location = %self.source.location(),
            programs = document.len(),
            bytes = len,
            "Config loaded"
        );

        self.document = Some(document);
        self.load_failed = false;
        self.recorded_len = len;
        Ok(())
    }

    fn read_source(&self) -> Result<(u64, String), StoreError> {
        if !self.source.exists_or_create()? {
            info!(target: "tilt::registry", location = %self.source.location(), "Config missing, created empty");
        }
        let len = self.source.size()?;
        let text = self.source.read_all()?;
        Ok((len, text))
    }

    /// Reloads when the source length changed or the last load failed.
    /// Returns whether it reloaded.
    ///
    /// # Errors
    ///
    /// Propagates [`ConfigurationRegistry::reload`] failures.
    pub fn refresh(&mut self) -> Result<bool, StoreError> {
        if self.is_loaded() && !self.is_outdated() {
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }

    /// Serializes the whole document and writes it to the source.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotLoaded`] if the source could not be loaded, and
    /// another [`StoreError`] if it cannot be written.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let text = self.document().to_string();
        if self.load_failed {
            warn!(target: "tilt::registry", location = %self.source.location(), "Config not loaded, save skipped");
            return Err(StoreError::NotLoaded { message: self.source.location().into(), context: None });
        }

        self.source.write_all(&text)?;
        self.recorded_len = u64::try_from(text.len()).unwrap_or(u64::MAX);

        debug!(target: "tilt::registry", location = %self.source.location(), bytes = text.len(), "Config saved");
        Ok(())
    }

    /// Removes the persisted document and forgets everything in memory.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the source cannot be removed.
    pub fn delete(&mut self) -> Result<(), StoreError> {
        self.source.remove()?;
        self.document = Some(ConfigDocument::new());
        self.load_failed = false;
        self.diagnostics.clear();
        self.recorded_len = 0;

        info!(target: "tilt::registry", location = %self.source.location(), "Config deleted");
        Ok(())
    }
}
