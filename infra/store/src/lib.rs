//! Program configuration persisted in a small, sectioned, type-tagged text format.
//!
//! # Layers
//!
//! 1. **[`ProgramConfig`]**: typed, self-healing key/value store of one program.
//! 2. **[`ConfigDocument`]**: parser and deterministic serializer for the whole file.
//! 3. **[`ConfigurationRegistry`]**: owns the document, loads it lazily from a
//!    [`ConfigSource`], detects external edits by file length, saves wholesale.
//!
//! # Example
//!
//! ```rust
//! use tilt_store::{ConfigurationRegistry, MemorySource, StoreError};
//!
//! # fn main() -> Result<(), StoreError> {
//! let source = MemorySource::with_contents("[autonomous]\nBlue.speed=i_5\n\n");
//! let mut registry = ConfigurationRegistry::new(source.clone());
//!
//! // Wrong kind on disk: the default wins and is stored.
//! let speed = registry.get_program("Blue").get_or("speed", 2.5);
//! assert!((speed - 2.5).abs() < f64::EPSILON);
//!
//! registry.save()?;
//! assert_eq!(source.contents().as_deref(), Some("[autonomous]\nBlue.speed=d_2.5\n\n"));
//! # Ok(())
//! # }
//! ```

mod document;
mod error;
mod program;
mod registry;
mod source;

pub use document::{ConfigDocument, Diagnostic, ParseOutcome, ParsedBlock, Section, parse_blocks};
pub use error::{StoreError, StoreErrorExt};
pub use program::{ProgramConfig, is_storable_key, is_storable_payload, is_storable_program_name};
pub use registry::ConfigurationRegistry;
pub use source::{ConfigSource, FileSource, MemorySource};
