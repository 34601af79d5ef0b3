//! The sectioned config text format.
//!
//! ```text
//! [autonomous]
//! <program>.<key>=<tag>_<value>
//! ...
//! <blank line>
//! ```
//!
//! Parsing is a two-state loop: scan for a bracketed header, then consume one
//! run of non-empty lines as the block and go back to scanning. Only the
//! `autonomous` section is understood; other headers are reported and skipped.

use crate::program::{ProgramConfig, is_storable_program_name};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// The one section kind the format knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Autonomous,
}

impl Section {
    pub const AUTONOMOUS: &'static str = "autonomous";

    fn from_mode(mode: &str) -> Option<Self> {
        mode.eq_ignore_ascii_case(Self::AUTONOMOUS).then_some(Self::Autonomous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    ScanningForHeader,
    InBlock(Section),
}

/// A recoverable problem found while parsing. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A block line whose key side is not exactly `<program>.<property>`,
    /// or that has no `=` at all.
    MalformedLine { line_number: usize, line: String },
    /// A header naming a section this format does not support.
    UnknownSection { line_number: usize, mode: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedLine { line_number, line } => {
                write!(f, "line {line_number}: invalid line `{line}`")
            },
            Self::UnknownSection { line_number, mode } => {
                write!(f, "line {line_number}: unknown section `{mode}`")
            },
        }
    }
}

/// Programs read from one block, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedBlock {
    /// 1-based line number of the header that opened the block.
    pub header_line: usize,
    pub programs: Vec<ProgramConfig>,
}

/// Everything a parse produced, block by block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub blocks: Vec<ParsedBlock>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses `text` into per-block results plus diagnostics. Never fails.
#[must_use]
pub fn parse_blocks(text: &str) -> ParseOutcome {
    let lines: Vec<&str> = text.lines().collect();
    let mut outcome = ParseOutcome::default();
    let mut state = ParserState::ScanningForHeader;
    let mut header_line = 0;
    let mut index = 0;

    while index < lines.len() {
        match state {
            ParserState::ScanningForHeader => {
                let line = lines[index];
                index += 1;

                let Some(mode) = header_mode(line) else { continue };
                match Section::from_mode(mode) {
                    Some(section) => {
                        debug!(target: "tilt::document", line = index, ?section, "Entering section");
                        header_line = index;
                        state = ParserState::InBlock(section);
                    },
                    None => {
                        info!(target: "tilt::document", line = index, mode, "Unknown section");
                        outcome.diagnostics.push(Diagnostic::UnknownSection {
                            line_number: index,
                            mode: mode.to_owned(),
                        });
                    },
                }
            },
            ParserState::InBlock(Section::Autonomous) => {
                let start = index;
                let len = lines[start..].iter().take_while(|line| !line.is_empty()).count();
                let block = parse_block(&lines[start..start + len], start + 1, &mut outcome.diagnostics);
                outcome.blocks.push(ParsedBlock { header_line, programs: block });

                index = start + len;
                state = ParserState::ScanningForHeader;
            },
        }
    }

    outcome
}

/// Text between the first `[` and the last `]` of a header line.
fn header_mode(line: &str) -> Option<&str> {
    let rest = line.strip_prefix('[')?;
    let end = rest.rfind(']')?;
    Some(&rest[..end])
}

fn parse_block(
    lines: &[&str],
    first_line_number: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<ProgramConfig> {
    let mut programs: Vec<ProgramConfig> = Vec::new();

    for (offset, line) in lines.iter().enumerate() {
        let line_number = first_line_number + offset;

        let Some((program, property, value)) = split_line(line) else {
            warn!(target: "tilt::document", line = line_number, content = %line, "Invalid line");
            diagnostics.push(Diagnostic::MalformedLine {
                line_number,
                line: (*line).to_owned(),
            });
            continue;
        };

        let config = if let Some(pos) = programs.iter().position(|p| p.name() == program) {
            &mut programs[pos]
        } else {
            debug!(target: "tilt::document", program, "New program config");
            programs.push(ProgramConfig::new(program));
            let last = programs.len() - 1;
            &mut programs[last]
        };

        debug!(target: "tilt::document", program, property, value, "Set property");
        config.put_raw(property, value);
    }

    programs
}

/// Splits `<program>.<property>=<value>`. The value keeps any further `=`.
fn split_line(line: &str) -> Option<(&str, &str, &str)> {
    let (key, value) = line.split_once('=')?;
    let (program, property) = key.split_once('.')?;
    if property.is_empty() || property.contains('.') {
        return None;
    }
    Some((program, property, value))
}

/// The in-memory config document: program configs keyed by exact name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    programs: BTreeMap<String, ProgramConfig>,
}

impl ConfigDocument {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text`, merging every block. A program seen in several blocks is
    /// merged into one entry; for repeated keys the last occurrence wins.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::from_outcome(parse_blocks(text))
    }

    #[must_use]
    pub fn from_outcome(outcome: ParseOutcome) -> Self {
        let mut document = Self::new();
        for program in outcome.blocks.into_iter().flat_map(|block| block.programs) {
            document.merge(program);
        }
        document
    }

    fn merge(&mut self, incoming: ProgramConfig) {
        match self.programs.get_mut(incoming.name()) {
            Some(existing) => {
                for (key, value) in incoming.iter() {
                    existing.put_tagged(key, value.clone());
                }
            },
            None => {
                self.programs.insert(incoming.name().to_owned(), incoming);
            },
        }
    }

    #[must_use]
    pub fn program(&self, name: &str) -> Option<&ProgramConfig> {
        self.programs.get(name)
    }

    /// The program config for `name`, created empty if unseen.
    pub fn program_mut(&mut self, name: &str) -> &mut ProgramConfig {
        self.programs.entry(name.to_owned()).or_insert_with(|| {
            if !is_storable_program_name(name) {
                warn!(target: "tilt::document", program = name, "Program name cannot be saved");
            }
            info!(target: "tilt::document", program = name, "Creating program config");
            ProgramConfig::new(name)
        })
    }

    pub fn remove_program(&mut self, name: &str) -> Option<ProgramConfig> {
        self.programs.remove(name)
    }

    /// Program configs in ascending name order.
    pub fn programs(&self) -> impl Iterator<Item = &ProgramConfig> {
        self.programs.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    pub fn clear(&mut self) {
        self.programs.clear();
    }

    /// Every `(program, key, rendered value)` triple in serialization order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String, String)> {
        self.programs()
            .flat_map(|p| p.iter().map(|(k, v)| (p.name().to_owned(), k.to_owned(), v.to_string())))
            .collect()
    }
}

/// `[autonomous]`, the sorted program lines, then one blank line.
impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", Section::AUTONOMOUS)?;
        for program in self.programs().filter(|p| is_storable_program_name(p.name())) {
            write!(f, "{program}")?;
        }
        writeln!(f)
    }
}
