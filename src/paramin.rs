//! Tools to script the reading and editing of `PARAM.in` command files.
//!
//! A `PARAM.in` file is a line oriented text format. A line whose first
//! whitespace delimited token starts with `#` is a command marker, e.g.
//! `#STARTTIME`. The marker line plus every following line up to the next
//! marker (or the end of the file) forms a command block; each non-marker
//! line holds a parameter value in its first token with an optional trailing
//! comment.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use crate::errors::SwmfDataErr;

mod read;
mod write;

pub use self::write::ParamRow;

/// An in-memory `PARAM.in` document.
///
/// A document is an ordered sequence of lines and is never mutated after it
/// is built; editing operations return a new document. Load one at the start
/// of an operation, read or replace commands, and serialize the result with
/// [`Document::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    /// Load a document from a file.
    pub fn load(path: &dyn AsRef<Path>) -> Result<Self, SwmfDataErr> {
        let mut text = String::new();
        File::open(path.as_ref())?.read_to_string(&mut text)?;

        Ok(Document::from(text.as_str()))
    }

    /// Build a document from already split lines.
    pub fn from_lines(lines: Vec<String>) -> Self {
        Document { lines }
    }

    /// The lines of the document, in file order, without line terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Serialize the document to a file, overwriting any existing content.
    ///
    /// The document is always complete in memory before this is called, so a
    /// failed edit never leaves a half written destination behind.
    pub fn save(&self, path: &dyn AsRef<Path>) -> Result<(), SwmfDataErr> {
        let mut out = BufWriter::new(File::create(path.as_ref())?);
        for line in &self.lines {
            out.write_all(line.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()?;

        Ok(())
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Document {
        Document {
            lines: text.lines().map(str::to_owned).collect(),
        }
    }
}

/// Return the command marker on a line, if there is one.
///
/// The marker is the first whitespace delimited token when that token starts
/// with the `#` sigil. Matching is case sensitive.
pub fn command_marker(line: &str) -> Option<&str> {
    let first = line.split_whitespace().next()?;

    if first.starts_with('#') {
        Some(first)
    } else {
        None
    }
}
