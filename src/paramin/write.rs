use std::collections::HashMap;

use super::{command_marker, Document};

use crate::errors::SwmfDataErr;

// Field layout of newly written parameter lines. Values are right justified
// in fixed width columns and the comment starts at a fixed column, the same
// layout convention SWMF input files use.
const VALUE_WIDTH: usize = 7;
const COMMENT_COLUMN: usize = 24;

/// One replacement parameter line: its value fields plus an optional
/// trailing comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRow {
    values: Vec<String>,
    comment: Option<String>,
}

impl ParamRow {
    /// Make a row from its value fields.
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ParamRow {
            values: values.into_iter().map(|v| v.as_ref().to_owned()).collect(),
            comment: None,
        }
    }

    /// Attach a trailing comment to the row.
    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = Some(comment.into());
        self
    }

    // Render the row as a parameter line. Fails if any field cannot be a
    // single token on a single line.
    fn format(&self) -> Result<String, SwmfDataErr> {
        let mut fields = Vec::with_capacity(self.values.len());
        for value in &self.values {
            if value.split_whitespace().count() != 1 {
                return Err(SwmfDataErr::MalformedRow(format!(
                    "value {:?} is not a single token",
                    value
                )));
            }
            fields.push(format!("{:>width$}", value, width = VALUE_WIDTH));
        }

        let mut line = fields.join(" ");

        if let Some(ref comment) = self.comment {
            if comment.contains('\n') {
                return Err(SwmfDataErr::MalformedRow(format!(
                    "comment {:?} spans multiple lines",
                    comment
                )));
            }
            while line.len() < COMMENT_COLUMN {
                line.push(' ');
            }
            line.push_str(comment);
        }

        Ok(line)
    }
}

impl Document {
    /// Replace the parameter lines of commands in this document.
    ///
    /// For every marker in `replacements` (case sensitive, `#` sigil
    /// included), each occurrence of that command in the document keeps its
    /// marker line, gets one newly formatted line per supplied [`ParamRow`],
    /// and loses its original parameter lines. Repeat commands are all
    /// replaced. Every line belonging to a non-targeted command is copied
    /// through verbatim, comments and whitespace included.
    ///
    /// The new document is assembled fully in memory; on error nothing has
    /// been produced and the source document is untouched. Serialize the
    /// result with [`Document::save`] when a file is wanted.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::collections::HashMap;
    /// use swmf_data::{Document, ParamRow};
    ///
    /// let mut change = HashMap::new();
    /// change.insert(
    ///     "#SOLARWINDFILE".to_owned(),
    ///     vec![
    ///         ParamRow::new(&["T"]).comment("UseSolarWindFile"),
    ///         ParamRow::new(&["new_imf.dat"]).comment("NameSolarWindFile"),
    ///     ],
    /// );
    ///
    /// let template = Document::load(&"PARAM.in.template")?;
    /// template.replace_commands(&change)?.save(&"PARAM.in")?;
    /// # Ok::<(), swmf_data::SwmfDataErr>(())
    /// ```
    pub fn replace_commands(
        &self,
        replacements: &HashMap<String, Vec<ParamRow>>,
    ) -> Result<Document, SwmfDataErr> {
        // Format every row up front so a malformed row aborts the whole
        // operation before any output exists.
        let mut formatted: HashMap<&str, Vec<String>> = HashMap::new();
        for (marker, rows) in replacements {
            let lines = rows
                .iter()
                .map(ParamRow::format)
                .collect::<Result<Vec<_>, _>>()?;
            formatted.insert(marker.as_str(), lines);
        }

        let mut new_lines = Vec::with_capacity(self.lines().len());
        let mut in_replaced_block = false;

        for line in self.lines() {
            if let Some(marker) = command_marker(line) {
                in_replaced_block = false;
                new_lines.push(line.clone());

                if let Some(replacement_lines) = formatted.get(marker) {
                    new_lines.extend(replacement_lines.iter().cloned());
                    in_replaced_block = true;
                }
            } else if !in_replaced_block {
                new_lines.push(line.clone());
            }
        }

        Ok(Document::from_lines(new_lines))
    }
}
