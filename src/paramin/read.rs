use super::{command_marker, Document};

use crate::errors::SwmfDataErr;

impl Document {
    /// Get the parameters of a command in this document.
    ///
    /// Finds the first block whose marker equals `marker` (case sensitive,
    /// `#` sigil included) and returns the marker followed by the first token
    /// of each parameter line in file order. Collection stops at the next
    /// command marker or the end of the document.
    ///
    /// Blank and whitespace-only lines inside the block carry no value token
    /// and are skipped, they do not count toward `num_values`.
    ///
    /// Values are returned as strings; numeric conversion is left to the
    /// caller.
    ///
    /// `num_values` bounds how many values are collected, which helps with
    /// files that carry free text after a short parameter list. The returned
    /// vector then holds at most `num_values + 1` elements.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use swmf_data::Document;
    ///
    /// let doc = Document::load(&"PARAM.in")?;
    /// let start_time = doc.read_command("#STARTTIME", None)?;
    /// println!("starting year is {}", start_time[1]);
    /// # Ok::<(), swmf_data::SwmfDataErr>(())
    /// ```
    pub fn read_command(
        &self,
        marker: &str,
        num_values: Option<usize>,
    ) -> Result<Vec<String>, SwmfDataErr> {
        let start = self
            .lines()
            .iter()
            .position(|line| command_marker(line) == Some(marker))
            .ok_or_else(|| SwmfDataErr::CommandNotFound(marker.to_owned()))?;

        let mut values = vec![marker.to_owned()];

        for line in &self.lines()[start + 1..] {
            if command_marker(line).is_some() {
                break;
            }

            if let Some(limit) = num_values {
                if values.len() > limit {
                    break;
                }
            }

            if let Some(token) = line.split_whitespace().next() {
                values.push(token.to_owned());
            }
        }

        Ok(values)
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    const PARAMIN: &str = "\
#STARTTIME
2014
2
2
0
0
0
#SOLARWINDFILE
F
dummy
";

    #[test]
    fn test_read_command() {
        let doc = Document::from(PARAMIN);

        let values = doc.read_command("#STARTTIME", None).unwrap();
        assert_eq!(values, ["#STARTTIME", "2014", "2", "2", "0", "0", "0"]);

        let values = doc.read_command("#SOLARWINDFILE", None).unwrap();
        assert_eq!(values, ["#SOLARWINDFILE", "F", "dummy"]);
    }

    #[test]
    fn test_read_is_idempotent() {
        let doc = Document::from(PARAMIN);

        let first = doc.read_command("#STARTTIME", None).unwrap();
        let second = doc.read_command("#STARTTIME", None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_read_command_not_found() {
        let doc = Document::from(PARAMIN);

        match doc.read_command("#ENDTIME", None) {
            Err(SwmfDataErr::CommandNotFound(cmd)) => assert_eq!(cmd, "#ENDTIME"),
            other => panic!("expected CommandNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_read_command_bounded() {
        let doc = Document::from(PARAMIN);

        // Marker plus exactly two values, the remaining lines are ignored.
        let values = doc.read_command("#STARTTIME", Some(2)).unwrap();
        assert_eq!(values, ["#STARTTIME", "2014", "2"]);

        let values = doc.read_command("#STARTTIME", Some(0)).unwrap();
        assert_eq!(values, ["#STARTTIME"]);
    }

    #[test]
    fn test_read_command_only_first_token_per_line() {
        let doc = Document::from("#SOLARWINDFILE\nT\t\t\tUseSolarWindFile\nimf.dat\t\tNameSolarWindFile\n");

        let values = doc.read_command("#SOLARWINDFILE", None).unwrap();
        assert_eq!(values, ["#SOLARWINDFILE", "T", "imf.dat"]);
    }

    #[test]
    fn test_read_command_skips_blank_lines() {
        let doc = Document::from("#TIMEACCURATE\n\nF\n\n#END\n");

        let values = doc.read_command("#TIMEACCURATE", None).unwrap();
        assert_eq!(values, ["#TIMEACCURATE", "F"]);
    }

    #[test]
    fn test_read_command_with_no_parameters() {
        let doc = Document::from("#RUN\n#END\n");

        let values = doc.read_command("#RUN", None).unwrap();
        assert_eq!(values, ["#RUN"]);
    }
}
