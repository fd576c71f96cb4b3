//! Writer for the BATS-R-US solar wind input file, `IMF.dat`.

use std::{fs, path::Path};

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::errors::SwmfDataErr;

// Column width of the .dat layout.
const FIELD_WIDTH: usize = 7;

const COLUMNS_DAT: [&str; 15] = [
    "year", "month", "day", "hour", "min", "sec", "msec", "bx", "by", "bz", "vx", "vy", "vz",
    "density", "temperature",
];

/// Options for [`ImfData::write`].
#[derive(Debug, Clone, Default)]
pub struct ImfWriteOptions {
    /// Extra `#COMMAND` lines to write into the file header, e.g.
    /// `#COOR` followed by `GSE`.
    pub commands: Vec<String>,
}

/// Solar wind data destined for an `IMF.dat` input file.
///
/// All columns must have the same length as `times`; a row whose values
/// contain a NaN is dropped on write, since the model cannot digest gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImfData {
    /// Sample times, in UT.
    pub times: Vec<NaiveDateTime>,
    /// Interplanetary magnetic field x component, nT (GSM).
    pub bx: Vec<f64>,
    /// Interplanetary magnetic field y component, nT (GSM).
    pub by: Vec<f64>,
    /// Interplanetary magnetic field z component, nT (GSM).
    pub bz: Vec<f64>,
    /// Solar wind velocity x component, km/s.
    pub vx: Vec<f64>,
    /// Solar wind velocity y component, km/s.
    pub vy: Vec<f64>,
    /// Solar wind velocity z component, km/s.
    pub vz: Vec<f64>,
    /// Proton density, n/cc.
    pub density: Vec<f64>,
    /// Proton temperature, K.
    pub temperature: Vec<f64>,
}

impl ImfData {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn value_columns(&self) -> [&Vec<f64>; 8] {
        [
            &self.bx,
            &self.by,
            &self.bz,
            &self.vx,
            &self.vy,
            &self.vz,
            &self.density,
            &self.temperature,
        ]
    }

    /// Write the data as an `IMF.dat` file for the SWMF geospace model.
    ///
    /// The whole file is assembled in memory first; on error the destination
    /// is never touched.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use swmf_data::{ImfData, ImfWriteOptions};
    ///
    /// let imf_data = ImfData::default();
    /// imf_data.write(&"run/IMF.dat", &ImfWriteOptions::default())?;
    /// # Ok::<(), swmf_data::SwmfDataErr>(())
    /// ```
    pub fn write(
        &self,
        path: &dyn AsRef<Path>,
        options: &ImfWriteOptions,
    ) -> Result<(), SwmfDataErr> {
        for column in self.value_columns().iter() {
            if column.len() != self.times.len() {
                return Err(SwmfDataErr::MalformedRow(
                    "IMF columns have unequal lengths".to_owned(),
                ));
            }
        }

        let mut contents = String::new();
        contents.push_str("Made with swmf-data ");
        contents.push_str("(https://gitlab.umich.edu/swmf_software/swmf-data)\n\n");

        for command in &options.commands {
            contents.push_str(command);
            contents.push('\n');
        }

        contents.push('\n');
        contents.push_str(&justified_row(COLUMNS_DAT.iter().map(|s| s.to_string())));
        contents.push_str("\n#START\n");

        for row in 0..self.len() {
            let values: Vec<f64> = self.value_columns().iter().map(|col| col[row]).collect();
            if values.iter().any(|v| v.is_nan()) {
                continue;
            }

            let time = self.times[row];
            let fields = time_fields(time)
                .into_iter()
                .chain(values.iter().map(|v| format!("{:.2}", v)));
            contents.push_str(&justified_row(fields));
            contents.push('\n');
        }

        fs::write(path.as_ref(), contents)?;

        Ok(())
    }
}

fn time_fields(time: NaiveDateTime) -> Vec<String> {
    vec![
        format!("{}", time.year()),
        format!("{}", time.month()),
        format!("{}", time.day()),
        format!("{}", time.hour()),
        format!("{}", time.minute()),
        format!("{}", time.second()),
        format!("{}", time.nanosecond() / 1_000_000),
    ]
}

// Right justify every field to the fixed .dat column width.
fn justified_row(fields: impl Iterator<Item = String>) -> String {
    fields
        .map(|field| format!("{:>width$}", field, width = FIELD_WIDTH))
        .collect::<Vec<_>>()
        .join(" ")
}
