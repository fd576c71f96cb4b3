//! Reader for GM (BATS-R-US) model log files.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::SwmfDataErr;

/// Options for [`read_gm_log`].
#[derive(Debug, Clone)]
pub struct GmLogOptions {
    /// Column names to use. When `None` the names come from the second line
    /// of the log file, which is where the model writes them.
    pub columns: Option<Vec<String>>,
    /// Synthesize a UT timestamp per row from the year/month/day/hour/
    /// minute/second/millisecond columns (columns 1 through 7). On by
    /// default.
    pub index_time: bool,
}

impl Default for GmLogOptions {
    fn default() -> Self {
        GmLogOptions {
            columns: None,
            index_time: true,
        }
    }
}

/// A parsed GM model log file.
///
/// The key set is fixed: one entry in `data` per name in `columns`, and a
/// `times` sequence of the same length as the columns when timestamps were
/// requested.
#[derive(Debug, Clone, Default)]
pub struct GmLog {
    /// Free text description from the first line of the file.
    pub description: String,
    /// Column names in file order, duplicates disambiguated.
    pub columns: Vec<String>,
    /// Column name to the column's values. Cells that fail to parse as
    /// floats become NaN.
    pub data: HashMap<String, Vec<f64>>,
    /// Synthesized UT timestamp per row; empty unless requested.
    pub times: Vec<NaiveDateTime>,
}

/// Read the indices a GM model run logged, e.g.
/// `run/GM/IO2/geoindex_e20140215-100500.log`.
///
/// The first line is a description, the second holds the column names, and
/// every line after that is one whitespace delimited row of floats.
///
/// # Examples
///
/// ```no_run
/// use swmf_data::{read_gm_log, GmLogOptions};
///
/// let geo = read_gm_log(&"run/GM/IO2/geoindex_e20140215-100500.log",
///                       &GmLogOptions::default())?;
/// let al = &geo.data["AL"];
/// # Ok::<(), swmf_data::SwmfDataErr>(())
/// ```
pub fn read_gm_log(path: &dyn AsRef<Path>, options: &GmLogOptions) -> Result<GmLog, SwmfDataErr> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);

    let mut description = String::new();
    reader.read_line(&mut description)?;

    let mut name_line = String::new();
    reader.read_line(&mut name_line)?;

    let columns = match options.columns {
        Some(ref names) => names.clone(),
        None => name_line.split_whitespace().map(str::to_owned).collect(),
    };
    let columns = disambiguate(columns);

    let mut data: HashMap<String, Vec<f64>> = columns
        .iter()
        .map(|name| (name.clone(), Vec::new()))
        .collect();

    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        // A short row would leave the columns ragged, a long one would drop
        // values on the floor. Truncated logs are common when a run is
        // killed mid-write.
        if fields.len() != columns.len() {
            return Err(SwmfDataErr::MalformedRow(line.clone()));
        }

        for (name, field) in columns.iter().zip(fields) {
            let value = field.parse::<f64>().unwrap_or(std::f64::NAN);
            data.get_mut(name)
                .expect("column initialized above")
                .push(value);
        }
    }

    let times = if options.index_time {
        index_times(&columns, &data)?
    } else {
        Vec::new()
    };

    Ok(GmLog {
        description: description.trim_end().to_owned(),
        columns,
        data,
        times,
    })
}

// Build the UT timestamp column from the date/time columns. By SWMF log
// convention the iteration counter is column 0 and the date/time fields are
// columns 1..=7.
fn index_times(
    columns: &[String],
    data: &HashMap<String, Vec<f64>>,
) -> Result<Vec<NaiveDateTime>, SwmfDataErr> {
    if columns.len() < 8 {
        return Err(SwmfDataErr::MissingColumn(
            "year..msc (columns 1 through 7)".to_owned(),
        ));
    }

    let col = |idx: usize| -> &Vec<f64> { &data[&columns[idx]] };

    let num_rows = col(1).len();
    let mut times = Vec::with_capacity(num_rows);

    for row in 0..num_rows {
        let time = NaiveDate::from_ymd_opt(
            col(1)[row] as i32,
            col(2)[row] as u32,
            col(3)[row] as u32,
        )
        .and_then(|date| {
            date.and_hms_milli_opt(
                col(4)[row] as u32,
                col(5)[row] as u32,
                col(6)[row] as u32,
                col(7)[row] as u32,
            )
        })
        .ok_or_else(|| {
            SwmfDataErr::MalformedRow(format!("row {} has no valid date/time fields", row))
        })?;
        times.push(time);
    }

    Ok(times)
}

// Rename repeated column names so each one keys its own data column. A
// repeat gets an _{index} suffix.
fn disambiguate(mut columns: Vec<String>) -> Vec<String> {
    for index in 0..columns.len() {
        if columns[..index].contains(&columns[index]) {
            let renamed = format!("{}_{}", columns[index], index);
            columns[index] = renamed;
        }
    }
    columns
}
