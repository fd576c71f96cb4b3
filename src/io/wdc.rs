//! Readers for Kyoto World Data Center (WDC) index files.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::SwmfDataErr;

/// A minute resolution time series of one geomagnetic index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexSeries<T> {
    /// Time of each sample, in UT.
    pub times: Vec<NaiveDateTime>,
    /// One value per entry in `times`.
    pub values: Vec<T>,
}

impl<T> IndexSeries<T> {
    fn push(&mut self, time: NaiveDateTime, value: T) {
        self.times.push(time);
        self.values.push(value);
    }
}

/// Auroral electrojet indices read from a WDC AE file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AeIndices {
    /// The AL lower envelope index, nT.
    pub al: IndexSeries<i32>,
    /// The AE index (AU - AL), nT.
    pub ae: IndexSeries<i32>,
    /// The AO mean index, nT.
    pub ao: IndexSeries<i32>,
    /// The AU upper envelope index, nT.
    pub au: IndexSeries<i32>,
}

/// ASY/SYM indices read from a WDC ASY/SYM file.
///
/// The bad data sentinel 99999 is mapped to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsySymIndices {
    /// Edition field from the file header.
    pub edition: String,
    /// Asymmetric disturbance, declination component, nT.
    pub asy_d: IndexSeries<Option<i32>>,
    /// Asymmetric disturbance, horizontal component, nT.
    pub asy_h: IndexSeries<Option<i32>>,
    /// Symmetric disturbance, declination component, nT.
    pub sym_d: IndexSeries<Option<i32>>,
    /// Symmetric disturbance, horizontal component, nT.
    pub sym_h: IndexSeries<Option<i32>>,
}

/// Read auroral electrojet (AE) indices from a WDC text file.
///
/// Files of this kind come from <http://wdc.kugi.kyoto-u.ac.jp/>. Each data
/// line holds one hour of minute data for one of the AL/AE/AO/AU indices.
pub fn read_wdc_ae(path: &dyn AsRef<Path>) -> Result<AeIndices, SwmfDataErr> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);

    let mut header = String::new();
    reader.read_line(&mut header)?;
    if !header.starts_with("AEALAOAU") {
        return Err(SwmfDataErr::UnrecognizedFormat("WDC AE"));
    }

    let mut indices = AeIndices::default();

    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 63 {
            return Err(SwmfDataErr::MalformedRow(line.clone()));
        }

        // The second field packs date, hour, and index name into one tag
        // sliced by character position, yymmdd at the front, the hour at
        // offset 7, and the index name at the end.
        let tag = fields[1];
        if tag.len() < 11 || !tag.is_ascii() {
            return Err(SwmfDataErr::MalformedRow(line.clone()));
        }
        let year = expand_year(tag[0..2].parse()?);
        let month: u32 = tag[2..4].parse()?;
        let day: u32 = tag[4..6].parse()?;
        let hour: u32 = tag[7..9].parse()?;
        let index_name = &tag[tag.len() - 2..];

        let series = match index_name {
            "AL" => &mut indices.al,
            "AE" => &mut indices.ae,
            "AO" => &mut indices.ao,
            "AU" => &mut indices.au,
            _ => return Err(SwmfDataErr::MalformedRow(line.clone())),
        };

        let base = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .ok_or_else(|| SwmfDataErr::MalformedRow(line.clone()))?;
        for (minute, value) in fields[3..63].iter().enumerate() {
            let time = base + chrono::Duration::minutes(minute as i64);
            series.push(time, value.parse()?);
        }
    }

    Ok(indices)
}

/// Read ASY/SYM indices from a WDC text file.
///
/// Files of this kind come from <http://wdc.kugi.kyoto-u.ac.jp/aeasy/>. The
/// date, component, and index name live in fixed character columns; the 60
/// minute values are whitespace delimited.
pub fn read_wdc_asy_sym(path: &dyn AsRef<Path>) -> Result<AsySymIndices, SwmfDataErr> {
    const BAD_VALUE: i32 = 99999;

    let mut reader = BufReader::new(File::open(path.as_ref())?);

    let mut header = String::new();
    reader.read_line(&mut header)?;
    if !header.starts_with("ASYSYM N6E01") {
        return Err(SwmfDataErr::UnrecognizedFormat("WDC ASY/SYM"));
    }

    let mut indices = AsySymIndices::default();
    if let Some(edition) = header.get(24..34) {
        indices.edition = edition.trim().to_owned();
    }

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if line.len() < 24 || !line.is_ascii() {
            return Err(SwmfDataErr::MalformedRow(line.clone()));
        }

        let year = expand_year_asy(line[12..14].parse()?);
        let month: u32 = line[14..16].parse()?;
        let day: u32 = line[16..18].parse()?;
        let hour: u32 = line[19..21].parse()?;
        let component = &line[18..19];
        let index_name = &line[21..24];

        let series = match (index_name, component) {
            ("ASY", "D") => &mut indices.asy_d,
            ("ASY", "H") => &mut indices.asy_h,
            ("SYM", "D") => &mut indices.sym_d,
            ("SYM", "H") => &mut indices.sym_h,
            _ => return Err(SwmfDataErr::MalformedRow(line.clone())),
        };

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 62 {
            return Err(SwmfDataErr::MalformedRow(line.clone()));
        }

        let base = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .ok_or_else(|| SwmfDataErr::MalformedRow(line.clone()))?;
        for (minute, value) in fields[2..62].iter().enumerate() {
            let time = base + chrono::Duration::minutes(minute as i64);
            let value: i32 = value.parse()?;
            let value = if value == BAD_VALUE { None } else { Some(value) };
            series.push(time, value);
        }
    }

    Ok(indices)
}

// WDC AE files carry two digit years.
fn expand_year(suffix: i32) -> i32 {
    if suffix < 50 {
        2000 + suffix
    } else {
        1900 + suffix
    }
}

// The ASY/SYM record starts in 1970, so the pivot differs from the AE one.
fn expand_year_asy(suffix: i32) -> i32 {
    if suffix < 70 {
        2000 + suffix
    } else {
        1900 + suffix
    }
}

#[cfg(test)]
mod unit {
    use super::*;

    use std::io::Write;

    use tempdir::TempDir;

    fn sixty(start: i32) -> String {
        (0..60)
            .map(|minute| format!("{}", start + minute))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_read_wdc_ae() {
        let tmp = TempDir::new("wdc-ae-test").expect("Failed to make temp dir.");
        let path = tmp.path().join("wdc_ae.dat");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "AEALAOAU index hourly file").unwrap();
        writeln!(file, "AEAL 140218P05AL X123 {} 999", sixty(-100)).unwrap();
        writeln!(file, "AEAU 140218P05AU X123 {} 999", sixty(50)).unwrap();
        drop(file);

        let indices = read_wdc_ae(&path).expect("Error reading AE file.");

        assert_eq!(indices.al.times.len(), 60);
        assert_eq!(indices.au.times.len(), 60);
        assert!(indices.ae.times.is_empty());
        assert!(indices.ao.times.is_empty());

        assert_eq!(indices.al.values[0], -100);
        assert_eq!(indices.al.values[59], -41);
        assert_eq!(
            indices.al.times[0],
            NaiveDate::from_ymd(2014, 2, 18).and_hms(5, 0, 0)
        );
        assert_eq!(
            indices.al.times[59],
            NaiveDate::from_ymd(2014, 2, 18).and_hms(5, 59, 0)
        );
    }

    #[test]
    fn test_read_wdc_ae_wrong_header() {
        let tmp = TempDir::new("wdc-ae-test").expect("Failed to make temp dir.");
        let path = tmp.path().join("not_ae.dat");
        std::fs::write(&path, "SOMETHING ELSE\n").unwrap();

        match read_wdc_ae(&path) {
            Err(SwmfDataErr::UnrecognizedFormat(fmt)) => assert_eq!(fmt, "WDC AE"),
            other => panic!("expected UnrecognizedFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_read_wdc_ae_bad_date_is_malformed() {
        let tmp = TempDir::new("wdc-ae-test").expect("Failed to make temp dir.");
        let path = tmp.path().join("wdc_ae.dat");

        // Month 99 in the tag.
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "AEALAOAU index hourly file").unwrap();
        writeln!(file, "AEAL 149918P05AL X123 {} 999", sixty(-100)).unwrap();
        drop(file);

        match read_wdc_ae(&path) {
            Err(SwmfDataErr::MalformedRow(_)) => {}
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_wdc_ae_non_ascii_tag_is_malformed() {
        let tmp = TempDir::new("wdc-ae-test").expect("Failed to make temp dir.");
        let path = tmp.path().join("wdc_ae.dat");

        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "AEALAOAU index hourly file").unwrap();
        writeln!(file, "AEAL 14\u{e9}218P05AL X123 {} 999", sixty(-100)).unwrap();
        drop(file);

        match read_wdc_ae(&path) {
            Err(SwmfDataErr::MalformedRow(_)) => {}
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_read_wdc_asy_sym() {
        let tmp = TempDir::new("wdc-asy-test").expect("Failed to make temp dir.");
        let path = tmp.path().join("wdc_asy.dat");

        // Fixed columns: index 12..14 year, 14..16 month, 16..18 day,
        // 18 component, 19..21 hour, 21..24 index name.
        let mut values = sixty(10);
        values.push_str(" 25");
        let data_line = format!("ASYSYM N6E01140218H05SYM {}", values);
        assert_eq!(&data_line[12..14], "14");
        assert_eq!(&data_line[18..19], "H");
        assert_eq!(&data_line[21..24], "SYM");

        // Edition lives in header columns 24..34.
        let contents = format!(
            "ASYSYM N6E01 ASY/SYM    VERS.01.0 hourly values\n{}\n",
            data_line
        );
        std::fs::write(&path, contents).unwrap();

        let indices = read_wdc_asy_sym(&path).expect("Error reading ASY/SYM file.");

        assert_eq!(indices.edition, "VERS.01.0");
        assert_eq!(indices.sym_h.times.len(), 60);
        assert_eq!(indices.sym_h.values[0], Some(10));
        assert!(indices.asy_d.times.is_empty());
        assert_eq!(
            indices.sym_h.times[0],
            NaiveDate::from_ymd(2014, 2, 18).and_hms(5, 0, 0)
        );
    }

    #[test]
    fn test_read_wdc_asy_sym_bad_values_are_none() {
        let tmp = TempDir::new("wdc-asy-test").expect("Failed to make temp dir.");
        let path = tmp.path().join("wdc_asy.dat");

        let mut values: Vec<String> = (0..60).map(|v| v.to_string()).collect();
        values[3] = "99999".to_owned();
        let data_line = format!("ASYSYM N6E01140218D05ASY {} 25", values.join(" "));

        let contents = format!("ASYSYM N6E01 ASY/SYM    VERS.01.0 hourly values\n{}\n", data_line);
        std::fs::write(&path, contents).unwrap();

        let indices = read_wdc_asy_sym(&path).expect("Error reading ASY/SYM file.");

        assert_eq!(indices.asy_d.values[2], Some(2));
        assert_eq!(indices.asy_d.values[3], None);
    }

    #[test]
    fn test_read_wdc_asy_sym_bad_hour_is_malformed() {
        let tmp = TempDir::new("wdc-asy-test").expect("Failed to make temp dir.");
        let path = tmp.path().join("wdc_asy.dat");

        // Hour 25 in the fixed columns.
        let data_line = format!("ASYSYM N6E01140218H25SYM {} 25", sixty(10));
        let contents = format!(
            "ASYSYM N6E01 ASY/SYM    VERS.01.0 hourly values\n{}\n",
            data_line
        );
        std::fs::write(&path, contents).unwrap();

        match read_wdc_asy_sym(&path) {
            Err(SwmfDataErr::MalformedRow(_)) => {}
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }
}
