//! Downloaders for externally hosted space weather data sets.
//!
//! Everything here blocks for the duration of the transfer and surfaces
//! failures immediately; nothing retries. Since supercomputers commonly cut
//! network access during a job, run these while preprocessing and keep the
//! results on disk.

use std::{
    collections::{BTreeSet, HashMap},
    fs,
    io::Read,
    path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use flate2::read::GzDecoder;
use regex::Regex;
use reqwest::{blocking::Client, StatusCode};
use strum_macros::{AsStaticStr, EnumIter, EnumString};

use crate::errors::SwmfDataErr;
use crate::io::ImfData;
use crate::tools::interp_nans;

static OMNI_URL: &str = "https://spdf.gsfc.nasa.gov/pub/data/omni/high_res_omni/monthly_1min/";
static ADAPT_URL: &str = "https://gong2.nso.edu/adapt/maps/gong/";

/// The data columns of the high resolution OMNI set, as pairs of the
/// original spdf format-guide name and a short name.
pub const OMNI_COLS: [(&str, &str); 42] = [
    ("ID for IMF spacecraft", "id_imf"),
    ("ID for SW Plasma spacecraft", "id_plasma"),
    ("# of points in IMF averages", "num_avg_imf"),
    ("# of points in Plasma averages", "num_avg_plasma"),
    ("Percent interp", "interp"),
    ("Timeshift, sec", "timeshift"),
    ("RMS, Timeshift", "rms_timeshift"),
    ("RMS, Phase front normal", "rms_phase"),
    ("Time btwn observations, sec", "delta_time"),
    ("Field magnitude average, nT", "b"),
    ("Bx, nT (GSE, GSM)", "bx"),
    ("By, nT (GSE)", "by_gse"),
    ("Bz, nT (GSE)", "bz_gse"),
    ("By, nT (GSM)", "by"),
    ("Bz, nT (GSM)", "bz"),
    ("RMS SD B scalar, nT", "rms_sd_b"),
    ("RMS SD field vector, nT", "rms_sd_field"),
    ("Flow speed, km/s", "v"),
    ("Vx Velocity, km/s, GSE", "vx"),
    ("Vy Velocity, km/s, GSE", "vy"),
    ("Vz Velocity, km/s, GSE", "vz"),
    ("Proton Density, n/cc", "density"),
    ("Temperature, K", "temperature"),
    ("Flow pressure, nPa", "pressure"),
    ("Electric field, mV/m", "e"),
    ("Plasma beta", "beta"),
    ("Alfven mach number", "alfven_mach"),
    ("X(s/c), GSE, Re", "x_gse"),
    ("Y(s/c), GSE, Re", "y_gse"),
    ("Z(s/c), GSE, Re", "z_gse"),
    ("BSN location, Xgse, Re", "bsn_x"),
    ("BSN location, Ygse, Re", "bsn_y"),
    ("BSN location, Zgse, Re", "bsn_z"),
    ("AE-index, nT", "ae"),
    ("AL-index, nT", "al"),
    ("AU-index, nT", "au"),
    ("SYM/D index, nT", "sym_d"),
    ("SYM/H index, nT", "sym_h"),
    ("ASY/D index, nT", "asy_d"),
    ("ASY/H index, nT", "asy_h"),
    ("PC(N) index", "pc_n"),
    ("Magnetosonic mach number", "ms_mach"),
];

/// Options for [`OmniDownloader::get`].
#[derive(Debug, Clone, Default)]
pub struct OmniOptions {
    /// Key the columns by the original spdf format-guide names instead of
    /// the short names. Off by default.
    pub original_colnames: bool,
}

/// OMNI solar wind data parsed into columns.
///
/// Every column of [`OMNI_COLS`] is present; washed out samples are `None`.
#[derive(Debug, Clone, Default)]
pub struct OmniData {
    /// Sample times, in UT.
    pub times: Vec<NaiveDateTime>,
    /// Column names, in spdf column order.
    pub columns: Vec<String>,
    /// Column name to that column's values, one per entry in `times`.
    pub data: HashMap<String, Vec<Option<f64>>>,
}

/// Downloads OMNI solar wind data from
/// <https://spdf.gsfc.nasa.gov/pub/data/omni>.
///
/// The downloader keeps each monthly file it has fetched in an in-memory
/// cache keyed by `(year, month)`, so repeated queries over the same storm
/// interval hit the network once. The cache belongs to the caller: inspect
/// it with [`OmniDownloader::cached_months`] and drop it with
/// [`OmniDownloader::clear_cache`].
#[derive(Debug, Default)]
pub struct OmniDownloader {
    client: Client,
    cache: HashMap<(i32, u32), String>,
}

impl OmniDownloader {
    /// Make a downloader with an empty cache.
    pub fn new() -> Self {
        OmniDownloader {
            client: Client::new(),
            cache: HashMap::new(),
        }
    }

    /// The `(year, month)` keys currently held in the cache.
    pub fn cached_months(&self) -> Vec<(i32, u32)> {
        let mut months: Vec<_> = self.cache.keys().cloned().collect();
        months.sort();
        months
    }

    /// Drop every cached monthly file.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Retrieve OMNI data between two times.
    ///
    /// Downloads the monthly high resolution files covering `[from, to]`
    /// and keeps the samples inside the interval.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use chrono::NaiveDate;
    /// use swmf_data::{OmniDownloader, OmniOptions};
    ///
    /// let storm_start = NaiveDate::from_ymd(2000, 1, 1).and_hms(0, 0, 0);
    /// let storm_end = NaiveDate::from_ymd(2000, 2, 15).and_hms(0, 0, 0);
    ///
    /// let mut downloader = OmniDownloader::new();
    /// let data = downloader.get(storm_start, storm_end, &OmniOptions::default())?;
    /// # Ok::<(), swmf_data::SwmfDataErr>(())
    /// ```
    pub fn get(
        &mut self,
        from: NaiveDateTime,
        to: NaiveDateTime,
        options: &OmniOptions,
    ) -> Result<OmniData, SwmfDataErr> {
        let columns: Vec<String> = OMNI_COLS
            .iter()
            .map(|(original, short)| {
                if options.original_colnames {
                    (*original).to_owned()
                } else {
                    (*short).to_owned()
                }
            })
            .collect();

        let mut data = OmniData {
            times: Vec::new(),
            columns: columns.clone(),
            data: columns
                .iter()
                .map(|name| (name.clone(), Vec::new()))
                .collect(),
        };

        for (year, month) in month_range(from, to) {
            let text = self.fetch_month(year, month)?;
            parse_omni_month(text, from, to, &mut data)?;
        }

        Ok(data)
    }

    // Download one monthly file, or serve it from the cache.
    fn fetch_month(&mut self, year: i32, month: u32) -> Result<&str, SwmfDataErr> {
        if !self.cache.contains_key(&(year, month)) {
            let url = format!("{}omni_min{}{:02}.asc", OMNI_URL, year, month);

            let response = self.client.get(&url).send()?;
            match response.status() {
                StatusCode::OK => {
                    self.cache.insert((year, month), response.text()?);
                }
                StatusCode::NOT_FOUND => return Err(SwmfDataErr::RemoteFileNotFound(url)),
                code => return Err(SwmfDataErr::UrlStatus(url, code)),
            }
        }

        Ok(&self.cache[&(year, month)])
    }
}

// The (year, month) pairs whose monthly files cover [from, to].
fn month_range(from: NaiveDateTime, to: NaiveDateTime) -> Vec<(i32, u32)> {
    let mut months = Vec::new();
    let (mut year, mut month) = (from.year(), from.month());

    while (year, month) <= (to.year(), to.month()) {
        months.push((year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    months
}

// Parse the rows of one monthly 1-minute OMNI file into `data`, keeping
// samples within [from, to]. Timestamps use day of year.
fn parse_omni_month(
    text: &str,
    from: NaiveDateTime,
    to: NaiveDateTime,
    data: &mut OmniData,
) -> Result<(), SwmfDataErr> {
    for line in text.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() < 4 + data.columns.len() {
            return Err(SwmfDataErr::MalformedRow(line.to_owned()));
        }

        let year: i32 = fields[0].parse()?;
        let day_of_year: u32 = fields[1].parse()?;
        let hour: u32 = fields[2].parse()?;
        let minute: u32 = fields[3].parse()?;
        let time = NaiveDate::from_yo_opt(year, day_of_year)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .ok_or_else(|| SwmfDataErr::MalformedRow(line.to_owned()))?;

        if time < from || time > to {
            continue;
        }

        data.times.push(time);
        for (name, field) in data.columns.iter().zip(&fields[4..]) {
            let value = if is_bad_omni_num(field) {
                None
            } else {
                Some(field.parse::<f64>()?)
            };
            data.data
                .get_mut(name)
                .expect("column initialized above")
                .push(value);
        }
    }

    Ok(())
}

// Bad numbers in OMNI are all 9s, in any of several widths.
fn is_bad_omni_num(field: &str) -> bool {
    !field.is_empty() && field.chars().all(|c| c == '9' || c == '.')
}

/// The kind of GONG ADAPT synoptic map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsStaticStr, EnumIter)]
pub enum MapType {
    /// Carrington-fixed frame maps.
    #[strum(to_string = "fixed", serialize = "Fixed", serialize = "FIXED")]
    Fixed,
    /// Central-meridian frame maps.
    #[strum(to_string = "central", serialize = "Central", serialize = "CENTRAL")]
    Central,
}

impl MapType {
    // Map type digit in the ADAPT file naming scheme.
    fn map_id(self) -> char {
        match self {
            MapType::Fixed => '0',
            MapType::Central => '1',
        }
    }
}

/// Download GONG ADAPT magnetograms near a time.
///
/// Fetches the year index of <https://gong2.nso.edu/adapt/maps/gong/>,
/// downloads every public GONG ADAPT map matching
/// `adapt4[01]3*yyyymmddhh*` for the requested map type, gunzips them, and
/// returns the local paths of the unzipped files. ADAPT only publishes even
/// hours, so an odd hour is rounded down.
///
/// Fails with [`SwmfDataErr::RemoteDirNotFound`] when the year directory is
/// absent on the server and [`SwmfDataErr::RemoteFileNotFound`] when no map
/// matches the requested time.
///
/// # Examples
///
/// ```no_run
/// use chrono::NaiveDate;
/// use swmf_data::{download_magnetogram_adapt, MapType};
///
/// let time_flare = NaiveDate::from_ymd(2018, 2, 12).and_hms(10, 0, 0);
/// let client = reqwest::blocking::Client::new();
/// let maps = download_magnetogram_adapt(&client, time_flare, MapType::Central, &"./mymaps")?;
/// # Ok::<(), swmf_data::SwmfDataErr>(())
/// ```
pub fn download_magnetogram_adapt(
    client: &Client,
    time: NaiveDateTime,
    map_type: MapType,
    download_dir: &dyn AsRef<Path>,
) -> Result<Vec<PathBuf>, SwmfDataErr> {
    let year_url = format!("{}{}/", ADAPT_URL, time.year());

    let response = client.get(&year_url).send()?;
    let listing = match response.status() {
        StatusCode::OK => response.text()?,
        StatusCode::NOT_FOUND => return Err(SwmfDataErr::RemoteDirNotFound(year_url)),
        code => return Err(SwmfDataErr::UrlStatus(year_url, code)),
    };

    let pattern = adapt_file_pattern(time, map_type);
    let file_names = match_adapt_files(&listing, &pattern);
    if file_names.is_empty() {
        return Err(SwmfDataErr::RemoteFileNotFound(format!(
            "{}{}",
            year_url,
            pattern.as_str()
        )));
    }

    fs::create_dir_all(download_dir.as_ref())?;

    let mut local_paths = Vec::with_capacity(file_names.len());
    for file_name in file_names {
        let url = format!("{}{}", year_url, file_name);

        let response = client.get(&url).send()?;
        let bytes = match response.status() {
            StatusCode::OK => response.bytes()?,
            StatusCode::NOT_FOUND => return Err(SwmfDataErr::RemoteFileNotFound(url)),
            code => return Err(SwmfDataErr::UrlStatus(url, code)),
        };

        let local_gz = download_dir.as_ref().join(&file_name);
        fs::write(&local_gz, &bytes)?;

        if file_name.ends_with(".gz") {
            let mut unzipped = Vec::new();
            GzDecoder::new(&bytes[..]).read_to_end(&mut unzipped)?;

            let local = download_dir
                .as_ref()
                .join(file_name.trim_end_matches(".gz"));
            fs::write(&local, &unzipped)?;
            local_paths.push(local);
        } else {
            local_paths.push(local_gz);
        }
    }

    Ok(local_paths)
}

// Only the public (4) GONG (3) ADAPT maps are considered, with the map type
// selecting the Carrington-fixed (0) or central-meridian (1) frame.
fn adapt_file_pattern(time: NaiveDateTime, map_type: MapType) -> Regex {
    let even_hour = time.hour() / 2 * 2;
    let stamp = format!(
        "{:04}{:02}{:02}{:02}",
        time.year(),
        time.month(),
        time.day(),
        even_hour
    );

    let pattern = format!(
        r#"adapt4{}3[0-9a-z_]*{}[0-9a-z_.]*\.fts(?:\.gz)?"#,
        map_type.map_id(),
        stamp
    );

    Regex::new(&pattern).expect("static pattern")
}

// Names in the listing appear once in the href and once as link text, so
// dedup while keeping them ordered.
fn match_adapt_files(listing: &str, pattern: &Regex) -> Vec<String> {
    let unique: BTreeSet<String> = pattern
        .find_iter(listing)
        .map(|m| m.as_str().to_owned())
        .collect();
    unique.into_iter().collect()
}

/// Download OMNI data for a time range and write it as an `IMF.dat` file.
///
/// Gaps in the OMNI record are filled by linear interpolation in time
/// before writing, since the model cannot digest missing samples. Returns
/// the data that was written.
pub fn write_imf_from_omni(
    downloader: &mut OmniDownloader,
    from: NaiveDateTime,
    to: NaiveDateTime,
    path: &dyn AsRef<Path>,
) -> Result<ImfData, SwmfDataErr> {
    let omni = downloader.get(from, to, &OmniOptions::default())?;

    let seconds: Vec<f64> = omni
        .times
        .iter()
        .map(|time| time.timestamp() as f64)
        .collect();

    let filled_column = |name: &str| -> Result<Vec<f64>, SwmfDataErr> {
        let column = omni
            .data
            .get(name)
            .ok_or_else(|| SwmfDataErr::MissingColumn(name.to_owned()))?;
        let raw: Vec<f64> = column
            .iter()
            .map(|value| value.unwrap_or(std::f64::NAN))
            .collect();
        Ok(interp_nans(&seconds, &raw))
    };

    let imf_data = ImfData {
        times: omni.times.clone(),
        bx: filled_column("bx")?,
        by: filled_column("by")?,
        bz: filled_column("bz")?,
        vx: filled_column("vx")?,
        vy: filled_column("vy")?,
        vz: filled_column("vz")?,
        density: filled_column("density")?,
        temperature: filled_column("temperature")?,
    };

    imf_data.write(path, &Default::default())?;

    Ok(imf_data)
}

#[cfg(test)]
mod unit {
    use super::*;

    use std::str::FromStr;

    #[test]
    fn test_month_range() {
        let from = NaiveDate::from_ymd(2012, 12, 1).and_hms(0, 0, 0);
        let to = NaiveDate::from_ymd(2013, 2, 15).and_hms(0, 0, 0);

        assert_eq!(
            month_range(from, to),
            [(2012, 12), (2013, 1), (2013, 2)]
        );

        let single = month_range(from, from);
        assert_eq!(single, [(2012, 12)]);
    }

    #[test]
    fn test_is_bad_omni_num() {
        assert!(is_bad_omni_num("9999.99"));
        assert!(is_bad_omni_num("99999"));
        assert!(!is_bad_omni_num("9999.98"));
        assert!(!is_bad_omni_num("19.99"));
        assert!(!is_bad_omni_num(""));
    }

    #[test]
    fn test_parse_omni_month() {
        // Two rows of the 1-minute format: year, doy, hour, minute, then
        // the 42 data columns, with a bad sentinel in the Bx column.
        let mut values: Vec<String> = (0..42).map(|i| format!("{}.5", i)).collect();
        values[10] = "9999.99".to_owned();
        let row = values.join(" ");
        let text = format!(
            "2014 33 0 0 {}\n2014 33 0 1 {}\n2014 33 0 2 {}\n",
            row, row, row
        );

        let from = NaiveDate::from_ymd(2014, 2, 2).and_hms(0, 0, 0);
        let to = NaiveDate::from_ymd(2014, 2, 2).and_hms(0, 1, 0);

        let columns: Vec<String> = OMNI_COLS.iter().map(|(_, s)| (*s).to_owned()).collect();
        let mut data = OmniData {
            times: Vec::new(),
            columns: columns.clone(),
            data: columns
                .iter()
                .map(|name| (name.clone(), Vec::new()))
                .collect(),
        };

        parse_omni_month(&text, from, to, &mut data).expect("Error parsing omni month.");

        // The third row is outside [from, to].
        assert_eq!(data.times.len(), 2);
        assert_eq!(
            data.times[0],
            NaiveDate::from_ymd(2014, 2, 2).and_hms(0, 0, 0)
        );

        assert_eq!(data.data["bx"], [None, None]);
        assert_eq!(data.data["b"], [Some(9.5), Some(9.5)]);
        assert_eq!(data.data["ms_mach"], [Some(41.5), Some(41.5)]);
    }

    #[test]
    fn test_parse_omni_month_bad_timestamp() {
        // Day of year 366 does not exist in 2014.
        let values: Vec<String> = (0..42).map(|i| format!("{}.5", i)).collect();
        let text = format!("2014 366 0 0 {}\n", values.join(" "));

        let from = NaiveDate::from_ymd(2014, 1, 1).and_hms(0, 0, 0);
        let to = NaiveDate::from_ymd(2015, 1, 1).and_hms(0, 0, 0);

        let columns: Vec<String> = OMNI_COLS.iter().map(|(_, s)| (*s).to_owned()).collect();
        let mut data = OmniData {
            times: Vec::new(),
            columns: columns.clone(),
            data: columns
                .iter()
                .map(|name| (name.clone(), Vec::new()))
                .collect(),
        };

        match parse_omni_month(&text, from, to, &mut data) {
            Err(SwmfDataErr::MalformedRow(_)) => {}
            other => panic!("expected MalformedRow, got {:?}", other),
        }
    }

    #[test]
    fn test_map_type_from_str() {
        assert_eq!(MapType::from_str("fixed").unwrap(), MapType::Fixed);
        assert_eq!(MapType::from_str("Central").unwrap(), MapType::Central);
        assert!(MapType::from_str("sideways").is_err());
    }

    #[test]
    fn test_adapt_file_pattern() {
        let time = NaiveDate::from_ymd(2016, 2, 3).and_hms(3, 1, 1);

        // Hour 3 rounds down to the even hour 02.
        let pattern = adapt_file_pattern(time, MapType::Fixed);
        assert!(pattern.is_match("adapt40311_03k012_201602030200_i00015600n1.fts.gz"));
        assert!(!pattern.is_match("adapt41311_03k012_201602030200_i00015600n1.fts.gz"));
        assert!(!pattern.is_match("adapt40311_03k012_201602040200_i00015600n1.fts.gz"));

        let pattern = adapt_file_pattern(time, MapType::Central);
        assert!(pattern.is_match("adapt41311_03k012_201602030200_i00015600n1.fts.gz"));
    }

    #[test]
    fn test_match_adapt_files_dedups_listing() {
        let time = NaiveDate::from_ymd(2016, 2, 3).and_hms(2, 0, 0);
        let pattern = adapt_file_pattern(time, MapType::Fixed);

        let listing = concat!(
            r#"<a href="adapt40311_03k012_201602030200_i00015600n1.fts.gz">"#,
            "adapt40311_03k012_201602030200_i00015600n1.fts.gz</a>\n",
            r#"<a href="adapt40311_03k012_201602050200_i00015600n1.fts.gz">"#,
            "adapt40311_03k012_201602050200_i00015600n1.fts.gz</a>\n",
        );

        let matches = match_adapt_files(listing, &pattern);
        assert_eq!(
            matches,
            ["adapt40311_03k012_201602030200_i00015600n1.fts.gz"]
        );
    }
}
