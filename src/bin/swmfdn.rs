//! SWMF input downloader.
//!
//! Downloads OMNI solar wind data for a storm interval and writes it as an
//! `IMF.dat` input file, optionally grabbing the GONG ADAPT magnetograms
//! near the start time as well.

use std::{process, str::FromStr};

use chrono::NaiveDateTime;
use clap::{crate_version, App, Arg};

use swmf_data::{
    download_magnetogram_adapt, errors::SwmfDataErr, write_imf_from_omni, MapType, OmniDownloader,
};

static TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

fn main() {
    if let Err(ref e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), SwmfDataErr> {
    let matches = App::new("swmfdn")
        .about("Download solar wind data and magnetograms for an SWMF run.")
        .version(crate_version!())
        .arg(
            Arg::with_name("start")
                .short("s")
                .long("start")
                .takes_value(true)
                .required(true)
                .help("Start of the interval, e.g. 2014-02-15T00:00:00."),
        )
        .arg(
            Arg::with_name("end")
                .short("e")
                .long("end")
                .takes_value(true)
                .required(true)
                .help("End of the interval, e.g. 2014-02-20T00:00:00."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("IMF.dat")
                .help("File to write the solar wind input to."),
        )
        .arg(
            Arg::with_name("adapt")
                .long("adapt")
                .help("Also download the ADAPT magnetograms nearest the start time."),
        )
        .arg(
            Arg::with_name("map-type")
                .long("map-type")
                .takes_value(true)
                .default_value("fixed")
                .help("ADAPT map type, fixed or central."),
        )
        .arg(
            Arg::with_name("download-dir")
                .long("download-dir")
                .takes_value(true)
                .default_value(".")
                .help("Directory to download magnetograms into."),
        )
        .get_matches();

    let start = parse_time(matches.value_of("start").expect("start is required"))?;
    let end = parse_time(matches.value_of("end").expect("end is required"))?;
    let output = matches.value_of("output").expect("output has a default");

    let mut downloader = OmniDownloader::new();
    let imf_data = write_imf_from_omni(&mut downloader, start, end, &output)?;
    println!("Wrote {} samples to {}.", imf_data.len(), output);

    if matches.is_present("adapt") {
        let map_type = MapType::from_str(matches.value_of("map-type").expect("has a default"))?;
        let download_dir = matches.value_of("download-dir").expect("has a default");

        let client = reqwest::blocking::Client::new();
        let maps = download_magnetogram_adapt(&client, start, map_type, &download_dir)?;

        for map in maps {
            println!("Downloaded {}.", map.display());
        }
    }

    Ok(())
}

fn parse_time(value: &str) -> Result<NaiveDateTime, SwmfDataErr> {
    Ok(NaiveDateTime::parse_from_str(value, TIME_FORMAT)?)
}
