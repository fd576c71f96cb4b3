//! OMNIWeb listing converter.
//!
//! Converts a raw solar wind listing downloaded from
//! <https://omniweb.gsfc.nasa.gov/> into a cleaned `IMF.dat` input file for
//! the SWMF. Day-of-year timestamps become calendar dates and washed out
//! samples (the all-9 sentinels) are filled by linear interpolation.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    process,
};

use chrono::{NaiveDate, NaiveDateTime};
use clap::{crate_version, App, Arg};

use swmf_data::{
    errors::SwmfDataErr,
    tools::{clean_sentinels, interp_nans, OMNI_SENTINELS},
    ImfData, ImfWriteOptions,
};

fn main() {
    if let Err(ref e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), SwmfDataErr> {
    let matches = App::new("omni2imf")
        .about("Convert a raw OMNIWeb solar wind listing into a cleaned IMF.dat.")
        .version(crate_version!())
        .arg(
            Arg::with_name("input")
                .required(true)
                .index(1)
                .help("OMNIWeb listing with year/doy/hour/minute and bx by bz vx vy vz dens temp columns."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .default_value("IMF.dat")
                .help("File to write the solar wind input to."),
        )
        .get_matches();

    let input = matches.value_of("input").expect("input is required");
    let output = matches.value_of("output").expect("output has a default");

    let imf_data = convert(input)?;
    imf_data.write(&output, &ImfWriteOptions::default())?;

    println!("Wrote {} samples to {}.", imf_data.len(), output);

    Ok(())
}

// Parse the listing, mark sentinels as gaps, and interpolate them away.
fn convert(input: &str) -> Result<ImfData, SwmfDataErr> {
    let reader = BufReader::new(File::open(input)?);

    let mut times: Vec<NaiveDateTime> = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); 8];

    for line in reader.lines() {
        let line = line?;
        let fields: Vec<&str> = line.split_whitespace().collect();

        // Header lines do not start with a year field.
        if fields.len() < 12 || fields[0].parse::<i32>().is_err() {
            continue;
        }

        let year: i32 = fields[0].parse()?;
        let day_of_year: u32 = fields[1].parse()?;
        let hour: u32 = fields[2].parse()?;
        let minute: u32 = fields[3].parse()?;
        let time = NaiveDate::from_yo_opt(year, day_of_year)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .ok_or_else(|| SwmfDataErr::MalformedRow(line.clone()))?;
        times.push(time);

        for (column, field) in columns.iter_mut().zip(&fields[4..12]) {
            column.push(field.parse()?);
        }
    }

    let seconds: Vec<f64> = times.iter().map(|t| t.timestamp() as f64).collect();
    for column in columns.iter_mut() {
        clean_sentinels(column, &OMNI_SENTINELS);
        *column = interp_nans(&seconds, column);
    }

    let mut columns = columns.into_iter();
    let mut next = || columns.next().expect("eight columns above");

    Ok(ImfData {
        times,
        bx: next(),
        by: next(),
        bz: next(),
        vx: next(),
        vy: next(),
        vz: next(),
        density: next(),
        temperature: next(),
    })
}
