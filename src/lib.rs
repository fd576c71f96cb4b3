#![deny(missing_docs)]
//! Package to read, write, and fetch input/output files for the Space Weather
//! Modeling Framework (SWMF).
//!
//! The SWMF and its geospace model BATS-R-US consume and produce a handful of
//! plain text file formats. This crate covers the ones a scripting workflow
//! touches most:
//!
//! - [`paramin`] reads and edits `PARAM.in` command files.
//! - [`io`] parses fixed-column index/log files and writes `IMF.dat` solar
//!   wind input files.
//! - [`web`] downloads OMNI solar wind data and GONG ADAPT magnetograms.
//! - [`tools`] holds the small numeric and calendar helpers the rest of the
//!   crate leans on.

//
// Public API
//
pub use crate::errors::SwmfDataErr;
pub use crate::io::{
    read_gm_log, read_wdc_ae, read_wdc_asy_sym, AeIndices, AsySymIndices, GmLog, GmLogOptions,
    ImfData, ImfWriteOptions, IndexSeries,
};
pub use crate::paramin::{command_marker, Document, ParamRow};
pub use crate::web::{
    download_magnetogram_adapt, write_imf_from_omni, MapType, OmniData, OmniDownloader,
    OmniOptions, OMNI_COLS,
};

pub mod errors;
pub mod io;
pub mod paramin;
pub mod tools;
pub mod web;
