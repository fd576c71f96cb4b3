//! Readers and writers for SWMF related data files.
//!
//! Covers the fixed column index files published by the Kyoto World Data
//! Center, the whitespace delimited log files the GM (BATS-R-US) model
//! writes, and the `IMF.dat` solar wind input file the model reads.

pub use self::gm_log::{read_gm_log, GmLog, GmLogOptions};
pub use self::imf::{ImfData, ImfWriteOptions};
pub use self::wdc::{read_wdc_ae, read_wdc_asy_sym, AeIndices, AsySymIndices, IndexSeries};

mod gm_log;
mod imf;
mod wdc;
