//! Module for errors.
use std::{error::Error, fmt::Display};

/// Error from the SWMF file and download interface.
#[derive(Debug)]
pub enum SwmfDataErr {
    // Inherited errors from std
    /// Error forwarded from std
    IO(::std::io::Error),
    /// Error parsing an integer field
    ParseInt(::std::num::ParseIntError),
    /// Error parsing a floating point field
    ParseFloat(::std::num::ParseFloatError),

    // Other forwarded errors
    /// Error forwarded from the reqwest crate
    Http(::reqwest::Error),
    /// Error forwarded from the chrono crate
    ChronoParse(::chrono::ParseError),
    /// Error forwarded from the strum crate, e.g. an unrecognized map type
    StrumError(::strum::ParseError),
    /// General error with any cause information erased and replaced by a string
    GeneralError(String),

    // My own errors from this crate
    /// A command marker was not found in a PARAM.in document.
    CommandNotFound(String),
    /// A replacement row or data column could not be rendered as text.
    MalformedRow(String),
    /// A file did not have the header expected for its format.
    UnrecognizedFormat(&'static str),
    /// A named column is missing from a parsed data set.
    MissingColumn(String),
    /// A remote directory does not exist on the server.
    RemoteDirNotFound(String),
    /// A remote file does not exist on the server.
    RemoteFileNotFound(String),
    /// The server answered with an unexpected HTTP status.
    UrlStatus(String, ::reqwest::StatusCode),
}

impl Display for SwmfDataErr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> Result<(), std::fmt::Error> {
        use crate::errors::SwmfDataErr::*;

        match self {
            IO(err) => write!(f, "std lib io error: {}", err),
            ParseInt(err) => write!(f, "error parsing integer field: {}", err),
            ParseFloat(err) => write!(f, "error parsing float field: {}", err),

            Http(err) => write!(f, "error forwarded from reqwest crate: {}", err),
            ChronoParse(err) => write!(f, "error parsing date-time: {}", err),
            StrumError(err) => write!(f, "error forwarded from strum crate: {}", err),
            GeneralError(msg) => write!(f, "general error forwarded: {}", msg),

            CommandNotFound(cmd) => write!(f, "command not found: {}", cmd),
            MalformedRow(msg) => write!(f, "malformed row: {}", msg),
            UnrecognizedFormat(fmt) => write!(f, "file does not look like a {} file", fmt),
            MissingColumn(col) => write!(f, "missing column: {}", col),
            RemoteDirNotFound(url) => write!(f, "remote directory not found: {}", url),
            RemoteFileNotFound(url) => write!(f, "remote file not found: {}", url),
            UrlStatus(url, code) => write!(f, "unexpected HTTP status ({}): {}", code, url),
        }
    }
}

impl Error for SwmfDataErr {}

impl From<::std::io::Error> for SwmfDataErr {
    fn from(err: ::std::io::Error) -> SwmfDataErr {
        SwmfDataErr::IO(err)
    }
}

impl From<::std::num::ParseIntError> for SwmfDataErr {
    fn from(err: ::std::num::ParseIntError) -> SwmfDataErr {
        SwmfDataErr::ParseInt(err)
    }
}

impl From<::std::num::ParseFloatError> for SwmfDataErr {
    fn from(err: ::std::num::ParseFloatError) -> SwmfDataErr {
        SwmfDataErr::ParseFloat(err)
    }
}

impl From<::reqwest::Error> for SwmfDataErr {
    fn from(err: ::reqwest::Error) -> SwmfDataErr {
        SwmfDataErr::Http(err)
    }
}

impl From<::chrono::ParseError> for SwmfDataErr {
    fn from(err: ::chrono::ParseError) -> SwmfDataErr {
        SwmfDataErr::ChronoParse(err)
    }
}

impl From<::strum::ParseError> for SwmfDataErr {
    fn from(err: ::strum::ParseError) -> SwmfDataErr {
        SwmfDataErr::StrumError(err)
    }
}

impl From<Box<dyn Error>> for SwmfDataErr {
    fn from(err: Box<dyn Error>) -> SwmfDataErr {
        SwmfDataErr::GeneralError(err.to_string())
    }
}
