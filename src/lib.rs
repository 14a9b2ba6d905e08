//! Conversion of the binary latency records written by the packet generator
//! into a tab separated text file.
//!
//! Each record on disk is 24 bytes long and holds the id of the probe packet
//! along with its transmit and receive timestamps, all as little-endian u64.
//! Every full record becomes a single `<id>\t<latency>` line, where the
//! latency is the difference between the timestamps divided by a constant
//! number of clock ticks.

#[macro_use]
extern crate log;

pub mod configuration;
pub mod convert;
pub mod output;
pub mod record;
pub mod record_stream;

use std::io;
use std::path::PathBuf;

use log::LevelFilter;
use thiserror::Error;

pub use crate::configuration::{ConverterConfig, ConverterConfigBuilder};
pub use crate::convert::{convert, convert_file, ConversionSummary, FileConversion};
pub use crate::record::{Latency, LatencyArithmetic, Record, RECORD_SIZE};

/// Failures of a file to file conversion. All of them are file access errors
/// of one kind or another.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Can't open input file {path:?}")]
    OpenInput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Can't create output file {path:?}")]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed reading records from {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed writing latencies to {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Input path {0:?} doesn't end with a file name")]
    NoFileName(PathBuf),
    #[error("Output file {0:?} would overwrite the input file")]
    OutputIsInput(PathBuf),
    #[error("Invalid configuration")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Can't read configuration file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed configuration")]
    Parse(#[from] toml::de::Error),
    #[error("Output suffix can't be empty")]
    EmptySuffix,
    #[error("Output suffix {0:?} contains a path separator")]
    SuffixHasSeparator(String),
}

/// Sends all log messages at `level` and above to stderr.
///
/// Standard output and the output file are left alone, so this is safe to
/// call from the command line tool. Fails if a logger was already set.
pub fn setup_logger(level: LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        .chain(io::stderr())
        .apply()?;
    Ok(())
}
