use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

#[macro_use]
extern crate log;

use anyhow::{Context, Result};

use librawlat::{convert_file, setup_logger, ConverterConfig};

const USAGE: &str = "Usage: rawlat <raw record file>";

/// Returns the path to the raw record file if the argument list to our
/// software has exactly one entry
fn parse_args(args: &[OsString]) -> Option<PathBuf> {
    match args {
        [path] => Some(PathBuf::from(path)),
        _ => None,
    }
}

/// Converts a single raw record file from the CLI
fn main() -> Result<()> {
    let config = ConverterConfig::default();
    setup_logger(config.log_level).context("Failed to initialize the logger")?;
    // Raw record files may have names that aren't valid UTF-8
    let args: Vec<OsString> = env::args_os().collect();
    let input = match parse_args(args.get(1..).unwrap_or_default()) {
        Some(input) => input,
        None => {
            println!("{}", USAGE);
            return Ok(());
        }
    };
    info!("Converting {:?} from the CLI", input);
    let conversion = convert_file(&input, &config)
        .with_context(|| format!("Failed to convert {:?}", input))?;
    debug!("Conversion finished: {:?}", conversion);
    Ok(())
}
