//! The conversion itself: raw records in, one text line per record out.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::configuration::ConverterConfig;
use crate::output::{output_path_for, LatencyWriter};
use crate::record_stream::RecordReader;
use crate::ConversionError;

/// What happened during a single conversion. Nothing here ends up in the
/// output file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    /// Lines written, one per full record
    pub records: u64,
    /// Bytes after the last full record that were dropped
    pub trailing_bytes: usize,
    /// Records whose receive time is earlier than their transmit time
    pub reversed: u64,
}

/// Result of converting a file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConversion {
    pub output: PathBuf,
    pub summary: ConversionSummary,
}

/// Errors that occurred while converting a stream, before we know which
/// paths were involved.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("reading records failed")]
    Read(#[source] std::io::Error),
    #[error("writing latencies failed")]
    Write(#[source] std::io::Error),
}

/// Convert every full record of `source` into a line in `sink`.
///
/// The sink is flushed before returning, so a successful return means
/// everything was handed over to it.
pub fn convert<R: Read, W: Write>(
    source: R,
    sink: W,
    config: &ConverterConfig,
) -> Result<ConversionSummary, StreamError> {
    let mut records = RecordReader::new(source);
    let mut writer = LatencyWriter::new(sink);
    let mut reversed = 0u64;
    for record in records.by_ref() {
        let record = record.map_err(StreamError::Read)?;
        if record.is_reversed() {
            reversed += 1;
        }
        let latency = record.latency(config.ticks_per_unit, config.arithmetic);
        writer.write_record(record.id, latency).map_err(StreamError::Write)?;
    }
    let summary = ConversionSummary {
        records: writer.lines(),
        trailing_bytes: records.trailing_bytes(),
        reversed,
    };
    writer.finish().map_err(StreamError::Write)?;
    Ok(summary)
}

/// Convert the raw record file at `input` into a text file next to it,
/// named according to [`output_path_for`].
///
/// The input is opened first so that a missing input doesn't leave an empty
/// output file behind. An existing output file is overwritten, unless it's the
/// input file itself.
pub fn convert_file(
    input: &Path,
    config: &ConverterConfig,
) -> Result<FileConversion, ConversionError> {
    config.validate()?;
    let output = output_path_for(input, &config.output_suffix)
        .ok_or_else(|| ConversionError::NoFileName(input.to_path_buf()))?;
    if output == input {
        return Err(ConversionError::OutputIsInput(output));
    }
    debug!("Converting {:?} into {:?} with {:?}", input, output, config);

    let source = File::open(input).map_err(|source| ConversionError::OpenInput {
        path: input.to_path_buf(),
        source,
    })?;
    let sink = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&output)
        .map_err(|source| ConversionError::CreateOutput {
            path: output.clone(),
            source,
        })?;

    let summary =
        convert(BufReader::new(source), BufWriter::new(sink), config).map_err(|e| match e {
            StreamError::Read(source) => ConversionError::Read {
                path: input.to_path_buf(),
                source,
            },
            StreamError::Write(source) => ConversionError::Write {
                path: output.clone(),
                source,
            },
        })?;

    report(input, &output, &summary);
    Ok(FileConversion { output, summary })
}

fn report(input: &Path, output: &Path, summary: &ConversionSummary) {
    info!("Wrote {} records from {:?} to {:?}", summary.records, input, output);
    if summary.trailing_bytes > 0 {
        warn!(
            "Dropped {} trailing bytes of {:?} that don't make up a full record",
            summary.trailing_bytes, input
        );
    }
    if summary.reversed > 0 {
        warn!(
            "{} records of {:?} were received before they were sent",
            summary.reversed, input
        );
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;

    use super::*;
    use crate::configuration::ConverterConfigBuilder;
    use crate::record::{LatencyArithmetic, Record};

    fn run(input: &[u8], config: &ConverterConfig) -> (String, ConversionSummary) {
        let mut out = Vec::new();
        let summary = convert(input, &mut out, config).unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn single_zero_record() {
        let (text, summary) = run(&[0u8; 24], &ConverterConfig::default());
        assert_eq!(text, "0\t0\n");
        assert_eq!(summary.records, 1);
    }

    #[test]
    fn three_units_of_latency() {
        let input = Record::new(5, 1000, 7300).to_le_bytes();
        let (text, _) = run(&input, &ConverterConfig::default());
        assert_eq!(text, "5\t3\n");
    }

    #[test]
    fn stray_bytes_after_a_record() {
        let mut input = Record::new(5, 1000, 7300).to_le_bytes().to_vec();
        input.extend_from_slice(&[1, 2, 3, 4, 5, 6]);
        let (text, summary) = run(&input, &ConverterConfig::default());
        assert_eq!(text, "5\t3\n");
        assert_eq!(
            summary,
            ConversionSummary {
                records: 1,
                trailing_bytes: 6,
                reversed: 0
            }
        );
    }

    #[test]
    fn empty_input() {
        let (text, summary) = run(&[], &ConverterConfig::default());
        assert!(text.is_empty());
        assert_eq!(summary, ConversionSummary::default());
    }

    #[test]
    fn reversed_record_wraps_by_default() {
        let input = Record::new(1, 2100, 0).to_le_bytes();
        let (text, summary) = run(&input, &ConverterConfig::default());
        assert_eq!(text, format!("1\t{}\n", 0u64.wrapping_sub(2100) / 2100));
        assert_eq!(summary.reversed, 1);
    }

    #[test]
    fn reversed_record_with_signed_arithmetic() {
        let config = ConverterConfigBuilder::default()
            .with_arithmetic(LatencyArithmetic::Signed)
            .build();
        let input = Record::new(1, 2100 * 2 + 5, 0).to_le_bytes();
        let (text, _) = run(&input, &config);
        assert_eq!(text, "1\t-2\n");
    }

    #[test]
    fn custom_ticks_per_unit() {
        let config = ConverterConfigBuilder::default()
            .with_ticks_per_unit(NonZeroU64::new(10).unwrap())
            .build();
        let input = Record::new(8, 0, 99).to_le_bytes();
        let (text, _) = run(&input, &config);
        assert_eq!(text, "8\t9\n");
    }

    struct FullDisk;

    impl Write for FullDisk {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_are_reported() {
        let input = [0u8; 24];
        let result = convert(&input[..], FullDisk, &ConverterConfig::default());
        assert!(matches!(result, Err(StreamError::Write(_))));
    }
}
