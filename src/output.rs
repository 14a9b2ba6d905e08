//! Writing the human readable latency file and deciding where it goes.

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::record::{Latency, RecordId};

/// Suffix replacing the extension of the raw record file.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_lat.txt";

/// Derive the name of the text file from the name of the raw record file.
///
/// The extension of the file name, i.e. everything from its last dot onwards,
/// is replaced by `suffix`. Dots that only lead the file name (".hidden")
/// don't start an extension, and a file without an extension just gets the
/// suffix appended. The directory part of the path is left untouched.
///
/// Returns `None` for paths that don't end in a file name, like "/" or "..".
pub fn output_path_for(input: &Path, suffix: &str) -> Option<PathBuf> {
    let file_name = input.file_name()?;
    let mut stem: OsString = match file_name.to_str() {
        Some(name) => strip_extension(name).into(),
        // Non UTF-8 names: the standard library splits in almost the same way
        None => input.file_stem()?.to_owned(),
    };
    stem.push(suffix);
    Some(input.with_file_name(stem))
}

fn strip_extension(name: &str) -> &str {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => &name[..leading_dots + idx],
        None => name,
    }
}

/// Writes `<id>\t<latency>\n` lines to the underlying sink.
///
/// Wrap files with a [`std::io::BufWriter`] before handing them over, every
/// record is a separate small write.
#[derive(Debug)]
pub struct LatencyWriter<W: Write> {
    sink: W,
    lines: u64,
}

impl<W: Write> LatencyWriter<W> {
    pub fn new(sink: W) -> Self {
        LatencyWriter { sink, lines: 0 }
    }

    #[inline]
    pub fn write_record(&mut self, id: RecordId, latency: Latency) -> io::Result<()> {
        writeln!(self.sink, "{}\t{}", id, latency)?;
        self.lines += 1;
        Ok(())
    }

    /// Number of lines written so far
    pub fn lines(&self) -> u64 {
        self.lines
    }

    /// Flush the sink and hand it back. Dropping a buffered writer also
    /// flushes it but swallows the error, so always finish with this.
    pub fn finish(mut self) -> io::Result<W> {
        self.sink.flush()?;
        Ok(self.sink)
    }
}
