//! Iteration over the records of a raw record file.

use std::io::{self, ErrorKind, Read};

use crate::record::{Record, RECORD_SIZE};

/// A consuming iterator over the records arriving from any byte source.
///
/// The source is consumed in chunks of [`RECORD_SIZE`] bytes. Once the source
/// is exhausted the iterator stops, and whatever bytes didn't make up a full
/// record are dropped. Their number is available through
/// [`RecordReader::trailing_bytes`] for the caller to report.
#[derive(Debug)]
pub struct RecordReader<R> {
    source: R,
    chunk: [u8; RECORD_SIZE],
    trailing_bytes: usize,
    done: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(source: R) -> Self {
        RecordReader {
            source,
            chunk: [0u8; RECORD_SIZE],
            trailing_bytes: 0,
            done: false,
        }
    }

    /// Number of bytes left over after the last full record. Only meaningful
    /// once the iterator returned `None`.
    pub fn trailing_bytes(&self) -> usize {
        self.trailing_bytes
    }

    /// Read until the chunk is full or the source is drained. Short reads are
    /// normal for pipes and the like so we keep going until `read` returns 0.
    fn fill_chunk(&mut self) -> io::Result<usize> {
        let mut filled = 0;
        while filled < RECORD_SIZE {
            match self.source.read(&mut self.chunk[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = io::Result<Record>;

    fn next(&mut self) -> Option<io::Result<Record>> {
        if self.done {
            return None;
        }
        match self.fill_chunk() {
            Ok(RECORD_SIZE) => Some(Ok(Record::from_le_bytes(&self.chunk))),
            Ok(leftover) => {
                self.done = true;
                self.trailing_bytes = leftover;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
