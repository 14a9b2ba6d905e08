//! A single latency record as it's stored on disk by the packet generator.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// Raw clock ticks, as sampled by the time stamp counter of the sending and
/// receiving cores.
pub type Tick = u64;
/// Record identifiers are opaque - nothing about them is checked.
pub type RecordId = u64;
/// The computed latency. Wide enough to hold both the wrapped unsigned result
/// and a negative one.
pub type Latency = i128;

/// Size in bytes of one record on disk: three little-endian u64 values.
pub const RECORD_SIZE: usize = 24;

/// Number of clock ticks in one unit of the reported latency.
pub const DEFAULT_TICKS_PER_UNIT: u64 = 2100;

/// How the difference between the receive and transmit timestamps is taken.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LatencyArithmetic {
    /// Unsigned 64 bit subtraction. A receive time earlier than the transmit
    /// time wraps around and results in a huge latency.
    Wrapping,
    /// Widened signed subtraction, truncated towards zero. A receive time
    /// earlier than the transmit time results in a negative latency.
    Signed,
}

impl Default for LatencyArithmetic {
    fn default() -> Self {
        LatencyArithmetic::Wrapping
    }
}

/// A single (id, tx, rx) triplet.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub tx: Tick,
    pub rx: Tick,
}

impl Record {
    /// Create a new Record with the given values
    pub fn new(id: RecordId, tx: Tick, rx: Tick) -> Self {
        Record { id, tx, rx }
    }

    /// Decode a record from exactly one chunk of the input file.
    pub fn from_le_bytes(chunk: &[u8; RECORD_SIZE]) -> Self {
        Record {
            id: read_field(chunk, 0),
            tx: read_field(chunk, 1),
            rx: read_field(chunk, 2),
        }
    }

    /// The on-disk representation of this record.
    pub fn to_le_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut chunk = [0u8; RECORD_SIZE];
        chunk[0..8].copy_from_slice(&self.id.to_le_bytes());
        chunk[8..16].copy_from_slice(&self.tx.to_le_bytes());
        chunk[16..24].copy_from_slice(&self.rx.to_le_bytes());
        chunk
    }

    /// Whether the packet was received "before" it was sent.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.rx < self.tx
    }

    /// Latency in units of `ticks_per_unit` clock ticks, using integer
    /// division.
    #[inline]
    pub fn latency(&self, ticks_per_unit: NonZeroU64, arithmetic: LatencyArithmetic) -> Latency {
        match arithmetic {
            LatencyArithmetic::Wrapping => {
                (self.rx.wrapping_sub(self.tx) / ticks_per_unit.get()) as Latency
            }
            // i128 division truncates towards zero
            LatencyArithmetic::Signed => {
                (self.rx as i128 - self.tx as i128) / ticks_per_unit.get() as i128
            }
        }
    }
}

/// The `idx`th u64 field of the chunk.
#[inline]
fn read_field(chunk: &[u8; RECORD_SIZE], idx: usize) -> u64 {
    let mut field = [0u8; 8];
    field.copy_from_slice(&chunk[idx * 8..(idx + 1) * 8]);
    u64::from_le_bytes(field)
}
