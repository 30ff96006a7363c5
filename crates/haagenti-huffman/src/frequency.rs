//! Byte frequency analysis.

use haagenti_core::{BitRead, Result};
use tracing::trace;

use crate::{ALPH_SIZE, BITS_PER_WORD};

/// Occurrence count of every byte value in an input.
///
/// The end marker is not tracked here; the tree builder always gives it a
/// weight of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPH_SIZE],
}

impl FrequencyTable {
    /// Create a table from raw counts.
    pub fn from_counts(counts: [u64; ALPH_SIZE]) -> Self {
        Self { counts }
    }

    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; ALPH_SIZE];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Count 8-bit symbols until the stream is exhausted.
    ///
    /// The stream is left at its end; callers rewind it before a second pass.
    pub fn count<R: BitRead>(input: &mut R) -> Result<Self> {
        let mut counts = [0u64; ALPH_SIZE];
        while let Some(value) = input.read_bits(BITS_PER_WORD)? {
            counts[value as usize] += 1;
        }

        let table = Self { counts };
        trace!(
            total = table.total(),
            distinct = table.distinct(),
            "counted symbol frequencies"
        );
        Ok(table)
    }

    /// Count of a single byte value.
    #[inline]
    pub fn get(&self, byte: u8) -> u64 {
        self.counts[byte as usize]
    }

    /// All 256 counts, indexed by byte value.
    pub fn counts(&self) -> &[u64; ALPH_SIZE] {
        &self.counts
    }

    /// Number of byte values that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Total number of bytes counted.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Present byte values with their counts, in ascending byte order.
    pub fn present(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(byte, &c)| (byte as u8, c))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::from_counts([0; ALPH_SIZE])
    }
}
