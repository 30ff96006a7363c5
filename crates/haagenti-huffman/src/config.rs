//! Compressor configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{HUFF_COUNTS, HUFF_TREE};

/// Default output buffer capacity hint (64 KB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Minimum buffer capacity allowed.
pub const MIN_BUFFER_CAPACITY: usize = 4 * 1024;

/// Maximum buffer capacity allowed (1 MB).
pub const MAX_BUFFER_CAPACITY: usize = 1024 * 1024;

/// How the code is described at the start of a compressed stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HeaderFormat {
    /// Pre-order serialization of the code tree.
    #[default]
    Tree,
    /// The 256 byte counts; the decoder rebuilds the tree from them.
    Counts,
}

impl HeaderFormat {
    /// Magic number that opens a stream with this header.
    pub fn magic(self) -> u32 {
        match self {
            HeaderFormat::Tree => HUFF_TREE,
            HeaderFormat::Counts => HUFF_COUNTS,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeaderFormat::Tree => "tree",
            HeaderFormat::Counts => "counts",
        }
    }
}

/// Configuration for [`HuffProcessor`](crate::HuffProcessor) and
/// [`HuffmanCodec`](crate::HuffmanCodec).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HuffmanConfig {
    /// Header written by compression and required by decompression.
    pub header: HeaderFormat,

    /// Initial output buffer capacity for one-shot operations.
    pub buffer_capacity: usize,
}

impl HuffmanConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given header format.
    pub fn with_header(mut self, header: HeaderFormat) -> Self {
        self.header = header;
        self
    }

    /// Use the given buffer capacity, clamped to the allowed range.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = clamp_buffer_capacity(capacity);
        self
    }
}

impl Default for HuffmanConfig {
    fn default() -> Self {
        HuffmanConfig {
            header: HeaderFormat::Tree,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

/// Clamp buffer capacity to valid range.
#[inline]
pub fn clamp_buffer_capacity(size: usize) -> usize {
    size.clamp(MIN_BUFFER_CAPACITY, MAX_BUFFER_CAPACITY)
}
