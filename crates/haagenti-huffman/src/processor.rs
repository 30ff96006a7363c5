//! Two-pass stream compression and single-pass decompression.

use std::time::Instant;

use haagenti_core::{BitRead, BitWrite, CompressionStats, Result};
use tracing::debug;

use crate::code::CodeTable;
use crate::config::{HeaderFormat, HuffmanConfig};
use crate::content::{decode_content, encode_content};
use crate::frequency::FrequencyTable;
use crate::header::{
    check_counts, read_counts, read_magic, read_tree, write_counts, write_magic, write_tree,
};
use crate::tree::HuffmanTree;

/// Compresses and decompresses bit streams with a per-stream Huffman code.
///
/// Neither operation flushes `out`; callers flush or finish their writer
/// once done so the last partial byte is padded and written.
#[derive(Debug, Clone, Default)]
pub struct HuffProcessor {
    config: HuffmanConfig,
}

impl HuffProcessor {
    /// Create a processor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor with the given configuration.
    pub fn with_config(config: HuffmanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HuffmanConfig {
        &self.config
    }

    /// Select the header format for subsequent calls.
    pub fn set_header(&mut self, header: HeaderFormat) {
        debug!(header = header.name(), "header format set");
        self.config.header = header;
    }

    /// Compress `input` into `out`.
    ///
    /// The input is read twice: once to count byte frequencies, and again,
    /// after [`BitRead::reset`], to encode it. The magic number is only
    /// written if `out` is still empty. Header errors are detected before
    /// anything is written.
    pub fn compress<R, W>(&self, input: &mut R, out: &mut W) -> Result<CompressionStats>
    where
        R: BitRead,
        W: BitWrite,
    {
        let started = Instant::now();
        let header = self.config.header;

        let freq = FrequencyTable::count(input)?;
        let tree = HuffmanTree::from_frequencies(&freq);
        let codes = CodeTable::from_tree(&tree)?;
        if header == HeaderFormat::Counts {
            check_counts(&freq)?;
        }

        let start_bits = out.bits_written();
        let mut header_bits = write_magic(header.magic(), out)?;
        header_bits += match header {
            HeaderFormat::Tree => write_tree(&tree, out)?,
            HeaderFormat::Counts => write_counts(&freq, out)?,
        };

        input.reset()?;
        let content = encode_content(input, &codes, out)?;

        let stats = CompressionStats {
            original_size: content.symbols as usize,
            compressed_size: (out.bits_written() - start_bits).div_ceil(8) as usize,
            header_bits,
            content_bits: content.bits,
            leaves: tree.leaf_count(),
            time_us: started.elapsed().as_micros() as u64,
        };
        debug!(
            header = header.name(),
            original = stats.original_size,
            compressed = stats.compressed_size,
            header_bits,
            content_bits = content.bits,
            "compressed stream"
        );
        Ok(stats)
    }

    /// Decompress a stream produced by [`compress`](Self::compress) with the
    /// same header format.
    ///
    /// Fails without reading past the magic number if the stream does not
    /// start with the expected magic.
    pub fn decompress<R, W>(&self, input: &mut R, out: &mut W) -> Result<CompressionStats>
    where
        R: BitRead,
        W: BitWrite,
    {
        let started = Instant::now();
        let header = self.config.header;
        let start_bits = input.bits_read();

        read_magic(header.magic(), input)?;
        let tree = match header {
            HeaderFormat::Tree => read_tree(input)?,
            HeaderFormat::Counts => read_counts(input)?,
        };
        let header_bits = input.bits_read() - start_bits;

        let content = decode_content(&tree, input, out)?;

        let stats = CompressionStats {
            original_size: content.symbols as usize,
            compressed_size: (input.bits_read() - start_bits).div_ceil(8) as usize,
            header_bits,
            content_bits: content.bits,
            leaves: tree.leaf_count(),
            time_us: started.elapsed().as_micros() as u64,
        };
        debug!(
            header = header.name(),
            original = stats.original_size,
            compressed = stats.compressed_size,
            "decompressed stream"
        );
        Ok(stats)
    }
}
