//! One-shot codec over byte slices.

use std::io::Cursor;
use std::sync::Mutex;

use haagenti_core::{
    BitReader, BitWriter, Codec, CompressionStats, Compressor, Decompressor, Result,
};

use crate::config::{HeaderFormat, HuffmanConfig};
use crate::processor::HuffProcessor;
use crate::{ALPH_SIZE, BITS_PER_INT, SYMBOL_BITS};

/// Worst-case content bits per input byte.
///
/// 257 symbols always admit a prefix code of 9-bit codes, and a Huffman
/// code never costs more than any other prefix code.
const MAX_BITS_PER_SYMBOL: usize = SYMBOL_BITS as usize;

/// Huffman codec for in-memory data.
#[derive(Debug)]
pub struct HuffmanCodec {
    processor: HuffProcessor,
    last_stats: Mutex<Option<CompressionStats>>,
}

impl HuffmanCodec {
    /// Create a new codec with the tree header.
    pub fn new() -> Self {
        Self::with_config(HuffmanConfig::default())
    }

    /// Create a codec with the given configuration.
    pub fn with_config(config: HuffmanConfig) -> Self {
        Self {
            processor: HuffProcessor::with_config(config),
            last_stats: Mutex::new(None),
        }
    }

    /// Create a codec with the given header format.
    pub fn with_header(header: HeaderFormat) -> Self {
        Self::with_config(HuffmanConfig::new().with_header(header))
    }

    pub fn config(&self) -> &HuffmanConfig {
        self.processor.config()
    }

    fn record(&self, stats: CompressionStats) {
        if let Ok(mut slot) = self.last_stats.lock() {
            *slot = Some(stats);
        }
    }

    fn header_bits(&self) -> usize {
        let header = match self.config().header {
            // 257 leaves of 1 + 9 bits, 256 internal nodes of 1 bit
            HeaderFormat::Tree => (ALPH_SIZE + 1) * (1 + SYMBOL_BITS as usize) + ALPH_SIZE,
            HeaderFormat::Counts => ALPH_SIZE * BITS_PER_INT as usize,
        };
        BITS_PER_INT as usize + header
    }

    /// Output buffer hint for decompressing `input_len` bytes.
    fn decompress_capacity(&self, input_len: usize) -> usize {
        self.config().buffer_capacity.min(input_len.saturating_mul(4))
    }
}

impl Default for HuffmanCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HuffmanCodec {
    fn clone(&self) -> Self {
        Self::with_config(self.config().clone())
    }
}

impl Compressor for HuffmanCodec {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let capacity = self
            .config()
            .buffer_capacity
            .min(self.max_compressed_size(input.len()));

        let mut reader = BitReader::new(Cursor::new(input));
        let mut writer = BitWriter::new(Vec::with_capacity(capacity));
        let stats = self.processor.compress(&mut reader, &mut writer)?;
        let compressed = writer.finish()?;

        self.record(stats);
        Ok(compressed)
    }

    fn max_compressed_size(&self, input_len: usize) -> usize {
        let bits = input_len
            .saturating_add(1)
            .saturating_mul(MAX_BITS_PER_SYMBOL)
            .saturating_add(self.header_bits());
        bits.div_ceil(8)
    }

    fn stats(&self) -> Option<CompressionStats> {
        self.last_stats.lock().ok().and_then(|slot| slot.clone())
    }
}

impl Decompressor for HuffmanCodec {
    fn name(&self) -> &'static str {
        "huffman"
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let capacity = self.decompress_capacity(input.len());

        let mut reader = BitReader::new(Cursor::new(input));
        let mut writer = BitWriter::new(Vec::with_capacity(capacity));
        let stats = self.processor.decompress(&mut reader, &mut writer)?;
        let decompressed = writer.finish()?;

        self.record(stats);
        Ok(decompressed)
    }
}

impl Codec for HuffmanCodec {
    fn new() -> Self {
        HuffmanCodec::new()
    }
}

#[cfg(test)]
mod tests {
    use haagenti_core::Error;

    use super::*;

    #[test]
    fn test_codec_roundtrip() {
        let codec = HuffmanCodec::new();
        let data = b"Hello, Huffman! Hello, Huffman! Hello, Huffman!";
        let compressed = codec.compress(data).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), data);
        assert!(codec.verify_roundtrip(data).unwrap());
    }

    #[test]
    fn test_codec_counts_roundtrip() {
        let codec = HuffmanCodec::with_header(HeaderFormat::Counts);
        let data = b"counts header variant";
        let compressed = codec.compress(data).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_stats_recorded() {
        let codec = HuffmanCodec::new();
        assert!(Compressor::stats(&codec).is_none());

        let data = vec![b'q'; 1000];
        let compressed = codec.compress(&data).unwrap();
        let stats = Compressor::stats(&codec).unwrap();
        assert_eq!(stats.original_size, 1000);
        assert_eq!(stats.compressed_size, compressed.len());
        assert_eq!(stats.leaves, 2);
        assert_eq!(stats.content_bits, 1001);
    }

    #[test]
    fn test_max_compressed_size_bound() {
        let codec = HuffmanCodec::new();
        let data: Vec<u8> = (0..4096u32).map(|i| (i * 7 % 256) as u8).collect();
        let compressed = codec.compress(&data).unwrap();
        assert!(compressed.len() <= codec.max_compressed_size(data.len()));
        assert!(codec.compress(b"").unwrap().len() <= codec.max_compressed_size(0));
    }

    #[test]
    fn test_size_hints_saturate() {
        for codec in [HuffmanCodec::new(), HuffmanCodec::with_header(HeaderFormat::Counts)] {
            assert_eq!(codec.max_compressed_size(usize::MAX), usize::MAX / 8 + 1);
            assert_eq!(
                codec.decompress_capacity(usize::MAX),
                codec.config().buffer_capacity
            );
            assert_eq!(codec.decompress_capacity(10), 40);
        }
    }

    #[test]
    fn test_decompress_garbage() {
        let codec = HuffmanCodec::new();
        let err = codec.decompress(b"not huffman data").unwrap_err();
        assert!(err.is_format_error());
        assert_eq!(err.category(), "bad_magic");
    }

    #[test]
    fn test_decompress_to_buffer_too_small() {
        let codec = HuffmanCodec::new();
        let compressed = codec.compress(b"0123456789").unwrap();
        let mut out = [0u8; 4];
        let err = codec.decompress_to(&compressed, &mut out).unwrap_err();
        assert!(matches!(err, Error::BufferTooSmall { .. }));
    }
}
