//! Statistics for compression operations.

/// Compression ratio metrics.
#[derive(Debug, Clone, Copy)]
pub struct CompressionRatio {
    /// Original uncompressed size in bytes.
    pub original_size: usize,
    /// Compressed size in bytes.
    pub compressed_size: usize,
}

impl CompressionRatio {
    /// Create new ratio from sizes.
    pub fn new(original: usize, compressed: usize) -> Self {
        CompressionRatio {
            original_size: original,
            compressed_size: compressed,
        }
    }

    /// Calculate ratio (original / compressed).
    /// Higher is better (more compression).
    pub fn ratio(&self) -> f64 {
        if self.compressed_size == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.compressed_size as f64
    }

    /// Calculate space savings as percentage (0-100).
    pub fn savings_percent(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        (1.0 - (self.compressed_size as f64 / self.original_size as f64)) * 100.0
    }

    /// Check if compression was effective (saved space).
    pub fn is_effective(&self) -> bool {
        self.compressed_size < self.original_size
    }
}

/// Statistics from a compression/decompression operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompressionStats {
    /// Original (uncompressed) size in bytes.
    pub original_size: usize,

    /// Compressed size in bytes, including header and padding.
    pub compressed_size: usize,

    /// Bits spent on the magic number and header.
    pub header_bits: u64,

    /// Bits spent on encoded content, including the end marker.
    pub content_bits: u64,

    /// Number of leaves in the code tree.
    pub leaves: usize,

    /// Time taken in microseconds.
    pub time_us: u64,
}

impl CompressionStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get compression ratio.
    pub fn ratio(&self) -> CompressionRatio {
        CompressionRatio::new(self.original_size, self.compressed_size)
    }

    /// Total bits produced or consumed.
    pub fn total_bits(&self) -> u64 {
        self.header_bits + self.content_bits
    }

    /// Average content bits per input byte (0.0 for empty input).
    pub fn bits_per_symbol(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        self.content_bits as f64 / self.original_size as f64
    }

    /// Get throughput in MB/s.
    pub fn throughput_mbs(&self) -> f64 {
        if self.time_us == 0 {
            return 0.0;
        }
        self.original_size as f64 / self.time_us as f64
    }

    /// Get space savings as percentage.
    pub fn savings_percent(&self) -> f64 {
        self.ratio().savings_percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio() {
        let ratio = CompressionRatio::new(100, 25);
        assert_eq!(ratio.ratio(), 4.0);
        assert_eq!(ratio.savings_percent(), 75.0);
        assert!(ratio.is_effective());

        let empty = CompressionRatio::new(0, 9);
        assert_eq!(empty.savings_percent(), 0.0);
        assert!(!empty.is_effective());
    }

    #[test]
    fn test_bits_per_symbol() {
        let stats = CompressionStats {
            original_size: 8,
            content_bits: 12,
            header_bits: 52,
            ..Default::default()
        };
        assert_eq!(stats.bits_per_symbol(), 1.5);
        assert_eq!(stats.total_bits(), 64);
        assert_eq!(CompressionStats::new().bits_per_symbol(), 0.0);
    }
}
