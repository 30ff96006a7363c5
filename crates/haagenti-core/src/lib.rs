//! # Haagenti Core
//!
//! Core traits, error type, and bit streams shared by the Haagenti
//! compressors.
//!
//! Haagenti is named after the 48th demon of the Ars Goetia, who transmutes
//! substances into more valuable forms - just as compression transforms data
//! into denser representations.
//!
//! ## Core Traits
//!
//! - [`Compressor`] - One-shot compression operations
//! - [`Decompressor`] - One-shot decompression operations
//! - [`Codec`] - Combined compress/decompress capability
//! - [`BitRead`] / [`BitWrite`] - Bit-granular input and output
//!
//! ## Example
//!
//! ```ignore
//! use haagenti_core::{Codec, Compressor, Decompressor};
//! use haagenti_huffman::HuffmanCodec;
//!
//! let codec = HuffmanCodec::new();
//! let compressed = codec.compress(data)?;
//! let original = codec.decompress(&compressed)?;
//! ```

pub mod bits;
pub mod error;
pub mod stats;
pub mod traits;

pub use bits::{BitRead, BitReader, BitWrite, BitWriter};
pub use error::{Error, Result, Section};
pub use stats::{CompressionRatio, CompressionStats};
pub use traits::{Codec, Compressor, Decompressor};
