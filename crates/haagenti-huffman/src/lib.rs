//! # Haagenti Huffman
//!
//! Lossless byte-stream compression with a static Huffman code.
//!
//! The input is scanned once to count byte frequencies, a prefix code is
//! built greedily from those counts, the code tree is written as a
//! self-describing header, and the input is scanned a second time to emit
//! one code per byte followed by the code of a synthetic end marker.
//!
//! ## Stream Format
//!
//! ```text
//! compressed_stream ::= MAGIC(32) tree_header content
//! tree_header       ::= node
//! node              ::= '1' symbol(9)     -- leaf
//!                     | '0' node node     -- internal, pre-order
//! content           ::= code* end_code
//! ```
//!
//! Symbols `0..=255` are literal bytes; [`PSEUDO_EOF`] (256) terminates the
//! content, which is why leaf symbols take 9 bits. The final byte is padded
//! with zero bits.
//!
//! ## Example
//!
//! ```rust
//! use haagenti_core::{Compressor, Decompressor};
//! use haagenti_huffman::HuffmanCodec;
//!
//! let codec = HuffmanCodec::new();
//! let compressed = codec.compress(b"abracadabra").unwrap();
//! let original = codec.decompress(&compressed).unwrap();
//! assert_eq!(original, b"abracadabra");
//! ```

pub mod code;
pub mod codec;
pub mod config;
pub mod content;
pub mod frequency;
pub mod header;
pub mod processor;
pub mod tree;

pub use code::{Code, CodeTable};
pub use codec::HuffmanCodec;
pub use config::{HeaderFormat, HuffmanConfig};
pub use frequency::FrequencyTable;
pub use processor::HuffProcessor;
pub use tree::{HuffNode, HuffmanTree};

/// A coded symbol: a literal byte (`0..=255`) or [`PSEUDO_EOF`].
pub type Symbol = u16;

/// Bits per literal symbol.
pub const BITS_PER_WORD: u8 = 8;

/// Bits in a magic number or header count.
pub const BITS_PER_INT: u8 = 32;

/// Number of literal symbols.
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;

/// End-of-content marker; never produced by a literal byte.
pub const PSEUDO_EOF: Symbol = ALPH_SIZE as Symbol;

/// Bits used for a leaf symbol in the tree header.
pub const SYMBOL_BITS: u8 = BITS_PER_WORD + 1;

/// Common prefix of all magic numbers.
pub const HUFF_NUMBER: u32 = 0xface_8200;

/// Magic number of a stream with a tree header.
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// Magic number of a stream with a counts header.
pub const HUFF_COUNTS: u32 = HUFF_NUMBER | 2;
