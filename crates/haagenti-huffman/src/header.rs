//! Header serialization.
//!
//! A compressed stream opens with a 32-bit magic number naming the header
//! format, followed by the header itself:
//!
//! - **Tree**: pre-order walk of the code tree. An internal node is a `0`
//!   bit followed by its left and right subtrees; a leaf is a `1` bit
//!   followed by its 9-bit symbol.
//! - **Counts**: the 256 byte counts as 32-bit values, from which the
//!   decoder rebuilds the same tree the encoder used.

use haagenti_core::{BitRead, BitWrite, Error, Result, Section};
use tracing::{debug, trace};

use crate::code::MAX_CODE_BITS;
use crate::frequency::FrequencyTable;
use crate::tree::{HuffNode, HuffmanTree};
use crate::{ALPH_SIZE, BITS_PER_INT, PSEUDO_EOF, SYMBOL_BITS, Symbol};

/// Write `magic` unless the stream already has content.
///
/// Segments appended to a non-empty stream share the first segment's magic.
/// Returns the number of bits written.
pub fn write_magic<W: BitWrite>(magic: u32, out: &mut W) -> Result<u64> {
    if out.bits_written() != 0 {
        trace!(bits = out.bits_written(), "stream not empty, skipping magic");
        return Ok(0);
    }
    out.write_bits(BITS_PER_INT, magic)?;
    Ok(BITS_PER_INT as u64)
}

/// Read the magic number and check it against `expected`.
///
/// Nothing beyond the first 32 bits is consumed.
pub fn read_magic<R: BitRead>(expected: u32, input: &mut R) -> Result<()> {
    match input.read_bits(BITS_PER_INT)? {
        Some(magic) if magic == expected => Ok(()),
        found => Err(Error::bad_magic(expected, found)),
    }
}

/// Serialize `tree` in pre-order. Returns the number of bits written.
pub fn write_tree<W: BitWrite>(tree: &HuffmanTree, out: &mut W) -> Result<u64> {
    let start = out.bits_written();
    write_node(tree.root(), out)?;
    let bits = out.bits_written() - start;
    debug!(bits, leaves = tree.leaf_count(), "wrote tree header");
    Ok(bits)
}

fn write_node<W: BitWrite>(node: &HuffNode, out: &mut W) -> Result<()> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            out.write_bits(1, 1)?;
            out.write_bits(SYMBOL_BITS, *symbol as u32)
        }
        HuffNode::Internal { left, right, .. } => {
            out.write_bits(1, 0)?;
            write_node(left, out)?;
            write_node(right, out)
        }
    }
}

/// Rebuild a tree written by [`write_tree`].
///
/// Weights are not part of the header; rebuilt nodes carry weight 0.
pub fn read_tree<R: BitRead>(input: &mut R) -> Result<HuffmanTree> {
    let root = read_node(input, 0)?;
    let tree = HuffmanTree::from_root(root);
    debug!(
        leaves = tree.leaf_count(),
        depth = tree.depth(),
        "read tree header"
    );
    Ok(tree)
}

fn read_node<R: BitRead>(input: &mut R, depth: usize) -> Result<HuffNode> {
    if depth > MAX_CODE_BITS {
        return Err(Error::corrupted_at(
            format!("tree deeper than {MAX_CODE_BITS} levels"),
            input.bits_read(),
        ));
    }

    let is_leaf = input
        .read_bit()?
        .ok_or_else(|| Error::truncated(Section::Header, input.bits_read()))?;

    if is_leaf {
        let symbol = input
            .read_bits(SYMBOL_BITS)?
            .ok_or_else(|| Error::truncated(Section::Header, input.bits_read()))?;
        if symbol > PSEUDO_EOF as u32 {
            return Err(Error::corrupted_at(
                format!("leaf symbol {symbol} out of range"),
                input.bits_read(),
            ));
        }
        return Ok(HuffNode::leaf(symbol as Symbol, 0));
    }

    let left = read_node(input, depth + 1)?;
    let right = read_node(input, depth + 1)?;
    Ok(HuffNode::merge(left, right))
}

/// Check that every count fits the 32-bit counts header.
pub fn check_counts(freq: &FrequencyTable) -> Result<()> {
    match freq.present().find(|&(_, count)| count > u32::MAX as u64) {
        Some((byte, count)) => Err(Error::unsupported(format!(
            "count {count} of byte {byte} exceeds the counts header limit"
        ))),
        None => Ok(()),
    }
}

/// Serialize the 256 byte counts. Returns the number of bits written.
///
/// Nothing is written if a count does not fit in 32 bits.
pub fn write_counts<W: BitWrite>(freq: &FrequencyTable, out: &mut W) -> Result<u64> {
    check_counts(freq)?;
    let start = out.bits_written();
    for &count in freq.counts() {
        out.write_bits(BITS_PER_INT, count as u32)?;
    }
    let bits = out.bits_written() - start;
    debug!(bits, distinct = freq.distinct(), "wrote counts header");
    Ok(bits)
}

/// Read counts written by [`write_counts`] and rebuild the encoder's tree.
pub fn read_counts<R: BitRead>(input: &mut R) -> Result<HuffmanTree> {
    let mut counts = [0u64; ALPH_SIZE];
    for count in counts.iter_mut() {
        *count = input
            .read_bits(BITS_PER_INT)?
            .ok_or_else(|| Error::truncated(Section::Header, input.bits_read()))?
            as u64;
    }
    let freq = FrequencyTable::from_counts(counts);
    debug!(distinct = freq.distinct(), "read counts header");
    Ok(HuffmanTree::from_frequencies(&freq))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use haagenti_core::{BitReader, BitWriter};

    use super::*;
    use crate::code::CodeTable;
    use crate::{HUFF_COUNTS, HUFF_TREE};

    fn serialize_tree(tree: &HuffmanTree) -> Vec<u8> {
        let mut writer = BitWriter::new(Vec::new());
        write_tree(tree, &mut writer).unwrap();
        writer.finish().unwrap()
    }

    #[test]
    fn test_lone_leaf_header_bits() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::default());
        let mut writer = BitWriter::new(Vec::new());
        assert_eq!(write_tree(&tree, &mut writer).unwrap(), 10);
        // 1 then 100000000 (256), padded
        assert_eq!(writer.finish().unwrap(), vec![0b1100_0000, 0b0000_0000]);
    }

    #[test]
    fn test_tree_header_bit_layout() {
        // ((B, END), A)
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"AAAB"));
        let mut writer = BitWriter::new(Vec::new());
        let bits = write_tree(&tree, &mut writer).unwrap();
        // 2 internal nodes + 3 leaves * 10 bits
        assert_eq!(bits, 32);

        let data = writer.finish().unwrap();
        let mut reader = BitReader::new(Cursor::new(data));
        assert_eq!(reader.read_bits(2).unwrap(), Some(0b00));
        assert_eq!(reader.read_bits(10).unwrap(), Some((1 << 9) | b'B' as u32));
        assert_eq!(reader.read_bits(10).unwrap(), Some((1 << 9) | 256));
        assert_eq!(reader.read_bits(10).unwrap(), Some((1 << 9) | b'A' as u32));
    }

    #[test]
    fn test_tree_roundtrip_preserves_codes() {
        let data = b"it was the best of times, it was the worst of times";
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(data));

        let bytes = serialize_tree(&tree);
        let mut reader = BitReader::new(Cursor::new(bytes));
        let rebuilt = read_tree(&mut reader).unwrap();

        assert!(tree.same_shape(&rebuilt));
        assert_eq!(tree.symbols(), rebuilt.symbols());
        assert_eq!(
            CodeTable::from_tree(&tree).unwrap(),
            CodeTable::from_tree(&rebuilt).unwrap()
        );
    }

    #[test]
    fn test_read_magic() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(32, HUFF_TREE).unwrap();
        let data = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(data.clone()));
        read_magic(HUFF_TREE, &mut reader).unwrap();

        let mut reader = BitReader::new(Cursor::new(data));
        let err = read_magic(HUFF_COUNTS, &mut reader).unwrap_err();
        assert!(matches!(
            err,
            Error::BadMagic {
                expected: HUFF_COUNTS,
                found: Some(HUFF_TREE)
            }
        ));
        assert_eq!(reader.bits_read(), 32);
    }

    #[test]
    fn test_read_magic_short_stream() {
        let mut reader = BitReader::new(Cursor::new(vec![0xfa, 0xce]));
        let err = read_magic(HUFF_TREE, &mut reader).unwrap_err();
        assert!(matches!(err, Error::BadMagic { found: None, .. }));
    }

    #[test]
    fn test_magic_skipped_on_non_empty_stream() {
        let mut writer = BitWriter::new(Vec::new());
        assert_eq!(write_magic(HUFF_TREE, &mut writer).unwrap(), 32);
        assert_eq!(write_magic(HUFF_TREE, &mut writer).unwrap(), 0);
        assert_eq!(writer.bits_written(), 32);
    }

    #[test]
    fn test_truncated_tree() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"abcdef"));
        let mut bytes = serialize_tree(&tree);
        bytes.truncate(bytes.len() / 2);

        let mut reader = BitReader::new(Cursor::new(bytes));
        let err = read_tree(&mut reader).unwrap_err();
        assert!(matches!(
            err,
            Error::Truncated {
                section: Section::Header,
                ..
            }
        ));
    }

    #[test]
    fn test_leaf_symbol_out_of_range() {
        let mut writer = BitWriter::new(Vec::new());
        writer.write_bits(1, 1).unwrap();
        writer.write_bits(9, 300).unwrap();
        let data = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(data));
        let err = read_tree(&mut reader).unwrap_err();
        assert!(matches!(err, Error::CorruptedData { .. }));
    }

    #[test]
    fn test_degenerate_depth_rejected() {
        // A left spine of zero bits never reaches a leaf
        let data = vec![0u8; 64];
        let mut reader = BitReader::new(Cursor::new(data));
        let err = read_tree(&mut reader).unwrap_err();
        assert!(matches!(err, Error::CorruptedData { .. }));
    }

    /// Left spine of `depth` internal nodes ending in the end marker.
    fn spine(depth: usize) -> HuffmanTree {
        let mut node = HuffNode::leaf(PSEUDO_EOF, 1);
        for _ in 0..depth {
            node = HuffNode::merge(node, HuffNode::leaf(b'z' as Symbol, 1));
        }
        HuffmanTree::from_root(node)
    }

    #[test]
    fn test_deepest_tree_roundtrip() {
        let tree = spine(MAX_CODE_BITS);
        let mut reader = BitReader::new(Cursor::new(serialize_tree(&tree)));
        let rebuilt = read_tree(&mut reader).unwrap();
        assert_eq!(rebuilt.depth(), MAX_CODE_BITS);
        assert!(tree.same_shape(&rebuilt));
    }

    #[test]
    fn test_too_deep_tree_rejected() {
        for depth in [MAX_CODE_BITS + 1, 200] {
            let mut reader = BitReader::new(Cursor::new(serialize_tree(&spine(depth))));
            let err = read_tree(&mut reader).unwrap_err();
            assert!(matches!(err, Error::CorruptedData { .. }), "depth {depth}");
        }
    }

    #[test]
    fn test_counts_roundtrip_rebuilds_same_tree() {
        let freq = FrequencyTable::from_bytes(b"mississippi river");
        let tree = HuffmanTree::from_frequencies(&freq);

        let mut writer = BitWriter::new(Vec::new());
        assert_eq!(write_counts(&freq, &mut writer).unwrap(), 256 * 32);
        let data = writer.finish().unwrap();

        let mut reader = BitReader::new(Cursor::new(data));
        let rebuilt = read_counts(&mut reader).unwrap();
        assert_eq!(tree, rebuilt);
    }

    #[test]
    fn test_counts_too_large() {
        let mut counts = [0u64; ALPH_SIZE];
        counts[7] = u32::MAX as u64 + 1;
        let freq = FrequencyTable::from_counts(counts);

        assert!(matches!(check_counts(&freq), Err(Error::Unsupported(_))));

        let mut writer = BitWriter::new(Vec::new());
        let err = write_counts(&freq, &mut writer).unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert_eq!(writer.bits_written(), 0);
    }
}
