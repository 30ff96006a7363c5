//! Content encoding and decoding.
//!
//! Encoding replaces every input byte with its code and terminates the
//! content with the end marker's code, so trailing pad bits in the last
//! byte are never mistaken for symbols. Decoding walks the tree one bit at
//! a time from the root until it reaches a leaf.

use haagenti_core::{BitRead, BitWrite, Error, Result, Section};
use tracing::debug;

use crate::code::CodeTable;
use crate::tree::{HuffNode, HuffmanTree};
use crate::{BITS_PER_WORD, PSEUDO_EOF, Symbol};

/// Totals for one encoded or decoded content section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentSummary {
    /// Literal bytes encoded or decoded, excluding the end marker.
    pub symbols: u64,
    /// Content bits written or read, including the end marker's code.
    pub bits: u64,
}

/// Encode every byte of `input` followed by the end marker.
pub fn encode_content<R, W>(input: &mut R, codes: &CodeTable, out: &mut W) -> Result<ContentSummary>
where
    R: BitRead,
    W: BitWrite,
{
    let start = out.bits_written();
    let mut symbols = 0u64;

    while let Some(value) = input.read_bits(BITS_PER_WORD)? {
        let code = codes
            .get(value as Symbol)
            .ok_or_else(|| Error::corrupted(format!("byte {value} not in code table")))?;
        code.write_to(out)?;
        symbols += 1;
    }

    let end = codes
        .end_code()
        .ok_or_else(|| Error::corrupted("end marker not in code table"))?;
    end.write_to(out)?;

    let summary = ContentSummary {
        symbols,
        bits: out.bits_written() - start,
    };
    debug!(symbols, bits = summary.bits, "encoded content");
    Ok(summary)
}

/// Outcome of feeding one bit to a [`Decoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Inside the tree; more bits are needed.
    Continue,
    /// A literal leaf was reached; the walk restarts at the root.
    Emit(u8),
    /// The end marker was reached.
    Done,
}

/// Bit-driven walk over a code tree.
#[derive(Debug, Clone)]
pub struct Decoder<'t> {
    root: &'t HuffNode,
    cursor: &'t HuffNode,
}

impl<'t> Decoder<'t> {
    pub fn new(tree: &'t HuffmanTree) -> Self {
        Self {
            root: tree.root(),
            cursor: tree.root(),
        }
    }

    /// Whether the walk is at the root, i.e. between symbols.
    pub fn at_root(&self) -> bool {
        std::ptr::eq(self.root, self.cursor)
    }

    /// Follow one branch: `false` goes left, `true` goes right.
    ///
    /// A tree that is a lone leaf consumes one bit per symbol.
    pub fn step(&mut self, bit: bool) -> Result<Step> {
        let node = self.cursor.child(bit).unwrap_or(self.cursor);
        let HuffNode::Leaf { symbol, .. } = node else {
            self.cursor = node;
            return Ok(Step::Continue);
        };

        if *symbol == PSEUDO_EOF {
            return Ok(Step::Done);
        }
        self.cursor = self.root;
        let byte = u8::try_from(*symbol)
            .map_err(|_| Error::corrupted(format!("leaf symbol {symbol} is not a byte")))?;
        Ok(Step::Emit(byte))
    }
}

/// Decode content with `tree` until the end marker.
///
/// Running out of input before the end marker is an error; output already
/// written for earlier symbols is left in `out`.
pub fn decode_content<R, W>(tree: &HuffmanTree, input: &mut R, out: &mut W) -> Result<ContentSummary>
where
    R: BitRead,
    W: BitWrite,
{
    let start = input.bits_read();
    let mut decoder = Decoder::new(tree);
    let mut symbols = 0u64;

    loop {
        let bit = input
            .read_bit()?
            .ok_or_else(|| Error::truncated(Section::Content, input.bits_read()))?;
        match decoder.step(bit)? {
            Step::Continue => {}
            Step::Emit(byte) => {
                out.write_bits(BITS_PER_WORD, byte as u32)?;
                symbols += 1;
            }
            Step::Done => break,
        }
    }

    let summary = ContentSummary {
        symbols,
        bits: input.bits_read() - start,
    };
    debug!(symbols, bits = summary.bits, "decoded content");
    Ok(summary)
}
