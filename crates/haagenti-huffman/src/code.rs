//! Code table generation.
//!
//! Every leaf's code is its path from the root: 0 for a left branch, 1 for
//! a right branch. Because symbols only live in leaves, no code is a prefix
//! of another.

use std::fmt;

use haagenti_core::{BitWrite, Error, Result};

use crate::tree::{HuffNode, HuffmanTree};
use crate::{ALPH_SIZE, PSEUDO_EOF, Symbol};

/// Longest code a tree may produce.
///
/// Counts are 64-bit, so greedily built trees stay far below this. Header
/// readers and [`CodeTable::from_tree`] reject deeper trees.
pub const MAX_CODE_BITS: usize = 128;

/// A root-to-leaf path, most significant bit first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Code {
    bits: u128,
    num_bits: u8,
}

impl Code {
    /// Build a code from the low `num_bits` of `bits`.
    pub fn new(bits: u128, num_bits: u8) -> Self {
        debug_assert!(num_bits as usize <= MAX_CODE_BITS);
        let mask = if num_bits as usize >= MAX_CODE_BITS {
            u128::MAX
        } else {
            (1u128 << num_bits) - 1
        };
        Self {
            bits: bits & mask,
            num_bits,
        }
    }

    /// Code bits, right-aligned.
    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn num_bits(&self) -> u8 {
        self.num_bits
    }

    /// Bit at `index`, counted from the first bit written.
    pub fn bit(&self, index: u8) -> bool {
        debug_assert!(index < self.num_bits);
        (self.bits >> (self.num_bits - 1 - index)) & 1 == 1
    }

    fn push(self, bit: bool) -> Result<Self> {
        if self.num_bits as usize >= MAX_CODE_BITS {
            return Err(Error::corrupted(format!(
                "code tree deeper than {MAX_CODE_BITS} levels"
            )));
        }
        Ok(Self {
            bits: (self.bits << 1) | bit as u128,
            num_bits: self.num_bits + 1,
        })
    }

    /// Whether `self` is a prefix of `other` (every code is a prefix of itself).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.num_bits == 0 {
            return true;
        }
        self.num_bits <= other.num_bits
            && other.bits >> (other.num_bits - self.num_bits) == self.bits
    }

    /// Emit the code in chunks of up to 32 bits.
    pub fn write_to<W: BitWrite>(&self, out: &mut W) -> Result<()> {
        let mut remaining = self.num_bits;
        while remaining > 0 {
            let chunk = remaining.min(32);
            remaining -= chunk;
            let value = (self.bits >> remaining) as u32;
            out.write_bits(chunk, value)?;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.num_bits {
            f.write_str(if self.bit(i) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from every leaf symbol to its code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Derive codes from a tree.
    ///
    /// A tree consisting of a lone leaf has no branch to take, so its symbol
    /// is assigned the one-bit code `0`. Fails if a leaf lies deeper than
    /// [`MAX_CODE_BITS`].
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut codes = vec![None; ALPH_SIZE + 1];
        match tree.root() {
            HuffNode::Leaf { symbol, .. } => {
                if let Some(slot) = codes.get_mut(*symbol as usize) {
                    *slot = Some(Code::new(0, 1));
                }
            }
            root => assign(root, Code::default(), &mut codes)?,
        }
        Ok(Self { codes })
    }

    /// Code for `symbol`, `None` if the symbol is not in the tree.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(symbol as usize).and_then(Option::as_ref)
    }

    /// Code of the end marker.
    pub fn end_code(&self) -> Option<&Code> {
        self.get(PSEUDO_EOF)
    }

    /// Number of symbols with a code.
    pub fn entries(&self) -> usize {
        self.codes.iter().flatten().count()
    }

    /// Symbols and codes in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol as Symbol, c)))
    }

    /// Total content bits needed for `data` plus the end marker.
    ///
    /// Returns `None` if some byte has no code.
    pub fn encoded_bits(&self, data: &[u8]) -> Option<u64> {
        let mut total = self.end_code()?.num_bits() as u64;
        for &byte in data {
            total += self.get(byte as Symbol)?.num_bits() as u64;
        }
        Some(total)
    }
}

fn assign(node: &HuffNode, path: Code, codes: &mut [Option<Code>]) -> Result<()> {
    match node {
        HuffNode::Leaf { symbol, .. } => {
            if let Some(slot) = codes.get_mut(*symbol as usize) {
                *slot = Some(path);
            }
            Ok(())
        }
        HuffNode::Internal { left, right, .. } => {
            assign(left, path.push(false)?, codes)?;
            assign(right, path.push(true)?, codes)
        }
    }
}
