//! Huffman tree construction.
//!
//! Trees are built greedily: every present byte and the end marker start as
//! leaves in a min-priority queue, and the two lightest nodes are merged
//! until a single root remains.
//!
//! ## Tie Breaking
//!
//! Nodes of equal weight leave the queue in insertion order. Leaves are
//! inserted in ascending symbol order with the end marker last, and every
//! merged node is inserted after all existing ones. The same counts
//! therefore always produce the same tree, which the counts header relies
//! on to rebuild the encoder's tree.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use tracing::debug;

use crate::frequency::FrequencyTable;
use crate::{PSEUDO_EOF, Symbol};

/// Node of a Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: Symbol,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    /// Create a leaf.
    pub fn leaf(symbol: Symbol, weight: u64) -> Self {
        HuffNode::Leaf { symbol, weight }
    }

    /// Combine two subtrees; `left` is reached with a 0 bit.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// Symbol of a leaf, `None` for internal nodes.
    pub fn symbol(&self) -> Option<Symbol> {
        match self {
            HuffNode::Leaf { symbol, .. } => Some(*symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    /// Child reached by `bit` (`false` = left), `None` for leaves.
    #[inline]
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => Some(if bit { right } else { left }),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 1,
            HuffNode::Internal { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    fn depth(&self) -> usize {
        match self {
            HuffNode::Leaf { .. } => 0,
            HuffNode::Internal { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            HuffNode::Leaf { symbol, .. } => out.push(*symbol),
            HuffNode::Internal { left, right, .. } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
        }
    }

    fn same_shape(&self, other: &HuffNode) -> bool {
        match (self, other) {
            (HuffNode::Leaf { symbol: a, .. }, HuffNode::Leaf { symbol: b, .. }) => a == b,
            (
                HuffNode::Internal {
                    left: l1,
                    right: r1,
                    ..
                },
                HuffNode::Internal {
                    left: l2,
                    right: r2,
                    ..
                },
            ) => l1.same_shape(l2) && r1.same_shape(r2),
            _ => false,
        }
    }
}

/// Queue entry ordered by weight, then insertion sequence.
struct Pending {
    weight: u64,
    seq: u64,
    node: HuffNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.seq).cmp(&(other.weight, other.seq))
    }
}

/// A complete Huffman code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Build the code tree for the given byte counts plus the end marker.
    pub fn from_frequencies(freq: &FrequencyTable) -> Self {
        let mut queue = BinaryHeap::new();
        let mut seq = 0u64;
        let mut push = |queue: &mut BinaryHeap<Reverse<Pending>>, node: HuffNode| {
            queue.push(Reverse(Pending {
                weight: node.weight(),
                seq,
                node,
            }));
            seq += 1;
        };

        for (byte, count) in freq.present() {
            push(&mut queue, HuffNode::leaf(byte as Symbol, count));
        }
        push(&mut queue, HuffNode::leaf(PSEUDO_EOF, 1));

        while queue.len() > 1 {
            if let (Some(Reverse(first)), Some(Reverse(second))) = (queue.pop(), queue.pop()) {
                push(&mut queue, HuffNode::merge(first.node, second.node));
            }
        }
        // The end marker guarantees one node remains
        let root = match queue.pop() {
            Some(Reverse(last)) => last.node,
            None => HuffNode::leaf(PSEUDO_EOF, 1),
        };

        let tree = Self { root };
        debug!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            weight = tree.root.weight(),
            "built huffman tree"
        );
        tree
    }

    /// Wrap an already assembled root.
    pub fn from_root(root: HuffNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    pub fn into_root(self) -> HuffNode {
        self.root
    }

    /// Number of leaves (distinct symbols, including the end marker).
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Length of the longest root-to-leaf path; 0 for a lone leaf.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Leaf symbols in pre-order (left before right).
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        self.root.collect_symbols(&mut out);
        out
    }

    /// Structural equality ignoring weights.
    ///
    /// Weights are not serialized, so a tree read back from a header only
    /// matches its source in shape and leaf symbols.
    pub fn same_shape(&self, other: &HuffmanTree) -> bool {
        self.root.same_shape(&other.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find_depth(node: &HuffNode, symbol: Symbol, depth: usize) -> Option<usize> {
        match node {
            HuffNode::Leaf { symbol: s, .. } => (*s == symbol).then_some(depth),
            HuffNode::Internal { left, right, .. } => find_depth(left, symbol, depth + 1)
                .or_else(|| find_depth(right, symbol, depth + 1)),
        }
    }

    #[test]
    fn test_empty_input_is_lone_end_leaf() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::default());
        assert_eq!(tree.root(), &HuffNode::leaf(PSEUDO_EOF, 1));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn test_single_symbol_two_leaves() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"xxxxxx"));
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 1);
        // END (weight 1) leaves the queue before 'x' (weight 6)
        assert_eq!(tree.symbols(), vec![PSEUDO_EOF, b'x' as Symbol]);
        assert_eq!(tree.root().weight(), 7);
    }

    #[test]
    fn test_aaab_shape() {
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(b"AAAB"));
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.root().weight(), 5);

        let a = find_depth(tree.root(), b'A' as Symbol, 0).unwrap();
        let b = find_depth(tree.root(), b'B' as Symbol, 0).unwrap();
        let end = find_depth(tree.root(), PSEUDO_EOF, 0).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(end, 2);

        // B and END tie at weight 1; B was inserted first so it goes left
        let expected = HuffNode::merge(
            HuffNode::merge(HuffNode::leaf(b'B' as Symbol, 1), HuffNode::leaf(PSEUDO_EOF, 1)),
            HuffNode::leaf(b'A' as Symbol, 3),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn test_leaf_and_internal_counts() {
        let data: Vec<u8> = (0..=255u8).collect();
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(&data));
        assert_eq!(tree.leaf_count(), 257);

        let mut symbols = tree.symbols();
        symbols.sort_unstable();
        let expected: Vec<Symbol> = (0..=PSEUDO_EOF).collect();
        assert_eq!(symbols, expected);
    }

    #[test]
    fn test_deterministic() {
        let freq = FrequencyTable::from_bytes(b"the quick brown fox jumps over the lazy dog");
        let a = HuffmanTree::from_frequencies(&freq);
        let b = HuffmanTree::from_frequencies(&freq);
        assert_eq!(a, b);
    }

    #[test]
    fn test_frequent_symbols_not_deeper() {
        let mut data = vec![b'e'; 1000];
        data.extend(std::iter::repeat_n(b'q', 10));
        data.extend(std::iter::repeat_n(b'z', 1));
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_bytes(&data));

        let e = find_depth(tree.root(), b'e' as Symbol, 0).unwrap();
        let q = find_depth(tree.root(), b'q' as Symbol, 0).unwrap();
        let z = find_depth(tree.root(), b'z' as Symbol, 0).unwrap();
        assert!(e <= q && q <= z);
    }

    #[test]
    fn test_same_shape_ignores_weights() {
        let a = HuffmanTree::from_root(HuffNode::merge(
            HuffNode::leaf(1, 10),
            HuffNode::leaf(PSEUDO_EOF, 1),
        ));
        let b = HuffmanTree::from_root(HuffNode::merge(
            HuffNode::leaf(1, 0),
            HuffNode::leaf(PSEUDO_EOF, 0),
        ));
        let c = HuffmanTree::from_root(HuffNode::merge(
            HuffNode::leaf(PSEUDO_EOF, 0),
            HuffNode::leaf(1, 0),
        ));
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
        assert_ne!(a, b);
    }
}
