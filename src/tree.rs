//! Huffman tree construction and code assignment.
//!
//! The tree only lives long enough to derive a [`CodeTable`]; it's stored as
//! an arena of nodes addressed by index, and dropped once the codes are out.

use std::{cmp::Reverse, collections::BinaryHeap, fmt};

use log::trace;

use crate::bits::Code;
use crate::CodeTable;

/// How often each byte value occurs in some input.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
}

impl FrequencyTable {
    /// Count the bytes of `data`.
    pub fn of(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        Self { counts }
    }

    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Repeated symbols have their counts summed.
    pub fn from_counts(pairs: impl IntoIterator<Item = (u8, u64)>) -> Self {
        let mut counts = [0u64; 256];
        for (symbol, count) in pairs {
            counts[symbol as usize] = counts[symbol as usize].saturating_add(count);
        }
        Self { counts }
    }

    pub fn get(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of symbols that occur at least once.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&n| n > 0).count()
    }

    /// Symbols that occur at least once, with their counts, in ascending
    /// symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .map(|symbol| (symbol, self.get(symbol)))
            .filter(|&(_, count)| count > 0)
    }
}

impl fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl CodeTable {
    /// Build the Huffman code for `freq`.
    ///
    /// An empty table yields no codes. A table with a single distinct symbol
    /// yields the one-bit code `0` for it; otherwise every code is derived
    /// from the tree.
    pub fn from_frequencies(freq: &FrequencyTable) -> CodeTable {
        let codes = match freq.distinct() {
            0 => CodeTable::new(),
            1 => {
                let mut codes = CodeTable::new();
                for (symbol, _) in freq.iter() {
                    codes.insert(symbol, Code::repeat(false, 1)).ok();
                }
                codes
            }
            _ => Tree::build(freq).derive_codes(),
        };

        trace!("{} distinct symbols, codes: {:?}", codes.len(), codes);
        codes
    }
}

type NodeId = usize;

#[derive(Debug)]
enum Node {
    Leaf { symbol: u8 },
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Merge the two lightest nodes until one remains.
    ///
    /// Ties on weight go to the node created first. Leaves are created in
    /// ascending symbol order, before any internal node, so the shape of the
    /// tree is a pure function of `freq`. The first node popped becomes the
    /// left child.
    ///
    /// `freq` must contain at least one symbol.
    fn build(freq: &FrequencyTable) -> Tree {
        let mut nodes = Vec::with_capacity(2 * freq.distinct());
        // Keyed by (weight, id); ids double as creation order.
        let mut queue = BinaryHeap::new();

        for (symbol, count) in freq.iter() {
            queue.push(Reverse((count, nodes.len())));
            nodes.push(Node::Leaf { symbol });
        }

        while queue.len() > 1 {
            let Some(Reverse((w1, left))) = queue.pop() else { break };
            let Some(Reverse((w2, right))) = queue.pop() else { break };

            queue.push(Reverse((w1.saturating_add(w2), nodes.len())));
            nodes.push(Node::Internal { left, right });
        }

        // The last node pushed is the root (or the lone leaf).
        let root = nodes.len().saturating_sub(1);
        Tree { nodes, root }
    }

    /// Walk the tree in preorder, appending `0` going left and `1` going
    /// right, and record the path at every leaf.
    fn derive_codes(&self) -> CodeTable {
        let mut codes = CodeTable::new();
        let mut stack = vec![(self.root, Code::new())];

        while let Some((id, path)) = stack.pop() {
            match self.nodes[id] {
                Node::Leaf { symbol } => {
                    // With at least two leaves every path is 1 to 255 bits
                    // long (256 symbols at most), so `insert` always accepts
                    // it. `from_frequencies` handles the lone leaf itself.
                    let inserted = codes.insert(symbol, path);
                    debug_assert!(inserted.is_ok(), "leaf code rejected: {inserted:?}");
                }
                Node::Internal { left, right } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);

                    // Left is visited first.
                    stack.push((right, right_path));
                    stack.push((left, left_path));
                }
            }
        }

        codes
    }
}
