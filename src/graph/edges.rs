//! Bitstring edge representation of labeled simple graphs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::codec::{self, edge_slots};

/// Largest supported vertex count (one bit per vertex in the matcher's used mask)
pub const MAX_VERTICES: usize = 64;

const WORD_BITS: usize = 64;

/// A labeled simple graph stored as one bit per vertex pair
///
/// Bit `p - 1` holds the pair at codec position `p`. The vertex count is part
/// of the value, so two graphs with different `n` never compare equal even
/// when their bit patterns coincide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeBits {
    vertices: usize,
    words: Vec<u64>,
}

impl EdgeBits {
    /// Graph on `vertices` vertices with no edges
    pub fn empty(vertices: usize) -> Result<Self, GraphError> {
        if vertices > MAX_VERTICES {
            return Err(GraphError::TooManyVertices {
                vertices,
                max: MAX_VERTICES,
            });
        }
        let words = edge_slots(vertices).div_ceil(WORD_BITS);
        Ok(Self {
            vertices,
            words: vec![0; words],
        })
    }

    /// Complete graph K_n
    pub fn complete(vertices: usize) -> Result<Self, GraphError> {
        let mut graph = Self::empty(vertices)?;
        for bit in 0..graph.len() {
            graph.set_bit(bit);
        }
        Ok(graph)
    }

    /// Graph from 1-indexed vertex pairs (either orientation)
    pub fn from_edges(vertices: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut graph = Self::empty(vertices)?;
        for &(u, v) in edges {
            let (i, j) = if u < v { (u, v) } else { (v, u) };
            let position = codec::edge_to_position(vertices, i, j)?;
            graph.set_bit(position - 1);
        }
        Ok(graph)
    }

    /// Parse a `'0'`/`'1'` string for a known vertex count
    pub fn parse_with_vertices(vertices: usize, text: &str) -> Result<Self, GraphError> {
        let mut graph = Self::empty(vertices)?;
        let len = text.chars().count();
        if len != graph.len() {
            return Err(GraphError::LengthMismatch {
                left: len,
                right: graph.len(),
            });
        }
        for (bit, ch) in text.chars().enumerate() {
            match ch {
                '1' => graph.set_bit(bit),
                '0' => {}
                other => return Err(GraphError::InvalidBit(other)),
            }
        }
        Ok(graph)
    }

    /// Lexicographic rank `counter` among all graphs on `vertices` vertices
    ///
    /// The leftmost character of the string form is the most significant bit
    /// of the counter, so counting up walks the strings in dictionary order.
    pub(crate) fn from_counter(vertices: usize, counter: u64) -> Self {
        let slots = edge_slots(vertices);
        let mut words = vec![0; slots.div_ceil(WORD_BITS)];
        if slots > 0 {
            words[0] = counter.reverse_bits() >> (WORD_BITS - slots);
        }
        Self { vertices, words }
    }

    /// Number of vertices `n`
    pub fn vertex_count(&self) -> usize {
        self.vertices
    }

    /// Number of bits, `n(n-1)/2`
    pub fn len(&self) -> usize {
        edge_slots(self.vertices)
    }

    /// True if there are no vertex pairs at all
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of edges present
    pub fn edge_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bit at 1-indexed codec position `position`
    pub fn get(&self, position: usize) -> Result<bool, GraphError> {
        if position == 0 || position > self.len() {
            return Err(GraphError::PositionOutOfRange {
                vertices: self.vertices,
                position,
                max: self.len(),
            });
        }
        Ok(self.bit(position - 1))
    }

    /// Whether the 1-indexed pair `(i, j)` is an edge
    pub fn has_edge(&self, i: usize, j: usize) -> Result<bool, GraphError> {
        let position = codec::edge_to_position(self.vertices, i, j)?;
        Ok(self.bit(position - 1))
    }

    /// Adjacency test on zero-based vertices, `a != b`, both `< n`
    #[inline]
    pub(crate) fn adjacent(&self, a: usize, b: usize) -> bool {
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        self.bit(codec::bit_index(self.vertices, lo, hi))
    }

    /// Edges as 1-indexed pairs in codec order
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.len())
            .filter(|&bit| self.bit(bit))
            .filter_map(move |bit| codec::position_to_edge(self.vertices, bit + 1).ok())
    }

    /// Bitwise XOR with a graph on the same vertex set
    pub fn symmetric_difference(&self, other: &Self) -> Result<Self, GraphError> {
        if self.len() != other.len() || self.vertices != other.vertices {
            return Err(GraphError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        let words = self
            .words
            .iter()
            .zip(&other.words)
            .map(|(a, b)| a ^ b)
            .collect();
        Ok(Self {
            vertices: self.vertices,
            words,
        })
    }

    #[inline]
    fn bit(&self, bit: usize) -> bool {
        self.words[bit / WORD_BITS] >> (bit % WORD_BITS) & 1 == 1
    }

    fn set_bit(&mut self, bit: usize) {
        self.words[bit / WORD_BITS] |= 1 << (bit % WORD_BITS);
    }
}

impl fmt::Display for EdgeBits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in 0..self.len() {
            f.write_str(if self.bit(bit) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl FromStr for EdgeBits {
    type Err = GraphError;

    /// Infers `n` from the string length; the empty string is the one-vertex graph
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vertices = codec::vertices_for_slots(s.chars().count())?;
        Self::parse_with_vertices(vertices, s)
    }
}
