//! Enumeration of every labeled graph on `n` vertices

use crate::error::GraphError;
use crate::graph::codec::edge_slots;
use crate::graph::edges::EdgeBits;

/// Largest number of edge slots the counter-based enumerator accepts
pub const MAX_ENUMERABLE_SLOTS: usize = 63;

/// Lazily yields all `2^(n choose 2)` graphs on `n` vertices in lexicographic
/// order of their bitstrings, isomorphic copies included
#[derive(Debug, Clone)]
pub struct GraphEnumerator {
    vertices: usize,
    next: u64,
    end: u64,
}

impl GraphEnumerator {
    /// Create an enumerator for graphs on `vertices` vertices
    pub fn new(vertices: usize) -> Result<Self, GraphError> {
        let slots = edge_slots(vertices);
        if slots > MAX_ENUMERABLE_SLOTS {
            return Err(GraphError::TooManyEdgeSlots {
                edges: slots,
                max: MAX_ENUMERABLE_SLOTS,
            });
        }
        Ok(Self {
            vertices,
            next: 0,
            end: 1u64 << slots,
        })
    }

    /// Total number of graphs this enumerator produces from the start
    pub fn total(&self) -> u64 {
        self.end
    }

    /// Rewind to the first graph
    pub fn restart(&mut self) {
        self.next = 0;
    }
}

impl Iterator for GraphEnumerator {
    type Item = EdgeBits;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let graph = EdgeBits::from_counter(self.vertices, self.next);
        self.next += 1;
        Some(graph)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GraphEnumerator {}

/// Collect every graph on `vertices` vertices
pub fn all_graphs(vertices: usize) -> Result<Vec<EdgeBits>, GraphError> {
    Ok(GraphEnumerator::new(vertices)?.collect())
}
