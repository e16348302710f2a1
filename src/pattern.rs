//! Forbidden pattern families

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::EdgeBits;

/// An ordered, non-empty family H of patterns sharing one vertex count `k`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternFamily {
    vertices: usize,
    patterns: Vec<EdgeBits>,
}

impl PatternFamily {
    pub fn new(patterns: Vec<EdgeBits>) -> Result<Self, GraphError> {
        let vertices = patterns
            .first()
            .ok_or(GraphError::EmptyFamily)?
            .vertex_count();
        if let Some(odd) = patterns.iter().find(|p| p.vertex_count() != vertices) {
            return Err(GraphError::MixedPatternSizes {
                expected: vertices,
                found: odd.vertex_count(),
            });
        }
        Ok(Self { vertices, patterns })
    }

    /// Family from bitstrings such as `"111"`
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self, GraphError> {
        let parsed = patterns
            .iter()
            .map(|p| p.as_ref().parse())
            .collect::<Result<Vec<EdgeBits>, _>>()?;
        Self::new(parsed)
    }

    /// The single-member family {K_k}; `complete(3)` forbids triangles
    pub fn complete(k: usize) -> Result<Self, GraphError> {
        Self::new(vec![EdgeBits::complete(k)?])
    }

    /// Vertex count `k` shared by every pattern
    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn patterns(&self) -> &[EdgeBits] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Patterns rendered as bitstrings, in family order
    pub fn to_strings(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.to_string()).collect()
    }
}
