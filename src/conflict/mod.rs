//! Conflict graph over candidate graphs

pub mod builder;
pub mod metrics;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::pattern::PatternFamily;

pub use builder::ConflictGraphBuilder;
pub use metrics::ConflictStats;

/// Lower-triangular boolean matrix over candidate indices
///
/// `conflicts(i, j)` is symmetric and false on the diagonal. The pair
/// `i > j` is stored at bit `i(i-1)/2 + j`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct ConflictMatrix {
    size: usize,
    bits: Vec<u64>,
}

/// Wire form of [`ConflictMatrix`], checked before use
#[derive(Deserialize)]
struct RawMatrix {
    size: usize,
    bits: Vec<u64>,
}

impl TryFrom<RawMatrix> for ConflictMatrix {
    type Error = GraphError;

    fn try_from(raw: RawMatrix) -> Result<Self, GraphError> {
        let pairs = raw
            .size
            .checked_mul(raw.size.saturating_sub(1))
            .map(|twice| twice / 2);
        let expected = pairs.map_or(usize::MAX, |pairs| pairs.div_ceil(64));
        let malformed = GraphError::MalformedMatrix {
            size: raw.size,
            expected,
            found: raw.bits.len(),
        };
        let Some(pairs) = pairs else {
            return Err(malformed);
        };
        if raw.bits.len() != expected {
            return Err(malformed);
        }
        // bits past the last pair must be clear
        if pairs % 64 != 0 && raw.bits[expected - 1] >> (pairs % 64) != 0 {
            return Err(malformed);
        }
        Ok(Self {
            size: raw.size,
            bits: raw.bits,
        })
    }
}

impl ConflictMatrix {
    /// Matrix for `size` candidates with no conflicts
    pub fn new(size: usize) -> Self {
        let pairs = size * size.saturating_sub(1) / 2;
        Self {
            size,
            bits: vec![0; pairs.div_ceil(64)],
        }
    }

    /// Number of candidates
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn slot(i: usize, j: usize) -> usize {
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        hi * (hi - 1) / 2 + lo
    }

    /// Whether candidates `i` and `j` conflict
    pub fn conflicts(&self, i: usize, j: usize) -> bool {
        if i == j || i >= self.size || j >= self.size {
            return false;
        }
        let slot = Self::slot(i, j);
        self.bits[slot / 64] >> (slot % 64) & 1 == 1
    }

    /// Mark candidates `i` and `j` as conflicting
    pub(crate) fn set(&mut self, i: usize, j: usize) {
        debug_assert!(i != j && i < self.size && j < self.size);
        let slot = Self::slot(i, j);
        self.bits[slot / 64] |= 1 << (slot % 64);
    }

    /// Total number of conflicting pairs
    pub fn conflict_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Number of candidates conflicting with `i`
    pub fn degree(&self, i: usize) -> usize {
        (0..self.size).filter(|&j| self.conflicts(i, j)).count()
    }

    /// Conflicting pairs `(i, j)` with `i > j`, row by row
    pub fn conflicting_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs().filter(|&(i, j)| self.conflicts(i, j))
    }

    /// Non-conflicting pairs `(i, j)` with `i > j`, the edges of the complement
    pub fn compatible_pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs().filter(|&(i, j)| !self.conflicts(i, j))
    }

    fn pairs(&self) -> impl Iterator<Item = (usize, usize)> {
        (0..self.size).flat_map(|i| (0..i).map(move |j| (i, j)))
    }
}

/// A conflict matrix together with the inputs it was built from
///
/// A matrix is only meaningful for one candidate vertex count and one
/// forbidden family, so both travel with it into the on-disk cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedMatrix {
    pub vertices: usize,
    pub patterns: Vec<String>,
    pub matrix: ConflictMatrix,
}

impl CachedMatrix {
    pub fn new(matrix: ConflictMatrix, vertices: usize, family: &PatternFamily) -> Self {
        Self {
            vertices,
            patterns: family.to_strings(),
            matrix,
        }
    }

    /// Whether this matrix was built for `vertices` and `family`
    pub fn built_for(&self, vertices: usize, family: &PatternFamily) -> bool {
        self.vertices == vertices && self.patterns == family.to_strings()
    }
}
