//! Non-induced subgraph matching by backtracking over vertex mappings

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::edges::{EdgeBits, MAX_VERTICES};
use crate::pattern::PatternFamily;

/// Whether `pattern` embeds into `target` under some injective vertex map
///
/// Every pattern edge must land on a target edge; extra target edges are
/// allowed. Runs the full search every time, see [`SubgraphMatcher`] for the
/// memoized form.
pub fn contains_subgraph(target: &EdgeBits, pattern: &EdgeBits) -> Result<bool, GraphError> {
    let n = target.vertex_count();
    let k = pattern.vertex_count();
    if k > n {
        return Err(GraphError::PatternTooLarge {
            pattern: k,
            target: n,
        });
    }
    if n > MAX_VERTICES {
        return Err(GraphError::TooManyVertices {
            vertices: n,
            max: MAX_VERTICES,
        });
    }
    if pattern.edge_count() > target.edge_count() {
        return Ok(false);
    }

    let search = Embedding::new(target, pattern);
    let mut image = vec![0usize; k];
    Ok(search.extend(0, &mut image, 0))
}

/// Backtracking state shared by every branch of one search
struct Embedding<'a> {
    target: &'a EdgeBits,
    /// For pattern vertex `v`, the earlier pattern vertices adjacent to it
    back_edges: Vec<Vec<usize>>,
}

impl<'a> Embedding<'a> {
    fn new(target: &'a EdgeBits, pattern: &EdgeBits) -> Self {
        let mut back_edges = vec![Vec::new(); pattern.vertex_count()];
        for (i, j) in pattern.edges() {
            back_edges[j - 1].push(i - 1);
        }
        Self { target, back_edges }
    }

    /// Map pattern vertex `depth` to each unused target vertex in turn
    ///
    /// `image[..depth]` is the current partial mapping. Entries past `depth`
    /// are scratch and get overwritten, so nothing needs undoing on return.
    fn extend(&self, depth: usize, image: &mut [usize], used: u64) -> bool {
        if depth == image.len() {
            return true;
        }
        for candidate in 0..self.target.vertex_count() {
            if used >> candidate & 1 == 1 {
                continue;
            }
            let realized = self.back_edges[depth]
                .iter()
                .all(|&u| self.target.adjacent(image[u], candidate));
            if !realized {
                continue;
            }
            image[depth] = candidate;
            if self.extend(depth + 1, image, used | 1 << candidate) {
                return true;
            }
        }
        false
    }
}

/// Counters describing how the memo table was used
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Append-only cache of match results, safe to share between worker threads
///
/// Results are grouped by pattern, then keyed by the exact target bitstring.
/// Both carry their vertex count, so graphs of different sizes never share
/// an entry.
#[derive(Debug, Default)]
pub struct MemoTable {
    by_pattern: DashMap<EdgeBits, DashMap<EdgeBits, bool>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for `(target, pattern)`, counting the lookup
    pub fn lookup(&self, target: &EdgeBits, pattern: &EdgeBits) -> Option<bool> {
        let found = match self.by_pattern.get(pattern) {
            Some(results) => results.value().get(target).map(|matched| *matched),
            None => None,
        };
        let counter = if found.is_some() { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Insert if absent and return the value now stored for the key
    pub fn insert(&self, target: EdgeBits, pattern: &EdgeBits, matched: bool) -> bool {
        if let Some(results) = self.by_pattern.get(pattern) {
            let stored = *results.value().entry(target).or_insert(matched);
            return stored;
        }
        let results = self.by_pattern.entry(pattern.clone()).or_default();
        let stored = *results.value().entry(target).or_insert(matched);
        stored
    }

    pub fn len(&self) -> usize {
        self.by_pattern.iter().map(|results| results.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Memoized subgraph matcher
///
/// Owns its [`MemoTable`] for the lifetime of one run. `searches` counts how
/// many backtracking searches were actually executed.
#[derive(Debug, Default)]
pub struct SubgraphMatcher {
    memo: MemoTable,
    searches: AtomicU64,
}

impl SubgraphMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized [`contains_subgraph`]
    pub fn contains_subgraph(
        &self,
        target: &EdgeBits,
        pattern: &EdgeBits,
    ) -> Result<bool, GraphError> {
        if let Some(matched) = self.memo.lookup(target, pattern) {
            return Ok(matched);
        }
        let matched = contains_subgraph(target, pattern)?;
        self.searches.fetch_add(1, Ordering::Relaxed);
        Ok(self.memo.insert(target.clone(), pattern, matched))
    }

    /// True if any member of `family` embeds into `target`, stopping at the first
    pub fn contains_any(
        &self,
        target: &EdgeBits,
        family: &PatternFamily,
    ) -> Result<bool, GraphError> {
        for pattern in family.patterns() {
            if self.contains_subgraph(target, pattern)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Number of backtracking searches run so far
    pub fn searches(&self) -> u64 {
        self.searches.load(Ordering::Relaxed)
    }

    pub fn memo(&self) -> &MemoTable {
        &self.memo
    }
}
