//! Pairwise conflict detection over candidate graphs

use log;
use rayon::prelude::*;

use crate::conflict::ConflictMatrix;
use crate::error::GraphError;
use crate::graph::{EdgeBits, SubgraphMatcher};
use crate::pattern::PatternFamily;

/// Builds the conflict matrix for a candidate list and a pattern family
///
/// Two candidates conflict when their symmetric difference contains some
/// member of the family. Match results are memoized in the owned
/// [`SubgraphMatcher`], which lives as long as the builder.
#[derive(Debug, Default)]
pub struct ConflictGraphBuilder {
    matcher: SubgraphMatcher,
    parallel: bool,
}

impl ConflictGraphBuilder {
    pub fn new(parallel: bool) -> Self {
        Self {
            matcher: SubgraphMatcher::new(),
            parallel,
        }
    }

    pub fn matcher(&self) -> &SubgraphMatcher {
        &self.matcher
    }

    /// Whether the symmetric difference of `a` and `b` contains a pattern
    pub fn in_conflict(
        &self,
        a: &EdgeBits,
        b: &EdgeBits,
        family: &PatternFamily,
    ) -> Result<bool, GraphError> {
        let diff = a.symmetric_difference(b)?;
        self.matcher.contains_any(&diff, family)
    }

    /// Test every unordered pair of candidates
    pub fn build(
        &self,
        candidates: &[EdgeBits],
        family: &PatternFamily,
    ) -> Result<ConflictMatrix, GraphError> {
        let size = candidates.len();
        log::info!(
            "Building conflict matrix for {} candidates and {} patterns",
            size,
            family.len()
        );

        if let Some(first) = candidates.first() {
            if family.vertices() > first.vertex_count() {
                return Err(GraphError::PatternTooLarge {
                    pattern: family.vertices(),
                    target: first.vertex_count(),
                });
            }
            if let Some(odd) = candidates.iter().find(|c| c.len() != first.len()) {
                return Err(GraphError::LengthMismatch {
                    left: first.len(),
                    right: odd.len(),
                });
            }
        }

        // Row i holds the j < i that conflict with candidate i
        let rows: Vec<Vec<usize>> = if self.parallel {
            (0..size)
                .into_par_iter()
                .map(|i| self.conflict_row(candidates, i, family))
                .collect::<Result<_, _>>()?
        } else {
            (0..size)
                .map(|i| self.conflict_row(candidates, i, family))
                .collect::<Result<_, _>>()?
        };

        let mut matrix = ConflictMatrix::new(size);
        for (i, row) in rows.iter().enumerate() {
            for &j in row {
                matrix.set(i, j);
            }
        }

        let memo = self.matcher.memo().stats();
        log::info!(
            "Found {} conflicting pairs ({} searches, {} memo entries, {} memo hits)",
            matrix.conflict_count(),
            self.matcher.searches(),
            memo.entries,
            memo.hits
        );

        Ok(matrix)
    }

    fn conflict_row(
        &self,
        candidates: &[EdgeBits],
        i: usize,
        family: &PatternFamily,
    ) -> Result<Vec<usize>, GraphError> {
        let mut row = Vec::new();
        for j in 0..i {
            if self.in_conflict(&candidates[i], &candidates[j], family)? {
                row.push(j);
            }
        }
        if i > 0 && i % 4096 == 0 {
            log::debug!("Conflict row {} done ({} conflicts)", i, row.len());
        }
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::enumerate::all_graphs;

    #[test]
    fn triangle_conflicts_on_three_vertices_are_complements() {
        let graphs = all_graphs(3).unwrap();
        let family = PatternFamily::complete(3).unwrap();
        let matrix = ConflictGraphBuilder::new(false).build(&graphs, &family).unwrap();

        assert_eq!(matrix.size(), 8);
        for i in 0..8 {
            for j in 0..8 {
                let diff = graphs[i].symmetric_difference(&graphs[j]).unwrap();
                assert_eq!(matrix.conflicts(i, j), diff.to_string() == "111", "i={i} j={j}");
            }
        }
        assert_eq!(matrix.conflict_count(), 4);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let graphs = all_graphs(4).unwrap();
        let family = PatternFamily::complete(3).unwrap();
        let sequential = ConflictGraphBuilder::new(false).build(&graphs, &family).unwrap();
        let parallel = ConflictGraphBuilder::new(true).build(&graphs, &family).unwrap();
        assert_eq!(sequential, parallel);
        assert!(sequential.conflict_count() > 0);
    }

    #[test]
    fn repeated_differences_hit_the_memo() {
        let graphs = all_graphs(4).unwrap();
        let family = PatternFamily::complete(3).unwrap();
        let builder = ConflictGraphBuilder::new(false);
        builder.build(&graphs, &family).unwrap();

        // 64 graphs give 2016 pairs but only 63 distinct non-zero differences
        assert_eq!(builder.matcher().searches(), 63);
        assert_eq!(builder.matcher().memo().stats().hits, 2016 - 63);
    }

    #[test]
    fn rejects_mixed_candidate_sizes() {
        let candidates = vec!["111".parse().unwrap(), "000000".parse().unwrap()];
        let family = PatternFamily::complete(3).unwrap();
        assert!(matches!(
            ConflictGraphBuilder::new(false).build(&candidates, &family),
            Err(GraphError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_patterns_larger_than_candidates() {
        let candidates = all_graphs(3).unwrap();
        let family = PatternFamily::complete(4).unwrap();
        assert!(matches!(
            ConflictGraphBuilder::new(true).build(&candidates, &family),
            Err(GraphError::PatternTooLarge { pattern: 4, target: 3 })
        ));
    }

    #[test]
    fn empty_candidate_list() {
        let family = PatternFamily::complete(3).unwrap();
        let matrix = ConflictGraphBuilder::new(true).build(&[], &family).unwrap();
        assert_eq!(matrix.size(), 0);
    }
}
