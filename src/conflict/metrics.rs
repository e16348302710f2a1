//! Conflict graph statistics

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};

use crate::conflict::ConflictMatrix;

/// Summary of a conflict matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictStats {
    pub candidates: usize,
    pub conflicting_pairs: usize,

    /// Conflicting pairs / all pairs
    pub density: f64,

    pub min_degree: usize,
    pub max_degree: usize,

    /// Candidates that conflict with nothing; every one of them belongs to
    /// any maximum independent set
    pub isolated: usize,

    pub components: usize,
}

/// Calculate statistics for a conflict matrix
pub fn calculate_stats(matrix: &ConflictMatrix) -> ConflictStats {
    let n = matrix.size();
    let degrees: Vec<usize> = (0..n).map(|i| matrix.degree(i)).collect();
    let conflicting_pairs = matrix.conflict_count();

    ConflictStats {
        candidates: n,
        conflicting_pairs,
        density: calculate_density(n, conflicting_pairs),
        min_degree: degrees.iter().copied().min().unwrap_or(0),
        max_degree: degrees.iter().copied().max().unwrap_or(0),
        isolated: degrees.iter().filter(|&&d| d == 0).count(),
        components: count_components(matrix),
    }
}

/// Density (conflicting pairs / potential pairs)
pub fn calculate_density(candidates: usize, conflicting_pairs: usize) -> f64 {
    if candidates <= 1 {
        return 0.0;
    }
    let potential = candidates * (candidates - 1) / 2;
    conflicting_pairs as f64 / potential as f64
}

/// Number of connected components of the conflict graph
pub fn count_components(matrix: &ConflictMatrix) -> usize {
    let mut graph = UnGraph::<(), ()>::with_capacity(matrix.size(), matrix.conflict_count());
    let nodes: Vec<_> = (0..matrix.size()).map(|_| graph.add_node(())).collect();
    for (i, j) in matrix.conflicting_pairs() {
        graph.add_edge(nodes[i], nodes[j], ());
    }
    connected_components(&graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_of_a_perfect_matching() {
        let mut matrix = ConflictMatrix::new(6);
        matrix.set(1, 0);
        matrix.set(3, 2);
        matrix.set(5, 4);
        let stats = calculate_stats(&matrix);
        assert_eq!(stats.candidates, 6);
        assert_eq!(stats.conflicting_pairs, 3);
        assert!((stats.density - 3.0 / 15.0).abs() < 1e-12);
        assert_eq!(stats.min_degree, 1);
        assert_eq!(stats.max_degree, 1);
        assert_eq!(stats.isolated, 0);
        assert_eq!(stats.components, 3);
    }

    #[test]
    fn isolated_candidates_are_their_own_components() {
        let mut matrix = ConflictMatrix::new(4);
        matrix.set(2, 1);
        let stats = calculate_stats(&matrix);
        assert_eq!(stats.isolated, 2);
        assert_eq!(stats.min_degree, 0);
        assert_eq!(stats.components, 3);
    }

    #[test]
    fn empty_matrix() {
        let stats = calculate_stats(&ConflictMatrix::new(0));
        assert_eq!(stats.components, 0);
        assert_eq!(stats.density, 0.0);
    }
}
