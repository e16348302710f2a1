//! Mapping between vertex pairs and bit positions of the edge representation
//!
//! Pairs are ordered (1,2), (1,3), ..., (1,n), (2,3), ..., (n-1,n) and
//! positions are 1-indexed, so for n = 4 the pair (2,3) sits at position 4.

use crate::error::GraphError;

/// Number of unordered vertex pairs on `vertices` vertices
pub fn edge_slots(vertices: usize) -> usize {
    vertices * vertices.saturating_sub(1) / 2
}

/// Position of the pair just before row `i` starts, i.e. `pos(n, i, i)`
fn row_offset(vertices: usize, i: usize) -> usize {
    (i - 1) * vertices - i * (i - 1) / 2
}

/// Bit position (1-indexed) of the edge `(i, j)`, `1 <= i < j <= n`
pub fn edge_to_position(vertices: usize, i: usize, j: usize) -> Result<usize, GraphError> {
    if i == 0 || i >= j || j > vertices {
        return Err(GraphError::VertexOutOfRange { vertices, i, j });
    }
    Ok(row_offset(vertices, i) + j - i)
}

/// Inverse of [`edge_to_position`]
///
/// The closed-form root of the triangular inverse gives a first guess for
/// `i`, which is then moved to the exact row with integer comparisons so
/// that floating-point misrounding at row boundaries cannot leak through.
pub fn position_to_edge(vertices: usize, position: usize) -> Result<(usize, usize), GraphError> {
    let max = edge_slots(vertices);
    if position == 0 || position > max {
        return Err(GraphError::PositionOutOfRange {
            vertices,
            position,
            max,
        });
    }

    // i is the largest row with row_offset(i) < p, i.e. the largest integer
    // strictly below the smaller root of i^2 - (2n+1)i + 2n + 2p = 0.
    let b = (2 * vertices + 1) as f64;
    let disc = (b * b - 8.0 * (vertices + position) as f64).max(0.0);
    let root = (b - disc.sqrt()) / 2.0;
    let mut i = (root.ceil() as usize).saturating_sub(1).clamp(1, vertices - 1);

    while i > 1 && row_offset(vertices, i) >= position {
        i -= 1;
    }
    while i < vertices - 1 && row_offset(vertices, i + 1) < position {
        i += 1;
    }

    let j = position - row_offset(vertices, i) + i;
    debug_assert_eq!(edge_to_position(vertices, i, j), Ok(position));
    Ok((i, j))
}

/// Zero-based bit index of the zero-based pair `a < b`, no range checks
#[inline]
pub(crate) fn bit_index(vertices: usize, a: usize, b: usize) -> usize {
    a * vertices - a * (a + 1) / 2 + b - a - 1
}

/// Vertex count whose pair count equals `slots`, if one exists
///
/// Zero slots resolve to a single vertex.
pub fn vertices_for_slots(slots: usize) -> Result<usize, GraphError> {
    let estimate = ((1.0 + (1.0 + 8.0 * slots as f64).sqrt()) / 2.0) as usize;
    (estimate.saturating_sub(1)..=estimate + 1)
        .filter(|&n| n >= 1)
        .find(|&n| edge_slots(n) == slots)
        .ok_or(GraphError::NotTriangular(slots))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_positions_for_five_vertices() {
        assert_eq!(edge_to_position(5, 1, 2), Ok(1));
        assert_eq!(edge_to_position(5, 1, 5), Ok(4));
        assert_eq!(edge_to_position(5, 2, 3), Ok(5));
        assert_eq!(edge_to_position(5, 3, 4), Ok(8));
        assert_eq!(edge_to_position(5, 4, 5), Ok(10));
    }

    #[test]
    fn forward_then_inverse_is_identity() {
        for n in 2..=40 {
            for i in 1..n {
                for j in (i + 1)..=n {
                    let p = edge_to_position(n, i, j).unwrap();
                    assert_eq!(position_to_edge(n, p), Ok((i, j)), "n={n} i={i} j={j}");
                }
            }
        }
    }

    #[test]
    fn inverse_then_forward_is_identity() {
        for n in 2..=60 {
            for p in 1..=edge_slots(n) {
                let (i, j) = position_to_edge(n, p).unwrap();
                assert_eq!(edge_to_position(n, i, j), Ok(p), "n={n} p={p}");
            }
        }
    }

    #[test]
    fn row_boundaries_on_large_graphs() {
        let n = 3000;
        for i in [1, 2, 1499, 1500, 2998, 2999] {
            let first = edge_to_position(n, i, i + 1).unwrap();
            let last = edge_to_position(n, i, n).unwrap();
            assert_eq!(position_to_edge(n, first), Ok((i, i + 1)));
            assert_eq!(position_to_edge(n, last), Ok((i, n)));
        }
    }

    #[test]
    fn bit_index_matches_positions() {
        let n = 7;
        for a in 0..n {
            for b in (a + 1)..n {
                assert_eq!(bit_index(n, a, b) + 1, edge_to_position(n, a + 1, b + 1).unwrap());
            }
        }
    }

    #[test]
    fn rejects_out_of_range_input() {
        assert!(matches!(
            edge_to_position(4, 2, 2),
            Err(GraphError::VertexOutOfRange { .. })
        ));
        assert!(matches!(
            edge_to_position(4, 0, 2),
            Err(GraphError::VertexOutOfRange { .. })
        ));
        assert!(matches!(
            edge_to_position(4, 3, 5),
            Err(GraphError::VertexOutOfRange { .. })
        ));
        assert!(matches!(
            position_to_edge(4, 0),
            Err(GraphError::PositionOutOfRange { .. })
        ));
        assert!(matches!(
            position_to_edge(4, 7),
            Err(GraphError::PositionOutOfRange { max: 6, .. })
        ));
        assert!(position_to_edge(1, 1).is_err());
    }

    #[test]
    fn vertex_count_from_length() {
        assert_eq!(vertices_for_slots(0), Ok(1));
        assert_eq!(vertices_for_slots(1), Ok(2));
        assert_eq!(vertices_for_slots(3), Ok(3));
        assert_eq!(vertices_for_slots(10), Ok(5));
        assert_eq!(vertices_for_slots(4), Err(GraphError::NotTriangular(4)));
    }
}
