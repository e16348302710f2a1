//! Integer programs for maximum independent set and maximum clique

use serde::{Deserialize, Serialize};

use crate::conflict::ConflictMatrix;
use crate::error::OracleError;
use crate::ip::{Assignment, IpOracle, Model, VarId, VarKind};

/// Alternate optimal cliques kept by default
pub const DEFAULT_POOL_SIZE: usize = 10;

/// Which optimum to compute over the conflict graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Largest set of pairwise non-conflicting candidates (H-good family)
    IndependentSet,
    /// Largest set of pairwise conflicting candidates
    MaxClique,
}

/// Optimal value with the candidate indices of each solution found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Optimum {
    pub mode: Mode,
    pub value: i64,
    pub solutions: Vec<Vec<usize>>,
}

/// One 0/1 variable per candidate, maximize their sum
///
/// Independent-set mode excludes every conflicting pair, clique mode every
/// non-conflicting pair. Clique mode also asks the oracle for a pool of up
/// to `pool_size` optimal solutions.
pub fn formulate(matrix: &ConflictMatrix, mode: Mode, pool_size: usize) -> (Model, Vec<VarId>) {
    let mut model = Model::new(match mode {
        Mode::IndependentSet => "independent_set",
        Mode::MaxClique => "max_clique",
    });

    let vars: Vec<VarId> = (0..matrix.size())
        .map(|i| model.add_variable(format!("x[{i}]"), 0, Some(1), VarKind::Integer))
        .collect();
    model.set_objective_maximize_sum(&vars);

    let excluded: Box<dyn Iterator<Item = (usize, usize)> + '_> = match mode {
        Mode::IndependentSet => Box::new(matrix.conflicting_pairs()),
        Mode::MaxClique => Box::new(matrix.compatible_pairs()),
    };
    for (i, j) in excluded {
        model.add_constraint_le(&[vars[i], vars[j]], 1);
    }

    if mode == Mode::MaxClique {
        model.set_pool_size(pool_size);
    }

    log::info!(
        "Formulated {} with {} variables and {} constraints",
        model.name,
        model.variables.len(),
        model.constraints.len()
    );
    (model, vars)
}

/// Formulate, solve and read back the solutions
pub fn solve(
    oracle: &mut dyn IpOracle,
    matrix: &ConflictMatrix,
    mode: Mode,
    pool_size: usize,
) -> Result<Optimum, OracleError> {
    // an optimum always comes with at least one solution
    let pool_size = pool_size.max(1);
    let (model, vars) = formulate(matrix, mode, pool_size);
    let outcome = oracle.solve(&model)?;

    let assignments = match mode {
        Mode::IndependentSet => vec![outcome.assignment],
        Mode::MaxClique => oracle.solution_pool(pool_size)?,
    };
    let solutions = assignments
        .iter()
        .map(|assignment| selected(assignment, &vars))
        .collect();

    Ok(Optimum {
        mode,
        value: outcome.objective_value,
        solutions,
    })
}

fn selected(assignment: &Assignment, vars: &[VarId]) -> Vec<usize> {
    vars.iter()
        .enumerate()
        .filter(|&(_, &var)| assignment.value(var) != 0)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ip::BranchAndBound;

    /// Two disjoint conflicting triangles plus an isolated candidate
    fn two_triangles() -> ConflictMatrix {
        let mut matrix = ConflictMatrix::new(7);
        for (i, j) in [(1, 0), (2, 0), (2, 1), (4, 3), (5, 3), (5, 4)] {
            matrix.set(i, j);
        }
        matrix
    }

    #[test]
    fn independent_set_constraints_follow_conflicts() {
        let (model, vars) = formulate(&two_triangles(), Mode::IndependentSet, DEFAULT_POOL_SIZE);
        assert_eq!(vars.len(), 7);
        assert_eq!(model.constraints.len(), 6);
        assert_eq!(model.pool_size, 1);
        assert!(model.constraints.iter().all(|c| c.rhs == 1 && c.vars.len() == 2));
        assert!(model
            .variables
            .iter()
            .all(|v| v.lower == 0 && v.upper == Some(1) && v.kind == VarKind::Integer));
    }

    #[test]
    fn clique_constraints_follow_the_complement() {
        let (model, _) = formulate(&two_triangles(), Mode::MaxClique, 4);
        assert_eq!(model.constraints.len(), 21 - 6);
        assert_eq!(model.pool_size, 4);
    }

    #[test]
    fn solves_both_modes() {
        let matrix = two_triangles();
        let mut oracle = BranchAndBound::new();

        let independent = solve(&mut oracle, &matrix, Mode::IndependentSet, DEFAULT_POOL_SIZE).unwrap();
        assert_eq!(independent.value, 3);
        assert_eq!(independent.solutions.len(), 1);
        assert!(independent.solutions[0].contains(&6));

        let clique = solve(&mut oracle, &matrix, Mode::MaxClique, DEFAULT_POOL_SIZE).unwrap();
        assert_eq!(clique.value, 3);
        let mut found = clique.solutions.clone();
        found.sort();
        assert_eq!(found, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    }

    #[test]
    fn empty_clique_pool_still_reports_a_solution() {
        let mut oracle = BranchAndBound::new();
        let clique = solve(&mut oracle, &two_triangles(), Mode::MaxClique, 0).unwrap();
        assert_eq!(clique.value, 3);
        assert_eq!(clique.solutions.len(), 1);
        assert_eq!(clique.solutions[0].len(), 3);
    }

    #[test]
    fn oracle_failures_propagate() {
        let mut oracle = BranchAndBound::new().with_node_limit(Some(1));
        assert_eq!(
            solve(&mut oracle, &two_triangles(), Mode::IndependentSet, 1),
            Err(OracleError::NodeLimit(1))
        );
    }
}
