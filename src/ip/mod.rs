//! Integer programs and the oracle interface used to solve them
//!
//! [`Model`] is solver-agnostic: variables with integer bounds, linear `<=`
//! constraints with unit coefficients, and a maximize-sum objective. Any
//! backend implementing [`IpOracle`] can be swapped in without touching the
//! combinatorial code.

pub mod branch_bound;
pub mod formulate;

use serde::{Deserialize, Serialize};

use crate::error::OracleError;

pub use branch_bound::BranchAndBound;
pub use formulate::{Mode, Optimum};

/// Handle to a variable of a [`Model`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarKind {
    Integer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub lower: i64,
    /// `None` means unbounded above
    pub upper: Option<i64>,
    pub kind: VarKind,
}

/// `sum(vars) <= rhs`; a variable listed twice counts twice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    pub vars: Vec<VarId>,
    pub rhs: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub name: String,
    pub variables: Vec<Variable>,
    pub constraints: Vec<Constraint>,
    /// Maximize the sum of these variables
    pub objective: Vec<VarId>,
    /// How many optimal solutions the oracle should keep, at least one
    pub pool_size: usize,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pool_size: 1,
            ..Default::default()
        }
    }

    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        lower: i64,
        upper: Option<i64>,
        kind: VarKind,
    ) -> VarId {
        self.variables.push(Variable {
            name: name.into(),
            lower,
            upper,
            kind,
        });
        VarId(self.variables.len() - 1)
    }

    pub fn set_objective_maximize_sum(&mut self, vars: &[VarId]) {
        self.objective = vars.to_vec();
    }

    pub fn add_constraint_le(&mut self, vars: &[VarId], rhs: i64) {
        self.constraints.push(Constraint {
            vars: vars.to_vec(),
            rhs,
        });
    }

    pub fn set_pool_size(&mut self, pool_size: usize) {
        self.pool_size = pool_size.max(1);
    }
}

/// Values for every variable of a model, indexed by [`VarId`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment(pub Vec<i64>);

impl Assignment {
    pub fn value(&self, var: VarId) -> i64 {
        self.0[var.0]
    }

    /// Variables with a non-zero value
    pub fn nonzero(&self) -> impl Iterator<Item = VarId> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v != 0)
            .map(|(i, _)| VarId(i))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    Optimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub status: SolveStatus,
    pub objective_value: i64,
    pub assignment: Assignment,
}

/// External integer-programming solver
///
/// Anything other than a proven optimum (infeasible, unbounded, limits hit)
/// comes back as an [`OracleError`].
pub trait IpOracle {
    fn solve(&mut self, model: &Model) -> Result<SolveOutcome, OracleError>;

    /// Up to `max_count` optimal assignments found by the last `solve`
    fn solution_pool(&self, max_count: usize) -> Result<Vec<Assignment>, OracleError>;
}
