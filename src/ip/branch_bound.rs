//! Exact branch-and-bound oracle for 0/1 maximize-sum programs
//!
//! Pairwise constraints `x_i + x_j <= 1` form an exclusion graph, so an
//! optimal solution is a maximum clique of its complement (the
//! compatibility graph). The search is the classic colour-bounded clique
//! expansion: candidates are greedily coloured into classes of mutually
//! excluded variables, and a branch whose size plus colour count cannot
//! reach the incumbent is cut. Constraints of any other shape are kept as
//! knapsack rows and checked whenever a variable is taken.

use std::time::{Duration, Instant};

use itertools::Itertools;
use log;

use crate::error::OracleError;
use crate::ip::{Assignment, IpOracle, Model, SolveOutcome, SolveStatus, VarId};

/// Built-in exact solver
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
    pool: Option<Vec<Assignment>>,
    nodes: u64,
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give up with [`OracleError::NodeLimit`] after this many search nodes
    pub fn with_node_limit(mut self, limit: Option<u64>) -> Self {
        self.node_limit = limit;
        self
    }

    /// Give up with [`OracleError::TimeLimit`] after this much wall time
    pub fn with_time_limit(mut self, limit: Option<Duration>) -> Self {
        self.time_limit = limit;
        self
    }

    /// Search nodes visited by the last solve
    pub fn nodes_explored(&self) -> u64 {
        self.nodes
    }
}

impl IpOracle for BranchAndBound {
    fn solve(&mut self, model: &Model) -> Result<SolveOutcome, OracleError> {
        self.pool = None;
        self.nodes = 0;

        let problem = Problem::from_model(model)?;
        log::debug!(
            "Model {}: {} free 0/1 variables, {} knapsack rows",
            model.name,
            problem.vars.len(),
            problem.rows.len()
        );

        let mut search = Search {
            problem: &problem,
            usage: vec![0; problem.rows.len()],
            best: 0,
            pool: Vec::new(),
            pool_size: model.pool_size.max(1),
            nodes: 0,
            node_limit: self.node_limit,
            time_limit: self.time_limit,
            started: Instant::now(),
        };
        let result = search.run();
        self.nodes = search.nodes;
        result?;

        log::debug!(
            "Model {}: optimum {} after {} nodes, {} pooled solutions",
            model.name,
            search.best,
            search.nodes,
            search.pool.len()
        );

        let pool: Vec<Assignment> = search
            .pool
            .iter()
            .map(|chosen| problem.assignment(chosen))
            .collect();
        let assignment = pool
            .first()
            .cloned()
            .unwrap_or_else(|| Assignment(vec![0; problem.total_vars]));
        self.pool = Some(pool);

        Ok(SolveOutcome {
            status: SolveStatus::Optimal,
            objective_value: search.best as i64,
            assignment,
        })
    }

    fn solution_pool(&self, max_count: usize) -> Result<Vec<Assignment>, OracleError> {
        let pool = self.pool.as_ref().ok_or(OracleError::NotSolved)?;
        Ok(pool.iter().take(max_count).cloned().collect())
    }
}

/// The model reduced to free 0/1 variables
#[derive(Debug)]
struct Problem {
    /// Model variable behind each free variable
    vars: Vec<VarId>,
    /// Compatibility bitsets: bit `u` of `compatible[v]` is set when `u` and
    /// `v` may both be 1
    compatible: Vec<Vec<u64>>,
    /// Right-hand side of each knapsack row `sum(coef * x) <= rhs`
    rows: Vec<i64>,
    /// `(row, coefficient)` pairs for each free variable
    member_of: Vec<Vec<(usize, i64)>>,
    total_vars: usize,
}

impl Problem {
    fn from_model(model: &Model) -> Result<Self, OracleError> {
        let total_vars = model.variables.len();
        let known = |var: &VarId| {
            if var.0 < total_vars {
                Ok(())
            } else {
                Err(OracleError::InvalidModel(format!(
                    "reference to unknown variable {}",
                    var.0
                )))
            }
        };

        for (idx, var) in model.variables.iter().enumerate() {
            if let Some(upper) = var.upper {
                if upper < var.lower {
                    return Err(OracleError::Infeasible(format!(
                        "variable {} has empty domain [{}, {}]",
                        var.name, var.lower, upper
                    )));
                }
            }
            if var.lower != 0 {
                return Err(OracleError::Unsupported(format!(
                    "variable {} (#{}) has lower bound {}, expected 0",
                    var.name, idx, var.lower
                )));
            }
        }

        let mut constrained = vec![false; total_vars];
        for (idx, constraint) in model.constraints.iter().enumerate() {
            for var in &constraint.vars {
                known(var)?;
                constrained[var.0] = true;
            }
            if constraint.rhs < 0 {
                return Err(OracleError::Infeasible(format!(
                    "constraint {} needs a sum <= {} of non-negative variables",
                    idx, constraint.rhs
                )));
            }
        }

        // Objective variables become free unless something pins them to 0
        let mut free = vec![false; total_vars];
        let mut seen = vec![false; total_vars];
        for var in &model.objective {
            known(var)?;
            if std::mem::replace(&mut seen[var.0], true) {
                return Err(OracleError::InvalidModel(format!(
                    "variable {} appears twice in the objective",
                    model.variables[var.0].name
                )));
            }
            let variable = &model.variables[var.0];
            match variable.upper {
                None if !constrained[var.0] => {
                    return Err(OracleError::Unbounded(variable.name.clone()));
                }
                None => {
                    return Err(OracleError::Unsupported(format!(
                        "variable {} has no upper bound",
                        variable.name
                    )));
                }
                Some(upper) if upper > 1 => {
                    return Err(OracleError::Unsupported(format!(
                        "variable {} has upper bound {}, only 0/1 variables are supported",
                        variable.name, upper
                    )));
                }
                Some(upper) => free[var.0] = upper == 1,
            }
        }

        let mut exclusions = Vec::new();
        let mut knapsacks: Vec<(Vec<(usize, i64)>, i64)> = Vec::new();
        for constraint in &model.constraints {
            let coefs: Vec<(usize, i64)> = constraint
                .vars
                .iter()
                .map(|v| v.0)
                .filter(|&v| free[v])
                .counts()
                .into_iter()
                .map(|(v, count)| (v, count as i64))
                .sorted()
                .collect();
            let total: i64 = coefs.iter().map(|&(_, c)| c).sum();
            if total <= constraint.rhs {
                continue;
            }
            let mut kept = Vec::with_capacity(coefs.len());
            for (v, coef) in coefs {
                if coef > constraint.rhs {
                    free[v] = false;
                } else {
                    kept.push((v, coef));
                }
            }
            let pair = match kept[..] {
                [(a, 1), (b, 1)] if constraint.rhs == 1 => Some((a, b)),
                _ => None,
            };
            match pair {
                Some(pair) => exclusions.push(pair),
                None => knapsacks.push((kept, constraint.rhs)),
            }
        }

        let model_vars: Vec<usize> = (0..total_vars).filter(|&v| free[v]).collect();
        let mut local = vec![None; total_vars];
        for (i, &v) in model_vars.iter().enumerate() {
            local[v] = Some(i);
        }

        let m = model_vars.len();
        let words = m.div_ceil(64);
        let mut everyone = vec![!0u64; words];
        if m % 64 != 0 {
            everyone[words - 1] = (1 << (m % 64)) - 1;
        }
        let mut compatible: Vec<Vec<u64>> = (0..m)
            .map(|v| {
                let mut row = everyone.clone();
                row[v / 64] &= !(1 << (v % 64));
                row
            })
            .collect();
        for (a, b) in exclusions {
            // a variable pinned to 0 by a later row is no longer local
            if let (Some(a), Some(b)) = (local[a], local[b]) {
                compatible[a][b / 64] &= !(1 << (b % 64));
                compatible[b][a / 64] &= !(1 << (a % 64));
            }
        }

        let mut rows = Vec::new();
        let mut member_of = vec![Vec::new(); m];
        for (coefs, rhs) in knapsacks {
            let members: Vec<(usize, i64)> = coefs
                .into_iter()
                .filter_map(|(v, c)| local[v].map(|l| (l, c)))
                .collect();
            if members.iter().map(|&(_, c)| c).sum::<i64>() <= rhs {
                continue;
            }
            for &(l, c) in &members {
                member_of[l].push((rows.len(), c));
            }
            rows.push(rhs);
        }

        let problem = Self {
            vars: model_vars.into_iter().map(VarId).collect(),
            compatible,
            rows,
            member_of,
            total_vars,
        };
        Ok(problem)
    }

    #[inline]
    fn compatible(&self, u: usize, v: usize) -> bool {
        self.compatible[v][u / 64] >> (u % 64) & 1 == 1
    }

    fn degree(&self, v: usize) -> u32 {
        self.compatible[v].iter().map(|w| w.count_ones()).sum()
    }

    fn assignment(&self, chosen: &[usize]) -> Assignment {
        let mut values = vec![0; self.total_vars];
        for &l in chosen {
            values[self.vars[l].0] = 1;
        }
        Assignment(values)
    }
}

struct Search<'p> {
    problem: &'p Problem,
    /// Current left-hand side of each knapsack row
    usage: Vec<i64>,
    best: usize,
    pool: Vec<Vec<usize>>,
    pool_size: usize,
    nodes: u64,
    node_limit: Option<u64>,
    time_limit: Option<Duration>,
    started: Instant,
}

impl Search<'_> {
    fn run(&mut self) -> Result<(), OracleError> {
        let mut initial: Vec<usize> = (0..self.problem.vars.len())
            .filter(|&v| self.fits(v))
            .collect();
        if initial.is_empty() {
            self.record(&[]);
            return Ok(());
        }
        initial.sort_by_key(|&v| std::cmp::Reverse(self.problem.degree(v)));
        self.expand(&mut Vec::new(), &initial)
    }

    fn expand(&mut self, chosen: &mut Vec<usize>, candidates: &[usize]) -> Result<(), OracleError> {
        self.tick()?;
        let (order, colors) = self.color_sort(candidates);

        for idx in (0..order.len()).rev() {
            if !self.worth_exploring(chosen.len() + colors[idx]) {
                return Ok(());
            }
            let v = order[idx];
            self.take(v, 1);
            chosen.push(v);

            let next: Vec<usize> = order[..idx]
                .iter()
                .copied()
                .filter(|&u| self.problem.compatible(u, v) && self.fits(u))
                .collect();
            let result = if next.is_empty() {
                self.record(chosen);
                Ok(())
            } else {
                self.expand(chosen, &next)
            };

            chosen.pop();
            self.take(v, -1);
            result?;
        }
        Ok(())
    }

    /// Greedy colouring; a clique uses at most one vertex per colour class
    ///
    /// Returns the candidates ordered by class together with each one's class
    /// number (1-based), which bounds the clique size among it and everything
    /// before it.
    fn color_sort(&self, candidates: &[usize]) -> (Vec<usize>, Vec<usize>) {
        let mut classes: Vec<Vec<usize>> = Vec::new();
        for &v in candidates {
            let slot = classes
                .iter_mut()
                .find(|class| class.iter().all(|&u| !self.problem.compatible(u, v)));
            match slot {
                Some(class) => class.push(v),
                None => classes.push(vec![v]),
            }
        }

        let mut order = Vec::with_capacity(candidates.len());
        let mut colors = Vec::with_capacity(candidates.len());
        for (k, class) in classes.into_iter().enumerate() {
            for v in class {
                order.push(v);
                colors.push(k + 1);
            }
        }
        (order, colors)
    }

    /// Strictly better branches always; ties only while the pool has room
    fn worth_exploring(&self, bound: usize) -> bool {
        bound > self.best || (bound == self.best && self.pool.len() < self.pool_size)
    }

    fn record(&mut self, chosen: &[usize]) {
        if chosen.len() > self.best {
            self.best = chosen.len();
            self.pool.clear();
        }
        if chosen.len() == self.best && self.pool.len() < self.pool_size {
            let mut solution = chosen.to_vec();
            solution.sort_unstable();
            self.pool.push(solution);
        }
    }

    fn fits(&self, v: usize) -> bool {
        self.problem.member_of[v]
            .iter()
            .all(|&(row, coef)| self.usage[row] + coef <= self.problem.rows[row])
    }

    fn take(&mut self, v: usize, sign: i64) {
        let problem = self.problem;
        for &(row, coef) in &problem.member_of[v] {
            self.usage[row] += sign * coef;
        }
    }

    fn tick(&mut self) -> Result<(), OracleError> {
        self.nodes += 1;
        if let Some(limit) = self.node_limit {
            if self.nodes > limit {
                return Err(OracleError::NodeLimit(limit));
            }
        }
        if let Some(limit) = self.time_limit {
            if self.nodes % 256 == 1 && self.started.elapsed() >= limit {
                return Err(OracleError::TimeLimit(limit));
            }
        }
        Ok(())
    }
}
