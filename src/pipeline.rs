//! End-to-end search: enumerate candidates, build conflicts, solve

use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::conflict::{metrics, CachedMatrix, ConflictGraphBuilder, ConflictMatrix, ConflictStats};
use crate::graph::enumerate::all_graphs;
use crate::graph::matcher::MemoStats;
use crate::graph::EdgeBits;
use crate::ip::formulate::{self, Mode};
use crate::ip::IpOracle;
use crate::pattern::PatternFamily;

/// Everything a run produces apart from the matrix itself
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub vertices: usize,
    pub pattern_vertices: usize,
    pub patterns: Vec<String>,
    pub mode: Mode,
    pub candidates: usize,
    pub conflicts: ConflictStats,

    /// Memo usage while building; zero when the matrix came from a cache
    pub memo: MemoStats,
    pub searches: u64,
    pub matrix_cached: bool,

    pub optimum: i64,
    /// Candidate indices of each optimal solution
    pub solutions: Vec<Vec<usize>>,
    /// The same solutions as bitstrings
    pub solution_graphs: Vec<Vec<String>>,

    pub build_seconds: f64,
    pub solve_seconds: f64,
}

/// Search over every labeled graph on `config.vertices` vertices
pub fn run(
    config: &Config,
    family: &PatternFamily,
    cached: Option<CachedMatrix>,
    oracle: &mut dyn IpOracle,
) -> Result<(ConflictMatrix, SearchReport)> {
    let candidates = all_graphs(config.vertices)
        .with_context(|| format!("enumerating graphs on {} vertices", config.vertices))?;
    log::info!(
        "Enumerated {} graphs on {} vertices",
        candidates.len(),
        config.vertices
    );
    run_with_candidates(config, &candidates, family, cached, oracle)
}

/// Search over an explicit candidate list
pub fn run_with_candidates(
    config: &Config,
    candidates: &[EdgeBits],
    family: &PatternFamily,
    cached: Option<CachedMatrix>,
    oracle: &mut dyn IpOracle,
) -> Result<(ConflictMatrix, SearchReport)> {
    let started = Instant::now();
    let builder = ConflictGraphBuilder::new(config.parallel);
    let matrix_cached = cached.is_some();
    let vertices = candidates
        .first()
        .map_or(config.vertices, EdgeBits::vertex_count);

    let matrix = match cached {
        Some(cached) => {
            if !cached.built_for(vertices, family) {
                bail!(
                    "cached conflict matrix was built for {} vertices and patterns {:?}, expected {} vertices and {:?}",
                    cached.vertices,
                    cached.patterns,
                    vertices,
                    family.to_strings()
                );
            }
            let matrix = cached.matrix;
            if matrix.size() != candidates.len() {
                bail!(
                    "cached conflict matrix covers {} candidates, expected {}",
                    matrix.size(),
                    candidates.len()
                );
            }
            log::info!("Using cached conflict matrix for {} candidates", matrix.size());
            matrix
        }
        None => builder
            .build(candidates, family)
            .context("building the conflict matrix")?,
    };
    let build_seconds = started.elapsed().as_secs_f64();

    let conflicts = metrics::calculate_stats(&matrix);
    log::info!(
        "Conflict graph: {} pairs, density {:.4}, degree {}..{}, {} isolated, {} components",
        conflicts.conflicting_pairs,
        conflicts.density,
        conflicts.min_degree,
        conflicts.max_degree,
        conflicts.isolated,
        conflicts.components
    );

    let started = Instant::now();
    let optimum = formulate::solve(oracle, &matrix, config.mode, config.pool_size)
        .context("solving the integer program")?;
    let solve_seconds = started.elapsed().as_secs_f64();
    log::info!(
        "Optimal {:?} value {} ({} solutions) in {:.3}s",
        config.mode,
        optimum.value,
        optimum.solutions.len(),
        solve_seconds
    );

    let solution_graphs = optimum
        .solutions
        .iter()
        .map(|solution| solution.iter().map(|&i| candidates[i].to_string()).collect())
        .collect();

    let report = SearchReport {
        vertices,
        pattern_vertices: family.vertices(),
        patterns: family.to_strings(),
        mode: config.mode,
        candidates: candidates.len(),
        conflicts,
        memo: builder.matcher().memo().stats(),
        searches: builder.matcher().searches(),
        matrix_cached,
        optimum: optimum.value,
        solutions: optimum.solutions,
        solution_graphs,
        build_seconds,
        solve_seconds,
    };

    Ok((matrix, report))
}
