//! Configuration management for the H-good search

use std::time::Duration;

use crate::ip::formulate::{Mode, DEFAULT_POOL_SIZE};

/// Default configuration for a search run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Vertex count `n` of the candidate graphs
    pub vertices: usize,

    /// Optimum to compute over the conflict graph
    pub mode: Mode,

    /// Number of alternate optimal solutions kept in clique mode
    pub pool_size: usize,

    /// Test candidate pairs on the rayon thread pool
    pub parallel: bool,

    /// Search-node budget handed to the IP oracle
    pub node_limit: Option<u64>,

    /// Wall-clock budget handed to the IP oracle
    pub time_limit: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vertices: 5,
            mode: Mode::IndependentSet,
            pool_size: DEFAULT_POOL_SIZE,
            parallel: true,
            node_limit: None,
            time_limit: None,
        }
    }
}

impl Config {
    /// Create a new configuration with custom values and no oracle limits
    pub fn new(vertices: usize, mode: Mode, pool_size: usize, parallel: bool) -> Self {
        Self {
            vertices,
            mode,
            pool_size,
            parallel,
            ..Self::default()
        }
    }
}
