//! Error types for the H-good search

use std::time::Duration;
use thiserror::Error;

/// Caller contract violations on graphs, patterns and the edge codec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex pair ({i}, {j}) is invalid for {vertices} vertices (need 1 <= i < j <= n)")]
    VertexOutOfRange { vertices: usize, i: usize, j: usize },

    #[error("bit position {position} is invalid for {vertices} vertices (need 1 <= p <= {max})")]
    PositionOutOfRange {
        vertices: usize,
        position: usize,
        max: usize,
    },

    #[error("bitstring lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("pattern has {pattern} vertices but target has only {target}")]
    PatternTooLarge { pattern: usize, target: usize },

    #[error("bitstring length {0} is not a triangular number n(n-1)/2")]
    NotTriangular(usize),

    #[error("invalid bit {0:?}, expected '0' or '1'")]
    InvalidBit(char),

    #[error("{vertices} vertices exceeds the supported maximum of {max}")]
    TooManyVertices { vertices: usize, max: usize },

    #[error("cannot enumerate graphs with {edges} edge slots (at most {max})")]
    TooManyEdgeSlots { edges: usize, max: usize },

    #[error("pattern family is empty")]
    EmptyFamily,

    #[error("pattern family mixes vertex counts {expected} and {found}")]
    MixedPatternSizes { expected: usize, found: usize },

    #[error("conflict matrix for {size} candidates needs {expected} words, found {found}")]
    MalformedMatrix {
        size: usize,
        expected: usize,
        found: usize,
    },
}

/// Failures reported by an IP oracle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("model is infeasible: {0}")]
    Infeasible(String),

    #[error("objective is unbounded through variable {0}")]
    Unbounded(String),

    #[error("model is not supported by this oracle: {0}")]
    Unsupported(String),

    #[error("model is malformed: {0}")]
    InvalidModel(String),

    #[error("node limit of {0} reached before proving optimality")]
    NodeLimit(u64),

    #[error("time limit of {0:?} reached before proving optimality")]
    TimeLimit(Duration),

    #[error("solution pool requested before a successful solve")]
    NotSolved,
}
