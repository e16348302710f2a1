//! Exhaustive search for H-good graph families
//!
//! Every labeled graph on `n` vertices is a candidate. Two candidates
//! conflict when their symmetric difference contains a member of the
//! forbidden family H, and the largest conflict-free family (or the largest
//! clique of conflicts) is found by integer programming.

pub mod config;
pub mod conflict;
pub mod error;
pub mod graph;
pub mod ip;
pub mod pattern;
pub mod pipeline;
pub mod storage;

pub use anyhow::{Result, anyhow};
pub use error::{GraphError, OracleError};
