//! Graph representation, enumeration and subgraph matching

pub mod codec;
pub mod edges;
pub mod enumerate;
pub mod matcher;

pub use edges::EdgeBits;
pub use enumerate::GraphEnumerator;
pub use matcher::SubgraphMatcher;
