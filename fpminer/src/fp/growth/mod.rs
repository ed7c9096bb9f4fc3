pub mod builder;
pub mod mining;
pub mod tree;

pub use mining::{mine_frequent_patterns, mine_unweighted, FpGrowth};
pub use tree::{FPNode, FPTree, HeaderEntry, NodeLabel};
