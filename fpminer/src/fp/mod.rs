pub mod combinations;
pub mod growth;
pub mod occurrences;
pub mod transaction;
pub mod utils;


pub use growth::{mine_frequent_patterns, mine_unweighted, FPNode, FPTree, FpGrowth};
pub use occurrences::{sort_and_filter, OccurrenceTable};
pub use transaction::{merge_duplicates, unweighted, Item, WeightedTransaction};
pub use utils::{FrequentItemsets, FrequentLevel, ItemsetStorage};

use crate::error::Result;

/// Anything that turns weighted transactions and an absolute support
/// threshold into frequent itemsets plus per-item occurrence counts.
pub trait FrequentPatternMiner<T: Item> {
    fn mine(
        &self,
        transactions: &[WeightedTransaction<T>],
        min_support: usize,
    ) -> Result<(FrequentItemsets<T>, OccurrenceTable<T>)>;
}
