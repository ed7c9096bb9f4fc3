use tracing::{debug, trace};

use super::builder::{build_conditional_fp_tree, build_fp_tree};
use super::tree::FPTree;
use crate::config::{MiningStrategy, TraversalOrder};
use crate::error::Result;
use crate::fp::combinations::record_path_subsets;
use crate::fp::occurrences::OccurrenceTable;
use crate::fp::transaction::{unweighted, validate_weights, Item, WeightedTransaction};
use crate::fp::utils::FrequentItemsets;
use crate::fp::FrequentPatternMiner;

/// FP-Growth miner.
#[derive(Debug, Clone, Copy, Default)]
pub struct FpGrowth {
    pub strategy: MiningStrategy,
    pub traversal: TraversalOrder,
}

impl FpGrowth {
    pub fn new(strategy: MiningStrategy, traversal: TraversalOrder) -> Self {
        Self { strategy, traversal }
    }
}

impl<T: Item> FrequentPatternMiner<T> for FpGrowth {
    fn mine(
        &self,
        transactions: &[WeightedTransaction<T>],
        min_support: usize,
    ) -> Result<(FrequentItemsets<T>, OccurrenceTable<T>)> {
        validate_weights(transactions)?;

        // Itemsets that never occur are not reported, even at threshold 0.
        let min_support = min_support.max(1);
        let (fp_tree, occurrences) = build_fp_tree(transactions, min_support);

        let mut frequent_itemsets = FrequentItemsets::new();
        let mut miner = Miner {
            min_support,
            strategy: self.strategy,
            traversal: self.traversal,
            result: &mut frequent_itemsets,
        };
        miner.mine_tree(&fp_tree, &[], 0);

        debug!(
            itemsets = frequent_itemsets.len(),
            collisions = frequent_itemsets.collisions(),
            min_support,
            "fp-growth finished"
        );

        Ok((frequent_itemsets, occurrences))
    }
}

/// Mines `transactions` with the canonical FP-Growth settings.
pub fn mine_frequent_patterns<T: Item>(
    transactions: &[WeightedTransaction<T>],
    min_support: usize,
) -> Result<(FrequentItemsets<T>, OccurrenceTable<T>)> {
    FpGrowth::default().mine(transactions, min_support)
}

/// Same as [`mine_frequent_patterns`] for transactions without weights.
pub fn mine_unweighted<T: Item>(
    transactions: &[Vec<T>],
    min_support: usize,
) -> Result<(FrequentItemsets<T>, OccurrenceTable<T>)> {
    mine_frequent_patterns(&unweighted(transactions), min_support)
}

struct Miner<'a, T: Item> {
    min_support: usize,
    strategy: MiningStrategy,
    traversal: TraversalOrder,
    result: &'a mut FrequentItemsets<T>,
}

impl<T: Item> Miner<'_, T> {
    /// Every item left in `fp_tree` is frequent together with `suffix`.
    fn mine_tree(&mut self, fp_tree: &FPTree<T>, suffix: &[T], depth: usize) {
        if fp_tree.is_empty() {
            return;
        }

        if self.strategy == MiningStrategy::SinglePathShortcut && fp_tree.has_single_path() {
            let path = fp_tree.get_single_path();
            trace!(depth, path_len = path.len(), "expanding single path");
            record_path_subsets(&path, suffix, self.result);
            return;
        }

        let mut items = fp_tree.items_by_support();
        if self.traversal == TraversalOrder::AscendingSupport {
            items.reverse();
        }

        for item in items {
            let Some(support) = fp_tree.support(&item) else {
                continue;
            };

            let mut pattern = suffix.to_vec();
            pattern.push(item.clone());
            self.result.insert(&pattern, support);

            let prefix_paths = fp_tree.get_prefix_paths(&item);
            if prefix_paths.is_empty() {
                continue;
            }

            let cond_tree = build_conditional_fp_tree(&prefix_paths, self.min_support);
            trace!(depth, ?item, cond_items = cond_tree.header_table.len(), "descending");
            self.mine_tree(&cond_tree, &pattern, depth + 1);
        }
    }
}
