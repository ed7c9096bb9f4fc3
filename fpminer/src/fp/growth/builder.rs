use tracing::{debug, trace};

use super::tree::FPTree;
use crate::fp::occurrences::{sort_and_filter, OccurrenceTable};
use crate::fp::transaction::{Item, WeightedTransaction};

/// Counts, filters, orders and inserts `transactions`. Returns the tree and
/// the occurrence table of the full input.
pub fn build_fp_tree<T: Item>(
    transactions: &[WeightedTransaction<T>],
    min_support: usize,
) -> (FPTree<T>, OccurrenceTable<T>) {
    let occurrences = OccurrenceTable::count(transactions);
    let ordered = sort_and_filter(transactions, &occurrences, min_support);

    let mut fp_tree = FPTree::new();
    for transaction in &ordered {
        fp_tree.insert_transaction(&transaction.items, transaction.weight);
    }

    debug!(
        transactions = transactions.len(),
        distinct_items = occurrences.len(),
        frequent_items = fp_tree.header_table.len(),
        nodes = fp_tree.node_count(),
        "built fp-tree"
    );

    (fp_tree, occurrences)
}

/// Builds the conditional tree of one pattern base, counting and ordering it
/// afresh against the same threshold.
pub fn build_conditional_fp_tree<T: Item>(
    prefix_paths: &[WeightedTransaction<T>],
    min_support: usize,
) -> FPTree<T> {
    let occurrences = OccurrenceTable::count(prefix_paths);
    let ordered = sort_and_filter(prefix_paths, &occurrences, min_support);

    let mut conditional_tree = FPTree::new();
    for path in &ordered {
        conditional_tree.insert_transaction(&path.items, path.weight);
    }

    trace!(
        paths = prefix_paths.len(),
        items = conditional_tree.header_table.len(),
        nodes = conditional_tree.node_count(),
        "built conditional fp-tree"
    );

    conditional_tree
}
