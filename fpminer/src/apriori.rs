//! Brute-force miner that enumerates the itemset lattice depth first and
//! counts support directly from per-item transaction-id lists.

use std::collections::HashMap;

use tracing::debug;

use crate::error::Result;
use crate::fp::transaction::{validate_weights, Item, WeightedTransaction};
use crate::fp::{FrequentItemsets, FrequentPatternMiner, OccurrenceTable};

#[derive(Debug, Clone, Copy, Default)]
pub struct Apriori;

/// Transaction ids per item, each list ascending and free of repeats.
struct TidIndex<'a, T> {
    transactions: &'a [WeightedTransaction<T>],
    tids: HashMap<T, Vec<usize>>,
}

impl<'a, T: Item> TidIndex<'a, T> {
    fn new(transactions: &'a [WeightedTransaction<T>]) -> Self {
        let mut tids: HashMap<T, Vec<usize>> = HashMap::new();
        for (tid, transaction) in transactions.iter().enumerate() {
            for item in &transaction.items {
                let list = tids.entry(item.clone()).or_default();
                if list.last() != Some(&tid) {
                    list.push(tid);
                }
            }
        }
        Self { transactions, tids }
    }

    fn tids(&self, item: &T) -> &[usize] {
        self.tids.get(item).map(Vec::as_slice).unwrap_or(&[])
    }

    fn weight(&self, tids: &[usize]) -> usize {
        tids.iter().map(|&tid| self.transactions[tid].weight).sum()
    }
}

fn intersect(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

impl<T: Item> FrequentPatternMiner<T> for Apriori {
    fn mine(
        &self,
        transactions: &[WeightedTransaction<T>],
        min_support: usize,
    ) -> Result<(FrequentItemsets<T>, OccurrenceTable<T>)> {
        validate_weights(transactions)?;

        let min_support = min_support.max(1);
        let occurrences = OccurrenceTable::count(transactions);
        let index = TidIndex::new(transactions);

        // Least frequent first, as the lattice is widest there.
        let mut candidates = occurrences.frequent_items(min_support);
        candidates.reverse();

        let mut frequent_itemsets = FrequentItemsets::new();
        let mut accumulation = Vec::new();
        extend(
            &index,
            &candidates,
            0,
            &mut accumulation,
            None,
            min_support,
            &mut frequent_itemsets,
        );

        debug!(
            itemsets = frequent_itemsets.len(),
            candidates = candidates.len(),
            min_support,
            "apriori finished"
        );

        Ok((frequent_itemsets, occurrences))
    }
}

fn extend<T: Item>(
    index: &TidIndex<'_, T>,
    candidates: &[T],
    start: usize,
    accumulation: &mut Vec<T>,
    tids: Option<&[usize]>,
    min_support: usize,
    result: &mut FrequentItemsets<T>,
) {
    for i in start..candidates.len() {
        let item = &candidates[i];
        let item_tids = match tids {
            Some(current) => intersect(current, index.tids(item)),
            None => index.tids(item).to_vec(),
        };

        let support = index.weight(&item_tids);
        if support < min_support {
            continue;
        }

        accumulation.push(item.clone());
        result.insert(accumulation, support);
        extend(
            index,
            candidates,
            i + 1,
            accumulation,
            Some(&item_tids),
            min_support,
            result,
        );
        accumulation.pop();
    }
}

/// Mines with [`Apriori`] using the same contract as FP-Growth.
pub fn mine_frequent_patterns<T: Item>(
    transactions: &[WeightedTransaction<T>],
    min_support: usize,
) -> Result<(FrequentItemsets<T>, OccurrenceTable<T>)> {
    Apriori.mine(transactions, min_support)
}
