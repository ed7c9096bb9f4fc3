use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::fp::transaction::{Item, WeightedTransaction};

/// Weighted number of transactions each item appears in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OccurrenceTable<T: Item> {
    counts: HashMap<T, usize>,
}

impl<T: Item> Default for OccurrenceTable<T> {
    fn default() -> Self {
        Self { counts: HashMap::new() }
    }
}

impl<T: Item> OccurrenceTable<T> {
    /// Counts every item once per transaction, adding the transaction weight.
    pub fn count(transactions: &[WeightedTransaction<T>]) -> Self {
        let mut counts: HashMap<T, usize> = HashMap::new();
        let mut seen: HashSet<&T> = HashSet::new();

        for transaction in transactions {
            seen.clear();
            for item in &transaction.items {
                if seen.insert(item) {
                    *counts.entry(item.clone()).or_insert(0) += transaction.weight;
                }
            }
        }

        Self { counts }
    }

    pub fn get(&self, item: &T) -> Option<usize> {
        self.counts.get(item).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, usize)> {
        self.counts.iter().map(|(item, &count)| (item, count))
    }

    pub fn into_map(self) -> HashMap<T, usize> {
        self.counts
    }

    /// Descending count, then ascending item order.
    pub fn compare(&self, a: &T, b: &T) -> std::cmp::Ordering {
        let count_a = self.get(a).unwrap_or(0);
        let count_b = self.get(b).unwrap_or(0);
        count_b.cmp(&count_a).then_with(|| a.cmp(b))
    }

    /// Items meeting `min_support`, most frequent first.
    pub fn frequent_items(&self, min_support: usize) -> Vec<T> {
        let mut frequent: Vec<T> = self
            .counts
            .iter()
            .filter(|&(_, &count)| count >= min_support)
            .map(|(item, _)| item.clone())
            .collect();
        frequent.sort_by(|a, b| self.compare(a, b));
        frequent
    }
}

impl<T: Item> FromIterator<(T, usize)> for OccurrenceTable<T> {
    fn from_iter<I: IntoIterator<Item = (T, usize)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// Drops items below `min_support` and orders the rest by descending count.
/// Repeated labels keep only their first occurrence. Transactions left empty
/// are dropped.
pub fn sort_and_filter<T: Item>(
    transactions: &[WeightedTransaction<T>],
    occurrences: &OccurrenceTable<T>,
    min_support: usize,
) -> Vec<WeightedTransaction<T>> {
    transactions
        .iter()
        .filter_map(|transaction| {
            let mut items: Vec<T> = Vec::with_capacity(transaction.items.len());
            for item in &transaction.items {
                let frequent = occurrences
                    .get(item)
                    .is_some_and(|count| count >= min_support);
                if frequent && !items.contains(item) {
                    items.push(item.clone());
                }
            }

            if items.is_empty() {
                return None;
            }

            items.sort_by(|a, b| occurrences.compare(a, b));
            Some(WeightedTransaction::new(transaction.weight, items))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fp::transaction::unweighted;

    fn sample() -> Vec<WeightedTransaction<&'static str>> {
        unweighted(&[
            vec!["9192", "31651", "45874"],
            vec!["57515", "45874"],
            vec!["45874", "9192"],
            vec!["31651"],
        ])
    }

    #[test]
    fn counts_weighted_occurrences() {
        let mut transactions = sample();
        transactions[1].weight = 3;
        let table = OccurrenceTable::count(&transactions);

        assert_eq!(table.get(&"45874"), Some(5));
        assert_eq!(table.get(&"57515"), Some(3));
        assert_eq!(table.get(&"9192"), Some(2));
        assert_eq!(table.get(&"missing"), None);
    }

    #[test]
    fn repeated_label_counts_once() {
        let table = OccurrenceTable::count(&[WeightedTransaction::new(2, vec!["a", "a", "b"])]);
        assert_eq!(table.get(&"a"), Some(2));
    }

    #[test]
    fn empty_input_gives_empty_table() {
        let table = OccurrenceTable::<u32>::count(&[]);
        assert!(table.is_empty());
    }

    #[test]
    fn sorts_by_descending_count_with_item_tie_break() {
        let transactions = sample();
        let table = OccurrenceTable::count(&transactions);
        let sorted = sort_and_filter(&transactions, &table, 2);

        assert_eq!(sorted.len(), 4);
        assert_eq!(sorted[0].items, vec!["45874", "31651", "9192"]);
        assert_eq!(sorted[1].items, vec!["45874"]);
        assert_eq!(sorted[2].items, vec!["45874", "9192"]);
        assert_eq!(sorted[3].items, vec!["31651"]);
    }

    #[test]
    fn sorting_twice_changes_nothing() {
        let transactions = sample();
        let table = OccurrenceTable::count(&transactions);
        let once = sort_and_filter(&transactions, &table, 1);
        let twice = sort_and_filter(&once, &table, 1);
        assert_eq!(once, twice);
    }

    #[test]
    fn caller_transactions_are_untouched() {
        let transactions = sample();
        let table = OccurrenceTable::count(&transactions);
        let _ = sort_and_filter(&transactions, &table, 3);
        assert_eq!(transactions, sample());
    }
}
