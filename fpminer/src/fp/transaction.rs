use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{MiningError, Result};

/// Anything usable as an item label. The ordering is only used to break ties.
pub trait Item: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Item for T {}

/// A transaction standing for `weight` identical source records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedTransaction<T> {
    pub weight: usize,
    pub items: Vec<T>,
}

impl<T> WeightedTransaction<T> {
    pub fn new(weight: usize, items: Vec<T>) -> Self {
        Self { weight, items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<Vec<T>> for WeightedTransaction<T> {
    fn from(items: Vec<T>) -> Self {
        Self { weight: 1, items }
    }
}

/// Converts plain transactions into weight-1 transactions.
pub fn unweighted<T: Clone>(transactions: &[Vec<T>]) -> Vec<WeightedTransaction<T>> {
    transactions
        .iter()
        .map(|items| WeightedTransaction::from(items.clone()))
        .collect()
}

/// Rejects the whole batch if any transaction carries a zero weight.
pub fn validate_weights<T>(transactions: &[WeightedTransaction<T>]) -> Result<()> {
    match transactions.iter().position(|t| t.weight == 0) {
        Some(index) => Err(MiningError::MalformedTransaction { index, weight: 0 }),
        None => Ok(()),
    }
}

/// Collapses transactions holding the same set of items into one weighted
/// transaction. Output order follows the first occurrence of each set.
pub fn merge_duplicates<T: Item>(transactions: Vec<Vec<T>>) -> Vec<WeightedTransaction<T>> {
    let mut slots: HashMap<Vec<T>, usize> = HashMap::new();
    let mut merged: Vec<WeightedTransaction<T>> = Vec::new();

    for items in transactions {
        let mut key = items.clone();
        key.sort_unstable();
        key.dedup();

        match slots.get(&key) {
            Some(&slot) => merged[slot].weight += 1,
            None => {
                slots.insert(key, merged.len());
                merged.push(WeightedTransaction::from(items));
            }
        }
    }

    merged
}
