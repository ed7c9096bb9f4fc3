use std::collections::HashMap;

use serde::Serialize;
use tracing::warn;

use crate::error::{MiningError, Result};
use crate::fp::transaction::Item;

/// Itemsets of one size packed into a single buffer.
#[derive(Debug, Clone)]
pub struct ItemsetStorage<T> {
    pub items: Vec<T>,
    pub offsets: Vec<(usize, usize)>,
    pub supports: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct FrequentLevel<T> {
    pub storage: ItemsetStorage<T>,
    pub itemset_size: usize,
}

impl<T: Item> ItemsetStorage<T> {
    pub(crate) fn new() -> Self {
        Self { items: Vec::new(), offsets: Vec::new(), supports: Vec::new() }
    }

    pub(crate) fn add_itemset_with_support(&mut self, items: &[T], support: usize) {
        let start = self.items.len();
        self.items.extend_from_slice(items);
        self.offsets.push((start, items.len()));
        self.supports.push(support);
    }

    pub(crate) fn get_itemset(&self, idx: usize) -> &[T] {
        let (start, len) = self.offsets[idx];
        &self.items[start..start + len]
    }

    pub(crate) fn len(&self) -> usize {
        self.offsets.len()
    }
}

impl<T: Item> FrequentLevel<T> {
    pub fn new(itemset_size: usize) -> Self {
        Self { storage: ItemsetStorage::new(), itemset_size }
    }

    pub fn add_itemset_with_support(&mut self, items: &[T], support: usize) -> usize {
        self.storage.add_itemset_with_support(items, support);
        self.storage.len() - 1
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.len() == 0
    }

    pub fn get_itemset(&self, idx: usize) -> &[T] {
        self.storage.get_itemset(idx)
    }

    pub fn support(&self, idx: usize) -> usize {
        self.storage.supports[idx]
    }

    pub fn iter_itemsets(&self) -> impl Iterator<Item = (&[T], usize)> {
        (0..self.storage.len()).map(move |idx| (self.get_itemset(idx), self.support(idx)))
    }
}

/// Puts an itemset in canonical form: sorted, without repeats.
pub fn canonical<T: Item>(items: &[T]) -> Vec<T> {
    let mut key = items.to_vec();
    key.sort_unstable();
    key.dedup();
    key
}

/// Mapping from itemset to support count collected across every mining
/// branch.
#[derive(Debug, Clone)]
pub struct FrequentItemsets<T: Item> {
    supports: HashMap<Vec<T>, usize>,
    collisions: usize,
}

/// Equality looks at the itemset-support entries only.
impl<T: Item> PartialEq for FrequentItemsets<T> {
    fn eq(&self, other: &Self) -> bool {
        self.supports == other.supports
    }
}

impl<T: Item> Eq for FrequentItemsets<T> {}

impl<T: Item> Default for FrequentItemsets<T> {
    fn default() -> Self {
        Self { supports: HashMap::new(), collisions: 0 }
    }
}

impl<T: Item> FrequentItemsets<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `support` for `items`. A repeated itemset overwrites the earlier
    /// value and counts as a collision. The empty itemset is never recorded.
    pub fn insert(&mut self, items: &[T], support: usize) {
        if items.is_empty() {
            return;
        }
        let key = canonical(items);
        if let Some(previous) = self.supports.insert(key, support) {
            self.collisions += 1;
            warn!(?items, previous, support, "itemset recorded twice");
        }
    }

    pub fn get(&self, items: &[T]) -> Option<usize> {
        self.supports.get(&canonical(items)).copied()
    }

    /// Like [`get`](Self::get) but a missing itemset is an error.
    pub fn support(&self, items: &[T]) -> Result<usize> {
        self.get(items)
            .ok_or_else(|| MiningError::missing_support(items))
    }

    pub fn contains(&self, items: &[T]) -> bool {
        self.get(items).is_some()
    }

    pub fn len(&self) -> usize {
        self.supports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.supports.is_empty()
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }

    pub fn iter(&self) -> impl Iterator<Item = (&[T], usize)> {
        self.supports
            .iter()
            .map(|(items, &support)| (items.as_slice(), support))
    }

    /// Entries ordered by size, then by items.
    pub fn to_sorted_vec(&self) -> Vec<(Vec<T>, usize)> {
        let mut entries: Vec<(Vec<T>, usize)> = self
            .supports
            .iter()
            .map(|(items, &support)| (items.clone(), support))
            .collect();
        entries.sort_by(|a, b| a.0.len().cmp(&b.0.len()).then_with(|| a.0.cmp(&b.0)));
        entries
    }

    /// Groups the itemsets by size; level `i` holds itemsets of size `i + 1`.
    pub fn levels(&self) -> Vec<FrequentLevel<T>> {
        let mut levels: Vec<FrequentLevel<T>> = Vec::new();
        for (items, support) in self.to_sorted_vec() {
            let size = items.len();
            while levels.len() < size {
                levels.push(FrequentLevel::new(levels.len() + 1));
            }
            levels[size - 1].add_itemset_with_support(&items, support);
        }
        levels
    }
}

impl<T: Item> FromIterator<(Vec<T>, usize)> for FrequentItemsets<T> {
    fn from_iter<I: IntoIterator<Item = (Vec<T>, usize)>>(iter: I) -> Self {
        let mut itemsets = Self::new();
        for (items, support) in iter {
            itemsets.insert(&items, support);
        }
        itemsets
    }
}

#[derive(Serialize)]
struct ItemsetEntry<'a, T> {
    items: &'a [T],
    support: usize,
}

impl<T: Item + Serialize> Serialize for FrequentItemsets<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        use serde::ser::SerializeSeq;

        let entries = self.to_sorted_vec();
        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for (items, support) in &entries {
            seq.serialize_element(&ItemsetEntry { items: items.as_slice(), support: *support })?;
        }
        seq.end()
    }
}
