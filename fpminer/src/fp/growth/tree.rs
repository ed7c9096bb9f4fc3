use std::collections::{HashMap, HashSet};

use crate::fp::transaction::{Item, WeightedTransaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeLabel<T> {
    Root,
    Item(T),
}

impl<T> NodeLabel<T> {
    pub fn item(&self) -> Option<&T> {
        match self {
            NodeLabel::Root => None,
            NodeLabel::Item(item) => Some(item),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FPNode<T> {
    pub label: NodeLabel<T>,
    pub count: usize,
    pub parent: Option<usize>,
    pub children: HashMap<T, usize>,
    /// Next node carrying the same label, in insertion order.
    pub next: Option<usize>,
}

/// Total count and the two ends of one item's node chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderEntry {
    pub count: usize,
    pub head: usize,
    pub tail: usize,
}

#[derive(Debug, Clone)]
pub struct FPTree<T> {
    pub nodes: Vec<FPNode<T>>,
    pub header_table: HashMap<T, HeaderEntry>,
    pub root_index: usize,
}

impl<T> FPNode<T> {
    pub fn new_root() -> Self {
        Self {
            label: NodeLabel::Root,
            count: 0,
            parent: None,
            children: HashMap::new(),
            next: None,
        }
    }

    pub fn new_item(item: T, count: usize, parent: usize) -> Self {
        Self {
            label: NodeLabel::Item(item),
            count,
            parent: Some(parent),
            children: HashMap::new(),
            next: None,
        }
    }
}

impl<T: Item> Default for FPTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Item> FPTree<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![FPNode::new_root()],
            header_table: HashMap::new(),
            root_index: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.header_table.is_empty()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Inserts one already ordered transaction. A label that reappears later in
    /// the same transaction is skipped.
    pub fn insert_transaction(&mut self, transaction: &[T], weight: usize) {
        let mut current_index = self.root_index;
        let mut seen: HashSet<&T> = HashSet::with_capacity(transaction.len());

        for item in transaction {
            if !seen.insert(item) {
                continue;
            }

            if let Some(&child_index) = self.nodes[current_index].children.get(item) {
                self.nodes[child_index].count += weight;
                current_index = child_index;
            } else {
                let new_index = self.nodes.len();
                self.nodes
                    .push(FPNode::new_item(item.clone(), weight, current_index));
                self.nodes[current_index]
                    .children
                    .insert(item.clone(), new_index);
                self.link_node(item, new_index);
                current_index = new_index;
            }

            if let Some(entry) = self.header_table.get_mut(item) {
                entry.count += weight;
            }
        }
    }

    fn link_node(&mut self, item: &T, node_index: usize) {
        match self.header_table.get_mut(item) {
            Some(entry) => {
                let tail = entry.tail;
                entry.tail = node_index;
                self.nodes[tail].next = Some(node_index);
            }
            None => {
                self.header_table.insert(
                    item.clone(),
                    HeaderEntry {
                        count: 0,
                        head: node_index,
                        tail: node_index,
                    },
                );
            }
        }
    }

    pub fn support(&self, item: &T) -> Option<usize> {
        self.header_table.get(item).map(|entry| entry.count)
    }

    /// Walks the node chain of `item` from head to tail.
    pub fn node_chain(&self, item: &T) -> NodeChain<'_, T> {
        NodeChain {
            tree: self,
            current: self.header_table.get(item).map(|entry| entry.head),
        }
    }

    /// Items of the header table ordered by descending support, ties broken by
    /// ascending item order.
    pub fn items_by_support(&self) -> Vec<T> {
        let mut items: Vec<(&T, usize)> = self
            .header_table
            .iter()
            .map(|(item, entry)| (item, entry.count))
            .collect();
        items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        items.into_iter().map(|(item, _)| item.clone()).collect()
    }

    /// The conditional pattern base of `item`: one weighted prefix path per
    /// node in its chain, labels ordered root to node.
    pub fn get_prefix_paths(&self, item: &T) -> Vec<WeightedTransaction<T>> {
        self.node_chain(item)
            .filter_map(|idx| {
                let mut path = Vec::new();
                let mut current = self.nodes[idx].parent;

                while let Some(i) = current {
                    if let NodeLabel::Item(label) = &self.nodes[i].label {
                        path.push(label.clone());
                    }
                    current = self.nodes[i].parent;
                }

                path.reverse();
                (!path.is_empty()).then(|| WeightedTransaction::new(self.nodes[idx].count, path))
            })
            .collect()
    }

    pub fn has_single_path(&self) -> bool {
        let mut current_index = self.root_index;

        loop {
            let children = &self.nodes[current_index].children;
            match children.len() {
                0 => return true,
                1 => match children.values().next() {
                    Some(&child) => current_index = child,
                    None => return true,
                },
                _ => return false,
            }
        }
    }

    /// `(item, count)` pairs from the root down, following first children.
    pub fn get_single_path(&self) -> Vec<(T, usize)> {
        let mut path = Vec::new();
        let mut current_index = self.root_index;

        while let Some(&child_index) = self.nodes[current_index].children.values().next() {
            let child_node = &self.nodes[child_index];
            if let NodeLabel::Item(item) = &child_node.label {
                path.push((item.clone(), child_node.count));
            }
            current_index = child_index;
        }
        path
    }
}

pub struct NodeChain<'a, T> {
    tree: &'a FPTree<T>,
    current: Option<usize>,
}

impl<T> Iterator for NodeChain<'_, T> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.current?;
        self.current = self.tree.nodes[index].next;
        Some(index)
    }
}
