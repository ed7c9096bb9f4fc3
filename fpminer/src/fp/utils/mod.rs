pub mod storage;

pub use storage::{canonical, FrequentItemsets, FrequentLevel, ItemsetStorage};
