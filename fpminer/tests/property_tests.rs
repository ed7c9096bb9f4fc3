use std::collections::BTreeSet;

use fpminer::fp::{sort_and_filter, FrequentItemsets, OccurrenceTable, WeightedTransaction};
use fpminer::{
    Apriori, FpGrowth, FrequentPatternMiner, MiningStrategy, TraversalOrder,
};
use proptest::prelude::*;

const UNIVERSE: u8 = 8;

fn arb_transactions() -> impl Strategy<Value = Vec<WeightedTransaction<u8>>> {
    prop::collection::vec(
        (1usize..4, prop::collection::vec(0u8..UNIVERSE, 0..6)),
        0..25,
    )
    .prop_map(|raw| {
        raw.into_iter()
            .map(|(weight, items)| WeightedTransaction::new(weight, items))
            .collect()
    })
}

/// Weighted number of transactions containing every item of `itemset`.
fn brute_force_support(transactions: &[WeightedTransaction<u8>], itemset: &[u8]) -> usize {
    transactions
        .iter()
        .filter(|t| itemset.iter().all(|item| t.items.contains(item)))
        .map(|t| t.weight)
        .sum()
}

fn all_itemsets() -> Vec<Vec<u8>> {
    (1u32..(1 << UNIVERSE))
        .map(|mask| (0..UNIVERSE).filter(|bit| mask & (1 << bit) != 0).collect())
        .collect()
}

fn brute_force(transactions: &[WeightedTransaction<u8>], min_support: usize) -> FrequentItemsets<u8> {
    all_itemsets()
        .into_iter()
        .filter_map(|itemset| {
            let support = brute_force_support(transactions, &itemset);
            (support >= min_support && support > 0).then_some((itemset, support))
        })
        .collect()
}

proptest! {
    #[test]
    fn fp_growth_matches_brute_force(
        transactions in arb_transactions(),
        min_support in 1usize..6,
    ) {
        let (itemsets, _) = FpGrowth::default().mine(&transactions, min_support).unwrap();
        prop_assert_eq!(&itemsets, &brute_force(&transactions, min_support));
        prop_assert_eq!(itemsets.collisions(), 0);
    }

    #[test]
    fn apriori_and_fp_growth_agree(
        transactions in arb_transactions(),
        min_support in 1usize..6,
    ) {
        let (fp, fp_occurrences) = FpGrowth::default().mine(&transactions, min_support).unwrap();
        let (ap, ap_occurrences) = Apriori.mine(&transactions, min_support).unwrap();
        prop_assert_eq!(fp, ap);
        prop_assert_eq!(fp_occurrences, ap_occurrences);
    }

    #[test]
    fn strategies_and_traversals_agree(
        transactions in arb_transactions(),
        min_support in 1usize..6,
    ) {
        let (canonical, _) = FpGrowth::default().mine(&transactions, min_support).unwrap();

        for strategy in [MiningStrategy::ConditionalRecursion, MiningStrategy::SinglePathShortcut] {
            for traversal in [TraversalOrder::AscendingSupport, TraversalOrder::DescendingSupport] {
                let (itemsets, _) = FpGrowth::new(strategy, traversal)
                    .mine(&transactions, min_support)
                    .unwrap();
                prop_assert_eq!(&itemsets, &canonical);
                prop_assert_eq!(itemsets.collisions(), 0);
            }
        }
    }

    #[test]
    fn support_is_monotone(
        transactions in arb_transactions(),
        min_support in 1usize..4,
    ) {
        let (itemsets, _) = FpGrowth::default().mine(&transactions, min_support).unwrap();

        for (items, support) in itemsets.iter() {
            for skip in 0..items.len() {
                let subset: Vec<u8> = items
                    .iter()
                    .enumerate()
                    .filter(|&(idx, _)| idx != skip)
                    .map(|(_, &item)| item)
                    .collect();
                if subset.is_empty() {
                    continue;
                }
                let subset_support = itemsets.get(&subset);
                prop_assert!(subset_support.is_some_and(|s| s >= support));
            }
        }
    }

    #[test]
    fn singletons_match_occurrences(
        transactions in arb_transactions(),
        min_support in 1usize..6,
    ) {
        let (itemsets, occurrences) = FpGrowth::default().mine(&transactions, min_support).unwrap();

        for (item, count) in occurrences.iter() {
            if count >= min_support {
                prop_assert_eq!(itemsets.get(&[*item]), Some(count));
            } else {
                prop_assert!(!itemsets.contains(&[*item]));
            }
        }
    }

    #[test]
    fn ordering_is_idempotent(
        transactions in arb_transactions(),
        min_support in 0usize..6,
    ) {
        let occurrences = OccurrenceTable::count(&transactions);
        let once = sort_and_filter(&transactions, &occurrences, min_support);
        let twice = sort_and_filter(&once, &occurrences, min_support);
        prop_assert_eq!(&once, &twice);

        for transaction in &once {
            let distinct: BTreeSet<&u8> = transaction.items.iter().collect();
            prop_assert_eq!(distinct.len(), transaction.items.len());
        }
    }
}
