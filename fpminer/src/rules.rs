use std::fmt::Display;

use serde::Serialize;
use tracing::debug;

use crate::config::validate_fraction;
use crate::error::{MiningError, Result};
use crate::fp::combinations::for_each_combination;
use crate::fp::{FrequentItemsets, Item, OccurrenceTable};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssociationRule<T> {
    pub antecedent: Vec<T>,
    pub consequent: Vec<T>,
    /// `support(antecedent ∪ consequent) / support(antecedent)`
    pub confidence: f64,
    /// Support count of the whole itemset.
    pub support: usize,
    pub support_ratio: f64,
    pub lift: f64,
}

/// Derives every rule `A ==> C` with `A ∪ C` frequent, both sides non-empty
/// and confidence at least `min_confidence`.
///
/// The itemset table must be closed under subsets, as any complete miner
/// output is; a missing subset is reported as [`MissingSupport`].
///
/// [`MissingSupport`]: crate::error::MiningError::MissingSupport
pub fn mine_association_rules<T: Item>(
    itemsets: &FrequentItemsets<T>,
    min_confidence: f64,
    num_transactions: usize,
) -> Result<Vec<AssociationRule<T>>> {
    validate_fraction("min_confidence", min_confidence)?;
    if num_transactions == 0 && !itemsets.is_empty() {
        return Err(MiningError::invalid_threshold(
            "num_transactions must be positive when itemsets are present",
        ));
    }

    let mut rules = Vec::new();
    for (items, support) in itemsets.iter().filter(|(items, _)| items.len() > 1) {
        for antecedent_indices in proper_subsets(items.len()) {
            let (antecedent, consequent): (Vec<T>, Vec<T>) = {
                let mut antecedent = Vec::with_capacity(antecedent_indices.len());
                let mut consequent = Vec::with_capacity(items.len() - antecedent_indices.len());
                for (idx, item) in items.iter().enumerate() {
                    if antecedent_indices.contains(&idx) {
                        antecedent.push(item.clone());
                    } else {
                        consequent.push(item.clone());
                    }
                }
                (antecedent, consequent)
            };

            let antecedent_support = itemsets.support(&antecedent)?;
            let confidence = support as f64 / antecedent_support as f64;
            if confidence < min_confidence {
                continue;
            }

            let consequent_support = itemsets.support(&consequent)?;
            let support_ratio = ratio(support, num_transactions);
            let lift = confidence / ratio(consequent_support, num_transactions);

            rules.push(AssociationRule {
                antecedent,
                consequent,
                confidence,
                support,
                support_ratio,
                lift,
            });
        }
    }

    rules.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.antecedent.cmp(&b.antecedent))
            .then_with(|| a.consequent.cmp(&b.consequent))
    });

    debug!(rules = rules.len(), min_confidence, "mined association rules");
    Ok(rules)
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Index sets of every non-empty proper subset of `0..len`.
fn proper_subsets(len: usize) -> Vec<Vec<usize>> {
    let mut subsets = Vec::new();
    for k in 1..len {
        for_each_combination(len, k, &mut |combination: &[usize]| {
            subsets.push(combination.to_vec())
        });
    }
    subsets
}

/// Renders a rule with each side ordered by descending occurrence and
/// figures rounded to two decimals.
pub fn format_rule<T: Item + Display>(
    rule: &AssociationRule<T>,
    occurrences: &OccurrenceTable<T>,
) -> String {
    let side = |items: &[T]| {
        let mut ordered = items.to_vec();
        ordered.sort_by(|a, b| occurrences.compare(a, b));
        ordered
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    };

    format!(
        "{} ==> {}  support={:.2} confidence={:.2} lift={:.2}",
        side(&rule.antecedent),
        side(&rule.consequent),
        rule.support_ratio,
        rule.confidence,
        rule.lift
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MiningError;
    use crate::fp::{mine_unweighted, FrequentItemsets};

    fn reference() -> (FrequentItemsets<&'static str>, OccurrenceTable<&'static str>) {
        mine_unweighted(
            &[
                vec!["9192", "31651", "45874"],
                vec!["57515", "45874"],
                vec!["45874", "9192"],
                vec!["31651"],
            ],
            1,
        )
        .unwrap()
    }

    fn find<'a>(
        rules: &'a [AssociationRule<&'static str>],
        antecedent: &[&str],
        consequent: &[&str],
    ) -> Option<&'a AssociationRule<&'static str>> {
        rules
            .iter()
            .find(|r| r.antecedent == antecedent && r.consequent == consequent)
    }

    #[test]
    fn every_split_is_considered_at_zero_confidence() {
        let (itemsets, _) = reference();
        let rules = mine_association_rules(&itemsets, 0.0, 4).unwrap();

        // four pairs with two splits each, one triple with six
        assert_eq!(rules.len(), 14);
    }

    #[test]
    fn confidence_and_lift() {
        let (itemsets, _) = reference();
        let rules = mine_association_rules(&itemsets, 0.6, 4).unwrap();

        let rule = find(&rules, &["9192"], &["45874"]).unwrap();
        assert_eq!(rule.confidence, 1.0);
        assert_eq!(rule.support, 2);
        assert_eq!(rule.support_ratio, 0.5);
        assert!((rule.lift - 4.0 / 3.0).abs() < 1e-9);

        // 2/3 passes, 1/3 does not
        assert!(find(&rules, &["45874"], &["9192"]).is_some());
        assert!(find(&rules, &["45874"], &["57515"]).is_none());
        assert!(rules.iter().all(|r| r.confidence >= 0.6));
    }

    #[test]
    fn rules_are_sorted_by_confidence() {
        let (itemsets, _) = reference();
        let rules = mine_association_rules(&itemsets, 0.0, 4).unwrap();
        assert!(rules.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn missing_antecedent_is_an_error() {
        let itemsets: FrequentItemsets<u32> = vec![(vec![1, 2], 3), (vec![2], 4)].into_iter().collect();

        match mine_association_rules(&itemsets, 0.0, 10) {
            Err(MiningError::MissingSupport { itemset }) => assert_eq!(itemset, "[1]"),
            other => panic!("expected MissingSupport, got {other:?}"),
        }
    }

    #[test]
    fn invalid_confidence_is_rejected() {
        let (itemsets, _) = reference();
        assert!(matches!(
            mine_association_rules(&itemsets, 1.5, 4),
            Err(MiningError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn zero_transactions_with_itemsets_is_rejected() {
        let (itemsets, _) = reference();
        assert!(matches!(
            mine_association_rules(&itemsets, 0.0, 0),
            Err(MiningError::InvalidThreshold { .. })
        ));

        let empty = FrequentItemsets::<u32>::new();
        assert!(mine_association_rules(&empty, 0.0, 0).unwrap().is_empty());
    }

    #[test]
    fn formats_with_occurrence_order() {
        let (itemsets, occurrences) = reference();
        let rules = mine_association_rules(&itemsets, 0.0, 4).unwrap();
        let rule = find(&rules, &["31651", "9192"], &["45874"]).unwrap();

        assert_eq!(
            format_rule(rule, &occurrences),
            "31651 9192 ==> 45874  support=0.25 confidence=1.00 lift=1.33"
        );
    }
}
