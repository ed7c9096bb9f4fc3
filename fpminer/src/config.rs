use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MiningError, Result};

/// Minimum support as an absolute count or as a share of all transactions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinSupport {
    Count(usize),
    Fraction(f64),
}

impl MinSupport {
    /// Absolute count for a data set of `num_transactions`. Fractions round up,
    /// so an itemset is frequent exactly when `support >= fraction * n`.
    pub fn resolve(self, num_transactions: usize) -> Result<usize> {
        match self {
            MinSupport::Count(count) => Ok(count),
            MinSupport::Fraction(fraction) => {
                validate_fraction("min_support", fraction)?;
                Ok((fraction * num_transactions as f64).ceil() as usize)
            }
        }
    }

    /// Counts coming from signed outer surfaces (CLI, Python).
    pub fn from_signed(count: i64) -> Result<Self> {
        checked_count(count).map(MinSupport::Count)
    }
}

/// Rejects negative support counts.
pub fn checked_count(count: i64) -> Result<usize> {
    usize::try_from(count)
        .map_err(|_| MiningError::invalid_threshold(format!("min_support must be >= 0, got {count}")))
}

/// How single-path conditional trees are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MiningStrategy {
    /// Recurse through conditional trees until they are empty.
    #[default]
    ConditionalRecursion,
    /// Enumerate all subsets of a single-path tree directly.
    SinglePathShortcut,
}

/// Order in which header items are expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    #[default]
    AscendingSupport,
    DescendingSupport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    FpGrowth,
    Apriori,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinerConfig {
    pub min_support: MinSupport,
    pub min_confidence: f64,
    pub max_transactions: Option<usize>,
    pub algorithm: Algorithm,
    pub strategy: MiningStrategy,
    pub traversal: TraversalOrder,
}

impl Default for MinerConfig {
    fn default() -> Self {
        Self {
            min_support: MinSupport::Fraction(0.05),
            min_confidence: 0.07,
            max_transactions: Some(10_000),
            algorithm: Algorithm::FpGrowth,
            strategy: MiningStrategy::ConditionalRecursion,
            traversal: TraversalOrder::AscendingSupport,
        }
    }
}

impl MinerConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let MinSupport::Fraction(fraction) = self.min_support {
            validate_fraction("min_support", fraction)?;
        }
        validate_fraction("min_confidence", self.min_confidence)
    }

    pub fn with_min_support(mut self, min_support: MinSupport) -> Self {
        self.min_support = min_support;
        self
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn with_max_transactions(mut self, max_transactions: Option<usize>) -> Self {
        self.max_transactions = max_transactions;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_strategy(mut self, strategy: MiningStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_traversal(mut self, traversal: TraversalOrder) -> Self {
        self.traversal = traversal;
        self
    }
}

pub(crate) fn validate_fraction(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(MiningError::invalid_threshold(format!(
            "{name} must be a fraction in [0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_rounds_up() {
        assert_eq!(MinSupport::Fraction(0.05).resolve(10_000).unwrap(), 500);
        assert_eq!(MinSupport::Fraction(0.5).resolve(3).unwrap(), 2);
        assert_eq!(MinSupport::Fraction(0.0).resolve(3).unwrap(), 0);
        assert_eq!(MinSupport::Count(7).resolve(3).unwrap(), 7);
    }

    #[test]
    fn bad_fractions_are_rejected() {
        for fraction in [-0.1, 1.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                MinSupport::Fraction(fraction).resolve(10),
                Err(MiningError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn negative_count_is_rejected() {
        assert!(matches!(
            MinSupport::from_signed(-1),
            Err(MiningError::InvalidThreshold { .. })
        ));
        assert_eq!(MinSupport::from_signed(3).unwrap(), MinSupport::Count(3));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: MinerConfig =
            serde_json::from_str(r#"{"min_support": {"count": 3}, "algorithm": "apriori"}"#).unwrap();

        assert_eq!(config.min_support, MinSupport::Count(3));
        assert_eq!(config.algorithm, Algorithm::Apriori);
        assert_eq!(config.min_confidence, 0.07);
        assert_eq!(config.max_transactions, Some(10_000));
        assert_eq!(config.strategy, MiningStrategy::ConditionalRecursion);
    }

    #[test]
    fn confidence_out_of_range_fails_validation() {
        let config = MinerConfig::default().with_min_confidence(1.2);
        assert!(config.validate().is_err());
    }
}
