pub mod apriori;
pub mod config;
pub mod error;
pub mod fp;
pub mod preprocess;
pub mod rules;

pub use apriori::Apriori;
pub use config::{Algorithm, MinSupport, MinerConfig, MiningStrategy, TraversalOrder};
pub use error::{MiningError, Result};
pub use fp::{
    mine_frequent_patterns, mine_unweighted, FpGrowth, FrequentItemsets, FrequentPatternMiner,
    OccurrenceTable, WeightedTransaction,
};
pub use rules::{format_rule, mine_association_rules, AssociationRule};

/// The miner selected by `config`.
pub fn miner_for<T: fp::Item>(config: &MinerConfig) -> Box<dyn FrequentPatternMiner<T>> {
    match config.algorithm {
        Algorithm::FpGrowth => Box::new(FpGrowth::new(config.strategy, config.traversal)),
        Algorithm::Apriori => Box::new(Apriori),
    }
}

#[cfg(feature = "python")]
mod python {
    use std::collections::HashMap;

    use numpy::ndarray::Array2;
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::config::{checked_count, MinSupport};
    use crate::error::MiningError;
    use crate::fp::mine_unweighted;
    use crate::preprocess::transactions_from_matrix;

    fn to_py_err(err: MiningError) -> PyErr {
        match err {
            MiningError::InvalidThreshold { .. } | MiningError::MalformedTransaction { .. } => {
                PyValueError::new_err(err.to_string())
            }
            _ => PyRuntimeError::new_err(err.to_string()),
        }
    }

    /// Mines a binary incidence matrix; returns one array of itemsets per size.
    ///
    /// The fractional `min_support` is rounded up to a count (`ceil(min_support * n)`),
    /// so an itemset is kept only when its support reaches the fraction. Earlier
    /// releases truncated the product instead and could return extra itemsets.
    #[pyfunction]
    #[pyo3(name = "fp_growth")]
    fn fp_growth_py<'py>(
        py: Python<'py>,
        transactions: PyReadonlyArray2<'py, i32>,
        min_support: f64,
    ) -> PyResult<Vec<Bound<'py, PyArray2<usize>>>> {
        let rows = transactions_from_matrix(transactions.as_array());
        let min_count = MinSupport::Fraction(min_support)
            .resolve(rows.len())
            .map_err(to_py_err)?;
        let (itemsets, _) = mine_unweighted(&rows, min_count).map_err(to_py_err)?;

        let mut result = Vec::new();

        for level in itemsets.levels() {
            if level.is_empty() {
                continue;
            }

            let itemset_size = level.itemset_size;
            let num_itemsets = level.len();
            let mut data = vec![0usize; num_itemsets * itemset_size];

            for (i, (itemset, _)) in level.iter_itemsets().enumerate() {
                for (j, &item) in itemset.iter().enumerate() {
                    data[i * itemset_size + j] = item;
                }
            }

            let array = Array2::from_shape_vec((num_itemsets, itemset_size), data)
                .map_err(|_| PyValueError::new_err("Failed to create array"))?;

            result.push(array.into_pyarray(py));
        }

        Ok(result)
    }

    /// Mines lists of string items with an absolute support count.
    #[pyfunction]
    #[pyo3(name = "mine_frequent_patterns")]
    fn mine_frequent_patterns_py(
        transactions: Vec<Vec<String>>,
        min_support: i64,
    ) -> PyResult<(Vec<(Vec<String>, usize)>, HashMap<String, usize>)> {
        let min_count = checked_count(min_support).map_err(to_py_err)?;
        let (itemsets, occurrences) = mine_unweighted(&transactions, min_count).map_err(to_py_err)?;
        Ok((itemsets.to_sorted_vec(), occurrences.into_map()))
    }

    #[pymodule]
    fn fpminer(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(fp_growth_py, m)?)?;
        m.add_function(wrap_pyfunction!(mine_frequent_patterns_py, m)?)?;
        Ok(())
    }
}
