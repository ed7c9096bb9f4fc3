//! Turning raw input into transactions.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use ndarray::ArrayView2;
use regex::Regex;
use tracing::debug;

use crate::error::{MiningError, Result};

/// One line of a transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord<T> {
    pub transaction_id: String,
    pub timestamp: String,
    pub item: T,
}

/// Groups records by transaction id. Transactions come out in the order
/// their id was first seen, items in record order.
pub fn group_transactions<T, I>(records: I) -> Vec<Vec<T>>
where
    I: IntoIterator<Item = LogRecord<T>>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut transactions: Vec<Vec<T>> = Vec::new();

    for record in records {
        match slots.get(&record.transaction_id) {
            Some(&slot) => transactions[slot].push(record.item),
            None => {
                slots.insert(record.transaction_id, transactions.len());
                transactions.push(vec![record.item]);
            }
        }
    }

    transactions
}

/// Parses `id timestamp item` lines. Tokens are runs of ASCII letters and
/// digits; extra tokens after the item are ignored and blank lines skipped.
pub fn parse_records<R: Read>(reader: R) -> Result<Vec<LogRecord<String>>> {
    let token = Regex::new("[a-zA-Z0-9]+")?;
    let mut records = Vec::new();

    for (line_idx, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let tokens: Vec<&str> = token.find_iter(&line).map(|m| m.as_str()).collect();
        match tokens.as_slice() {
            [transaction_id, timestamp, item, ..] => records.push(LogRecord {
                transaction_id: transaction_id.to_string(),
                timestamp: timestamp.to_string(),
                item: item.to_string(),
            }),
            _ => {
                return Err(MiningError::MalformedRecord {
                    line: line_idx + 1,
                    content: line.clone(),
                })
            }
        }
    }

    Ok(records)
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<LogRecord<String>>> {
    let path = path.as_ref();
    let records = parse_records(File::open(path)?)?;
    debug!(path = %path.display(), records = records.len(), "loaded records");
    Ok(records)
}

/// Reads a binary incidence matrix, one row per transaction and one column
/// per item. Any nonzero cell marks the column's item as present.
pub fn transactions_from_matrix(transactions: ArrayView2<i32>) -> Vec<Vec<usize>> {
    let num_transactions = transactions.shape()[0];
    let num_items = transactions.shape()[1];

    (0..num_transactions)
        .map(|i| {
            (0..num_items)
                .filter(|&j| transactions[[i, j]] != 0)
                .collect()
        })
        .collect()
}

/// Keeps at most `limit` transactions.
pub fn truncate<T>(mut transactions: Vec<Vec<T>>, limit: Option<usize>) -> Vec<Vec<T>> {
    if let Some(limit) = limit {
        transactions.truncate(limit);
    }
    transactions
}
