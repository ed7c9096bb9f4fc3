use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fpminer::fp::merge_duplicates;
use fpminer::preprocess::{group_transactions, load_records, truncate};
use fpminer::{
    format_rule, mine_association_rules, miner_for, Algorithm, AssociationRule, FrequentItemsets,
    FrequentPatternMiner, MinSupport, MinerConfig,
};

#[derive(Parser, Debug)]
#[command(name = "fpminer", about = "Frequent itemset and association rule mining")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Mine frequent itemsets and association rules from a transaction log.
    Mine {
        /// Log file with one `transaction-id timestamp item` record per line
        #[arg(long)]
        input: PathBuf,
        /// Path to config file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Absolute minimum support count
        #[arg(long, conflicts_with = "min_support", allow_negative_numbers = true)]
        min_support_count: Option<i64>,
        /// Minimum support as a fraction of all transactions
        #[arg(long)]
        min_support: Option<f64>,
        /// Minimum rule confidence
        #[arg(long)]
        min_confidence: Option<f64>,
        /// Only use the first N transactions
        #[arg(long)]
        max_transactions: Option<usize>,
        #[arg(long, value_enum)]
        algorithm: Option<AlgorithmArg>,
        /// Print a JSON report instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum AlgorithmArg {
    FpGrowth,
    Apriori,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::FpGrowth => Algorithm::FpGrowth,
            AlgorithmArg::Apriori => Algorithm::Apriori,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    transactions: usize,
    min_support: usize,
    itemsets: &'a FrequentItemsets<String>,
    rules: &'a [AssociationRule<String>],
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mine {
            input,
            config,
            min_support_count,
            min_support,
            min_confidence,
            max_transactions,
            algorithm,
            json,
        } => {
            let mut config = match config {
                Some(path) => MinerConfig::from_json_file(path)?,
                None => MinerConfig::default(),
            };
            if let Some(count) = min_support_count {
                config = config.with_min_support(MinSupport::from_signed(count)?);
            }
            if let Some(fraction) = min_support {
                config = config.with_min_support(MinSupport::Fraction(fraction));
            }
            if let Some(confidence) = min_confidence {
                config = config.with_min_confidence(confidence);
            }
            if let Some(limit) = max_transactions {
                config = config.with_max_transactions(Some(limit));
            }
            if let Some(algorithm) = algorithm {
                config = config.with_algorithm(algorithm.into());
            }
            config.validate()?;

            cmd_mine(input, &config, json)?;
        }
    }

    Ok(())
}

fn cmd_mine(input: PathBuf, config: &MinerConfig, json: bool) -> anyhow::Result<()> {
    let start = Instant::now();

    let records = load_records(&input)?;
    let grouped = truncate(group_transactions(records), config.max_transactions);
    let num_transactions = grouped.len();
    let min_count = config.min_support.resolve(num_transactions)?;
    info!(transactions = num_transactions, min_count, algorithm = ?config.algorithm, "mining");

    let transactions = merge_duplicates(grouped);
    let miner = miner_for::<String>(config);
    let (itemsets, occurrences) = miner.mine(&transactions, min_count)?;
    let rules = mine_association_rules(&itemsets, config.min_confidence, num_transactions)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        let report = Report {
            transactions: num_transactions,
            min_support: min_count,
            itemsets: &itemsets,
            rules: &rules,
        };
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        writeln!(out, "transactions: {num_transactions}")?;
        writeln!(out, "min support count: {min_count}")?;
        for level in itemsets.levels() {
            writeln!(out, "\n{}-itemsets: {}", level.itemset_size, level.len())?;
            for (items, support) in level.iter_itemsets() {
                writeln!(out, "  {} ({support})", items.join(" "))?;
            }
        }
        writeln!(out, "\nrules: {}", rules.len())?;
        for rule in &rules {
            writeln!(out, "  {}", format_rule(rule, &occurrences))?;
        }
    }

    info!(elapsed = ?start.elapsed(), itemsets = itemsets.len(), rules = rules.len(), "done");
    Ok(())
}
