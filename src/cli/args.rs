use crate::core::{PendingPolicy, ProcessorConfig, DEFAULT_SUPPORTED_CURRENCIES};
use crate::strategy::BatchConfig;
use crate::types::Currency;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};

/// Process payment instructions against caller-supplied account snapshots
#[derive(Parser, Debug)]
#[command(name = "payment-instructions")]
#[command(
    about = "Process payment instructions against caller-supplied account snapshots",
    long_about = None
)]
pub struct CliArgs {
    /// JSON Lines file with one `{accounts, instruction}` request per line
    #[arg(
        value_name = "INPUT",
        required_unless_present = "accounts",
        conflicts_with = "accounts",
        help = "Path to the JSON Lines request file"
    )]
    pub input_file: Option<PathBuf>,

    /// Accounts CSV for a single instruction
    #[arg(
        long = "accounts",
        value_name = "CSV",
        requires = "instruction",
        help = "Accounts CSV (id,balance,currency) for a single instruction"
    )]
    pub accounts: Option<PathBuf>,

    /// The single instruction to run against `--accounts`
    #[arg(
        long = "instruction",
        value_name = "TEXT",
        requires = "accounts",
        help = "Single instruction to process (with --accounts)"
    )]
    pub instruction: Option<String>,

    /// Where to write resulting account states in single instruction mode
    #[arg(
        long = "accounts-out",
        value_name = "CSV",
        requires = "accounts",
        help = "Write the resulting account states as CSV (with --accounts)"
    )]
    pub accounts_out: Option<PathBuf>,

    /// Processing strategy for request files
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for synchronous or 'async' for batched parallel"
    )]
    pub strategy: StrategyType,

    /// Number of requests per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of concurrent batches (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of batches processing concurrently (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Settlement date used to decide immediate vs deferred execution
    #[arg(
        long = "today",
        value_name = "YYYY-MM-DD",
        help = "Fix today's date instead of reading the system clock (UTC)"
    )]
    pub today: Option<NaiveDate>,

    /// Balance treatment of future-dated transfers
    #[arg(
        long = "pending-policy",
        value_name = "POLICY",
        default_value = "reserve-debit",
        help = "Future-dated transfers: 'reserve-debit' debits now, 'hold' moves nothing"
    )]
    pub pending_policy: PendingPolicy,

    /// Supported currencies; repeat the flag to list several
    #[arg(
        long = "currency",
        value_name = "CUR",
        help = "Supported currency code, repeatable (default: NGN, USD, GBP, GHS)"
    )]
    pub currencies: Vec<Currency>,

    /// Log filter used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log level for stderr diagnostics (RUST_LOG takes precedence)"
    )]
    pub log_level: String,
}

/// Available processing strategies for request files
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyType {
    #[default]
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values take their defaults; zero values are replaced by
    /// `BatchConfig::new` with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a ProcessorConfig from CLI arguments
    ///
    /// # Returns
    ///
    /// A `ProcessorConfig` with the listed currencies (or the defaults when
    /// none are given), the pending policy and the optional fixed date.
    pub fn to_processor_config(&self) -> ProcessorConfig {
        let currencies = if self.currencies.is_empty() {
            DEFAULT_SUPPORTED_CURRENCIES.to_vec()
        } else {
            self.currencies.clone()
        };

        ProcessorConfig::new(currencies, self.pending_policy, self.today)
    }

    /// Accounts CSV and instruction, when a single instruction was given
    /// instead of a request file
    pub fn single_instruction(&self) -> Option<(&Path, &str)> {
        match (&self.accounts, &self.instruction) {
            (Some(accounts), Some(instruction)) => Some((accounts.as_path(), instruction.as_str())),
            _ => None,
        }
    }
}
