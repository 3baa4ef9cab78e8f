//! Instruction processor
//!
//! This module provides the InstructionProcessor that orchestrates one
//! instruction through every stage of the pipeline:
//!
//! ```text
//! raw string + accounts
//!     → InstructionParser   (Parsed)
//!     → AccountResolver     (Resolved)
//!     → ValidationEngine    (Validated)
//!     → TransferExecutor    (Executed: successful | pending | failed)
//!     → ResultBuilder
//! ```
//!
//! A failure in parsing, resolution or validation stops the pipeline and
//! rejects the instruction with every violation found in that stage. Nothing
//! is retried, and the supplied accounts are never modified.

use crate::core::executor::{PendingPolicy, TransferExecutor};
use crate::core::parser::InstructionParser;
use crate::core::resolver::AccountResolver;
use crate::core::result_builder::ResultBuilder;
use crate::core::traits::{Clock, FixedClock, InstantSettlement, SettlementGateway, SystemClock};
use crate::core::validator::{ValidationEngine, DEFAULT_SUPPORTED_CURRENCIES};
use crate::types::{Account, Currency, ProcessingError, ProcessingResult, Stage, TransferSummary};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info};

/// Configuration of an InstructionProcessor
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    /// Currencies a transfer may be denominated in; empty accepts any
    pub supported_currencies: Vec<Currency>,

    /// Balance treatment of future-dated transfers
    pub pending_policy: PendingPolicy,

    /// Fixed settlement date; `None` follows the system clock (UTC)
    pub today: Option<NaiveDate>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            supported_currencies: DEFAULT_SUPPORTED_CURRENCIES.to_vec(),
            pending_policy: PendingPolicy::default(),
            today: None,
        }
    }
}

impl ProcessorConfig {
    /// Create a new ProcessorConfig
    ///
    /// Duplicate currencies are dropped, keeping the first occurrence.
    pub fn new(
        supported_currencies: Vec<Currency>,
        pending_policy: PendingPolicy,
        today: Option<NaiveDate>,
    ) -> Self {
        let mut unique = Vec::with_capacity(supported_currencies.len());
        for currency in supported_currencies {
            if !unique.contains(&currency) {
                unique.push(currency);
            }
        }

        Self {
            supported_currencies: unique,
            pending_policy,
            today,
        }
    }
}

/// Instruction processor
///
/// Stateless between calls: every call to [`process`](Self::process) works on
/// the accounts it is given and returns fresh values, so one processor can be
/// shared across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct InstructionProcessor {
    parser: InstructionParser,
    resolver: AccountResolver,
    validator: ValidationEngine,
    executor: TransferExecutor,
}

impl Default for InstructionProcessor {
    fn default() -> Self {
        Self::new(ProcessorConfig::default())
    }
}

impl InstructionProcessor {
    /// Create a new InstructionProcessor
    ///
    /// Uses a [`FixedClock`] when `config.today` is set, the [`SystemClock`]
    /// otherwise, and settles immediate transfers with [`InstantSettlement`].
    pub fn new(config: ProcessorConfig) -> Self {
        let clock: Arc<dyn Clock> = match config.today {
            Some(date) => Arc::new(FixedClock(date)),
            None => Arc::new(SystemClock),
        };
        Self::with_collaborators(config, clock, Arc::new(InstantSettlement))
    }

    /// Create an InstructionProcessor with explicit collaborators
    ///
    /// `config.today` is ignored; `clock` decides the settlement date.
    ///
    /// # Arguments
    ///
    /// * `config` - Supported currencies and pending policy
    /// * `clock` - Source of the current settlement date
    /// * `gateway` - Backend that finalizes immediate transfers
    pub fn with_collaborators(
        config: ProcessorConfig,
        clock: Arc<dyn Clock>,
        gateway: Arc<dyn SettlementGateway>,
    ) -> Self {
        InstructionProcessor {
            parser: InstructionParser::new(),
            resolver: AccountResolver::new(),
            validator: ValidationEngine::new(config.supported_currencies),
            executor: TransferExecutor::new(config.pending_policy, clock, gateway),
        }
    }

    /// Process one instruction against a set of accounts
    ///
    /// # Arguments
    ///
    /// * `accounts` - Account snapshot supplied with the request
    /// * `instruction` - Raw instruction string
    ///
    /// # Returns
    ///
    /// * `ProcessingResult::Success` if the transfer executed, whatever its
    ///   settlement status
    /// * `ProcessingResult::Failure` with every violation of the stage that
    ///   rejected it
    pub fn process(&self, accounts: &[Account], instruction: &str) -> ProcessingResult {
        info!(instruction, accounts = accounts.len(), "processing instruction");

        match self.run(accounts, instruction) {
            Ok(summary) => {
                info!(
                    status = ?summary.status,
                    status_code = ?summary.status_code,
                    debit = %summary.debit_account,
                    credit = %summary.credit_account,
                    "instruction processed"
                );
                ProcessingResult::Success(summary)
            }
            Err(error) => {
                info!(stage = %error.stage(), %error, "instruction rejected");
                ResultBuilder::failure(error.into_errors())
            }
        }
    }

    fn run(
        &self,
        accounts: &[Account],
        instruction: &str,
    ) -> Result<TransferSummary, ProcessingError> {
        let operation = self.parser.parse(instruction)?;
        debug!(stage = %Stage::Parse, ?operation, "instruction parsed");

        let resolved = self
            .resolver
            .resolve(&operation, accounts)
            .map_err(|errors| ProcessingError::rejected(Stage::Resolve, errors))?;
        debug!(
            stage = %Stage::Resolve,
            debit = %resolved.debit.id,
            credit = %resolved.credit.id,
            "accounts resolved"
        );

        let transfer = self
            .validator
            .validate(&operation, resolved)
            .map_err(|errors| ProcessingError::rejected(Stage::Validate, errors))?;
        debug!(stage = %Stage::Validate, currency = %transfer.currency, "transfer validated");

        let execution = self.executor.execute(&transfer);
        debug!(stage = %Stage::Execute, status = ?execution.status, "transfer executed");

        Ok(ResultBuilder::success(&transfer, execution, accounts))
    }
}
