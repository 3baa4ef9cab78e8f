//! Instruction-related types for the payment instruction processor
//!
//! This module defines the structured form of a parsed payment instruction.
//! A raw instruction string always describes one debit leg and one credit leg;
//! the parser collapses both legs into a single [`TransferOperation`].

use super::account::{AccountId, Currency};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Leading keyword of an instruction
///
/// Echoed back to the caller as the `type` of the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstructionType {
    /// Instruction starts with the debit leg
    Debit,

    /// Instruction starts with the credit leg
    Credit,
}

impl InstructionType {
    /// The keyword as written in an instruction
    pub fn keyword(&self) -> &'static str {
        match self {
            InstructionType::Debit => "DEBIT",
            InstructionType::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for InstructionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A parsed transfer
///
/// Produced by the instruction parser and consumed by resolution, validation
/// and execution. `currency` is `None` when the instruction leaves it implicit,
/// in which case the resolved accounts decide it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferOperation {
    /// Which leg the instruction was written from
    pub instruction_type: InstructionType,

    /// Source account (the DEBIT leg)
    pub debit_account: AccountId,

    /// Destination account (the CREDIT leg)
    pub credit_account: AccountId,

    /// Amount moved between the two accounts
    ///
    /// Never negative; zero survives parsing and is rejected by validation.
    pub amount: Decimal,

    /// Currency stated in the instruction, if any
    pub currency: Option<Currency>,

    /// Requested settlement date
    ///
    /// A date after the current UTC date defers settlement.
    pub execute_by: Option<NaiveDate>,
}

impl TransferOperation {
    /// Whether the instruction moves money between an account and itself
    pub fn is_self_transfer(&self) -> bool {
        self.debit_account == self.credit_account
    }
}
