//! Error types for the payment instruction processor
//!
//! This module defines every error that can occur while turning a raw
//! instruction into a processing result, and the errors of the surrounding
//! I/O layer.
//!
//! # Error Categories
//!
//! - **Parse Errors**: the instruction string does not follow the grammar
//! - **Resolution Errors**: referenced accounts are missing or ambiguous
//! - **Validation Errors**: business rules (currency, funds, self-transfer)
//! - **Execution Faults**: settlement failed after validation passed
//! - **Input Errors**: files, CSV and JSON handling outside the core
//!
//! Parse, resolution and validation errors are all reported to the caller as
//! [`FieldError`] records inside a 400 envelope. Execution faults are a
//! business outcome and travel inside a 200 body with status `failed`.

use super::account::{AccountId, Currency};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Machine-readable code attached to every reported error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MalformedInstruction,
    InvalidAccountId,
    InvalidDateFormat,
    AccountNotFound,
    DuplicateAccount,
    CurrencyMismatch,
    InvalidAmount,
    InsufficientFunds,
    SelfTransfer,
    UnsupportedCurrency,
    InvalidRequestFormat,
    InvalidField,
}

impl ErrorCode {
    /// The code as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MalformedInstruction => "MALFORMED_INSTRUCTION",
            ErrorCode::InvalidAccountId => "INVALID_ACCOUNT_ID",
            ErrorCode::InvalidDateFormat => "INVALID_DATE_FORMAT",
            ErrorCode::AccountNotFound => "ACCOUNT_NOT_FOUND",
            ErrorCode::DuplicateAccount => "DUPLICATE_ACCOUNT",
            ErrorCode::CurrencyMismatch => "CURRENCY_MISMATCH",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::SelfTransfer => "SELF_TRANSFER",
            ErrorCode::UnsupportedCurrency => "UNSUPPORTED_CURRENCY",
            ErrorCode::InvalidRequestFormat => "INVALID_REQUEST_FORMAT",
            ErrorCode::InvalidField => "INVALID_FIELD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single reported violation
///
/// `field` names the offending logical field (`instruction`,
/// `accounts[].balance`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    pub code: ErrorCode,
}

impl FieldError {
    /// Create a new FieldError
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

/// Pipeline stage an instruction was in when it was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Resolve,
    Validate,
    Execute,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Parse => "parse",
            Stage::Resolve => "resolve",
            Stage::Validate => "validate",
            Stage::Execute => "execute",
        };
        f.write_str(name)
    }
}

/// Instruction string does not follow the grammar
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// Nothing left after trimming
    #[error("instruction is empty")]
    Empty,

    /// Neither grammar recognises the instruction
    #[error("malformed instruction: {reason}")]
    Malformed {
        /// What the parser expected
        reason: String,
    },

    /// A required DEBIT or CREDIT clause is absent
    #[error("malformed instruction: missing {keyword} clause")]
    MissingKeyword { keyword: &'static str },

    /// The same clause keyword appears more than once
    #[error("malformed instruction: {keyword} clause appears more than once")]
    DuplicateKeyword { keyword: &'static str },

    /// Amount token is not a plain non-negative decimal number
    #[error("malformed instruction: '{token}' is not a valid amount")]
    InvalidAmount { token: String },

    /// Account token contains characters outside the allowed set
    #[error("invalid account id '{token}' in instruction")]
    InvalidAccountId { token: String },

    /// Currency token is not three letters
    #[error("malformed instruction: '{token}' is not a valid currency code")]
    InvalidCurrency { token: String },

    /// Settlement date is not a real `YYYY-MM-DD` date
    #[error("invalid execution date '{token}': expected YYYY-MM-DD")]
    InvalidDate { token: String },

    /// Debit and credit legs carry different amounts
    #[error("malformed instruction: debit amount {debit} does not match credit amount {credit}")]
    AmountMismatch { debit: Decimal, credit: Decimal },

    /// Debit and credit legs state different currencies
    #[error("debit leg currency {debit} does not match credit leg currency {credit}")]
    CurrencyMismatch { debit: Currency, credit: Currency },
}

impl ParseError {
    /// Create a Malformed error
    pub fn malformed(reason: impl Into<String>) -> Self {
        ParseError::Malformed {
            reason: reason.into(),
        }
    }

    /// Wire code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::InvalidAccountId { .. } => ErrorCode::InvalidAccountId,
            ParseError::InvalidDate { .. } => ErrorCode::InvalidDateFormat,
            ParseError::CurrencyMismatch { .. } => ErrorCode::CurrencyMismatch,
            _ => ErrorCode::MalformedInstruction,
        }
    }
}

impl From<ParseError> for FieldError {
    fn from(error: ParseError) -> Self {
        FieldError::new("instruction", error.to_string(), error.code())
    }
}

/// Which leg of the transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leg {
    Debit,
    Credit,
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Leg::Debit => f.write_str("debit"),
            Leg::Credit => f.write_str("credit"),
        }
    }
}

/// Referenced account cannot be resolved unambiguously
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error("{leg} account '{id}' not found in supplied accounts")]
    AccountNotFound { id: AccountId, leg: Leg },

    #[error("account '{id}' appears {occurrences} times in supplied accounts")]
    DuplicateAccount { id: AccountId, occurrences: usize },
}

impl ResolutionError {
    /// Wire code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolutionError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            ResolutionError::DuplicateAccount { .. } => ErrorCode::DuplicateAccount,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            ResolutionError::AccountNotFound { leg: Leg::Debit, .. } => "instruction.debit_account",
            ResolutionError::AccountNotFound {
                leg: Leg::Credit, ..
            } => "instruction.credit_account",
            ResolutionError::DuplicateAccount { .. } => "accounts[].id",
        }
    }
}

impl From<ResolutionError> for FieldError {
    fn from(error: ResolutionError) -> Self {
        FieldError::new(error.field(), error.to_string(), error.code())
    }
}

/// Business rule violated by a resolved transfer
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("currency mismatch: debit account is {debit}, credit account is {credit}{}", instruction.map(|c| format!(", instruction is {}", c)).unwrap_or_default())]
    CurrencyMismatch {
        debit: Currency,
        credit: Currency,
        instruction: Option<Currency>,
    },

    #[error("amount must be greater than zero, got {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("insufficient funds in account '{account}': available {available}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        available: Decimal,
        requested: Decimal,
    },

    #[error("debit and credit account cannot be the same ('{account}')")]
    SelfTransfer { account: AccountId },

    #[error("currency {currency} is not supported")]
    UnsupportedCurrency { currency: Currency },
}

impl ValidationError {
    /// Wire code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::CurrencyMismatch { .. } => ErrorCode::CurrencyMismatch,
            ValidationError::InvalidAmount { .. } => ErrorCode::InvalidAmount,
            ValidationError::InsufficientFunds { .. } => ErrorCode::InsufficientFunds,
            ValidationError::SelfTransfer { .. } => ErrorCode::SelfTransfer,
            ValidationError::UnsupportedCurrency { .. } => ErrorCode::UnsupportedCurrency,
        }
    }

    fn field(&self) -> &'static str {
        match self {
            ValidationError::CurrencyMismatch { .. } => "accounts[].currency",
            ValidationError::InvalidAmount { .. } => "instruction",
            ValidationError::InsufficientFunds { .. } => "accounts[].balance",
            ValidationError::SelfTransfer { .. } => "instruction",
            ValidationError::UnsupportedCurrency { .. } => "instruction",
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(error: ValidationError) -> Self {
        FieldError::new(error.field(), error.to_string(), error.code())
    }
}

/// Settlement could not complete after validation passed
///
/// Reported with status `failed`; no balance change is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionFault {
    #[error("settlement rejected: {reason}")]
    SettlementRejected { reason: String },

    #[error("balance overflow on account '{account}'")]
    BalanceOverflow { account: AccountId },

    #[error("transfer would leave account '{account}' with a negative balance")]
    NegativeBalance { account: AccountId },
}

impl ExecutionFault {
    /// Create a SettlementRejected fault
    pub fn settlement_rejected(reason: impl Into<String>) -> Self {
        ExecutionFault::SettlementRejected {
            reason: reason.into(),
        }
    }
}

/// Instruction rejected before execution
///
/// Carries every violation collected in the stage that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProcessingError {
    #[error("instruction rejected at {stage} stage with {} error(s)", errors.len())]
    Rejected {
        stage: Stage,
        errors: Vec<FieldError>,
    },
}

impl ProcessingError {
    /// Build a rejection from any list of stage errors
    pub fn rejected<E: Into<FieldError>>(stage: Stage, errors: Vec<E>) -> Self {
        ProcessingError::Rejected {
            stage,
            errors: errors.into_iter().map(Into::into).collect(),
        }
    }

    /// Stage that produced the rejection
    pub fn stage(&self) -> Stage {
        match self {
            ProcessingError::Rejected { stage, .. } => *stage,
        }
    }

    /// Consume the error, returning the reported violations
    pub fn into_errors(self) -> Vec<FieldError> {
        match self {
            ProcessingError::Rejected { errors, .. } => errors,
        }
    }
}

impl From<ParseError> for ProcessingError {
    fn from(error: ParseError) -> Self {
        ProcessingError::rejected(Stage::Parse, vec![error])
    }
}

/// Errors of the I/O layer around the core
///
/// File-level problems are fatal for a run; per-line problems are turned into
/// 400 envelopes by the strategies and never surface as `InputError`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// CSV parsing error
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    CsvError { line: Option<u64>, message: String },

    /// JSON encoding error
    #[error("JSON error: {message}")]
    JsonError { message: String },

    /// Async runtime failure
    #[error("Runtime error: {message}")]
    RuntimeError { message: String },
}

impl InputError {
    /// Create a FileNotFound error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        InputError::FileNotFound { path: path.into() }
    }

    /// Create a RuntimeError
    pub fn runtime(message: impl fmt::Display) -> Self {
        InputError::RuntimeError {
            message: message.to_string(),
        }
    }
}

impl From<std::io::Error> for InputError {
    fn from(error: std::io::Error) -> Self {
        InputError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for InputError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        InputError::CsvError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for InputError {
    fn from(error: serde_json::Error) -> Self {
        InputError::JsonError {
            message: error.to_string(),
        }
    }
}
