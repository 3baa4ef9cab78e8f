//! Payment Instructions Library
//! # Overview
//!
//! This library parses textual payment instructions, checks them against a
//! caller-supplied snapshot of accounts, and produces the resulting account
//! states together with an HTTP-style response envelope. Nothing is stored
//! between requests: every call receives its accounts and returns new values.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (accounts, operations, errors, results)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - The instruction pipeline:
//!   - [`core::parser`] - Instruction text to [`TransferOperation`]
//!   - [`core::resolver`] - Account lookup by id
//!   - [`core::validator`] - Collected business-rule checks
//!   - [`core::executor`] - Immediate or deferred settlement
//!   - [`core::result_builder`] - Summaries and response envelopes
//!   - [`core::processor`] - Orchestration of the stages above
//! - [`io`] - JSON Lines requests, account CSV files and response output
//! - [`strategy`] - Sync, async batch and single instruction pipelines
//!
//! # Instruction Grammar
//!
//! ```text
//! DEBIT <account> <amount> [CUR]; CREDIT <account> <amount> [CUR] [; ON <YYYY-MM-DD>]
//! DEBIT <amount> <CUR> FROM ACCOUNT <account> FOR CREDIT TO ACCOUNT <account> [ON <YYYY-MM-DD>]
//! CREDIT <amount> <CUR> TO ACCOUNT <account> FOR DEBIT FROM ACCOUNT <account> [ON <YYYY-MM-DD>]
//! ```
//!
//! Keywords are case-insensitive. A transfer dated after today is `pending`;
//! otherwise it settles immediately.
//!
//! # Example
//!
//! ```
//! use payment_instructions::core::InstructionProcessor;
//! use payment_instructions::types::{Account, TransferStatus};
//! use rust_decimal::Decimal;
//!
//! let accounts = vec![
//!     Account::new("A".parse().unwrap(), Decimal::new(500, 0), "NGN".parse().unwrap()),
//!     Account::new("B".parse().unwrap(), Decimal::new(100, 0), "NGN".parse().unwrap()),
//! ];
//!
//! let result = InstructionProcessor::default().process(&accounts, "DEBIT A 200 NGN; CREDIT B 200 NGN");
//! let summary = result.summary().unwrap();
//!
//! assert_eq!(summary.status, TransferStatus::Successful);
//! assert_eq!(summary.account("A").unwrap().balance, Decimal::new(300, 0));
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{InstructionProcessor, ProcessorConfig};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, AccountSnapshot, Currency, FieldError, ProcessingResult, ResponseEnvelope,
    TransferOperation, TransferSummary,
};
