//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account snapshots, identifiers and currencies
//! - `instruction`: The parsed form of a payment instruction
//! - `result`: Processing results and response envelopes
//! - `error`: Error types for every pipeline stage and the I/O layer

pub mod account;
pub mod error;
pub mod instruction;
pub mod result;

pub use account::{Account, AccountId, AccountSnapshot, Currency};
pub use error::{
    ErrorCode, ExecutionFault, FieldError, InputError, Leg, ParseError, ProcessingError,
    ResolutionError, Stage, ValidationError,
};
pub use instruction::{InstructionType, TransferOperation};
pub use result::{
    EnvelopeStatus, ErrorList, ProcessingResult, ResponseBody, ResponseData, ResponseEnvelope,
    StatusCode, TransferStatus, TransferSummary,
};
