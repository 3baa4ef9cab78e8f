//! Core business logic module
//!
//! This module contains the instruction processing pipeline:
//! - `traits` - Injected collaborators (clock, settlement gateway)
//! - `parser` - Raw instruction string to transfer operation
//! - `resolver` - Account lookup inside the supplied snapshot
//! - `validator` - Business rules checked before any balance moves
//! - `executor` - Atomic application of a validated transfer
//! - `result_builder` - Transfer summaries and response envelopes
//! - `processor` - Orchestration of all of the above

pub mod executor;
pub mod parser;
pub mod processor;
pub mod resolver;
pub mod result_builder;
pub mod traits;
pub mod validator;

pub use executor::{Execution, PendingPolicy, TransferExecutor};
pub use parser::InstructionParser;
pub use processor::{InstructionProcessor, ProcessorConfig};
pub use resolver::{AccountResolver, ResolvedAccounts};
pub use result_builder::ResultBuilder;
pub use traits::{Clock, FixedClock, InstantSettlement, SettlementGateway, SystemClock};
pub use validator::{ValidatedTransfer, ValidationEngine, DEFAULT_SUPPORTED_CURRENCIES};
