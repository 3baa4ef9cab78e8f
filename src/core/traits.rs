//! Core traits for the collaborators the processor consumes
//!
//! The processor never reads the wall clock or talks to a settlement backend
//! directly. Both are injected behind these traits so that runs are
//! reproducible and the failure paths can be exercised in tests.

use crate::types::{ExecutionFault, TransferOperation};
use chrono::{NaiveDate, Utc};

/// Source of the current settlement date
///
/// Transfers whose `execute_by` date is strictly after `today()` are deferred.
pub trait Clock: Send + Sync {
    /// Current date in UTC
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time (UTC)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a fixed date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Backend that finalizes immediate transfers
///
/// Called once per transfer that settles synchronously, after validation has
/// passed and before any balance change is returned. An `Err` marks the
/// transfer `failed` with balances unchanged.
pub trait SettlementGateway: Send + Sync {
    /// Settle a validated transfer
    fn settle(&self, operation: &TransferOperation) -> Result<(), ExecutionFault>;
}

/// Gateway that accepts every transfer
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSettlement;

impl SettlementGateway for InstantSettlement {
    fn settle(&self, _operation: &TransferOperation) -> Result<(), ExecutionFault> {
        Ok(())
    }
}
