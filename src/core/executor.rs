//! Transfer execution
//!
//! Applies a validated transfer to the two accounts it touches. Execution never
//! mutates its input: the new balances are computed into fresh
//! [`AccountSnapshot`] values and handed back together, or not at all.
//!
//! # Outcomes
//!
//! - **successful** (`AP00`): no `execute_by`, or `execute_by` on or before
//!   today. Both balances move and the settlement gateway is called once.
//! - **pending** (`AP02`): `execute_by` strictly after today. Balances follow
//!   the configured [`PendingPolicy`]; the gateway is not called.
//! - **failed** (`SF01`/`SF02`): the gateway rejected the transfer or the new
//!   balances cannot be represented. Both balances stay unchanged.

use crate::core::traits::{Clock, SettlementGateway};
use crate::core::validator::ValidatedTransfer;
use crate::types::{Account, AccountSnapshot, ExecutionFault, StatusCode, TransferStatus};
use clap::ValueEnum;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, warn};

const REASON_SUCCESSFUL: &str = "Transaction executed successfully";
const REASON_PENDING: &str = "Transaction scheduled for future execution";

/// Balance treatment of transfers deferred to a future date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PendingPolicy {
    /// Debit the source now and credit the destination at settlement
    #[default]
    ReserveDebit,

    /// Leave both balances untouched until settlement
    Hold,
}

/// Result of executing a validated transfer
#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub status: TransferStatus,
    pub status_code: StatusCode,
    pub status_reason: String,

    /// Debit account after execution
    pub debit: AccountSnapshot,

    /// Credit account after execution
    pub credit: AccountSnapshot,
}

/// Transfer executor
///
/// Holds the collaborators that decide how a transfer settles. Cheap to clone
/// and safe to share between threads.
#[derive(Clone)]
pub struct TransferExecutor {
    pending_policy: PendingPolicy,
    clock: Arc<dyn Clock>,
    gateway: Arc<dyn SettlementGateway>,
}

impl std::fmt::Debug for TransferExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferExecutor")
            .field("pending_policy", &self.pending_policy)
            .field("today", &self.clock.today())
            .finish_non_exhaustive()
    }
}

impl TransferExecutor {
    /// Create a new TransferExecutor
    ///
    /// # Arguments
    ///
    /// * `pending_policy` - Balance treatment for future-dated transfers
    /// * `clock` - Source of the current settlement date
    /// * `gateway` - Backend that finalizes immediate transfers
    pub fn new(
        pending_policy: PendingPolicy,
        clock: Arc<dyn Clock>,
        gateway: Arc<dyn SettlementGateway>,
    ) -> Self {
        TransferExecutor {
            pending_policy,
            clock,
            gateway,
        }
    }

    /// Configured pending policy
    pub fn pending_policy(&self) -> PendingPolicy {
        self.pending_policy
    }

    /// Whether a transfer settles later than today
    pub fn is_deferred(&self, transfer: &ValidatedTransfer<'_>) -> bool {
        transfer
            .operation
            .execute_by
            .is_some_and(|date| date > self.clock.today())
    }

    /// Execute a validated transfer
    ///
    /// Always returns an [`Execution`]; settlement faults are reported through
    /// its status rather than as an error, and leave both balances unchanged.
    pub fn execute(&self, transfer: &ValidatedTransfer<'_>) -> Execution {
        let result = if self.is_deferred(transfer) {
            self.defer(transfer)
        } else {
            self.settle(transfer)
        };

        result.unwrap_or_else(|fault| {
            warn!(
                debit = %transfer.debit.id,
                credit = %transfer.credit.id,
                error = %fault,
                "settlement failed"
            );
            Execution {
                status: TransferStatus::Failed,
                status_code: status_code_for(&fault),
                status_reason: fault.to_string(),
                debit: transfer.debit.unchanged(),
                credit: transfer.credit.unchanged(),
            }
        })
    }

    fn settle(&self, transfer: &ValidatedTransfer<'_>) -> Result<Execution, ExecutionFault> {
        let amount = transfer.operation.amount;

        // Both new balances exist before the gateway is asked to settle
        let debit = debited(transfer.debit, amount)?;
        let credit = credited(transfer.credit, amount)?;
        self.gateway.settle(transfer.operation)?;

        debug!(debit = %debit.id, credit = %credit.id, %amount, "transfer settled");
        Ok(Execution {
            status: TransferStatus::Successful,
            status_code: StatusCode::Approved,
            status_reason: REASON_SUCCESSFUL.to_string(),
            debit,
            credit,
        })
    }

    fn defer(&self, transfer: &ValidatedTransfer<'_>) -> Result<Execution, ExecutionFault> {
        let debit = match self.pending_policy {
            PendingPolicy::ReserveDebit => debited(transfer.debit, transfer.operation.amount)?,
            PendingPolicy::Hold => transfer.debit.unchanged(),
        };

        debug!(
            execute_by = ?transfer.operation.execute_by,
            policy = ?self.pending_policy,
            "transfer deferred"
        );
        Ok(Execution {
            status: TransferStatus::Pending,
            status_code: StatusCode::Scheduled,
            status_reason: REASON_PENDING.to_string(),
            debit,
            credit: transfer.credit.unchanged(),
        })
    }
}

fn status_code_for(fault: &ExecutionFault) -> StatusCode {
    match fault {
        ExecutionFault::SettlementRejected { .. } => StatusCode::SettlementRejected,
        ExecutionFault::BalanceOverflow { .. } | ExecutionFault::NegativeBalance { .. } => {
            StatusCode::BalanceFault
        }
    }
}

fn debited(account: &Account, amount: Decimal) -> Result<AccountSnapshot, ExecutionFault> {
    let balance = account
        .balance
        .checked_sub(amount)
        .ok_or_else(|| ExecutionFault::BalanceOverflow {
            account: account.id.clone(),
        })?;

    if balance < Decimal::ZERO {
        return Err(ExecutionFault::NegativeBalance {
            account: account.id.clone(),
        });
    }

    Ok(AccountSnapshot {
        balance,
        ..account.unchanged()
    })
}

fn credited(account: &Account, amount: Decimal) -> Result<AccountSnapshot, ExecutionFault> {
    let balance = account
        .balance
        .checked_add(amount)
        .ok_or_else(|| ExecutionFault::BalanceOverflow {
            account: account.id.clone(),
        })?;

    Ok(AccountSnapshot {
        balance,
        ..account.unchanged()
    })
}
