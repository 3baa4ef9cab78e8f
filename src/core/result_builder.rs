//! Result assembly
//!
//! Builds the two shapes an instruction can end in: a [`TransferSummary`] for
//! executed transfers and an error list for rejected ones, and wraps either in
//! the HTTP-shaped [`ResponseEnvelope`].

use crate::core::executor::Execution;
use crate::core::validator::ValidatedTransfer;
use crate::types::{
    Account, EnvelopeStatus, ErrorList, FieldError, ProcessingResult, ResponseBody, ResponseData,
    ResponseEnvelope, TransferSummary,
};

/// Message of every 200 response
pub const MESSAGE_PROCESSED: &str = "Transaction processed successfully";

/// Message of every 400 response
pub const MESSAGE_REJECTED: &str = "Validation failed";

/// Assembles processing results and response envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultBuilder;

impl ResultBuilder {
    /// Build the summary of an executed transfer
    ///
    /// The account list holds every supplied account in input order. The two
    /// accounts the transfer touched carry their post-execution balances; every
    /// other account is reported with `balance == balance_before`.
    ///
    /// # Arguments
    ///
    /// * `transfer` - The validated transfer that was executed
    /// * `execution` - Outcome of the executor
    /// * `accounts` - Accounts supplied with the request
    pub fn success(
        transfer: &ValidatedTransfer<'_>,
        execution: Execution,
        accounts: &[Account],
    ) -> TransferSummary {
        let operation = transfer.operation;
        let accounts = accounts
            .iter()
            .map(|account| {
                if account.id == execution.debit.id {
                    execution.debit.clone()
                } else if account.id == execution.credit.id {
                    execution.credit.clone()
                } else {
                    account.unchanged()
                }
            })
            .collect();

        TransferSummary {
            instruction_type: operation.instruction_type,
            amount: operation.amount,
            currency: transfer.currency,
            debit_account: operation.debit_account.clone(),
            credit_account: operation.credit_account.clone(),
            execute_by: operation.execute_by,
            status: execution.status,
            status_reason: execution.status_reason,
            status_code: execution.status_code,
            accounts,
        }
    }

    /// Build the result of a rejected instruction
    pub fn failure(errors: Vec<FieldError>) -> ProcessingResult {
        ProcessingResult::Failure(errors)
    }

    /// Wrap a processing result in its response envelope
    ///
    /// Executed transfers answer 200 with the transfer status as the body
    /// status; rejections answer 400 with status `error`.
    pub fn envelope(result: &ProcessingResult) -> ResponseEnvelope {
        match result {
            ProcessingResult::Success(summary) => ResponseEnvelope {
                http_status: 200,
                body: ResponseBody {
                    status: summary.status.into(),
                    message: MESSAGE_PROCESSED.to_string(),
                    data: ResponseData::Transfer(summary.clone()),
                },
            },
            ProcessingResult::Failure(errors) => Self::rejection(errors.clone()),
        }
    }

    /// 400 envelope for errors raised before the core ran
    pub fn rejection(errors: Vec<FieldError>) -> ResponseEnvelope {
        ResponseEnvelope {
            http_status: 400,
            body: ResponseBody {
                status: EnvelopeStatus::Error,
                message: MESSAGE_REJECTED.to_string(),
                data: ResponseData::Errors(ErrorList { errors }),
            },
        }
    }
}
