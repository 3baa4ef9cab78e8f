//! Processing result types
//!
//! Every processed instruction ends in exactly one [`ProcessingResult`]:
//! a transfer summary (successful, pending or failed settlement) or the list of
//! violations that rejected it. [`ResponseEnvelope`] is the HTTP-shaped form of
//! that result.

use super::account::{AccountId, AccountSnapshot, Currency};
use super::error::FieldError;
use super::instruction::InstructionType;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement outcome of an executed instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Balances moved synchronously
    Successful,

    /// Settlement deferred until `execute_by`
    Pending,

    /// Settlement faulted; balances untouched
    Failed,
}

/// Status code reported alongside [`TransferStatus`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    /// Transfer settled immediately
    #[serde(rename = "AP00")]
    Approved,

    /// Transfer scheduled for a future date
    #[serde(rename = "AP02")]
    Scheduled,

    /// Settlement gateway rejected the transfer
    #[serde(rename = "SF01")]
    SettlementRejected,

    /// Balance arithmetic could not be represented
    #[serde(rename = "SF02")]
    BalanceFault,
}

/// Summary of an executed instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferSummary {
    #[serde(rename = "type")]
    pub instruction_type: InstructionType,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,

    pub currency: Currency,

    pub debit_account: AccountId,

    pub credit_account: AccountId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execute_by: Option<NaiveDate>,

    pub status: TransferStatus,

    pub status_reason: String,

    pub status_code: StatusCode,

    /// Every supplied account, in input order, after processing
    pub accounts: Vec<AccountSnapshot>,
}

impl TransferSummary {
    /// Find the post-processing record of an account
    pub fn account(&self, id: &str) -> Option<&AccountSnapshot> {
        self.accounts.iter().find(|a| a.id.as_str() == id)
    }
}

/// Outcome of processing one instruction
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingResult {
    /// Instruction executed (successfully, pending or failed)
    Success(TransferSummary),

    /// Instruction rejected before execution
    Failure(Vec<FieldError>),
}

impl ProcessingResult {
    /// Whether the instruction was rejected
    pub fn is_rejected(&self) -> bool {
        matches!(self, ProcessingResult::Failure(_))
    }

    /// The transfer summary, if the instruction was executed
    pub fn summary(&self) -> Option<&TransferSummary> {
        match self {
            ProcessingResult::Success(summary) => Some(summary),
            ProcessingResult::Failure(_) => None,
        }
    }

    /// The reported violations, empty if the instruction was executed
    pub fn errors(&self) -> &[FieldError] {
        match self {
            ProcessingResult::Success(_) => &[],
            ProcessingResult::Failure(errors) => errors,
        }
    }
}

/// Top-level status of a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Successful,
    Pending,
    Failed,
    Error,
}

impl From<TransferStatus> for EnvelopeStatus {
    fn from(status: TransferStatus) -> Self {
        match status {
            TransferStatus::Successful => EnvelopeStatus::Successful,
            TransferStatus::Pending => EnvelopeStatus::Pending,
            TransferStatus::Failed => EnvelopeStatus::Failed,
        }
    }
}

/// Error list payload of a 400 response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorList {
    pub errors: Vec<FieldError>,
}

/// Payload of a response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Transfer(TransferSummary),
    Errors(ErrorList),
}

/// JSON body of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBody {
    pub status: EnvelopeStatus,
    pub message: String,
    pub data: ResponseData,
}

/// HTTP-shaped response: status code plus JSON body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub http_status: u16,
    pub body: ResponseBody,
}

impl ResponseEnvelope {
    /// Reported violations, empty for 200 responses
    pub fn errors(&self) -> &[FieldError] {
        match &self.body.data {
            ResponseData::Errors(list) => &list.errors,
            ResponseData::Transfer(_) => &[],
        }
    }

    /// Transfer summary, present for 200 responses
    pub fn transfer(&self) -> Option<&TransferSummary> {
        match &self.body.data {
            ResponseData::Transfer(summary) => Some(summary),
            ResponseData::Errors(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::error::ErrorCode;

    #[test]
    fn test_status_code_wire_values() {
        assert_eq!(
            serde_json::to_string(&StatusCode::Approved).unwrap(),
            "\"AP00\""
        );
        assert_eq!(
            serde_json::to_string(&StatusCode::Scheduled).unwrap(),
            "\"AP02\""
        );
        assert_eq!(
            serde_json::to_string(&TransferStatus::Pending).unwrap(),
            "\"pending\""
        );
    }

    #[test]
    fn test_summary_omits_missing_execute_by() {
        let summary = TransferSummary {
            instruction_type: InstructionType::Debit,
            amount: Decimal::new(200, 0),
            currency: Currency::NGN,
            debit_account: "A".parse().unwrap(),
            credit_account: "B".parse().unwrap(),
            execute_by: None,
            status: TransferStatus::Successful,
            status_reason: "Transaction executed successfully".to_string(),
            status_code: StatusCode::Approved,
            accounts: Vec::new(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "DEBIT");
        assert_eq!(json["amount"].as_f64(), Some(200.0));
        assert!(json.get("execute_by").is_none());
    }

    #[test]
    fn test_error_envelope_round_trips_through_untagged_data() {
        let envelope = ResponseEnvelope {
            http_status: 400,
            body: ResponseBody {
                status: EnvelopeStatus::Error,
                message: "Validation failed".to_string(),
                data: ResponseData::Errors(ErrorList {
                    errors: vec![FieldError::new(
                        "instruction",
                        "instruction is empty",
                        ErrorCode::MalformedInstruction,
                    )],
                }),
            },
        };

        let json = serde_json::to_string(&envelope).unwrap();
        let parsed: ResponseEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, envelope);
        assert!(parsed.transfer().is_none());
        assert_eq!(parsed.errors()[0].code, ErrorCode::MalformedInstruction);
    }
}
