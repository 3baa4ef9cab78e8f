//! JSON format handling for payment requests and responses
//!
//! This module centralizes all JSON format concerns, providing:
//! - PaymentRequest / AccountInput structures for deserialization
//! - Field-level request validation into domain types
//! - Response envelope serialization (one JSON object per line)
//!
//! Apart from `write_envelope`, all functions are pure (no I/O).

use crate::types::{
    Account, AccountId, Currency, ErrorCode, FieldError, InputError, ResponseEnvelope,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Account entry of a request, before validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountInput {
    pub id: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,
    pub currency: String,
}

/// Request body: accounts snapshot plus one instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub accounts: Vec<AccountInput>,
    pub instruction: String,
}

/// A request whose fields passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRequest {
    pub accounts: Vec<Account>,

    /// Instruction with surrounding whitespace removed
    pub instruction: String,
}

/// Deserialize one request line
///
/// # Errors
///
/// Returns a single `INVALID_REQUEST_FORMAT` error when the line is not a JSON
/// object of the expected shape.
pub fn parse_request_line(line: &str) -> Result<PaymentRequest, Vec<FieldError>> {
    serde_json::from_str(line).map_err(|e| {
        let (field, message) = describe_json_error(&e);
        vec![FieldError::new(field, message, ErrorCode::InvalidRequestFormat)]
    })
}

/// Map a serde error onto the request field it concerns
fn describe_json_error(error: &serde_json::Error) -> (&'static str, String) {
    let text = error.to_string();
    for field in ["accounts", "instruction"] {
        if text.starts_with(&format!("missing field `{}`", field)) {
            return (field, format!("{} is required", field));
        }
    }
    ("request", format!("invalid request body: {}", text))
}

/// Validate request fields and convert them into domain types
///
/// Every violation is collected. Field names carry the account index, e.g.
/// `accounts[1].currency`.
///
/// # Arguments
///
/// * `request` - The deserialized request
///
/// # Returns
///
/// * `Ok(ValidRequest)` if every field is valid
/// * `Err(Vec<FieldError>)` with one `INVALID_FIELD` entry per violation
pub fn validate_request(request: PaymentRequest) -> Result<ValidRequest, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut accounts = Vec::with_capacity(request.accounts.len());

    for (index, input) in request.accounts.into_iter().enumerate() {
        let id = input.id.parse::<AccountId>().map_err(|e| {
            errors.push(FieldError::new(
                format!("accounts[{}].id", index),
                e.to_string(),
                ErrorCode::InvalidField,
            ))
        });

        if input.balance < Decimal::ZERO {
            errors.push(FieldError::new(
                format!("accounts[{}].balance", index),
                format!("balance must not be negative, got {}", input.balance),
                ErrorCode::InvalidField,
            ));
        }

        let currency = input.currency.parse::<Currency>().map_err(|e| {
            errors.push(FieldError::new(
                format!("accounts[{}].currency", index),
                e.to_string(),
                ErrorCode::InvalidField,
            ))
        });

        if let (Ok(id), Ok(currency)) = (id, currency) {
            accounts.push(Account::new(id, input.balance, currency));
        }
    }

    let instruction = request.instruction.trim();
    if instruction.is_empty() {
        errors.push(FieldError::new(
            "instruction",
            "instruction is required",
            ErrorCode::InvalidField,
        ));
    }

    if errors.is_empty() {
        Ok(ValidRequest {
            accounts,
            instruction: instruction.to_string(),
        })
    } else {
        Err(errors)
    }
}

/// Write a response envelope as one JSON line
///
/// # Arguments
///
/// * `envelope` - The response to write
/// * `output` - Mutable reference to a writer for outputting JSON
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(InputError)` if serialization or the write failed
pub fn write_envelope(envelope: &ResponseEnvelope, output: &mut dyn Write) -> Result<(), InputError> {
    serde_json::to_writer(&mut *output, envelope)?;
    output.write_all(b"\n")?;
    Ok(())
}
