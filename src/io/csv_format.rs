//! CSV format handling for account snapshots
//!
//! This module centralizes all CSV format concerns, providing:
//! - AccountRecord structure for deserialization
//! - Conversion from CSV records to domain accounts
//! - Post-transfer account output serialization
//!
//! Input columns are `id,balance,currency`; output columns are
//! `id,balance,balance_before,currency`. Rows keep their input order.

use crate::types::{Account, AccountId, AccountSnapshot, Currency, InputError};
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// CSV record structure for deserialization
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountRecord {
    pub id: String,
    pub balance: String,
    pub currency: String,
}

/// Convert an AccountRecord to an Account
///
/// # Returns
///
/// * `Ok(Account)` - Successfully converted record
/// * `Err(String)` - Error message describing the conversion failure
pub fn convert_account_record(record: AccountRecord) -> Result<Account, String> {
    let id: AccountId = record.id.parse().map_err(|e| format!("{}", e))?;

    let balance = Decimal::from_str(&record.balance)
        .map_err(|_| format!("Invalid balance '{}' for account {}", record.balance, id))?;
    if balance < Decimal::ZERO {
        return Err(format!("Negative balance {} for account {}", balance, id));
    }

    let currency: Currency = record.currency.parse().map_err(|e| format!("{}", e))?;

    Ok(Account::new(id, balance, currency))
}

/// Read accounts from any CSV source
///
/// # Errors
///
/// Returns `InputError::CsvError` with the offending line for malformed rows
/// or rows that fail conversion.
pub fn parse_accounts_csv<R: Read>(source: R) -> Result<Vec<Account>, InputError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(source);
    let mut accounts = Vec::new();

    for result in reader.deserialize::<AccountRecord>() {
        let record = result?;
        let account = convert_account_record(record).map_err(|message| InputError::CsvError {
            // Header is line 1
            line: Some(accounts.len() as u64 + 2),
            message,
        })?;
        accounts.push(account);
    }

    Ok(accounts)
}

/// Read accounts from a CSV file
///
/// # Errors
///
/// Returns `InputError::FileNotFound` if the file cannot be opened, otherwise
/// whatever [`parse_accounts_csv`] reports.
pub fn read_accounts_csv(path: &Path) -> Result<Vec<Account>, InputError> {
    let file =
        File::open(path).map_err(|_| InputError::file_not_found(path.display().to_string()))?;
    parse_accounts_csv(file)
}

/// Write post-transfer account states in CSV format
///
/// # Arguments
///
/// * `accounts` - Account snapshots to write, in output order
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(InputError)` if a write error occurred
pub fn write_accounts_csv(
    accounts: &[AccountSnapshot],
    output: &mut dyn Write,
) -> Result<(), InputError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(["id", "balance", "balance_before", "currency"])?;

    for account in accounts {
        let balance = account.balance.to_string();
        let balance_before = account.balance_before.to_string();
        writer.write_record([
            account.id.as_str(),
            balance.as_str(),
            balance_before.as_str(),
            account.currency.as_str(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
