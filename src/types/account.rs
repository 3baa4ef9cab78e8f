//! Account-related types for the payment instruction processor
//!
//! This module defines the account snapshot supplied with every request,
//! the post-transfer record returned in responses, and the validated
//! identifier and currency newtypes shared by both.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account identifier
///
/// Non-empty and restricted to ASCII letters, digits, `-`, `.` and `@`.
/// Construction goes through [`FromStr`] so an `AccountId` in hand is always
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Borrow the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_allowed(c: char) -> bool {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '@')
    }
}

impl FromStr for AccountId {
    type Err = InvalidAccountId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.chars().all(Self::is_allowed) {
            return Err(InvalidAccountId(s.to_string()));
        }
        Ok(AccountId(s.to_string()))
    }
}

impl TryFrom<String> for AccountId {
    type Error = InvalidAccountId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rejected account identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid account id '{0}': only letters, digits, '-', '.' and '@' are allowed")]
pub struct InvalidAccountId(pub String);

/// ISO-4217 style currency code: exactly three uppercase ASCII letters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Currency([u8; 3]);

impl Currency {
    pub const NGN: Currency = Currency(*b"NGN");
    pub const USD: Currency = Currency(*b"USD");
    pub const GBP: Currency = Currency(*b"GBP");
    pub const GHS: Currency = Currency(*b"GHS");

    /// Borrow the code as a string slice
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase bytes are ever stored
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl FromStr for Currency {
    type Err = InvalidCurrency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.as_bytes() {
            [a, b, c] if [a, b, c].iter().all(|byte| byte.is_ascii_uppercase()) => {
                Ok(Currency([*a, *b, *c]))
            }
            _ => Err(InvalidCurrency(s.to_string())),
        }
    }
}

impl TryFrom<String> for Currency {
    type Error = InvalidCurrency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.as_str().to_string()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected currency code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid currency '{0}': expected exactly 3 uppercase letters")]
pub struct InvalidCurrency(pub String);

/// Account state supplied by the caller
///
/// The processor never mutates an `Account`; balance changes are expressed
/// as freshly built [`AccountSnapshot`] values.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The account identifier
    pub id: AccountId,

    /// Current balance, never negative
    pub balance: Decimal,

    /// Currency the balance is denominated in
    pub currency: Currency,
}

impl Account {
    /// Create a new account
    pub fn new(id: AccountId, balance: Decimal, currency: Currency) -> Self {
        Account {
            id,
            balance,
            currency,
        }
    }

    /// Snapshot of this account with no balance change applied
    pub fn unchanged(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            balance: self.balance,
            balance_before: self.balance,
            currency: self.currency,
        }
    }
}

/// Account record returned in a response
///
/// Carries both the balance after processing and the balance the caller
/// supplied, so a client can reconcile the change without keeping state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub id: AccountId,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance: Decimal,

    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub balance_before: Decimal,

    pub currency: Currency,
}

impl AccountSnapshot {
    /// Net balance change carried by this snapshot
    pub fn delta(&self) -> Decimal {
        self.balance - self.balance_before
    }
}
