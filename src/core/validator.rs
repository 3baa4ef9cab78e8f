//! Business-rule validation
//!
//! Checks a resolved transfer against the rules that must hold before any
//! balance moves. Validation is a pure function of its inputs: every rule is
//! evaluated and every violation is returned, in a fixed order.

use crate::core::resolver::ResolvedAccounts;
use crate::types::{Account, Currency, TransferOperation, ValidationError};
use rust_decimal::Decimal;

/// Currencies accepted when no explicit list is configured
pub const DEFAULT_SUPPORTED_CURRENCIES: [Currency; 4] =
    [Currency::NGN, Currency::USD, Currency::GBP, Currency::GHS];

/// A transfer that passed every check
///
/// Only [`ValidationEngine::validate`] builds this value, so holding one means
/// the executor may move balances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatedTransfer<'a> {
    pub operation: &'a TransferOperation,
    pub debit: &'a Account,
    pub credit: &'a Account,

    /// Currency shared by both accounts and the instruction
    pub currency: Currency,
}

/// Validation engine
///
/// # Rules
///
/// Evaluated in this order, all of them every time:
/// 1. Debit, credit and (if stated) instruction currencies agree
/// 2. Amount is greater than zero
/// 3. Debit balance covers the amount
/// 4. Debit and credit are different accounts
/// 5. Currency is supported (skipped when the supported list is empty)
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationEngine {
    supported_currencies: Vec<Currency>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPORTED_CURRENCIES.to_vec())
    }
}

impl ValidationEngine {
    /// Create a ValidationEngine accepting the given currencies
    ///
    /// An empty list accepts any well-formed currency code.
    pub fn new(supported_currencies: Vec<Currency>) -> Self {
        ValidationEngine {
            supported_currencies,
        }
    }

    /// Currencies this engine accepts
    pub fn supported_currencies(&self) -> &[Currency] {
        &self.supported_currencies
    }

    /// Validate a resolved transfer
    ///
    /// # Arguments
    ///
    /// * `operation` - The parsed transfer
    /// * `accounts` - The debit and credit accounts it references
    ///
    /// # Returns
    ///
    /// * `Ok(ValidatedTransfer)` if every rule holds
    /// * `Err(Vec<ValidationError>)` with one entry per violated rule
    pub fn validate<'a>(
        &self,
        operation: &'a TransferOperation,
        accounts: ResolvedAccounts<'a>,
    ) -> Result<ValidatedTransfer<'a>, Vec<ValidationError>> {
        let ResolvedAccounts { debit, credit } = accounts;
        let mut errors = Vec::new();

        let stated_mismatch = operation
            .currency
            .is_some_and(|c| c != debit.currency || c != credit.currency);
        if debit.currency != credit.currency || stated_mismatch {
            errors.push(ValidationError::CurrencyMismatch {
                debit: debit.currency,
                credit: credit.currency,
                instruction: operation.currency,
            });
        }

        if operation.amount <= Decimal::ZERO {
            errors.push(ValidationError::InvalidAmount {
                amount: operation.amount,
            });
        }

        if debit.balance < operation.amount {
            errors.push(ValidationError::InsufficientFunds {
                account: debit.id.clone(),
                available: debit.balance,
                requested: operation.amount,
            });
        }

        if debit.id == credit.id {
            errors.push(ValidationError::SelfTransfer {
                account: debit.id.clone(),
            });
        }

        let currency = operation.currency.unwrap_or(debit.currency);
        if !self.supported_currencies.is_empty() && !self.supported_currencies.contains(&currency)
        {
            errors.push(ValidationError::UnsupportedCurrency { currency });
        }

        if errors.is_empty() {
            Ok(ValidatedTransfer {
                operation,
                debit,
                credit,
                currency,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccountId, ErrorCode, InstructionType};
    use rstest::rstest;

    fn id(raw: &str) -> AccountId {
        raw.parse().unwrap()
    }

    fn eur() -> Currency {
        "EUR".parse().unwrap()
    }

    fn account(raw: &str, balance: i64, currency: Currency) -> Account {
        Account::new(id(raw), Decimal::new(balance, 0), currency)
    }

    fn transfer(
        debit: &str,
        credit: &str,
        amount: i64,
        currency: Option<Currency>,
    ) -> TransferOperation {
        TransferOperation {
            instruction_type: InstructionType::Debit,
            debit_account: id(debit),
            credit_account: id(credit),
            amount: Decimal::new(amount, 0),
            currency,
            execute_by: None,
        }
    }

    fn codes(errors: &[ValidationError]) -> Vec<ErrorCode> {
        errors.iter().map(ValidationError::code).collect()
    }

    #[test]
    fn test_validate_accepts_valid_transfer() {
        let a = account("A", 500, Currency::NGN);
        let b = account("B", 100, Currency::NGN);
        let op = transfer("A", "B", 200, Some(Currency::NGN));

        let validated = ValidationEngine::default()
            .validate(&op, ResolvedAccounts { debit: &a, credit: &b })
            .unwrap();

        assert_eq!(validated.currency, Currency::NGN);
        assert_eq!(validated.debit, &a);
        assert_eq!(validated.credit, &b);
    }

    #[test]
    fn test_validate_infers_currency_from_accounts() {
        let a = account("A", 500, Currency::GHS);
        let b = account("B", 100, Currency::GHS);
        let op = transfer("A", "B", 200, None);

        let validated = ValidationEngine::default()
            .validate(&op, ResolvedAccounts { debit: &a, credit: &b })
            .unwrap();

        assert_eq!(validated.currency, Currency::GHS);
    }

    #[test]
    fn test_validate_accepts_exact_balance() {
        let a = account("A", 200, Currency::NGN);
        let b = account("B", 0, Currency::NGN);
        let op = transfer("A", "B", 200, None);

        assert!(ValidationEngine::default()
            .validate(&op, ResolvedAccounts { debit: &a, credit: &b })
            .is_ok());
    }

    #[rstest]
    #[case::insufficient_funds(
        account("A", 100, Currency::NGN),
        account("B", 0, Currency::NGN),
        transfer("A", "B", 150, Some(Currency::NGN)),
        vec![ErrorCode::InsufficientFunds]
    )]
    #[case::account_currency_mismatch(
        account("A", 500, Currency::NGN),
        account("B", 0, Currency::USD),
        transfer("A", "B", 100, None),
        vec![ErrorCode::CurrencyMismatch]
    )]
    #[case::instruction_currency_mismatch(
        account("A", 500, Currency::NGN),
        account("B", 0, Currency::NGN),
        transfer("A", "B", 100, Some(Currency::USD)),
        vec![ErrorCode::CurrencyMismatch]
    )]
    #[case::zero_amount(
        account("A", 500, Currency::NGN),
        account("B", 0, Currency::NGN),
        transfer("A", "B", 0, None),
        vec![ErrorCode::InvalidAmount]
    )]
    #[case::self_transfer(
        account("A", 500, Currency::NGN),
        account("A", 500, Currency::NGN),
        transfer("A", "A", 100, None),
        vec![ErrorCode::SelfTransfer]
    )]
    #[case::unsupported_currency(
        account("A", 500, eur()),
        account("B", 0, eur()),
        transfer("A", "B", 100, None),
        vec![ErrorCode::UnsupportedCurrency]
    )]
    #[case::every_rule_collected(
        account("A", 50, eur()),
        account("A", 50, Currency::NGN),
        transfer("A", "A", 100, None),
        vec![
            ErrorCode::CurrencyMismatch,
            ErrorCode::InsufficientFunds,
            ErrorCode::SelfTransfer,
            ErrorCode::UnsupportedCurrency,
        ]
    )]
    fn test_validate_rejects(
        #[case] debit: Account,
        #[case] credit: Account,
        #[case] op: TransferOperation,
        #[case] expected: Vec<ErrorCode>,
    ) {
        let errors = ValidationEngine::default()
            .validate(&op, ResolvedAccounts { debit: &debit, credit: &credit })
            .unwrap_err();

        assert_eq!(codes(&errors), expected);
    }

    #[test]
    fn test_validate_empty_supported_list_accepts_any_currency() {
        let a = account("A", 500, eur());
        let b = account("B", 0, eur());
        let op = transfer("A", "B", 100, None);

        let validated = ValidationEngine::new(Vec::new())
            .validate(&op, ResolvedAccounts { debit: &a, credit: &b })
            .unwrap();

        assert_eq!(validated.currency, eur());
    }

    #[test]
    fn test_validate_custom_supported_list() {
        let a = account("A", 500, Currency::NGN);
        let b = account("B", 0, Currency::NGN);
        let op = transfer("A", "B", 100, None);
        let engine = ValidationEngine::new(vec![Currency::USD]);

        let errors = engine
            .validate(&op, ResolvedAccounts { debit: &a, credit: &b })
            .unwrap_err();

        assert_eq!(
            errors,
            vec![ValidationError::UnsupportedCurrency {
                currency: Currency::NGN
            }]
        );
    }

    #[test]
    fn test_insufficient_funds_reports_balances() {
        let a = account("A", 100, Currency::NGN);
        let b = account("B", 0, Currency::NGN);
        let op = transfer("A", "B", 150, None);

        let errors = ValidationEngine::default()
            .validate(&op, ResolvedAccounts { debit: &a, credit: &b })
            .unwrap_err();

        assert_eq!(
            errors,
            vec![ValidationError::InsufficientFunds {
                account: id("A"),
                available: Decimal::new(100, 0),
                requested: Decimal::new(150, 0),
            }]
        );
    }
}
