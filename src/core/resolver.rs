//! Account resolution
//!
//! Looks up the two accounts a transfer references inside the caller-supplied
//! account list. The list is borrowed; resolution hands back references into
//! it and never copies or mutates an account.

use crate::types::{Account, AccountId, Leg, ResolutionError, TransferOperation};

/// The two accounts a transfer touches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedAccounts<'a> {
    pub debit: &'a Account,
    pub credit: &'a Account,
}

/// Resolves transfer legs against an account list
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountResolver;

impl AccountResolver {
    /// Create a new AccountResolver
    pub fn new() -> Self {
        AccountResolver
    }

    /// Find the debit and credit accounts of `operation` in `accounts`
    ///
    /// The first account with a matching identifier wins. Every problem is
    /// collected before returning, so a transfer naming two unknown accounts
    /// reports both.
    ///
    /// # Arguments
    ///
    /// * `operation` - The parsed transfer
    /// * `accounts` - Accounts supplied with the request
    ///
    /// # Errors
    ///
    /// Returns every [`ResolutionError`] found:
    /// - `AccountNotFound` for each leg whose account is absent
    /// - `DuplicateAccount` for each referenced identifier listed more than once
    pub fn resolve<'a>(
        &self,
        operation: &TransferOperation,
        accounts: &'a [Account],
    ) -> Result<ResolvedAccounts<'a>, Vec<ResolutionError>> {
        let mut errors = Vec::new();

        let debit = lookup(&operation.debit_account, Leg::Debit, accounts, &mut errors);
        let credit = if operation.is_self_transfer() {
            // Same identifier: report it once, validation flags the self transfer
            debit
        } else {
            lookup(&operation.credit_account, Leg::Credit, accounts, &mut errors)
        };

        match (debit, credit) {
            (Some(debit), Some(credit)) if errors.is_empty() => {
                Ok(ResolvedAccounts { debit, credit })
            }
            _ => Err(errors),
        }
    }
}

fn lookup<'a>(
    id: &AccountId,
    leg: Leg,
    accounts: &'a [Account],
    errors: &mut Vec<ResolutionError>,
) -> Option<&'a Account> {
    let mut matches = accounts.iter().filter(|account| &account.id == id);
    let first = matches.next();

    match first {
        None => errors.push(ResolutionError::AccountNotFound {
            id: id.clone(),
            leg,
        }),
        Some(_) => {
            let extra = matches.count();
            if extra > 0 {
                errors.push(ResolutionError::DuplicateAccount {
                    id: id.clone(),
                    occurrences: extra + 1,
                });
            }
        }
    }

    first
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Currency, InstructionType};
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn id(raw: &str) -> AccountId {
        raw.parse().unwrap()
    }

    fn account(raw: &str, balance: i64) -> Account {
        Account::new(id(raw), Decimal::new(balance, 0), Currency::NGN)
    }

    fn transfer(debit: &str, credit: &str) -> TransferOperation {
        TransferOperation {
            instruction_type: InstructionType::Debit,
            debit_account: id(debit),
            credit_account: id(credit),
            amount: Decimal::new(10, 0),
            currency: None,
            execute_by: None,
        }
    }

    #[test]
    fn test_resolve_finds_both_accounts() {
        let accounts = vec![account("A", 500), account("C", 0), account("B", 100)];

        let resolved = AccountResolver::new()
            .resolve(&transfer("A", "B"), &accounts)
            .unwrap();

        assert_eq!(resolved.debit, &accounts[0]);
        assert_eq!(resolved.credit, &accounts[2]);
    }

    #[rstest]
    #[case::debit_missing("X", "B", vec![ResolutionError::AccountNotFound { id: id("X"), leg: Leg::Debit }])]
    #[case::credit_missing("A", "Y", vec![ResolutionError::AccountNotFound { id: id("Y"), leg: Leg::Credit }])]
    #[case::both_missing("X", "Y", vec![
        ResolutionError::AccountNotFound { id: id("X"), leg: Leg::Debit },
        ResolutionError::AccountNotFound { id: id("Y"), leg: Leg::Credit },
    ])]
    fn test_resolve_reports_missing_accounts(
        #[case] debit: &str,
        #[case] credit: &str,
        #[case] expected: Vec<ResolutionError>,
    ) {
        let accounts = vec![account("A", 500), account("B", 100)];

        let errors = AccountResolver::new()
            .resolve(&transfer(debit, credit), &accounts)
            .unwrap_err();

        assert_eq!(errors, expected);
    }

    #[test]
    fn test_resolve_flags_duplicate_referenced_account() {
        let accounts = vec![account("A", 500), account("B", 100), account("A", 1)];

        let errors = AccountResolver::new()
            .resolve(&transfer("A", "B"), &accounts)
            .unwrap_err();

        assert_eq!(
            errors,
            vec![ResolutionError::DuplicateAccount {
                id: id("A"),
                occurrences: 2
            }]
        );
    }

    #[test]
    fn test_resolve_ignores_duplicates_of_unreferenced_accounts() {
        let accounts = vec![
            account("A", 500),
            account("Z", 1),
            account("B", 100),
            account("Z", 2),
        ];

        assert!(AccountResolver::new()
            .resolve(&transfer("A", "B"), &accounts)
            .is_ok());
    }

    #[test]
    fn test_resolve_self_transfer_returns_same_account() {
        let accounts = vec![account("A", 500)];

        let resolved = AccountResolver::new()
            .resolve(&transfer("A", "A"), &accounts)
            .unwrap();

        assert!(std::ptr::eq(resolved.debit, resolved.credit));
    }

    #[test]
    fn test_resolve_self_transfer_missing_reports_once() {
        let errors = AccountResolver::new()
            .resolve(&transfer("A", "A"), &[])
            .unwrap_err();

        assert_eq!(errors.len(), 1);
    }
}
