//! Instruction parser
//!
//! Turns a raw instruction string into a [`TransferOperation`]. Parsing is a
//! pure function: the same string always yields the same operation or the
//! same error.
//!
//! # Grammar
//!
//! Keywords are case-insensitive and any run of whitespace separates tokens.
//! Two forms are accepted.
//!
//! **Leg form**: one clause per leg, separated by `;` or a newline, in any
//! order, plus an optional date clause:
//!
//! ```text
//! DEBIT  <account> <amount> [<currency>]
//! CREDIT <account> <amount> [<currency>]
//! ON <YYYY-MM-DD>
//! ```
//!
//! **Sentence form**: one sentence written from either side. Without a `;`
//! it may wrap across lines:
//!
//! ```text
//! DEBIT <amount> <currency> FROM ACCOUNT <id> FOR CREDIT TO ACCOUNT <id> [ON <YYYY-MM-DD>]
//! CREDIT <amount> <currency> TO ACCOUNT <id> FOR DEBIT FROM ACCOUNT <id> [ON <YYYY-MM-DD>]
//! ```

use crate::types::{AccountId, Currency, InstructionType, ParseError, TransferOperation};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

const SENTENCE_FORMS: &str = "expected 'DEBIT <amount> <currency> FROM ACCOUNT <id> FOR CREDIT TO ACCOUNT <id> [ON <date>]' \
     or 'CREDIT <amount> <currency> TO ACCOUNT <id> FOR DEBIT FROM ACCOUNT <id> [ON <date>]'";

/// One side of a leg-form instruction
#[derive(Debug, Clone, PartialEq)]
struct LegClause {
    account: AccountId,
    amount: Decimal,
    currency: Option<Currency>,
}

/// Stateless instruction parser
#[derive(Debug, Clone, Copy, Default)]
pub struct InstructionParser;

impl InstructionParser {
    /// Create a new InstructionParser
    pub fn new() -> Self {
        InstructionParser
    }

    /// Parse an instruction into a transfer operation
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if:
    /// - The instruction is empty or follows neither grammar
    /// - A DEBIT or CREDIT clause is missing or repeated
    /// - An amount is not a plain non-negative number
    /// - An account identifier contains disallowed characters
    /// - The legs disagree on amount or currency
    /// - The settlement date is not a valid `YYYY-MM-DD` date
    pub fn parse(&self, instruction: &str) -> Result<TransferOperation, ParseError> {
        let trimmed = instruction.trim();
        if trimmed.is_empty() {
            return Err(ParseError::Empty);
        }

        // A sentence may wrap across lines; only `;` always separates clauses
        if !trimmed.contains(';') {
            let tokens: Vec<&str> = trimmed.split_whitespace().collect();
            if is_sentence(&tokens) {
                return parse_sentence(&tokens);
            }
        }

        let clauses: Vec<Vec<&str>> = trimmed
            .split([';', '\n', '\r'])
            .map(|clause| clause.split_whitespace().collect::<Vec<_>>())
            .filter(|tokens| !tokens.is_empty())
            .collect();

        match clauses.as_slice() {
            [tokens] if is_sentence(tokens) => parse_sentence(tokens),
            _ => parse_legs(&clauses),
        }
    }
}

fn keyword(token: &str, expected: &str) -> bool {
    token.eq_ignore_ascii_case(expected)
}

/// A sentence always links its two halves with `FOR DEBIT` or `FOR CREDIT`
fn is_sentence(tokens: &[&str]) -> bool {
    tokens.windows(2).any(|pair| {
        keyword(pair[0], "FOR") && (keyword(pair[1], "DEBIT") || keyword(pair[1], "CREDIT"))
    })
}

fn parse_sentence(tokens: &[&str]) -> Result<TransferOperation, ParseError> {
    let (instruction_type, amount, currency, debit, credit, rest) = match tokens {
        [kw, amount, currency, from, account, debit, r#for, other, to, account2, credit, rest @ ..]
            if keyword(kw, "DEBIT")
                && keyword(from, "FROM")
                && keyword(account, "ACCOUNT")
                && keyword(r#for, "FOR")
                && keyword(other, "CREDIT")
                && keyword(to, "TO")
                && keyword(account2, "ACCOUNT") =>
        {
            (InstructionType::Debit, amount, currency, debit, credit, rest)
        }
        [kw, amount, currency, to, account, credit, r#for, other, from, account2, debit, rest @ ..]
            if keyword(kw, "CREDIT")
                && keyword(to, "TO")
                && keyword(account, "ACCOUNT")
                && keyword(r#for, "FOR")
                && keyword(other, "DEBIT")
                && keyword(from, "FROM")
                && keyword(account2, "ACCOUNT") =>
        {
            (InstructionType::Credit, amount, currency, debit, credit, rest)
        }
        _ => return Err(ParseError::malformed(SENTENCE_FORMS)),
    };

    let amount = parse_amount(amount)?;
    let currency = parse_currency(currency)?;
    let debit_account = parse_account(debit)?;
    let credit_account = parse_account(credit)?;
    let execute_by = match rest {
        [] => None,
        [on, date] if keyword(on, "ON") => Some(parse_date(date)?),
        _ => return Err(ParseError::malformed(SENTENCE_FORMS)),
    };

    Ok(TransferOperation {
        instruction_type,
        debit_account,
        credit_account,
        amount,
        currency: Some(currency),
        execute_by,
    })
}

fn parse_legs(clauses: &[Vec<&str>]) -> Result<TransferOperation, ParseError> {
    let mut first = None;
    let mut debit = None;
    let mut credit = None;
    let mut execute_by = None;

    for tokens in clauses {
        let head = tokens[0];
        if keyword(head, "DEBIT") {
            if debit.is_some() {
                return Err(ParseError::DuplicateKeyword { keyword: "DEBIT" });
            }
            debit = Some(parse_leg("DEBIT", tokens)?);
            first.get_or_insert(InstructionType::Debit);
        } else if keyword(head, "CREDIT") {
            if credit.is_some() {
                return Err(ParseError::DuplicateKeyword { keyword: "CREDIT" });
            }
            credit = Some(parse_leg("CREDIT", tokens)?);
            first.get_or_insert(InstructionType::Credit);
        } else if keyword(head, "ON") {
            if execute_by.is_some() {
                return Err(ParseError::DuplicateKeyword { keyword: "ON" });
            }
            execute_by = match tokens.as_slice() {
                [_, date] => Some(parse_date(date)?),
                _ => return Err(ParseError::malformed("expected 'ON <YYYY-MM-DD>'")),
            };
        } else {
            return Err(ParseError::malformed(format!(
                "unexpected clause starting with '{}'",
                head
            )));
        }
    }

    let debit: LegClause = debit.ok_or(ParseError::MissingKeyword { keyword: "DEBIT" })?;
    let credit: LegClause = credit.ok_or(ParseError::MissingKeyword { keyword: "CREDIT" })?;

    if debit.amount != credit.amount {
        return Err(ParseError::AmountMismatch {
            debit: debit.amount,
            credit: credit.amount,
        });
    }

    let currency = match (debit.currency, credit.currency) {
        (Some(d), Some(c)) if d != c => {
            return Err(ParseError::CurrencyMismatch {
                debit: d,
                credit: c,
            })
        }
        (d, c) => d.or(c),
    };

    Ok(TransferOperation {
        instruction_type: first.unwrap_or(InstructionType::Debit),
        debit_account: debit.account,
        credit_account: credit.account,
        amount: debit.amount,
        currency,
        execute_by,
    })
}

fn parse_leg(keyword: &str, tokens: &[&str]) -> Result<LegClause, ParseError> {
    match tokens {
        [_, account, amount] => Ok(LegClause {
            account: parse_account(account)?,
            amount: parse_amount(amount)?,
            currency: None,
        }),
        [_, account, amount, currency] => Ok(LegClause {
            account: parse_account(account)?,
            amount: parse_amount(amount)?,
            currency: Some(parse_currency(currency)?),
        }),
        _ => Err(ParseError::malformed(format!(
            "expected '{} <account> <amount> [currency]'",
            keyword
        ))),
    }
}

/// Plain decimal: digits, optionally one `.` followed by digits. No sign, no exponent.
fn parse_amount(token: &str) -> Result<Decimal, ParseError> {
    let invalid = || ParseError::InvalidAmount {
        token: token.to_string(),
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    let (whole, fraction) = match token.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (token, None),
    };
    if !digits(whole) || fraction.is_some_and(|f| !digits(f)) {
        return Err(invalid());
    }

    Decimal::from_str(token).map_err(|_| invalid())
}

fn parse_currency(token: &str) -> Result<Currency, ParseError> {
    token
        .to_ascii_uppercase()
        .parse()
        .map_err(|_| ParseError::InvalidCurrency {
            token: token.to_string(),
        })
}

fn parse_account(token: &str) -> Result<AccountId, ParseError> {
    token
        .parse()
        .map_err(|_| ParseError::InvalidAccountId {
            token: token.to_string(),
        })
}

fn parse_date(token: &str) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate {
        token: token.to_string(),
    };
    if token.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(token, "%Y-%m-%d").map_err(|_| invalid())
}
