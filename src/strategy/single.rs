//! Single instruction strategy
//!
//! Runs one instruction against an accounts CSV file instead of a JSON Lines
//! request file. The response envelope goes to the output writer; the
//! resulting account states can also be written back out as CSV.

use crate::core::{InstructionProcessor, ResultBuilder};
use crate::io::csv_format::{read_accounts_csv, write_accounts_csv};
use crate::io::json_format::write_envelope;
use crate::strategy::ProcessingStrategy;
use crate::types::{AccountSnapshot, InputError, ProcessingResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Single instruction processing strategy
///
/// The input path of [`ProcessingStrategy::process`] is the accounts CSV
/// (`id,balance,currency`).
#[derive(Debug, Clone)]
pub struct SingleInstructionStrategy {
    processor: Arc<InstructionProcessor>,
    instruction: String,
    accounts_out: Option<PathBuf>,
}

impl SingleInstructionStrategy {
    /// Create a new SingleInstructionStrategy
    ///
    /// # Arguments
    ///
    /// * `processor` - Shared instruction processor
    /// * `instruction` - The instruction to run
    /// * `accounts_out` - Optional CSV path for the resulting account states
    pub fn new(
        processor: Arc<InstructionProcessor>,
        instruction: impl Into<String>,
        accounts_out: Option<PathBuf>,
    ) -> Self {
        Self {
            processor,
            instruction: instruction.into(),
            accounts_out,
        }
    }
}

impl ProcessingStrategy for SingleInstructionStrategy {
    /// Process the instruction against the accounts file
    ///
    /// A rejected instruction still writes its 400 envelope, and the accounts
    /// CSV (if requested) then lists every account unchanged.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), InputError> {
        let accounts = read_accounts_csv(input_path)?;
        info!(accounts = accounts.len(), path = %input_path.display(), "accounts loaded");

        let result = self.processor.process(&accounts, self.instruction.trim());
        write_envelope(&ResultBuilder::envelope(&result), output)?;
        output.flush()?;

        if let Some(path) = &self.accounts_out {
            let snapshots: Vec<AccountSnapshot> = match &result {
                ProcessingResult::Success(summary) => summary.accounts.clone(),
                ProcessingResult::Failure(_) => accounts.iter().map(|a| a.unchanged()).collect(),
            };
            let mut file = BufWriter::new(File::create(path)?);
            write_accounts_csv(&snapshots, &mut file)?;
            file.flush()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseEnvelope;
    use rust_decimal::Decimal;
    use tempfile::{tempdir, NamedTempFile};

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn run(instruction: &str, out: Option<PathBuf>) -> ResponseEnvelope {
        let accounts = create_temp_csv("id,balance,currency\nA,500,NGN\nB,100,NGN\nC,7,NGN\n");
        let strategy = SingleInstructionStrategy::new(
            Arc::new(InstructionProcessor::default()),
            instruction,
            out,
        );
        let mut output = Vec::new();

        strategy.process(accounts.path(), &mut output).unwrap();

        serde_json::from_slice(output.trim_ascii_end()).unwrap()
    }

    #[test]
    fn test_single_strategy_writes_envelope_and_accounts() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("accounts-out.csv");

        let envelope = run("  DEBIT A 200 NGN; CREDIT B 200 NGN  ", Some(out.clone()));

        assert_eq!(envelope.http_status, 200);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            text,
            "id,balance,balance_before,currency\nA,300,500,NGN\nB,300,100,NGN\nC,7,7,NGN\n"
        );
    }

    #[test]
    fn test_single_strategy_rejection_keeps_accounts() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("accounts-out.csv");

        let envelope = run("DEBIT A 900 NGN; CREDIT B 900 NGN", Some(out.clone()));

        assert_eq!(envelope.http_status, 400);
        let text = std::fs::read_to_string(&out).unwrap();
        assert!(text.contains("A,500,500,NGN"));
        assert!(text.contains("B,100,100,NGN"));
    }

    #[test]
    fn test_single_strategy_without_accounts_out() {
        let envelope = run("DEBIT A 1 NGN; CREDIT C 1 NGN", None);

        let summary = envelope.transfer().unwrap();
        assert_eq!(summary.account("C").unwrap().balance, Decimal::new(8, 0));
    }

    #[test]
    fn test_single_strategy_missing_accounts_file() {
        let strategy = SingleInstructionStrategy::new(
            Arc::new(InstructionProcessor::default()),
            "DEBIT A 1; CREDIT B 1",
            None,
        );
        let mut output = Vec::new();

        let result = strategy.process(Path::new("missing.csv"), &mut output);

        assert_eq!(result.unwrap_err(), InputError::file_not_found("missing.csv"));
    }
}
