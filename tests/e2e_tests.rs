//! End-to-end integration tests
//!
//! These tests validate the complete request processing pipeline using
//! JSON Lines fixtures. Each test:
//! 1. Reads input.jsonl from a fixture directory
//! 2. Processes every request through the selected strategy
//! 3. Compares each response line with the matching line of expected.jsonl
//!
//! Expected lines list only the fields a scenario is about: every key present
//! in the expected object must be present and equal in the response, arrays
//! must have the same length, and numbers compare by value (`300` == `300.0`).
//!
//! Fixtures are located in tests/fixtures/ and cover:
//! - Happy path transfers in both grammars
//! - Business rule rejections (funds, currency, self transfer, lookup)
//! - Grammar errors and malformed request bodies
//! - Future-dated transfers
//!
//! Each test is run twice: once with the synchronous strategy and once with
//! the async batch strategy.

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use payment_instructions::cli::StrategyType;
    use payment_instructions::core::{InstructionProcessor, PendingPolicy, ProcessorConfig};
    use payment_instructions::strategy::{create_strategy, BatchConfig};
    use rstest::rstest;
    use serde_json::Value;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    fn processor() -> Arc<InstructionProcessor> {
        let config = ProcessorConfig {
            today: NaiveDate::from_ymd_opt(2030, 6, 15),
            pending_policy: PendingPolicy::ReserveDebit,
            ..ProcessorConfig::default()
        };
        Arc::new(InstructionProcessor::new(config))
    }

    /// Check that every field in `expected` appears with the same value in `actual`
    fn assert_subset(expected: &Value, actual: &Value, path: &str) {
        match (expected, actual) {
            (Value::Object(expected), Value::Object(actual)) => {
                for (key, value) in expected {
                    let child = format!("{}.{}", path, key);
                    let actual = actual
                        .get(key)
                        .unwrap_or_else(|| panic!("missing field {} in response", child));
                    assert_subset(value, actual, &child);
                }
            }
            (Value::Array(expected), Value::Array(actual)) => {
                assert_eq!(
                    expected.len(),
                    actual.len(),
                    "length mismatch at {}: expected {:?}, got {:?}",
                    path,
                    expected,
                    actual
                );
                for (index, (e, a)) in expected.iter().zip(actual).enumerate() {
                    assert_subset(e, a, &format!("{}[{}]", path, index));
                }
            }
            (Value::Number(expected), Value::Number(actual)) => {
                assert_eq!(expected.as_f64(), actual.as_f64(), "number mismatch at {}", path);
            }
            _ => assert_eq!(expected, actual, "value mismatch at {}", path),
        }
    }

    /// Run a test fixture by processing input.jsonl and comparing with expected.jsonl
    ///
    /// # Arguments
    ///
    /// * `fixture_name` - Name of the fixture directory (e.g., "happy_path")
    /// * `strategy_type` - Processing strategy to use (Sync or Async)
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read or a response does not match.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.jsonl", fixture_dir);
        let expected_path = format!("{}/expected.jsonl", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        // Small batches so the async strategy spans several of them
        let config = match strategy_type {
            StrategyType::Async => Some(BatchConfig::new(2, 2)),
            StrategyType::Sync => None,
        };
        let strategy = create_strategy(strategy_type, config, processor());
        let mut output = Vec::new();
        strategy
            .process(Path::new(&input_path), &mut output)
            .expect("Failed to process fixture");

        let actual = String::from_utf8(output).expect("Output is not UTF-8");
        let expected = fs::read_to_string(&expected_path).expect("Failed to read expected output");

        let actual: Vec<Value> = actual
            .lines()
            .map(|line| serde_json::from_str(line).expect("Response line is not JSON"))
            .collect();
        let expected: Vec<Value> = expected
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("Expected line is not JSON"))
            .collect();

        assert_eq!(
            actual.len(),
            expected.len(),
            "Fixture '{}' ({:?}): response count mismatch",
            fixture_name,
            strategy_type
        );
        for (index, (e, a)) in expected.iter().zip(&actual).enumerate() {
            assert_subset(e, a, &format!("{}[{}]", fixture_name, index));
        }
    }

    #[rstest]
    #[case::happy_path("happy_path")]
    #[case::insufficient_funds("insufficient_funds")]
    #[case::currency_mismatch("currency_mismatch")]
    #[case::self_transfer("self_transfer")]
    #[case::malformed("malformed")]
    #[case::pending("pending")]
    #[case::account_not_found("account_not_found")]
    #[case::invalid_request("invalid_request")]
    #[case::sentence_grammar("sentence_grammar")]
    fn test_fixture(
        #[case] fixture_name: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy_type: StrategyType,
    ) {
        run_test_fixture(fixture_name, strategy_type);
    }

    #[test]
    fn test_missing_input_file_is_fatal() {
        let strategy = create_strategy(StrategyType::Sync, None, processor());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("tests/fixtures/does_not_exist.jsonl"), &mut output);

        assert!(result.is_err());
        assert!(output.is_empty());
    }
}
