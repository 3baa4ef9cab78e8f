//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. Requests are read in batches and batches are
//! processed in parallel on the blocking thread pool of a tokio runtime.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch line reading)
//!     ├── spawn_blocking per batch (InstructionProcessor::process)
//!     └── buffered stream (responses written in input order)
//! ```
//!
//! # Ordering
//!
//! Every request is independent, so batches need no coordination. Results
//! are still written in input order, which makes the output identical to the
//! synchronous strategy.

use crate::core::InstructionProcessor;
use crate::io::async_reader::AsyncReader;
use crate::io::json_format::write_envelope;
use crate::io::sync_reader::RequestLine;
use crate::strategy::{respond, ProcessingStrategy};
use crate::types::{InputError, ResponseEnvelope};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, warn};

/// Configuration for batch processing
///
/// Controls how requests are batched and how many batches are processed
/// at the same time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of requests per batch
    pub batch_size: usize,
    /// Maximum number of batches processing concurrently
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                max_concurrent_batches,
                default = default.max_concurrent_batches,
                "invalid max_concurrent_batches, using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// # Configuration
///
/// The strategy accepts a BatchConfig with:
/// - `batch_size`: Number of requests per batch (default: 1000)
/// - `max_concurrent_batches`: Batches in flight and worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    /// Batch processing configuration
    config: BatchConfig,
    processor: Arc<InstructionProcessor>,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - BatchConfig with batch_size and max_concurrent_batches
    /// * `processor` - Shared instruction processor
    pub fn new(config: BatchConfig, processor: Arc<InstructionProcessor>) -> Self {
        Self { config, processor }
    }

    /// Configured batch settings
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }
}

fn process_batch(
    processor: &InstructionProcessor,
    batch: Vec<RequestLine>,
) -> Vec<ResponseEnvelope> {
    batch
        .iter()
        .map(|line| respond(processor, &line.content))
        .collect()
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process requests from input file and write one response per line
    ///
    /// 1. Creates a tokio multi-threaded runtime
    /// 2. Reads requests in batches using AsyncReader
    /// 3. Hands each batch to the blocking pool, at most
    ///    `max_concurrent_batches` at a time
    /// 4. Writes the responses batch by batch in input order
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, I/O errors, runtime errors) are returned
    /// immediately. Malformed or rejected requests produce 400 envelopes.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), InputError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .max_blocking_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| InputError::runtime(format!("failed to create tokio runtime: {}", e)))?;

        runtime.block_on(async {
            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|_| InputError::file_not_found(input_path.display().to_string()))?;
            let reader = AsyncReader::new(BufReader::new(file));
            let batch_size = self.config.batch_size;

            let batches = stream::try_unfold(reader, move |mut reader| async move {
                let batch = reader.read_batch(batch_size).await?;
                Ok::<_, InputError>((!batch.is_empty()).then_some((batch, reader)))
            });

            let responses = batches
                .map_ok(|batch| {
                    let processor = Arc::clone(&self.processor);
                    debug!(size = batch.len(), "dispatching batch");
                    tokio::task::spawn_blocking(move || process_batch(&processor, batch))
                })
                .map(|handle| async move {
                    match handle {
                        Ok(handle) => handle.await.map_err(InputError::runtime),
                        Err(e) => Err(e),
                    }
                })
                .buffered(self.config.max_concurrent_batches);
            let mut responses = std::pin::pin!(responses);

            while let Some(envelopes) = responses.try_next().await? {
                for envelope in &envelopes {
                    write_envelope(envelope, output)?;
                }
            }

            output.flush()?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SyncProcessingStrategy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary JSONL file for testing
    fn create_temp_jsonl(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn request(debit_balance: u32, amount: u32) -> String {
        format!(
            r#"{{"accounts":[{{"id":"A","balance":{},"currency":"NGN"}},{{"id":"B","balance":0,"currency":"NGN"}}],"instruction":"DEBIT A {} NGN; CREDIT B {} NGN"}}"#,
            debit_balance, amount, amount
        )
    }

    fn processor() -> Arc<InstructionProcessor> {
        Arc::new(InstructionProcessor::default())
    }

    #[test]
    fn test_async_strategy_processes_valid_request() {
        let file = create_temp_jsonl(&request(500, 200));
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default(), processor());
        let mut output = Vec::new();

        strategy.process(file.path(), &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("\"http_status\":200"));
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default(), processor());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.jsonl"), &mut output);

        assert_eq!(
            result.unwrap_err(),
            InputError::file_not_found("nonexistent.jsonl")
        );
    }

    #[test]
    fn test_async_strategy_matches_sync_output_across_batches() {
        // Alternate accepted and rejected requests over several small batches
        let content: Vec<String> = (1..=25)
            .map(|i| if i % 3 == 0 { request(10, 50) } else { request(100 + i, i) })
            .collect();
        let file = create_temp_jsonl(&content.join("\n"));

        let mut async_output = Vec::new();
        AsyncProcessingStrategy::new(BatchConfig::new(4, 3), processor())
            .process(file.path(), &mut async_output)
            .unwrap();

        let mut sync_output = Vec::new();
        SyncProcessingStrategy::new(processor())
            .process(file.path(), &mut sync_output)
            .unwrap();

        assert_eq!(async_output, sync_output);
        assert_eq!(String::from_utf8(async_output).unwrap().lines().count(), 25);
    }

    #[test]
    fn test_batch_config_zero_values_fall_back_to_defaults() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn test_batch_config_keeps_valid_values() {
        let config = BatchConfig::new(10, 2);
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_concurrent_batches, 2);
    }
}
