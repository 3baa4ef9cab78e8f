//! Processing strategy module for payment instruction processing
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! from reading input through the instruction processor to writing responses.
//! Different implementations (synchronous, asynchronous batch, single
//! instruction) are selected at runtime.

use crate::cli::StrategyType;
use crate::core::{InstructionProcessor, ResultBuilder};
use crate::io::json_format::{parse_request_line, validate_request};
use crate::types::{InputError, ResponseEnvelope};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

pub mod r#async;
pub mod single;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use single::SingleInstructionStrategy;
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete processing pipelines
///
/// Each strategy reads its input from a file, runs every request through the
/// instruction processor, and writes the results to the output writer.
pub trait ProcessingStrategy: Send + Sync {
    /// Process the input file and write results to output
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input file
    /// * `output` - Mutable reference to a writer for outputting results
    ///
    /// # Returns
    ///
    /// * `Ok(())` if all processing completed (rejected requests included)
    /// * `Err(InputError)` if a fatal error occurred
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - A fatal I/O error occurs during reading or writing
    /// - The async runtime cannot be started
    ///
    /// A request that is malformed or rejected is not an error: it produces a
    /// 400 envelope and processing continues with the next one.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), InputError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch processing (ignored for sync)
/// * `processor` - Shared instruction processor
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    processor: Arc<InstructionProcessor>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(processor)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, processor))
        }
    }
}

/// Answer one raw request line
///
/// Decoding and field validation failures become 400 envelopes before the
/// processor runs; everything else is the processor's result.
pub fn respond(processor: &InstructionProcessor, line: &str) -> ResponseEnvelope {
    match parse_request_line(line).and_then(validate_request) {
        Ok(request) => {
            let result = processor.process(&request.accounts, &request.instruction);
            ResultBuilder::envelope(&result)
        }
        Err(errors) => {
            warn!(errors = errors.len(), "request rejected before processing");
            ResultBuilder::rejection(errors)
        }
    }
}
