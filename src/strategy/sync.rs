//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates request processing by coordinating
//! between the SyncReader (JSON Lines input) and the InstructionProcessor.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Line reading to `SyncReader` (iterator interface)
//! - Request decoding and processing to `strategy::respond`
//! - Output to `json_format::write_envelope`
//!
//! Requests are answered one at a time, so memory usage does not grow with
//! the size of the input file.

use crate::core::InstructionProcessor;
use crate::io::json_format::write_envelope;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{respond, ProcessingStrategy};
use crate::types::InputError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use payment_instructions::core::InstructionProcessor;
/// use payment_instructions::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::sync::Arc;
///
/// let strategy = SyncProcessingStrategy::new(Arc::new(InstructionProcessor::default()));
/// let mut output = std::io::stdout();
///
/// strategy
///     .process(Path::new("requests.jsonl"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    processor: Arc<InstructionProcessor>,
}

impl SyncProcessingStrategy {
    /// Create a new SyncProcessingStrategy around a shared processor
    pub fn new(processor: Arc<InstructionProcessor>) -> Self {
        Self { processor }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process requests from input file and write one response per line
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, I/O errors) are returned immediately.
    /// Malformed or rejected requests produce 400 envelopes and processing
    /// continues.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), InputError> {
        let reader = SyncReader::new(input_path)?;

        for line in reader {
            let line = line?;
            debug!(line = line.number, "processing request");

            let envelope = respond(&self.processor, &line.content);
            write_envelope(&envelope, output)?;
        }

        output.flush()?;
        Ok(())
    }
}
