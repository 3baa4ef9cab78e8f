//! Payment Instructions CLI
//!
//! Command-line interface for processing payment instructions.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- requests.jsonl > responses.jsonl
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 requests.jsonl > responses.jsonl
//! cargo run -- --today 2030-06-15 --pending-policy hold requests.jsonl
//! cargo run -- --accounts accounts.csv --instruction "DEBIT A 200 NGN; CREDIT B 200 NGN" --accounts-out after.csv
//! ```
//!
//! Request files hold one `{"accounts": [...], "instruction": "..."}` object
//! per line; every line gets one `{"http_status": ..., "body": ...}` line on
//! stdout. Diagnostics go to stderr through `tracing`.
//!
//! # Processing Strategies
//!
//! - **sync**: One request at a time (default)
//! - **async**: Batches of requests processed in parallel, output in input order
//!
//! # Exit Codes
//!
//! - 0: Success (rejected requests included)
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use payment_instructions::cli::{self, CliArgs};
use payment_instructions::core::InstructionProcessor;
use payment_instructions::strategy::{self, ProcessingStrategy, SingleInstructionStrategy};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging(args: &CliArgs) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Pick the pipeline and the path it reads from
fn select_strategy(
    args: &CliArgs,
    processor: Arc<InstructionProcessor>,
) -> Option<(Box<dyn ProcessingStrategy>, PathBuf)> {
    if let Some((accounts, instruction)) = args.single_instruction() {
        let single = SingleInstructionStrategy::new(processor, instruction, args.accounts_out.clone());
        return Some((Box::new(single), accounts.to_path_buf()));
    }

    let input = args.input_file.clone()?;
    let config = if args.strategy == cli::StrategyType::Async {
        Some(args.to_batch_config())
    } else {
        None
    };
    Some((strategy::create_strategy(args.strategy, config, processor), input))
}

fn main() {
    let args = cli::parse_args();
    init_logging(&args);

    let config = args.to_processor_config();
    info!(?config, strategy = ?args.strategy, "starting");
    let processor = Arc::new(InstructionProcessor::new(config));

    let Some((strategy, input)) = select_strategy(&args, processor) else {
        eprintln!("Error: an INPUT file or --accounts with --instruction is required");
        process::exit(1);
    };

    // Responses go to stdout
    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&input, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
