//! I/O module
//!
//! Handles request decoding, account CSV files and response output.
//!
//! # Components
//!
//! - `json_format` - JSON request/response handling and field validation
//! - `csv_format` - Account snapshot CSV input and output
//! - `sync_reader` - Synchronous JSON Lines reader with iterator interface
//! - `async_reader` - Asynchronous JSON Lines reader with batch reading interface

pub mod async_reader;
pub mod csv_format;
pub mod json_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use csv_format::{parse_accounts_csv, read_accounts_csv, write_accounts_csv};
pub use json_format::{
    parse_request_line, validate_request, write_envelope, AccountInput, PaymentRequest,
    ValidRequest,
};
pub use sync_reader::{RequestLine, SyncReader};
