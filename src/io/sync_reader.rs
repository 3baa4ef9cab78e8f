//! Synchronous JSON Lines reader with iterator interface
//!
//! Provides a streaming iterator over request lines from a file. Each
//! non-blank line holds one JSON request; decoding is left to the
//! json_format module so a bad line never stops the stream.
//!
//! ```no_run
//! use payment_instructions::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("requests.jsonl")).unwrap();
//! for line in reader {
//!     match line {
//!         Ok(line) => println!("line {}: {}", line.number, line.content),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! Memory usage stays O(longest line): lines are read one at a time.

use crate::types::InputError;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// One request line of the input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// 1-based line number in the file
    pub number: usize,

    /// Raw line content, without the line terminator
    pub content: String,
}

/// Synchronous line reader
#[derive(Debug)]
pub struct SyncReader {
    lines: Lines<BufReader<File>>,
    line_num: usize,
}

impl SyncReader {
    /// Create a new SyncReader from a file path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON Lines file
    ///
    /// # Returns
    ///
    /// * `Ok(SyncReader)` if file opened successfully
    /// * `Err(InputError::FileNotFound)` if file could not be opened
    pub fn new(path: &Path) -> Result<Self, InputError> {
        let file =
            File::open(path).map_err(|_| InputError::file_not_found(path.display().to_string()))?;

        Ok(Self {
            lines: BufReader::with_capacity(8 * 1024, file).lines(),
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<RequestLine, InputError>;

    /// Get the next non-blank line
    ///
    /// # Returns
    ///
    /// * `Some(Ok(RequestLine))` - Next request line
    /// * `Some(Err(InputError))` - The file could not be read
    /// * `None` - End of file reached
    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_num += 1;

            if !line.trim().is_empty() {
                return Some(Ok(RequestLine {
                    number: self.line_num,
                    content: line,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    #[test]
    fn test_sync_reader_new_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.jsonl"));
        assert_eq!(
            result.unwrap_err(),
            InputError::file_not_found("nonexistent.jsonl")
        );
    }

    #[test]
    fn test_sync_reader_skips_blank_lines_and_keeps_numbers() {
        let file = create_temp_jsonl("{\"a\":1}\n\n   \n{\"b\":2}\n");

        let lines: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            lines,
            vec![
                RequestLine {
                    number: 1,
                    content: "{\"a\":1}".to_string()
                },
                RequestLine {
                    number: 4,
                    content: "{\"b\":2}".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_sync_reader_handles_missing_trailing_newline() {
        let file = create_temp_jsonl("first\nsecond");

        let lines: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|line| line.content)
            .collect();

        assert_eq!(lines, vec!["first", "second"]);
    }

    #[test]
    fn test_sync_reader_handles_empty_file() {
        let file = create_temp_jsonl("");
        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_sync_reader_strips_crlf() {
        let file = create_temp_jsonl("one\r\ntwo\r\n");

        let lines: Vec<_> = SyncReader::new(file.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|line| line.content)
            .collect();

        assert_eq!(lines, vec!["one", "two"]);
    }
}
