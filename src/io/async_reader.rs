//! Asynchronous JSON Lines reader with batch interface
//!
//! Reads request lines from any tokio buffered reader and groups them into
//! batches for the async processing strategy. Blank lines are skipped, line
//! numbers are kept.

use crate::io::sync_reader::RequestLine;
use crate::types::InputError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Asynchronous line reader
pub struct AsyncReader<R> {
    lines: Lines<R>,
    line_num: usize,
}

impl<R: AsyncBufRead + Unpin> AsyncReader<R> {
    /// Create a new AsyncReader from a buffered async reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_num: 0,
        }
    }

    /// Read a batch of request lines
    ///
    /// Reads up to `batch_size` non-blank lines.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RequestLine>)` - Next batch; empty once the input is exhausted
    /// * `Err(InputError)` - The underlying reader failed
    pub async fn read_batch(&mut self, batch_size: usize) -> Result<Vec<RequestLine>, InputError> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            let Some(line) = self.lines.next_line().await? else {
                break;
            };
            self.line_num += 1;

            if !line.trim().is_empty() {
                batch.push(RequestLine {
                    number: self.line_num,
                    content: line,
                });
            }
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    fn contents(batch: &[RequestLine]) -> Vec<&str> {
        batch.iter().map(|line| line.content.as_str()).collect()
    }

    #[tokio::test]
    async fn test_async_reader_multiple_batches() {
        let input = "l1\nl2\nl3\nl4\nl5\n";
        let mut reader = AsyncReader::new(BufReader::new(input.as_bytes()));

        assert_eq!(contents(&reader.read_batch(2).await.unwrap()), vec!["l1", "l2"]);
        assert_eq!(contents(&reader.read_batch(2).await.unwrap()), vec!["l3", "l4"]);
        assert_eq!(contents(&reader.read_batch(2).await.unwrap()), vec!["l5"]);
        assert!(reader.read_batch(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_blank_lines() {
        let input = "\nfirst\n  \n\nsecond\n";
        let mut reader = AsyncReader::new(BufReader::new(input.as_bytes()));

        let batch = reader.read_batch(10).await.unwrap();

        assert_eq!(contents(&batch), vec!["first", "second"]);
        assert_eq!(batch[0].number, 2);
        assert_eq!(batch[1].number, 5);
    }

    #[tokio::test]
    async fn test_async_reader_empty_input() {
        let mut reader = AsyncReader::new(BufReader::new("".as_bytes()));
        assert!(reader.read_batch(10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_batch_size_larger_than_input() {
        let mut reader = AsyncReader::new(BufReader::new("only\n".as_bytes()));
        assert_eq!(reader.read_batch(100).await.unwrap().len(), 1);
    }
}
