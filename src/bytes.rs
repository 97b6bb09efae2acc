//! Counting single bytes.

use std::io::{self, ErrorKind, Read};

use tracing::debug;

use crate::count_tree::CountTree;
use crate::error::ScanError;
use crate::projector::NgramCounts;
use crate::window::Extractor;

const BUFFER_SIZE: usize = 64 * 1024;

/// Counts every byte of `reader`. Keys are rendered as two uppercase hex
/// digits.
///
/// # Errors
///
/// [`ScanError::Read`] with the first read error other than
/// [`ErrorKind::Interrupted`], which is retried.
///
/// # Examples
///
/// ```
/// let counts = ngram_counter::count_bytes(&b"\x00aa"[..]).unwrap();
/// assert_eq!(counts.total(), 3);
/// assert_eq!(counts.get("61"), Some(2));
/// assert_eq!(counts.get("00"), Some(1));
/// ```
pub fn count_bytes<R: Read>(mut reader: R) -> Result<NgramCounts, ScanError<io::Error>> {
    let mut extractor = Extractor::byte_counter();
    let mut tree = CountTree::with_capacity(256, 1);
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(ScanError::Read(err)),
        };

        for &byte in &buffer[..read] {
            extractor.push(byte, &mut tree);
        }
    }

    let windows = extractor.finish::<io::Error>()?;
    debug!(bytes = windows, distinct = tree.len(), "byte count finished");
    Ok(NgramCounts::from_tree(&tree))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    /// Hands out its data a few bytes at a time, interrupting every other
    /// call, then fails if asked to.
    struct Flaky {
        data: Vec<u8>,
        position: usize,
        calls: usize,
        fail_at_end: bool,
    }

    impl Read for Flaky {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.calls += 1;
            if self.calls % 2 == 0 {
                return Err(ErrorKind::Interrupted.into());
            }
            if self.position == self.data.len() {
                if self.fail_at_end {
                    return Err(io::Error::other("device gone"));
                }
                return Ok(0);
            }
            let n = buf.len().min(3).min(self.data.len() - self.position);
            buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
            self.position += n;
            Ok(n)
        }
    }

    #[test]
    fn empty_input_counts_nothing() {
        let counts = count_bytes(io::empty()).unwrap();
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn interrupted_reads_are_retried() {
        let reader = Flaky {
            data: b"hello world".to_vec(),
            position: 0,
            calls: 0,
            fail_at_end: false,
        };
        let counts = count_bytes(reader).unwrap();
        assert_eq!(counts.total(), 11);
        assert_eq!(counts.get("6C"), Some(3));
        assert_eq!(counts.get("20"), Some(1));
    }

    #[test]
    fn read_errors_propagate() {
        let reader = Flaky {
            data: vec![1, 2, 3],
            position: 0,
            calls: 0,
            fail_at_end: true,
        };
        match count_bytes(reader) {
            Err(ScanError::Read(err)) => assert_eq!(err.to_string(), "device gone"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn all_byte_values_fit() {
        let data: Vec<u8> = (0..=255).chain(0..=255).collect();
        let counts = count_bytes(data.as_slice()).unwrap();
        assert_eq!(counts.len(), 256);
        assert_eq!(counts.total(), 512);
        assert!(counts.counts().values().all(|&count| count == 2));
    }
}
