//! Decoding text input into characters.

use std::io::{self, BufRead};
use std::iter::FusedIterator;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reads `reader` as UTF-8, one line at a time, and yields its characters.
///
/// Line terminators are yielded like any other character. A byte order mark
/// at the very start is skipped. After the first error the iterator is done.
///
/// # Examples
///
/// ```
/// use ngram_counter::utf8_chars;
///
/// let chars: Vec<char> = utf8_chars("\u{feff}ab\nc".as_bytes())
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(chars, ['a', 'b', '\n', 'c']);
///
/// let mut broken = utf8_chars(&b"ok\xff"[..]);
/// assert!(broken.next().unwrap().is_err());
/// assert!(broken.next().is_none());
/// ```
pub fn utf8_chars<R: BufRead>(reader: R) -> Utf8Chars<R> {
    Utf8Chars {
        reader,
        line: String::new(),
        position: 0,
        at_start: true,
        done: false,
    }
}

/// Iterator returned by [`utf8_chars`].
#[derive(Debug)]
pub struct Utf8Chars<R> {
    reader: R,
    line: String,
    // Byte offset of the next character in `line`.
    position: usize,
    at_start: bool,
    done: bool,
}

impl<R: BufRead> Utf8Chars<R> {
    fn refill(&mut self) -> io::Result<bool> {
        self.line.clear();
        self.position = 0;
        loop {
            match self.reader.read_line(&mut self.line) {
                Ok(0) => return Ok(false),
                Ok(_) => break,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }

        if self.at_start {
            self.at_start = false;
            if self.line.starts_with(BYTE_ORDER_MARK) {
                self.position = BYTE_ORDER_MARK.len_utf8();
            }
        }
        Ok(true)
    }
}

impl<R: BufRead> Iterator for Utf8Chars<R> {
    type Item = io::Result<char>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            if let Some(symbol) = self.line[self.position..].chars().next() {
                self.position += symbol.len_utf8();
                return Some(Ok(symbol));
            }

            match self.refill() {
                Ok(true) => {}
                Ok(false) => self.done = true,
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Utf8Chars<R> {}
