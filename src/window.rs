//! Sliding-window extraction of n-grams.
//!
//! An [`Extractor`] takes symbols one at a time, skips the ones its filter
//! rejects, and every time it holds a full window hands that window to a
//! [`CountTree`]. What happens next depends on the [`WindowMode`]:
//!
//! - `Overlapping` drops the oldest symbol and keeps the rest, so `abcde` with
//!   a window of three yields `abc`, `bcd` and `cde`. A partial window at the
//!   end of the input is simply never counted.
//! - `Sequential` starts a new, empty window, so the same input yields `abc`
//!   and leaves `de` behind, which is an error: the input did not divide into
//!   whole windows.

use core::convert::Infallible;
use core::num::NonZeroU8;

use tracing::debug;

use crate::config::{ExtractorConfig, WindowMode};
use crate::count_tree::CountTree;
use crate::error::{ConfigError, ScanError};
use crate::projector::NgramCounts;
use crate::symbol::Symbol;

mod collector;
mod filter;

use collector::Collector;
pub use filter::{Accept, AcceptAll, CharFilter};

/// Cuts a symbol stream into fixed-size windows and counts them.
///
/// The extractor only holds the window being filled; counts go to the
/// [`CountTree`] passed to [`push`](Extractor::push) or
/// [`scan_into`](Extractor::scan_into). Use one extractor per input.
///
/// # Examples
///
/// ```
/// use ngram_counter::{Extractor, ExtractorConfig, WindowMode};
///
/// let config = ExtractorConfig::new(3, WindowMode::Overlapping).unwrap();
/// let mut extractor = Extractor::new(&config).unwrap();
///
/// let counts = extractor.scan_str("abcabc").unwrap();
/// assert_eq!(counts.total(), 4);
/// assert_eq!(counts.get("abc"), Some(2));
/// assert_eq!(counts.get("bca"), Some(1));
/// ```
#[derive(Debug, Clone)]
pub struct Extractor<T = char, F = CharFilter> {
    collector: Collector<T>,
    mode: WindowMode,
    filter: F,
    windows: u64,
}

impl Extractor<char, CharFilter> {
    /// Creates a character extractor from `config`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroWindowSize`] if the configured window size is 0,
    /// which can only happen for a deserialized config.
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        let window_size = NonZeroU8::new(config.window_size()).ok_or(ConfigError::ZeroWindowSize)?;
        Ok(Self::with_filter(window_size, config.mode(), config.char_filter()))
    }

    /// Scans a string slice.
    ///
    /// # Errors
    ///
    /// [`ScanError::IncompleteWindow`] if the text ends in the middle of a
    /// sequential window.
    pub fn scan_str(&mut self, text: &str) -> Result<NgramCounts, ScanError<Infallible>> {
        self.scan(text.chars().map(Ok))
    }
}

impl Extractor<u8, AcceptAll> {
    /// One-byte windows over every byte.
    #[must_use]
    pub fn byte_counter() -> Self {
        Self::with_filter(NonZeroU8::MIN, WindowMode::Overlapping, AcceptAll)
    }
}

impl<T: Symbol, F: Accept<T>> Extractor<T, F> {
    /// Creates an extractor over any symbol type.
    #[must_use]
    pub fn with_filter(window_size: NonZeroU8, mode: WindowMode, filter: F) -> Self {
        Self {
            collector: Collector::new(usize::from(window_size.get())),
            mode,
            filter,
            windows: 0,
        }
    }

    #[must_use]
    pub fn window_size(&self) -> usize {
        self.collector.capacity()
    }

    #[must_use]
    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    /// Symbols collected toward the next window.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.collector.len()
    }

    /// Windows emitted since the last [`finish`](Extractor::finish).
    #[must_use]
    pub fn windows(&self) -> u64 {
        self.windows
    }

    /// Feeds one symbol. Returns `true` if it completed a window, which was
    /// then added to `tree`.
    ///
    /// Stopping early is fine: `tree` is valid after every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use core::num::NonZeroU8;
    /// use ngram_counter::window::AcceptAll;
    /// use ngram_counter::{CountTree, Extractor, WindowMode};
    ///
    /// let size = NonZeroU8::new(2).unwrap();
    /// let mut extractor = Extractor::with_filter(size, WindowMode::Sequential, AcceptAll);
    /// let mut tree = CountTree::new();
    ///
    /// assert!(!extractor.push(1u8, &mut tree));
    /// assert!(extractor.push(2u8, &mut tree));
    /// assert_eq!(tree.get(&[1, 2]), Some(1));
    /// ```
    pub fn push(&mut self, symbol: T, tree: &mut CountTree<T>) -> bool {
        if !self.filter.accepts(symbol) || !self.collector.push(symbol) {
            return false;
        }

        tree.add(self.collector.window());
        self.windows += 1;

        match self.mode {
            WindowMode::Sequential => self.collector.reset(),
            WindowMode::Overlapping => self.collector.drop_oldest(),
        }

        true
    }

    /// Ends the input. Returns the number of windows emitted and readies the
    /// extractor for the next input.
    ///
    /// # Errors
    ///
    /// [`ScanError::IncompleteWindow`] in sequential mode if symbols are left
    /// over. The extractor is reset either way.
    pub fn finish<E>(&mut self) -> Result<u64, ScanError<E>> {
        let leftover = self.collector.len();
        let windows = self.windows;
        self.reset();

        if self.mode == WindowMode::Sequential && leftover != 0 {
            debug!(leftover, window_size = self.window_size(), "input ends inside a window");
            return Err(ScanError::IncompleteWindow {
                window_size: self.window_size(),
                leftover,
            });
        }

        Ok(windows)
    }

    /// Discards the partial window and the window count.
    pub fn reset(&mut self) {
        self.collector.reset();
        self.windows = 0;
    }

    /// Feeds a whole stream into `tree` and finishes it. Returns the number
    /// of windows counted.
    ///
    /// # Errors
    ///
    /// [`ScanError::Read`] with the stream's own error as soon as the stream
    /// yields one, or [`ScanError::IncompleteWindow`] as for
    /// [`finish`](Extractor::finish).
    pub fn scan_into<I, E>(&mut self, input: I, tree: &mut CountTree<T>) -> Result<u64, ScanError<E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        for symbol in input {
            match symbol {
                Ok(symbol) => {
                    self.push(symbol, tree);
                }
                Err(source) => {
                    self.reset();
                    return Err(ScanError::Read(source));
                }
            }
        }

        self.finish()
    }

    /// Counts a whole stream in a fresh tree and renders the result.
    ///
    /// # Errors
    ///
    /// As for [`scan_into`](Extractor::scan_into).
    pub fn scan<I, E>(&mut self, input: I) -> Result<NgramCounts, ScanError<E>>
    where
        I: IntoIterator<Item = Result<T, E>>,
    {
        let mut tree = CountTree::new();
        let windows = self.scan_into(input, &mut tree)?;
        debug!(windows, distinct = tree.len(), height = tree.height(), "scan finished");
        Ok(NgramCounts::from_tree(&tree))
    }
}
