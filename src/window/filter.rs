use serde::{Deserialize, Serialize};

/// Decides which symbols enter the sliding window.
///
/// Rejected symbols are skipped entirely: they neither occupy a slot nor
/// break a window apart.
pub trait Accept<T> {
    /// Returns `true` if `symbol` should be collected.
    fn accepts(&self, symbol: T) -> bool;
}

/// Accepts everything. Used for byte counting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcceptAll;

impl<T> Accept<T> for AcceptAll {
    #[inline]
    fn accepts(&self, _symbol: T) -> bool {
        true
    }
}

/// Character acceptance rules.
///
/// Control characters are always rejected. On top of that the filter can
/// keep only letters and digits, and can drop whitespace.
///
/// # Examples
///
/// ```
/// use ngram_counter::window::{Accept, CharFilter};
///
/// let filter = CharFilter::new(false, true);
/// assert!(filter.accepts('a'));
/// assert!(filter.accepts('.'));
/// assert!(!filter.accepts(' '));
/// assert!(!filter.accepts('\n'));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharFilter {
    letters_and_digits_only: bool,
    ignore_whitespace: bool,
}

impl CharFilter {
    #[must_use]
    pub const fn new(letters_and_digits_only: bool, ignore_whitespace: bool) -> Self {
        Self {
            letters_and_digits_only,
            ignore_whitespace,
        }
    }
}

impl Accept<char> for CharFilter {
    fn accepts(&self, symbol: char) -> bool {
        if symbol.is_control() {
            return false;
        }
        if self.letters_and_digits_only && !symbol.is_alphanumeric() {
            return false;
        }
        !(self.ignore_whitespace && symbol.is_whitespace())
    }
}
