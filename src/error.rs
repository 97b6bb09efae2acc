//! Error types for counting and reporting.

use std::io;

use thiserror::Error;

/// Errors that end a scan.
///
/// `E` is the error type of the symbol stream being scanned; it is passed
/// through untouched.
#[derive(Debug, Error)]
pub enum ScanError<E> {
    /// The input ran out in the middle of a window in sequential mode.
    #[error("stream ends with an incomplete {window_size}-gram ({leftover} of {window_size} symbols collected)")]
    IncompleteWindow {
        /// Configured window size.
        window_size: usize,
        /// Symbols collected for the unfinished window.
        leftover: usize,
    },

    /// The symbol stream failed.
    #[error("failed to read input")]
    Read(#[source] E),
}

/// Invalid extractor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A window must hold at least one symbol.
    #[error("window size must be between 1 and 255 but is 0")]
    ZeroWindowSize,
}

/// Errors while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// CSV reports only support `,` and `;`.
    #[error("separator must be either ',' or ';' but is '{0}'")]
    InvalidSeparator(char),

    /// The report format name is not known.
    #[error("unknown report format '{0}' (expected text, csv or json)")]
    UnknownFormat(String),

    /// Writing failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
