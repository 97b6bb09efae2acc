//! Byte and n-gram frequency counting.
//!
//! The crate slides a fixed-size window over a stream of symbols and counts
//! how often every distinct window occurs:
//!
//! - [`Extractor`] cuts the stream into windows, either overlapping (`abc`,
//!   `bcd`, ...) or back to back (`abc`, `def`, ...), skipping symbols its
//!   filter rejects.
//! - [`CountTree`] stores each distinct window once, in sorted order, with its
//!   count.
//! - [`NgramCounts`] is the printable result; the [`report`] module writes it
//!   as text, CSV or JSON.
//!
//! # Example
//!
//! ```
//! use ngram_counter::{Extractor, ExtractorConfig, WindowMode};
//!
//! let config = ExtractorConfig::builder()
//!     .window_size(2)
//!     .mode(WindowMode::Overlapping)
//!     .ignore_whitespace(true)
//!     .build()
//!     .unwrap();
//! let mut extractor = Extractor::new(&config).unwrap();
//!
//! let counts = extractor.scan_str("to to").unwrap();
//! assert_eq!(counts.total(), 3);
//! assert_eq!(counts.get("to"), Some(2));
//! assert_eq!(counts.get("ot"), Some(1));
//! ```
//!
//! Bytes are counted the same way, one byte per window:
//!
//! ```
//! let counts = ngram_counter::count_bytes(&b"\n\n"[..]).unwrap();
//! assert_eq!(counts.get("0A"), Some(2));
//! ```
//!
//! # Implementation
//!
//! The counting tree is an AVL tree. Nodes live in an arena and refer to each
//! other by index; keys are copied into one contiguous pool the first time
//! they are seen, so repeated windows cost a search and an increment and
//! nothing else.

// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod compare;
mod config;
mod error;
mod projector;
mod raw;
mod symbol;

pub mod bytes;
pub mod count_tree;
pub mod input;
pub mod report;
pub mod window;

pub use bytes::count_bytes;
pub use compare::compare_sequences;
pub use config::{ExtractorConfig, ExtractorConfigBuilder, ExtractorConfigBuilderError, WindowMode};
pub use count_tree::{CountEntry, CountTree, Found};
pub use error::{ConfigError, ReportError, ScanError};
pub use input::utf8_chars;
pub use projector::NgramCounts;
pub use symbol::Symbol;
pub use window::Extractor;
