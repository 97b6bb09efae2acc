//! Extractor configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::window::CharFilter;

/// How the window advances after it was counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Slide by one symbol: `len - n + 1` windows.
    #[default]
    Overlapping,
    /// Start over after every window: `len / n` windows, and the input must
    /// divide evenly.
    Sequential,
}

/// Configuration for an [`Extractor`](crate::Extractor) over characters.
///
/// # Examples
///
/// ```
/// use ngram_counter::{ExtractorConfig, WindowMode};
///
/// let config = ExtractorConfig::builder()
///     .window_size(3)
///     .mode(WindowMode::Sequential)
///     .ignore_whitespace(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.window_size(), 3);
///
/// assert!(ExtractorConfig::builder().window_size(0).build().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ExtractorConfig {
    /// Symbols per window, 1 to 255.
    #[builder(default = "1")]
    window_size: u8,

    /// Overlapping or sequential windows.
    #[builder(default)]
    #[serde(default)]
    mode: WindowMode,

    /// Skip everything that is neither a letter nor a digit.
    #[builder(default = "false")]
    #[serde(default)]
    letters_and_digits_only: bool,

    /// Skip whitespace.
    #[builder(default = "false")]
    #[serde(default)]
    ignore_whitespace: bool,
}

impl ExtractorConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if self.window_size == Some(0) {
            return Err(ConfigError::ZeroWindowSize.to_string());
        }
        Ok(())
    }
}

impl ExtractorConfig {
    /// Create a new config builder.
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }

    /// Create a config that accepts every non-control character.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ZeroWindowSize`] if `window_size` is 0.
    pub fn new(window_size: u8, mode: WindowMode) -> Result<Self, ConfigError> {
        if window_size == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        Ok(Self {
            window_size,
            mode,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn window_size(&self) -> u8 {
        self.window_size
    }

    #[must_use]
    pub fn mode(&self) -> WindowMode {
        self.mode
    }

    #[must_use]
    pub fn letters_and_digits_only(&self) -> bool {
        self.letters_and_digits_only
    }

    #[must_use]
    pub fn ignore_whitespace(&self) -> bool {
        self.ignore_whitespace
    }

    /// The acceptance filter these settings describe.
    #[must_use]
    pub fn char_filter(&self) -> CharFilter {
        CharFilter::new(self.letters_and_digits_only, self.ignore_whitespace)
    }
}

impl Default for ExtractorConfig {
    /// Single characters, overlapping, nothing but control characters
    /// skipped.
    fn default() -> Self {
        Self {
            window_size: 1,
            mode: WindowMode::Overlapping,
            letters_and_digits_only: false,
            ignore_whitespace: false,
        }
    }
}
