#![forbid(unsafe_code)]

//! Tree view configuration.
//!
//! [`ViewConfig`] gathers every tunable of a [`TreeView`](crate::TreeView).
//! With the `config` feature it can be loaded from TOML or JSON; missing
//! fields take their defaults.
//!
//! ```toml
//! show_root = false
//! allow_drop_reordering = true
//!
//! [text_search]
//! idle_timeout_ms = 350
//!
//! [collation]
//! locale = "sv-SE"
//! ```
//!
//! ```rust,ignore
//! let config = ViewConfig::from_toml_file("tree.toml")?;
//! let config = ViewConfig::from_json_str(json)?;
//! ```

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use canopy_text::{CaseMode, NaturalOrder, UnicodeCollator};
use std::time::Duration;

/// Top-level view configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ViewConfig {
    /// Whether the root node occupies the first row.
    pub show_root: bool,
    /// Whether a shown root can be collapsed by the user. When false, the
    /// root is kept expanded.
    pub show_root_expander: bool,
    /// Whether drops may land before or after a node, not only inside it.
    pub allow_drop_reordering: bool,
    /// Type-ahead search.
    pub text_search: TextSearchConfig,
    /// Ordering of labels.
    pub collation: CollationConfig,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_root: true,
            show_root_expander: false,
            allow_drop_reordering: false,
            text_search: TextSearchConfig::default(),
            collation: CollationConfig::default(),
        }
    }
}

/// Type-ahead search settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct TextSearchConfig {
    /// Whether text input drives the search.
    pub enabled: bool,
    /// Whether matching distinguishes case.
    pub case_sensitive: bool,
    /// Quiet period after which the typed prefix is forgotten.
    pub idle_timeout_ms: u64,
}

impl Default for TextSearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            case_sensitive: false,
            idle_timeout_ms: 200,
        }
    }
}

impl TextSearchConfig {
    /// The idle timeout as a duration.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }

    /// Case handling for prefix matches.
    #[must_use]
    pub const fn case_mode(&self) -> CaseMode {
        CaseMode::from_sensitive(self.case_sensitive)
    }
}

/// Label ordering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct CollationConfig {
    /// Locale tag for tailorings. `None` detects the system locale.
    pub locale: Option<String>,
    /// Whether letter case is ignored when ordering.
    pub ignore_case: bool,
}

impl Default for CollationConfig {
    fn default() -> Self {
        Self {
            locale: None,
            ignore_case: true,
        }
    }
}

impl CollationConfig {
    /// Build the collator this configuration describes.
    #[must_use]
    pub fn collator(&self) -> UnicodeCollator {
        let collator = match &self.locale {
            Some(locale) => UnicodeCollator::for_locale(locale),
            None => UnicodeCollator::system(),
        };
        collator.with_ignore_case(self.ignore_case)
    }

    /// Build the natural order comparator this configuration describes.
    #[must_use]
    pub fn natural_order(&self) -> NaturalOrder {
        NaturalOrder::new(self.collator())
    }
}

impl ViewConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Check parameter ranges. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.text_search.idle_timeout_ms == 0 {
            errors.push("text_search.idle_timeout_ms must be > 0".into());
        }
        if self.text_search.idle_timeout_ms > 10_000 {
            errors.push(format!(
                "text_search.idle_timeout_ms must be <= 10000, got {}",
                self.text_search.idle_timeout_ms
            ));
        }
        if let Some(locale) = &self.collation.locale
            && locale.trim().is_empty()
        {
            errors.push("collation.locale must not be empty when set".into());
        }
        if self.show_root_expander && !self.show_root {
            errors.push("show_root_expander has no effect when show_root is false".into());
        }

        errors
    }
}

/// Errors that can occur when loading a view configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config")]
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config")]
            Self::Json(e) => Some(e),
        }
    }
}
