//! Per-document language state.
//!
//! Every [`Document`](crate::document::Document) owns one [`LanguageContext`]
//! holding its active language and an optional fallback. The context only
//! affects read/write resolution; it is never persisted with the document.
//! Language codes are opaque strings and are not validated against any
//! catalog of known codes.

use crate::config::I18nConfig;

/// Process-wide default language used when a document is constructed
/// without an explicit language setting.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Mutable per-instance language state.
///
/// The current language can be switched at any time; the fallback is fixed
/// at construction (or absent). Switching languages has no effect on values
/// already stored under other languages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageContext {
    /// The language targeted by subsequent reads and writes
    current: String,

    /// Language consulted on read when the current language has no value
    fallback: Option<String>,
}

impl LanguageContext {
    /// Create a context with the given active language and no fallback.
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            current: lang.into(),
            fallback: None,
        }
    }

    /// Create a context with an active language and a fallback language.
    pub fn with_fallback(lang: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            current: lang.into(),
            fallback: Some(fallback.into()),
        }
    }

    /// Build a context from construction-time configuration.
    pub fn from_config(config: &I18nConfig) -> Self {
        Self {
            current: config.lang.clone(),
            fallback: config.fallback_lang.clone(),
        }
    }

    /// The active language for this instance.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Switch the active language. Subsequent reads and writes target
    /// `code`; already-stored values are untouched.
    pub fn set_current(&mut self, code: impl Into<String>) {
        self.current = code.into();
    }

    /// The fallback language, if one was configured at construction.
    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }
}

impl Default for LanguageContext {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}
