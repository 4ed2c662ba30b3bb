//! Construction-time configuration for document language handling.

use crate::language::DEFAULT_LANGUAGE;

/// Language settings handed to a document at construction.
///
/// `lang` is the initial active language; `fallback_lang` is consulted on
/// reads when the active language has no value. Both are opaque codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nConfig {
    /// Initial active language (defaults to [`DEFAULT_LANGUAGE`])
    pub lang: String,

    /// Optional fallback language, fixed for the instance lifetime
    pub fallback_lang: Option<String>,
}

impl I18nConfig {
    /// Build a configuration from the process environment.
    ///
    /// Reads `DOC_I18N_LANG` and `DOC_I18N_FALLBACK_LANG`; unset or empty
    /// variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            lang: std::env::var("DOC_I18N_LANG")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            fallback_lang: std::env::var("DOC_I18N_FALLBACK_LANG")
                .ok()
                .filter(|v| !v.is_empty()),
        }
    }

    /// A configuration with the given active language and no fallback.
    pub fn with_lang(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            fallback_lang: None,
        }
    }

    /// A configuration with an active language and a fallback.
    pub fn with_fallback(lang: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            fallback_lang: Some(fallback.into()),
        }
    }
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            lang: DEFAULT_LANGUAGE.to_string(),
            fallback_lang: None,
        }
    }
}
