//! Error types for schema registration, validation and storage.
//!
//! Everything the crate can fail with is collected in one [`Error`] enum so
//! callers can match on the exact failure instead of parsing strings.
//! Validation messages follow the `<path> must be an instance of <type>,
//! not <actual>` pattern throughout; the i18n variant substitutes `i18n`
//! as the expected type.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All failures surfaced by the document mapping layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A schema declared a translatable or required path that does not
    /// resolve in its structure. Raised at registration time, never later.
    #[error("schema '{schema}' declares unknown field path '{path}'")]
    UnknownPath {
        /// Name of the schema being registered
        schema: String,
        /// The dot-separated path that failed to resolve
        path: String,
    },

    /// A document carries a field that the schema structure does not declare.
    #[error("'{path}' is not declared in the schema structure")]
    UnknownField {
        /// The offending dot-separated path
        path: String,
    },

    /// A required field is absent or null.
    #[error("{path} is required")]
    MissingRequired {
        /// The missing dot-separated path
        path: String,
    },

    /// An operation expected a translatable path but the schema does not
    /// mark it as such.
    #[error("field '{path}' is not declared translatable")]
    NotTranslatable {
        /// The dot-separated path
        path: String,
    },

    /// A translatable field holds something other than a translation
    /// mapping.
    #[error("{path} must be an instance of i18n, not {actual}")]
    ExpectedI18n {
        /// The dot-separated path
        path: String,
        /// Name of the value's actual type
        actual: String,
    },

    /// A value does not match the field's declared type.
    #[error("{path} must be an instance of {expected}, not {actual}")]
    TypeMismatch {
        /// The dot-separated path
        path: String,
        /// Name of the declared type
        expected: String,
        /// Name of the value's actual type
        actual: String,
    },

    /// A specific language's value does not match the field's base type.
    #[error("{path} ('{lang}') must be an instance of {expected}, not {actual}")]
    LanguageTypeMismatch {
        /// The dot-separated path
        path: String,
        /// The offending language code
        lang: String,
        /// Name of the declared base type
        expected: String,
        /// Name of the value's actual type
        actual: String,
    },

    /// The storage form of a translatable field violates the record
    /// contract. This is a data-integrity signal and is never repaired
    /// silently.
    #[error("malformed i18n record for {path}: {reason}")]
    MalformedRecord {
        /// The dot-separated path being decoded
        path: String,
        /// What exactly was wrong with the records
        reason: String,
    },

    /// I/O failure in the persistence connector, passed through unmodified.
    #[error("store i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failure in the persistence connector.
    #[error("store serialization error: {0}")]
    Storage(#[from] serde_json::Error),
}

impl Error {
    /// Tag a plain type mismatch with the language under which it occurred.
    ///
    /// Used by the validation adapter when a per-language value fails the
    /// base-type check, so the caller sees both the field path and the
    /// offending language code. Other variants pass through unchanged.
    pub(crate) fn with_language(self, lang: &str) -> Self {
        match self {
            Error::TypeMismatch {
                path,
                expected,
                actual,
            } => Error::LanguageTypeMismatch {
                path,
                lang: lang.to_string(),
                expected,
                actual,
            },
            other => other,
        }
    }
}
