//! Translatable document fields for schemaless document stores.
//!
//! This crate lets a document schema mark fields as translatable: at the
//! application layer they read and write like plain scalars selected by
//! the document's current language, while the persisted form is a
//! normalized, indexable list of `{lang, value}` records covering all
//! languages at once.
//!
//! # Architecture
//!
//! - `language`: per-document language context (current + fallback)
//! - `schema`: typed structure declaration and registration-time checks
//! - `registry`: translatable path set derived once per schema
//! - `codec`: canonical mapping to/from storage record list transforms
//! - `document`: document instances and the translation accessor
//! - `validator`: generic type checks plus the i18n validation adapter
//! - `store`: file-backed persistence connector
//! - `config`: construction-time language configuration
//! - `error`: the crate-wide error enum
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use doc_i18n::{Document, FieldType, I18nConfig, Schema};
//! use serde_json::json;
//!
//! # fn main() -> doc_i18n::Result<()> {
//! let schema = Arc::new(
//!     Schema::builder("post")
//!         .field("title", FieldType::Text)
//!         .translatable("title")
//!         .build()?,
//! );
//!
//! let mut post = Document::with_config(Arc::clone(&schema), &I18nConfig::with_lang("en"));
//! post.set("title", json!("Hello"))?;
//! post.set_language("fr");
//! post.set("title", json!("Salut"))?;
//!
//! assert_eq!(post.get("title"), Some(&json!("Salut")));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod language;
pub mod registry;
pub mod schema;
pub mod store;
pub mod validator;

pub use config::I18nConfig;
pub use document::{Document, Translations};
pub use error::{Error, Result};
pub use language::{LanguageContext, DEFAULT_LANGUAGE};
pub use registry::FieldRegistry;
pub use schema::{FieldType, Schema, SchemaBuilder};
pub use store::JsonStore;
