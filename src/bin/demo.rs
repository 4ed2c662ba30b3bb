//! End-to-end walkthrough: declare a schema with translatable fields, fill
//! in translations, persist, reload and read back with a fallback.

use std::sync::Arc;

use anyhow::{Context, Result};
use doc_i18n::{Document, FieldType, I18nConfig, JsonStore, Schema};
use serde_json::json;
use tracing::info;

fn main() -> Result<()> {
    // Load .env if present (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("doc_i18n=debug".parse()?),
        )
        .init();

    let config = I18nConfig::from_env();
    info!(lang = %config.lang, fallback = ?config.fallback_lang, "starting demo");

    let schema = Arc::new(
        Schema::builder("recipes")
            .field("title", FieldType::Text)
            .field("ingredients", FieldType::list(FieldType::Text))
            .field("servings", FieldType::Integer)
            .translatable("title")
            .translatable("ingredients")
            .required("title")
            .build()
            .context("schema registration failed")?,
    );

    let store_path = std::env::var("DOC_I18N_STORE").unwrap_or_else(|_| "demo-store.json".to_string());
    let store = JsonStore::open(&store_path).context("failed to open document store")?;

    // Fill in two languages through the accessor.
    let mut recipe = Document::with_config(Arc::clone(&schema), &config);
    recipe.set("title", json!("Apple juice"))?;
    recipe.set("ingredients", json!(["apple", "water"]))?;
    recipe.set("servings", json!(2))?;

    recipe.set_language("fr");
    recipe.set("title", json!("Jus de pomme"))?;
    recipe.set("ingredients", json!(["pomme", "eau"]))?;

    recipe.save(&store, "apple-juice")?;
    info!("saved recipe in {} languages", recipe.translations("title")?.len());

    // Reload with French active and English as fallback.
    let reload_config = I18nConfig::with_fallback("fr", "en");
    let reloaded = Document::load(&store, Arc::clone(&schema), &reload_config, "apple-juice")?
        .context("recipe should exist")?;

    info!(title = ?reloaded.get("title"), "read under fr");

    let mut reloaded = reloaded;
    reloaded.set_language("de");
    // No German translation: the fallback answers.
    info!(title = ?reloaded.get("title"), "read under de (fallback en)");

    Ok(())
}
