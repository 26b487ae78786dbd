//! Description translation
//!
//! The [`Translator`] trait is the contract the engine relies on.
//! [`CachedTranslator`] wraps any translator with a time-bounded cache so
//! reopening the same detail view does not hit the service again.

use crate::error::Result;
use async_trait::async_trait;
use cached::{Cached, TimedCache};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

/// Languages understood by the translator
///
/// ```
/// use aktien_watchlist::Language;
///
/// assert_eq!(Language::from_code("de"), Language::German);
/// assert_eq!(Language::from_code("deutsch"), Language::German);
/// assert_eq!(Language::from_code("fr"), Language::Other("fr".to_string()));
/// assert_eq!(Language::Auto.code(), "auto");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    /// Let the service detect the language (source side only)
    Auto,
    /// German
    #[default]
    German,
    /// English
    English,
    /// Other languages (ISO 639-1 code)
    Other(String),
}

impl Language {
    /// Get ISO 639-1 language code
    pub fn code(&self) -> &str {
        match self {
            Language::Auto => "auto",
            Language::German => "de",
            Language::English => "en",
            Language::Other(code) => code,
        }
    }

    /// Get language name for display
    pub fn name(&self) -> &str {
        match self {
            Language::Auto => "auto-detect",
            Language::German => "German",
            Language::English => "English",
            Language::Other(code) => code,
        }
    }

    /// Parse from ISO 639-1 code or common name
    pub fn from_code(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "auto" => Language::Auto,
            "de" | "german" | "deutsch" => Language::German,
            "en" | "english" | "englisch" => Language::English,
            other => Language::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Translates free text between languages
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct TranslationKey {
    source: String,
    target: String,
    text: String,
}

/// Caching decorator around another [`Translator`]
///
/// Only successful translations are cached.
pub struct CachedTranslator<T> {
    inner: T,
    cache: Arc<RwLock<TimedCache<TranslationKey, String>>>,
}

impl<T: Translator> CachedTranslator<T> {
    pub fn new(inner: T, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    /// Number of cached translations
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        let mut cache = self.cache.write().await;
        cache.cache_clear();
    }
}

#[async_trait]
impl<T: Translator> Translator for CachedTranslator<T> {
    async fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String> {
        let key = TranslationKey {
            source: source.code().to_string(),
            target: target.code().to_string(),
            text: text.to_string(),
        };

        {
            let mut cache = self.cache.write().await;
            if let Some(hit) = cache.cache_get(&key) {
                debug!(target_lang = %key.target, "Translation cache hit");
                return Ok(hit.clone());
            }
        }

        debug!(target_lang = %key.target, "Translation cache miss");
        let translated = self.inner.translate(text, source, target).await?;

        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, translated.clone());
        Ok(translated)
    }
}
