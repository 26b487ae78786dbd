//! Google Translate client (public `translate_a/single` endpoint)

use crate::error::{Result, WatchlistError};
use crate::translate::{Language, Translator};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const BASE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// Longest text sent in one request
pub const MAX_CHUNK_CHARS: usize = 4500;

/// Client for the keyless Google Translate endpoint
#[derive(Debug, Clone)]
pub struct GoogleTranslateClient {
    client: Client,
    base_url: String,
}

impl GoogleTranslateClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Point the client at another host (mirrors, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn translate_chunk(
        &self,
        chunk: &str,
        source: &Language,
        target: &Language,
    ) -> Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("client", "gtx"),
                ("sl", source.code()),
                ("tl", target.code()),
                ("dt", "t"),
                ("q", chunk),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WatchlistError::TranslationError(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: Value = response.json().await?;
        parse_response(&body)
    }
}

/// Join the translated segments of a `translate_a/single` response
///
/// The body is a nested array whose first element lists
/// `[translated, original, ...]` segments.
fn parse_response(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| WatchlistError::TranslationError("Unexpected response shape".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(WatchlistError::TranslationError("Empty translation".to_string()));
    }
    Ok(translated)
}

/// Split text into pieces of at most `max_chars` characters, preferring sentence ends
fn split_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in text.split_inclusive(['.', '!', '?']) {
        if current.chars().count() + sentence.chars().count() > max_chars && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
        }

        if sentence.chars().count() > max_chars {
            // A single run-on sentence; cut it on character boundaries.
            let chars: Vec<char> = sentence.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
        } else {
            current.push_str(sentence);
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[async_trait]
impl Translator for GoogleTranslateClient {
    async fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let chunks = split_chunks(text, MAX_CHUNK_CHARS);
        debug!(chunks = chunks.len(), target = target.code(), "Translating text");

        let mut translated = String::with_capacity(text.len());
        for chunk in &chunks {
            translated.push_str(&self.translate_chunk(chunk, source, target).await?);
        }
        Ok(translated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_response_joins_segments() {
        let body = json!([
            [
                ["Apple entwirft Smartphones. ", "Apple designs smartphones. ", null, null, 10],
                ["Es verkauft auch Computer.", "It also sells computers.", null, null, 10]
            ],
            null,
            "en"
        ]);

        assert_eq!(
            parse_response(&body).unwrap(),
            "Apple entwirft Smartphones. Es verkauft auch Computer."
        );
    }

    #[test]
    fn test_parse_response_rejects_unexpected_shape() {
        assert!(parse_response(&json!({"error": "blocked"})).is_err());
        assert!(parse_response(&json!([[]])).is_err());
    }

    #[test]
    fn test_split_chunks_respects_limit() {
        let text = "One. Two! Three? Four.";
        let chunks = split_chunks(text, 10);

        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_chunks_long_sentence() {
        let text = "a".repeat(25);
        let chunks = split_chunks(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_chunks_short_text_single_chunk() {
        assert_eq!(split_chunks("Hello world.", MAX_CHUNK_CHARS), vec!["Hello world."]);
    }

    #[tokio::test]
    async fn test_blank_text_skips_request() {
        let client = GoogleTranslateClient::new(Duration::from_secs(5))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let result = client
            .translate("   ", &Language::Auto, &Language::German)
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_translate_live() {
        let client = GoogleTranslateClient::new(Duration::from_secs(30)).unwrap();
        let result = client
            .translate("Good morning", &Language::Auto, &Language::German)
            .await
            .unwrap();
        assert!(!result.is_empty());
    }
}
