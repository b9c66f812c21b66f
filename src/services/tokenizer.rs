//! Syntax tokenizer collaborator.
//!
//! The service returns token text, lemma and a universal POS tag per input
//! string. Failures are swallowed into an empty token list and logged; a
//! tokenizer outage alone never fails a translation request.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::types::{GrammaticalType, Token};

#[async_trait]
pub trait SyntaxTokenizer: Send + Sync {
    /// Tokens for `text`, or empty on blank input or any internal failure.
    async fn analyze_syntax(&self, text: &str, language_code: &str) -> Vec<Token>;
}

#[derive(Debug, Serialize)]
struct SyntaxRequest<'a> {
    text: &'a str,
    language: &'a str,
}

/// Loosely-typed service payload, validated field by field at the boundary.
#[derive(Debug, Deserialize)]
struct SyntaxResponse {
    #[serde(default)]
    tokens: Vec<RawToken>,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    pos_tag: Option<String>,
    #[serde(default)]
    lemma: Option<String>,
}

/// HTTP client for the tokenizer service.
#[derive(Debug, Clone)]
pub struct HttpTokenizer {
    client: Client,
    base_url: String,
}

impl HttpTokenizer {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn request_syntax(&self, text: &str, language_code: &str) -> anyhow::Result<SyntaxResponse> {
        let url = format!("{}/syntax/analyze", self.base_url);
        let body = SyntaxRequest {
            text,
            language: language_code,
        };
        let response = self.client.post(&url).json(&body).send().await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl SyntaxTokenizer for HttpTokenizer {
    async fn analyze_syntax(&self, text: &str, language_code: &str) -> Vec<Token> {
        if text.trim().is_empty() {
            return Vec::new();
        }
        match self.request_syntax(text, language_code).await {
            Ok(response) => response.tokens.into_iter().map(map_raw_token).collect(),
            Err(err) => {
                error!(%err, language_code, "syntax analysis failed, returning no tokens");
                Vec::new()
            }
        }
    }
}

fn map_raw_token(raw: RawToken) -> Token {
    let text = raw.text.unwrap_or_default();
    let lemma = raw.lemma.filter(|l| !l.is_empty()).unwrap_or_else(|| text.clone());
    Token {
        grammatical_type: map_pos_tag(raw.pos_tag.as_deref()),
        text,
        lemma,
    }
}

/// Universal POS tag to grammatical category.
pub fn map_pos_tag(tag: Option<&str>) -> GrammaticalType {
    let Some(tag) = tag else {
        return GrammaticalType::Unknown;
    };
    match tag.to_uppercase().as_str() {
        "ADJ" => GrammaticalType::Adjective,
        "ADP" | "PRT" => GrammaticalType::Preposition,
        "ADV" | "PART" => GrammaticalType::Adverb,
        "AUX" | "VERB" => GrammaticalType::Verb,
        "CONJ" | "CCONJ" | "SCONJ" => GrammaticalType::Conjunction,
        "DET" => GrammaticalType::Determiner,
        "NOUN" | "NUM" => GrammaticalType::Noun,
        "PRON" => GrammaticalType::Pronoun,
        _ => GrammaticalType::Unknown,
    }
}
