//! End-to-end engine flow against mock collaborator services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use lingo_backend::cache::{MemoryStore, TranslationStore};
use lingo_backend::engine::TranslationEngine;
use lingo_backend::error::TranslationError;
use lingo_backend::services::{CompletionService, SyntaxTokenizer};
use lingo_backend::types::{AlignmentSource, GrammaticalType, Token, TranslationRecord};

/// Splits on whitespace, tagging everything unknown.
struct MockTokenizer {
    calls: AtomicUsize,
}

impl MockTokenizer {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl SyntaxTokenizer for MockTokenizer {
    async fn analyze_syntax(&self, text: &str, _language_code: &str) -> Vec<Token> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        text.split_whitespace()
            .map(|w| Token::new(w, GrammaticalType::Unknown))
            .collect()
    }
}

struct MockCompletion {
    calls: AtomicUsize,
    response: String,
}

impl MockCompletion {
    fn new(response: impl Into<String>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            response: response.into(),
        }
    }
}

#[async_trait]
impl CompletionService for MockCompletion {
    async fn generate_content(&self, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Store whose `create` always fails; `find` always misses.
struct BrokenCreateStore;

#[async_trait]
impl TranslationStore for BrokenCreateStore {
    async fn find(
        &self,
        _key: &str,
        _source_lang: &str,
        _target_lang: &str,
    ) -> anyhow::Result<Option<TranslationRecord>> {
        Ok(None)
    }

    async fn create(&self, _record: TranslationRecord) -> anyhow::Result<()> {
        anyhow::bail!("store unavailable")
    }
}

fn coffee_response() -> String {
    concat!(
        "TRADUCAO:\nI would like a coffee\n\n",
        "GRAMATICA_ORIGINAL:\nSujeito + verbo no condicional seguido de objeto.\n\n",
        "GRAMATICA_TRADUZIDA:\nSubject with a modal verb and an object.\n\n",
        "MAPEAMENTO_JSON:\n```json\n",
        r#"[{"original_segment": "eu", "translated_segment": "I"},
            {"original_segment": "gostaria de", "translated_segment": "would like"},
            {"original_segment": "um café", "translated_segment": "a coffee"}]"#,
        "\n```\n\n",
        "QUIZ_VOCABULARIO_JSON:\n```json\n",
        r#"[{"question_prompt": "Qual é a tradução de 'café'?",
            "options": ["tea", "coffee", "milk"],
            "correct_option_index": 1,
            "original_tested_word": "café",
            "correct_translation": "coffee"}]"#,
        "\n```\n"
    )
    .to_string()
}

fn engine_with(
    completion_response: &str,
) -> (
    TranslationEngine,
    Arc<MockTokenizer>,
    Arc<MockCompletion>,
    Arc<MemoryStore>,
) {
    let tokenizer = Arc::new(MockTokenizer::new());
    let completion = Arc::new(MockCompletion::new(completion_response));
    let store = Arc::new(MemoryStore::new());
    let engine = TranslationEngine::new(tokenizer.clone(), completion.clone(), store.clone());
    (engine, tokenizer, completion, store)
}

#[tokio::test]
async fn full_translation_composes_tokens_alignments_and_quiz() {
    let (engine, _, _, store) = engine_with(&coffee_response());

    let response = engine
        .translate("Eu gostaria de um café", "pt", "en")
        .await
        .expect("translation succeeds");

    assert_eq!(response.original_text, "eu gostaria de um café");
    assert_eq!(response.translated_text, "I would like a coffee");
    assert_eq!(response.tokens_original.len(), 5);
    assert_eq!(response.tokens_translated.len(), 5);

    let ai_alignments: Vec<_> = response
        .alignments
        .iter()
        .filter(|a| a.source == AlignmentSource::IaGeneratedAlignment)
        .collect();
    assert_eq!(ai_alignments.len(), 3);

    // Partition: every token index appears exactly once per side.
    let mut original_indices: Vec<_> = response
        .alignments
        .iter()
        .flat_map(|a| a.original_token_indices.iter().copied())
        .collect();
    original_indices.sort_unstable();
    assert_eq!(original_indices, vec![0, 1, 2, 3, 4]);

    // Dual-sided alignments share one color across both sides.
    let would_like = ai_alignments
        .iter()
        .find(|a| a.translated_text_segment == "would like")
        .expect("would like alignment");
    let color = &response.tokens_original[would_like.original_token_indices[0]].background_color;
    for &idx in &would_like.original_token_indices {
        assert_eq!(&response.tokens_original[idx].background_color, color);
        assert_eq!(response.tokens_original[idx].is_unused, Some(false));
    }
    for &idx in &would_like.translated_token_indices {
        assert_eq!(&response.tokens_translated[idx].background_color, color);
    }

    assert_eq!(response.quiz.as_ref().map(Vec::len), Some(1));
    assert!(response
        .explanations
        .iter()
        .any(|e| e.contains("Grammar (original)")));

    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn second_identical_request_skips_both_external_services() {
    let (engine, tokenizer, completion, _) = engine_with(&coffee_response());

    let first = engine
        .translate("Eu gostaria de um café", "pt", "en")
        .await
        .expect("first request");
    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
    assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 2);

    let second = engine
        .translate("Eu gostaria de um café", "pt", "en")
        .await
        .expect("second request");
    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
    assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 2);

    // Structurally equivalent; colors are re-rolled and may differ.
    assert_eq!(second.translated_text, first.translated_text);
    assert_eq!(second.alignments.len(), first.alignments.len());
    assert_eq!(second.quiz, first.quiz);
    let texts = |tokens: &[lingo_backend::types::DisplayableToken]| {
        tokens.iter().map(|t| t.token.text.clone()).collect::<Vec<_>>()
    };
    assert_eq!(texts(&second.tokens_original), texts(&first.tokens_original));
    assert_eq!(
        texts(&second.tokens_translated),
        texts(&first.tokens_translated)
    );
}

#[tokio::test]
async fn normalization_makes_cache_identity_case_insensitive() {
    let (engine, _, completion, _) = engine_with(&coffee_response());

    engine
        .translate("Eu gostaria de um café", "pt", "en")
        .await
        .expect("first request");
    engine
        .translate("  EU GOSTARIA DE UM CAFÉ  ", "pt", "en")
        .await
        .expect("second request");
    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_translation_is_fatal_before_tokenization_and_caching() {
    let broken = coffee_response().replace("TRADUCAO:", "RESULT:");
    let (engine, tokenizer, _, store) = engine_with(&broken);

    let err = engine
        .translate("Eu gostaria de um café", "pt", "en")
        .await
        .expect_err("essential field missing must fail");
    assert!(matches!(err, TranslationError::AiResponse(_)));
    assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn missing_mapping_list_is_fatal() {
    let broken = coffee_response().replace("MAPEAMENTO_JSON:", "MAPPING:");
    let (engine, tokenizer, _, _) = engine_with(&broken);

    let err = engine
        .translate("bom dia", "pt", "en")
        .await
        .expect_err("mapping list is essential");
    assert!(matches!(err, TranslationError::AiResponse(_)));
    assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_quiz_and_grammar_are_not_fatal() {
    let degraded = concat!(
        "TRADUCAO:\ngood morning\n\n",
        "MAPEAMENTO_JSON:\n```json\n",
        r#"[{"original_segment": "bom dia", "translated_segment": "good morning"}]"#,
        "\n```\n"
    );
    let (engine, _, _, _) = engine_with(degraded);

    let response = engine
        .translate("Bom dia", "pt", "en")
        .await
        .expect("non-essential absence degrades, not fails");
    assert!(response.quiz.is_none());
    assert!(!response.explanations.is_empty());
}

#[tokio::test]
async fn empty_phrase_is_rejected_before_any_external_call() {
    let (engine, tokenizer, completion, _) = engine_with(&coffee_response());

    let err = engine
        .translate("   ", "pt", "en")
        .await
        .expect_err("blank phrase");
    assert!(matches!(err, TranslationError::InvalidInput(_)));
    assert_eq!(completion.calls.load(Ordering::SeqCst), 0);
    assert_eq!(tokenizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn persistence_failure_still_returns_the_computed_response() {
    let tokenizer = Arc::new(MockTokenizer::new());
    let completion = Arc::new(MockCompletion::new(coffee_response()));
    let engine = TranslationEngine::new(tokenizer, completion, Arc::new(BrokenCreateStore));

    let response = engine
        .translate("Eu gostaria de um café", "pt", "en")
        .await
        .expect("cache is best-effort");
    assert_eq!(response.translated_text, "I would like a coffee");
}

#[tokio::test]
async fn malformed_cached_record_falls_through_to_recomputation() {
    let (engine, _, completion, store) = engine_with(&coffee_response());

    let key = lingo_backend::cache::phrase_cache_key("bom dia", "pt", "en");
    store
        .create(TranslationRecord {
            original_text: "bom dia".to_string(),
            original_text_hash: key,
            translated_text: "good morning".to_string(),
            source_language_code: "pt".to_string(),
            target_language_code: "en".to_string(),
            tokens_original_json: "not valid json".to_string(),
            tokens_translated_json: "[]".to_string(),
            alignments_json: "[]".to_string(),
            explanations_json: "[]".to_string(),
            quiz_json: None,
        })
        .await
        .expect("seed broken record");

    let response = engine
        .translate("bom dia", "pt", "en")
        .await
        .expect("falls back to the AI path");
    assert_eq!(completion.calls.load(Ordering::SeqCst), 1);
    assert_eq!(response.translated_text, "I would like a coffee");
}
