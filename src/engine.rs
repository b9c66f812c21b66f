//! Request orchestration: cache probe, AI round trip, parsing, tokenization,
//! alignment, coloring and best-effort persistence.

use std::sync::Arc;

use tracing::{info, warn};

use crate::align::{apply_colors, build_alignments};
use crate::cache::{phrase_cache_key, TranslationStore};
use crate::colors::ColorAllocator;
use crate::error::TranslationError;
use crate::parser::parse_ai_response;
use crate::prompt::build_translation_prompt;
use crate::services::{CompletionService, SyntaxTokenizer};
use crate::types::{
    AlignmentSource, PhraseAlignment, QuizQuestion, SegmentMapping, Token, TranslationRecord,
    TranslationResponse,
};

pub struct TranslationEngine {
    tokenizer: Arc<dyn SyntaxTokenizer>,
    completion: Arc<dyn CompletionService>,
    store: Arc<dyn TranslationStore>,
}

impl TranslationEngine {
    pub fn new(
        tokenizer: Arc<dyn SyntaxTokenizer>,
        completion: Arc<dyn CompletionService>,
        store: Arc<dyn TranslationStore>,
    ) -> Self {
        Self {
            tokenizer,
            completion,
            store,
        }
    }

    /// Translate `phrase` with POS-tagged tokens, cross-language alignments,
    /// fresh colors, grammar explanations and an optional vocabulary quiz.
    pub async fn translate(
        &self,
        phrase: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TranslationResponse, TranslationError> {
        let normalized_phrase = phrase.trim().to_lowercase();
        if normalized_phrase.is_empty() {
            return Err(TranslationError::InvalidInput(
                "phrase must not be empty".to_string(),
            ));
        }

        let cache_key = phrase_cache_key(&normalized_phrase, source_lang, target_lang);
        match self.store.find(&cache_key, source_lang, target_lang).await {
            Ok(Some(record)) => {
                info!(phrase = %normalized_phrase, "cache hit");
                match rehydrate(&record) {
                    Ok(response) => return Ok(response),
                    Err(err) => {
                        warn!(%err, "cached record is malformed, recomputing");
                    }
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(%err, "cache lookup failed, proceeding without it");
            }
        }

        info!(
            phrase = %normalized_phrase,
            source_lang,
            target_lang,
            "cache miss, calling completion service"
        );
        let prompt = build_translation_prompt(&normalized_phrase, source_lang, target_lang);
        let ai_text = self
            .completion
            .generate_content(&prompt)
            .await
            .map_err(|err| TranslationError::Completion(err.to_string()))?;

        let parsed = parse_ai_response(&ai_text);
        let translation = parsed.translation.ok_or_else(|| {
            TranslationError::AiResponse("no parsable translation text".to_string())
        })?;
        let mappings = parsed.segment_mappings.ok_or_else(|| {
            TranslationError::AiResponse("no parsable segment mapping list".to_string())
        })?;

        let tokens_original = self
            .tokenizer
            .analyze_syntax(&normalized_phrase, source_lang)
            .await;
        let tokens_translated = self.tokenizer.analyze_syntax(&translation, target_lang).await;

        let alignments = build_alignments(&mappings, &tokens_original, &tokens_translated);

        let mut explanations = Vec::new();
        if let Some(grammar) = &parsed.original_grammar {
            explanations.push(format!("**Grammar (original):** {grammar}"));
        }
        if let Some(grammar) = &parsed.translated_grammar {
            explanations.push(format!("**Grammar (translated):** {grammar}"));
        }
        explanations.push(coloring_note(&alignments, &mappings));

        let mut allocator = ColorAllocator::from_entropy();
        let (tokens_original_display, tokens_translated_display) = apply_colors(
            &tokens_original,
            &tokens_translated,
            &alignments,
            &mut allocator,
        );

        let response = TranslationResponse {
            original_text: normalized_phrase.clone(),
            translated_text: translation,
            source_language_code: source_lang.to_string(),
            target_language_code: target_lang.to_string(),
            tokens_original: tokens_original_display,
            tokens_translated: tokens_translated_display,
            alignments,
            explanations,
            quiz: parsed.quiz,
        };

        match build_record(&cache_key, &response, &tokens_original, &tokens_translated) {
            Ok(record) => {
                if let Err(err) = self.store.create(record).await {
                    warn!(%err, "failed to persist translation record");
                }
            }
            Err(err) => warn!(%err, "failed to serialize translation record"),
        }

        Ok(response)
    }
}

fn coloring_note(alignments: &[PhraseAlignment], mappings: &[SegmentMapping]) -> String {
    let ai_count = alignments
        .iter()
        .filter(|a| a.source == AlignmentSource::IaGeneratedAlignment)
        .count();
    if ai_count == 0 && !mappings.is_empty() {
        "**Alert:** the AI provided segment mappings, but none could be applied to the tokens for paired coloring.".to_string()
    } else if ai_count > 0 {
        "**Note:** colors follow the AI segment mapping.".to_string()
    } else {
        "**Note:** colors applied per token.".to_string()
    }
}

/// Rebuild a response from a stored record with freshly rolled colors.
fn rehydrate(record: &TranslationRecord) -> anyhow::Result<TranslationResponse> {
    let tokens_original: Vec<Token> = serde_json::from_str(&record.tokens_original_json)?;
    let tokens_translated: Vec<Token> = serde_json::from_str(&record.tokens_translated_json)?;
    let alignments: Vec<PhraseAlignment> = serde_json::from_str(&record.alignments_json)?;
    let explanations: Vec<String> = serde_json::from_str(&record.explanations_json)?;
    let quiz: Option<Vec<QuizQuestion>> = record
        .quiz_json
        .as_deref()
        .map(serde_json::from_str)
        .transpose()?;

    let mut allocator = ColorAllocator::from_entropy();
    let (tokens_original_display, tokens_translated_display) = apply_colors(
        &tokens_original,
        &tokens_translated,
        &alignments,
        &mut allocator,
    );

    Ok(TranslationResponse {
        original_text: record.original_text.clone(),
        translated_text: record.translated_text.clone(),
        source_language_code: record.source_language_code.clone(),
        target_language_code: record.target_language_code.clone(),
        tokens_original: tokens_original_display,
        tokens_translated: tokens_translated_display,
        alignments,
        explanations,
        quiz,
    })
}

fn build_record(
    cache_key: &str,
    response: &TranslationResponse,
    tokens_original: &[Token],
    tokens_translated: &[Token],
) -> anyhow::Result<TranslationRecord> {
    Ok(TranslationRecord {
        original_text: response.original_text.clone(),
        original_text_hash: cache_key.to_string(),
        translated_text: response.translated_text.clone(),
        source_language_code: response.source_language_code.clone(),
        target_language_code: response.target_language_code.clone(),
        tokens_original_json: serde_json::to_string(tokens_original)?,
        tokens_translated_json: serde_json::to_string(tokens_translated)?,
        alignments_json: serde_json::to_string(&response.alignments)?,
        explanations_json: serde_json::to_string(&response.explanations)?,
        quiz_json: response
            .quiz
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?,
    })
}
