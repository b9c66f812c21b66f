//! Core data model for AI-enhanced phrase translation.
//!
//! Field names follow the wire format consumed by the frontend, so several
//! structs rename to camelCase on serialization.

use serde::{Deserialize, Serialize};

/// Grammatical category assigned to a token by the syntax tokenizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammaticalType {
    Verb,
    Noun,
    Adjective,
    Adverb,
    Preposition,
    Pronoun,
    Determiner,
    Conjunction,
    Interjection,
    Unknown,
}

/// Minimal unit of a sentence with its grammatical category and base form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    #[serde(rename = "grammaticalType")]
    pub grammatical_type: GrammaticalType,
    pub lemma: String,
}

/// Foreground color chosen for legibility against a background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextColor {
    Black,
    White,
}

/// A token decorated for display. Colors are recomputed on every serve and
/// never persisted, so repeated requests stay visually varied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayableToken {
    #[serde(flatten)]
    pub token: Token,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "textColor")]
    pub text_color: TextColor,
    /// Original side only: true when no dual-sided alignment touched this token.
    #[serde(rename = "isUnused", skip_serializing_if = "Option::is_none")]
    pub is_unused: Option<bool>,
}

/// Raw AI-proposed correspondence between a word sequence in each language.
/// Unindexed; segments may not line up with tokenizer boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentMapping {
    pub original_segment: String,
    pub translated_segment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentSource {
    Glossary,
    Sequential,
    Unaligned,
    IaGeneratedAlignment,
}

/// Pairs index ranges of original and translated tokens believed to express
/// the same meaning unit. Index lists are strictly increasing and refer to
/// valid positions; an `unaligned` record has indices on exactly one side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhraseAlignment {
    #[serde(rename = "originalTokenIndices")]
    pub original_token_indices: Vec<usize>,
    #[serde(rename = "translatedTokenIndices")]
    pub translated_token_indices: Vec<usize>,
    #[serde(rename = "originalTextSegment")]
    pub original_text_segment: String,
    #[serde(rename = "translatedTextSegment")]
    pub translated_text_segment: String,
    pub source: AlignmentSource,
}

/// One vocabulary quiz question produced by the AI. Field names match the
/// JSON the completion service is prompted to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question_prompt: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub original_tested_word: String,
    pub correct_translation: String,
}

/// Persisted cache entity. Token lists, alignments, explanations and the
/// optional quiz are stored as serialized JSON strings; colors are not
/// stored. Records are immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRecord {
    #[serde(rename = "originalText")]
    pub original_text: String,
    #[serde(rename = "originalTextHash")]
    pub original_text_hash: String,
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    #[serde(rename = "sourceLanguageCode")]
    pub source_language_code: String,
    #[serde(rename = "targetLanguageCode")]
    pub target_language_code: String,
    #[serde(rename = "tokensOriginalJson")]
    pub tokens_original_json: String,
    #[serde(rename = "tokensTranslatedJson")]
    pub tokens_translated_json: String,
    #[serde(rename = "alignmentsJson")]
    pub alignments_json: String,
    #[serde(rename = "explanationsJson")]
    pub explanations_json: String,
    #[serde(rename = "quizJson", skip_serializing_if = "Option::is_none")]
    pub quiz_json: Option<String>,
}

/// Composed API result, recomputed or rehydrated per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    #[serde(rename = "originalText")]
    pub original_text: String,
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    #[serde(rename = "sourceLanguageCode")]
    pub source_language_code: String,
    #[serde(rename = "targetLanguageCode")]
    pub target_language_code: String,
    #[serde(rename = "tokensOriginal")]
    pub tokens_original: Vec<DisplayableToken>,
    #[serde(rename = "tokensTranslated")]
    pub tokens_translated: Vec<DisplayableToken>,
    pub alignments: Vec<PhraseAlignment>,
    pub explanations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz: Option<Vec<QuizQuestion>>,
}

impl Token {
    pub fn new(text: impl Into<String>, grammatical_type: GrammaticalType) -> Self {
        let text = text.into();
        let lemma = text.clone();
        Self {
            text,
            grammatical_type,
            lemma,
        }
    }
}
