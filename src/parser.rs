//! Extraction of structured fields from the free-form completion response.
//!
//! The response is expected to carry five marker-introduced sections in a
//! fixed order, two of them wrapped in fenced ```json blocks. The marker set
//! is a versioned contract with the prompt in [`crate::prompt`]; a missing
//! marker, unparsable block or failed validation degrades that one field to
//! `None` and never aborts the others.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::types::{QuizQuestion, SegmentMapping};

/// Maximum quiz questions kept from one response.
pub const MAX_QUIZ_QUESTIONS: usize = 3;

/// Recognized section markers, in the order the prompt requests them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMarker {
    Translation,
    OriginalGrammar,
    TranslatedGrammar,
    SegmentMappings,
    VocabularyQuiz,
}

impl SectionMarker {
    pub const ALL: [SectionMarker; 5] = [
        SectionMarker::Translation,
        SectionMarker::OriginalGrammar,
        SectionMarker::TranslatedGrammar,
        SectionMarker::SegmentMappings,
        SectionMarker::VocabularyQuiz,
    ];

    /// Exact marker label, without the trailing colon.
    pub const fn label(self) -> &'static str {
        match self {
            SectionMarker::Translation => "TRADUCAO",
            SectionMarker::OriginalGrammar => "GRAMATICA_ORIGINAL",
            SectionMarker::TranslatedGrammar => "GRAMATICA_TRADUZIDA",
            SectionMarker::SegmentMappings => "MAPEAMENTO_JSON",
            SectionMarker::VocabularyQuiz => "QUIZ_VOCABULARIO_JSON",
        }
    }

    /// The marker expected to follow this one.
    const fn next(self) -> Option<SectionMarker> {
        match self {
            SectionMarker::Translation => Some(SectionMarker::OriginalGrammar),
            SectionMarker::OriginalGrammar => Some(SectionMarker::TranslatedGrammar),
            SectionMarker::TranslatedGrammar => Some(SectionMarker::SegmentMappings),
            SectionMarker::SegmentMappings => Some(SectionMarker::VocabularyQuiz),
            SectionMarker::VocabularyQuiz => None,
        }
    }

    fn regex(self) -> &'static Regex {
        static MARKER_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
            SectionMarker::ALL
                .iter()
                .map(|m| Regex::new(&format!(r"(?i){}:", m.label())).expect("marker regex"))
                .collect()
        });
        &MARKER_RES[self as usize]
    }
}

static JSON_FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```json\s*(.*?)\s*```").expect("fence regex"));

/// Fields extracted from one completion response. `quiz: Some(vec![])` is a
/// syntactically valid empty quiz, distinct from `None` (rejected or absent).
#[derive(Debug, Default, Clone)]
pub struct ParsedAiResponse {
    pub translation: Option<String>,
    pub original_grammar: Option<String>,
    pub translated_grammar: Option<String>,
    pub segment_mappings: Option<Vec<SegmentMapping>>,
    pub quiz: Option<Vec<QuizQuestion>>,
}

pub fn parse_ai_response(text: &str) -> ParsedAiResponse {
    debug!(length = text.len(), "parsing AI response");

    let translation = section_text(text, SectionMarker::Translation);
    let original_grammar = section_text(text, SectionMarker::OriginalGrammar);
    let translated_grammar = section_text(text, SectionMarker::TranslatedGrammar);

    let segment_mappings = fenced_json(text, SectionMarker::SegmentMappings)
        .and_then(|raw| match serde_json::from_str::<Vec<SegmentMapping>>(&raw) {
            Ok(mappings) => Some(mappings),
            Err(err) => {
                warn!(%err, "failed to parse segment mapping JSON");
                None
            }
        });

    let quiz = fenced_json(text, SectionMarker::VocabularyQuiz).and_then(|raw| validate_quiz(&raw));

    if translation.is_none() {
        warn!("could not parse {} section", SectionMarker::Translation.label());
    }
    if segment_mappings.is_none() {
        warn!("could not parse {} section", SectionMarker::SegmentMappings.label());
    }

    ParsedAiResponse {
        translation,
        original_grammar,
        translated_grammar,
        segment_mappings,
        quiz,
    }
}

/// Text between this marker and the next expected marker (or end of input),
/// trimmed. `None` when the marker is absent or the section is blank.
fn section_text(text: &str, marker: SectionMarker) -> Option<String> {
    let (_, body_start) = find_marker(text, marker)?;
    let body_end = marker
        .next()
        .and_then(|next| find_marker(&text[body_start..], next))
        .map(|(start, _)| body_start + start)
        .unwrap_or(text.len());

    let body = text[body_start..body_end].trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Content of the ```json fence inside the marker's section.
fn fenced_json(text: &str, marker: SectionMarker) -> Option<String> {
    let (_, body_start) = find_marker(text, marker)?;
    let body_end = marker
        .next()
        .and_then(|next| find_marker(&text[body_start..], next))
        .map(|(start, _)| body_start + start)
        .unwrap_or(text.len());

    JSON_FENCE_RE
        .captures(&text[body_start..body_end])
        .map(|caps| caps[1].to_string())
}

/// First case-insensitive occurrence of the marker; returns (start of the
/// marker, end of its colon).
fn find_marker(text: &str, marker: SectionMarker) -> Option<(usize, usize)> {
    marker.regex().find(text).map(|m| (m.start(), m.end()))
}

/// Whole-list quiz validation: every element must carry the five required
/// fields with a correct-option index in bounds. One malformed element
/// rejects the entire list; a valid empty list is accepted as-is.
fn validate_quiz(raw: &str) -> Option<Vec<QuizQuestion>> {
    let questions: Vec<QuizQuestion> = match serde_json::from_str(raw) {
        Ok(questions) => questions,
        Err(err) => {
            warn!(%err, "failed to parse vocabulary quiz JSON");
            return None;
        }
    };

    for question in &questions {
        if question.options.is_empty() || question.correct_option_index >= question.options.len() {
            warn!(
                tested_word = %question.original_tested_word,
                "quiz question has out-of-bounds correct_option_index, rejecting quiz"
            );
            return None;
        }
    }

    if questions.len() > MAX_QUIZ_QUESTIONS {
        warn!(
            count = questions.len(),
            "AI produced more than {MAX_QUIZ_QUESTIONS} quiz questions, truncating"
        );
    }

    let mut questions = questions;
    questions.truncate(MAX_QUIZ_QUESTIONS);
    Some(questions)
}
