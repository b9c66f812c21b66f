//! Reconciles AI segment mappings with tokenized sentences and paints the
//! resulting alignment set.
//!
//! Output ordering matters to the coloring pass: AI-derived alignments come
//! first in mapping input order, then synthetic unaligned records for
//! leftover original tokens, then for leftover translated tokens.

use std::collections::HashSet;

use rand::Rng;
use tracing::warn;

use crate::colors::ColorAllocator;
use crate::locator::find_segment_indices;
use crate::types::{
    AlignmentSource, DisplayableToken, PhraseAlignment, SegmentMapping, Token,
};

/// Turns AI segment mappings into alignment records and synthesizes
/// `unaligned` records for every token left unconsumed on either side.
pub fn build_alignments(
    mappings: &[SegmentMapping],
    original_tokens: &[Token],
    translated_tokens: &[Token],
) -> Vec<PhraseAlignment> {
    let mut alignments = Vec::new();
    let mut consumed_original: HashSet<usize> = HashSet::new();
    let mut consumed_translated: HashSet<usize> = HashSet::new();

    for mapping in mappings {
        if mapping.original_segment.is_empty() || mapping.translated_segment.is_empty() {
            warn!(?mapping, "mapping with empty segment, skipping");
            continue;
        }

        let original_indices = find_segment_indices(&mapping.original_segment, original_tokens);
        let translated_indices =
            find_segment_indices(&mapping.translated_segment, translated_tokens);

        if original_indices.is_empty() && translated_indices.is_empty() {
            warn!(
                original = %mapping.original_segment,
                translated = %mapping.translated_segment,
                "could not map AI segments to tokens on either side"
            );
            continue;
        }

        consumed_original.extend(original_indices.iter().copied());
        consumed_translated.extend(translated_indices.iter().copied());
        alignments.push(PhraseAlignment {
            original_token_indices: original_indices,
            translated_token_indices: translated_indices,
            original_text_segment: mapping.original_segment.clone(),
            translated_text_segment: mapping.translated_segment.clone(),
            source: AlignmentSource::IaGeneratedAlignment,
        });
    }

    for (index, token) in original_tokens.iter().enumerate() {
        if !consumed_original.contains(&index) {
            alignments.push(PhraseAlignment {
                original_token_indices: vec![index],
                translated_token_indices: Vec::new(),
                original_text_segment: token.text.clone(),
                translated_text_segment: String::new(),
                source: AlignmentSource::Unaligned,
            });
        }
    }
    for (index, token) in translated_tokens.iter().enumerate() {
        if !consumed_translated.contains(&index) {
            alignments.push(PhraseAlignment {
                original_token_indices: Vec::new(),
                translated_token_indices: vec![index],
                original_text_segment: String::new(),
                translated_text_segment: token.text.clone(),
                source: AlignmentSource::Unaligned,
            });
        }
    }

    alignments
}

/// Two-phase coloring: every token starts with an independent random color,
/// then each dual-sided AI alignment overwrites its indices on both sides
/// with one shared color. Tokens never touched by a dual-sided alignment are
/// re-rolled so cache replays stay visually varied.
pub fn apply_colors<R: Rng>(
    original_tokens: &[Token],
    translated_tokens: &[Token],
    alignments: &[PhraseAlignment],
    allocator: &mut ColorAllocator<R>,
) -> (Vec<DisplayableToken>, Vec<DisplayableToken>) {
    let mut displayable_original: Vec<DisplayableToken> = original_tokens
        .iter()
        .map(|token| {
            let (background_color, text_color) = allocator.color_pair();
            DisplayableToken {
                token: token.clone(),
                background_color,
                text_color,
                is_unused: Some(true),
            }
        })
        .collect();

    let mut displayable_translated: Vec<DisplayableToken> = translated_tokens
        .iter()
        .map(|token| {
            let (background_color, text_color) = allocator.color_pair();
            DisplayableToken {
                token: token.clone(),
                background_color,
                text_color,
                is_unused: None,
            }
        })
        .collect();

    let mut used_original: HashSet<usize> = HashSet::new();
    let mut used_translated: HashSet<usize> = HashSet::new();

    for alignment in alignments.iter().filter(|a| {
        a.source == AlignmentSource::IaGeneratedAlignment
            && !a.original_token_indices.is_empty()
            && !a.translated_token_indices.is_empty()
    }) {
        let (shared_background, shared_text) = allocator.color_pair();

        for &index in &alignment.original_token_indices {
            if let Some(token) = displayable_original.get_mut(index) {
                token.background_color = shared_background.clone();
                token.text_color = shared_text;
                token.is_unused = Some(false);
                used_original.insert(index);
            }
        }
        for &index in &alignment.translated_token_indices {
            if let Some(token) = displayable_translated.get_mut(index) {
                token.background_color = shared_background.clone();
                token.text_color = shared_text;
                used_translated.insert(index);
            }
        }
    }

    for (index, token) in displayable_original.iter_mut().enumerate() {
        if !used_original.contains(&index) {
            let (background_color, text_color) = allocator.color_pair();
            token.background_color = background_color;
            token.text_color = text_color;
            token.is_unused = Some(true);
        }
    }
    for (index, token) in displayable_translated.iter_mut().enumerate() {
        if !used_translated.contains(&index) {
            let (background_color, text_color) = allocator.color_pair();
            token.background_color = background_color;
            token.text_color = text_color;
        }
    }

    (displayable_original, displayable_translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GrammaticalType;

    fn tokens(words: &[&str]) -> Vec<Token> {
        words
            .iter()
            .map(|w| Token::new(*w, GrammaticalType::Unknown))
            .collect()
    }

    fn mapping(original: &str, translated: &str) -> SegmentMapping {
        SegmentMapping {
            original_segment: original.to_string(),
            translated_segment: translated.to_string(),
        }
    }

    #[test]
    fn mappings_resolve_on_both_sides() {
        let original = tokens(&["Eu", "gostaria", "de", "um", "café"]);
        let translated = tokens(&["I", "would", "like", "a", "coffee"]);
        let mappings = vec![
            mapping("Eu", "I"),
            mapping("gostaria de", "would like"),
            mapping("um café", "a coffee"),
        ];

        let alignments = build_alignments(&mappings, &original, &translated);
        let ai: Vec<_> = alignments
            .iter()
            .filter(|a| a.source == AlignmentSource::IaGeneratedAlignment)
            .collect();
        assert_eq!(ai.len(), 3);
        assert_eq!(ai[1].original_token_indices, vec![1, 2]);
        assert_eq!(ai[1].translated_token_indices, vec![1, 2]);
        // Everything consumed, no unaligned leftovers.
        assert_eq!(alignments.len(), 3);
    }

    #[test]
    fn one_sided_resolution_still_consumes_that_side() {
        let original = tokens(&["bom", "dia"]);
        let translated = tokens(&["good", "morning"]);
        let mappings = vec![mapping("bom dia", "guten morgen")];

        let alignments = build_alignments(&mappings, &original, &translated);
        let ai = &alignments[0];
        assert_eq!(ai.source, AlignmentSource::IaGeneratedAlignment);
        assert_eq!(ai.original_token_indices, vec![0, 1]);
        assert!(ai.translated_token_indices.is_empty());

        // Translated side untouched: both tokens get unaligned records.
        let unaligned: Vec<_> = alignments
            .iter()
            .filter(|a| a.source == AlignmentSource::Unaligned)
            .collect();
        assert_eq!(unaligned.len(), 2);
        assert!(unaligned.iter().all(|a| a.original_token_indices.is_empty()));
    }

    #[test]
    fn unresolvable_mapping_is_dropped() {
        let original = tokens(&["um", "café"]);
        let translated = tokens(&["a", "coffee"]);
        let mappings = vec![mapping("xyz", "zyx"), mapping("café", "coffee")];

        let alignments = build_alignments(&mappings, &original, &translated);
        let ai: Vec<_> = alignments
            .iter()
            .filter(|a| a.source == AlignmentSource::IaGeneratedAlignment)
            .collect();
        assert_eq!(ai.len(), 1);
        assert_eq!(ai[0].original_text_segment, "café");
    }

    #[test]
    fn partition_property_holds_on_both_sides() {
        let original = tokens(&["Eu", "gostaria", "de", "um", "café"]);
        let translated = tokens(&["I", "would", "like", "a", "coffee"]);
        let mappings = vec![mapping("gostaria de", "would like")];

        let alignments = build_alignments(&mappings, &original, &translated);

        let mut seen_original = Vec::new();
        let mut seen_translated = Vec::new();
        for alignment in &alignments {
            seen_original.extend(alignment.original_token_indices.iter().copied());
            seen_translated.extend(alignment.translated_token_indices.iter().copied());
        }
        seen_original.sort_unstable();
        seen_translated.sort_unstable();
        assert_eq!(seen_original, (0..original.len()).collect::<Vec<_>>());
        assert_eq!(seen_translated, (0..translated.len()).collect::<Vec<_>>());
    }

    #[test]
    fn output_ordering_groups_ai_then_unaligned() {
        let original = tokens(&["Eu", "gostaria", "de", "um", "café"]);
        let translated = tokens(&["I", "would", "like", "a", "coffee"]);
        let mappings = vec![mapping("gostaria de", "would like")];

        let alignments = build_alignments(&mappings, &original, &translated);
        assert_eq!(alignments[0].source, AlignmentSource::IaGeneratedAlignment);
        // Unaligned originals in token order, then unaligned translated.
        assert_eq!(alignments[1].original_token_indices, vec![0]);
        assert_eq!(alignments[2].original_token_indices, vec![3]);
        assert_eq!(alignments[3].original_token_indices, vec![4]);
        assert_eq!(alignments[4].translated_token_indices, vec![0]);
        assert_eq!(alignments[5].translated_token_indices, vec![3]);
        assert_eq!(alignments[6].translated_token_indices, vec![4]);
    }

    #[test]
    fn dual_sided_alignment_shares_one_color_pair() {
        let original = tokens(&["gostaria", "de"]);
        let translated = tokens(&["would", "like"]);
        let alignments = vec![PhraseAlignment {
            original_token_indices: vec![0, 1],
            translated_token_indices: vec![0, 1],
            original_text_segment: "gostaria de".to_string(),
            translated_text_segment: "would like".to_string(),
            source: AlignmentSource::IaGeneratedAlignment,
        }];

        let mut allocator = ColorAllocator::seeded(11);
        let (orig, trans) = apply_colors(&original, &translated, &alignments, &mut allocator);

        let shared = &orig[0].background_color;
        assert!(orig.iter().all(|t| &t.background_color == shared));
        assert!(trans.iter().all(|t| &t.background_color == shared));
        assert!(orig.iter().all(|t| t.text_color == orig[0].text_color));
        assert!(orig.iter().all(|t| t.is_unused == Some(false)));
        assert!(trans.iter().all(|t| t.is_unused.is_none()));
    }

    #[test]
    fn one_sided_alignment_does_not_link_colors() {
        let original = tokens(&["bom", "dia"]);
        let translated = tokens(&["good", "morning"]);
        let alignments = vec![PhraseAlignment {
            original_token_indices: vec![0, 1],
            translated_token_indices: Vec::new(),
            original_text_segment: "bom dia".to_string(),
            translated_text_segment: "guten morgen".to_string(),
            source: AlignmentSource::IaGeneratedAlignment,
        }];

        let mut allocator = ColorAllocator::seeded(5);
        let (orig, _) = apply_colors(&original, &translated, &alignments, &mut allocator);
        // Single-sided alignments never clear the unused flag.
        assert!(orig.iter().all(|t| t.is_unused == Some(true)));
    }

    #[test]
    fn unaligned_tokens_keep_independent_colors_and_unused_flag() {
        let original = tokens(&["Eu", "gostaria"]);
        let translated = tokens(&["I", "would"]);
        let alignments = vec![
            PhraseAlignment {
                original_token_indices: vec![1],
                translated_token_indices: vec![1],
                original_text_segment: "gostaria".to_string(),
                translated_text_segment: "would".to_string(),
                source: AlignmentSource::IaGeneratedAlignment,
            },
            PhraseAlignment {
                original_token_indices: vec![0],
                translated_token_indices: Vec::new(),
                original_text_segment: "Eu".to_string(),
                translated_text_segment: String::new(),
                source: AlignmentSource::Unaligned,
            },
        ];

        let mut allocator = ColorAllocator::seeded(23);
        let (orig, trans) = apply_colors(&original, &translated, &alignments, &mut allocator);
        assert_eq!(orig[0].is_unused, Some(true));
        assert_eq!(orig[1].is_unused, Some(false));
        assert_eq!(orig[1].background_color, trans[1].background_color);
    }
}
