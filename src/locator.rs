//! Locates an AI-proposed text segment inside an ordered token sequence.
//!
//! AI segments do not always line up with tokenizer boundaries (multi-word
//! idioms, contractions), so lookup runs two passes: a cheap exact
//! word-window match, then a bounded concatenation fallback that rebuilds
//! the segment from consecutive token texts.

use tracing::{debug, warn};

use crate::types::Token;

/// How far past the segment length a concatenation may grow before the scan
/// from a given start index is abandoned.
const CONCAT_OVERRUN_LIMIT: usize = 15;

/// Contiguous token-index run reconstructing `segment`, or empty when the
/// segment is not attributable to these tokens.
pub fn find_segment_indices(segment: &str, tokens: &[Token]) -> Vec<usize> {
    if segment.trim().is_empty() || tokens.is_empty() {
        return Vec::new();
    }

    let normalized = segment.to_lowercase().trim().to_string();
    let words: Vec<&str> = normalized.split_whitespace().collect();
    if words.is_empty() {
        return Vec::new();
    }

    // Pass 1: exact window match, leftmost wins.
    if tokens.len() >= words.len() {
        for start in 0..=(tokens.len() - words.len()) {
            let matches = words
                .iter()
                .enumerate()
                .all(|(offset, word)| tokens[start + offset].text.to_lowercase() == *word);
            if matches {
                return (start..start + words.len()).collect();
            }
        }
    }

    // Pass 2: rebuild the segment by concatenating consecutive token texts.
    for start in 0..tokens.len() {
        let mut concatenated = String::new();
        let mut indices = Vec::new();
        for (index, token) in tokens.iter().enumerate().skip(start) {
            if !indices.is_empty() {
                concatenated.push(' ');
            }
            concatenated.push_str(&token.text.to_lowercase());
            indices.push(index);
            if concatenated == normalized {
                debug!(segment, ?indices, "segment found by concatenation");
                return indices;
            }
            if concatenated.len() > normalized.len() + CONCAT_OVERRUN_LIMIT {
                break;
            }
        }
    }

    warn!(segment, "segment not found in tokens");
    Vec::new()
}
