//! Content-addressed reuse of computed translations.
//!
//! The cache key is a SHA-256 digest over the normalized phrase and both
//! language codes. Lookup still matches the language codes explicitly; the
//! digest alone is not trusted across language-code variations.

use async_trait::async_trait;
use dashmap::DashMap;
use sha2::{Digest, Sha256};

use crate::types::TranslationRecord;

/// Hex digest of `normalizedPhrase:sourceLang:targetLang`. The phrase must
/// already be normalized (lowercased and trimmed); language codes go in
/// verbatim.
pub fn phrase_cache_key(normalized_phrase: &str, source_lang: &str, target_lang: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{normalized_phrase}:{source_lang}:{target_lang}"));
    hex::encode(hasher.finalize())
}

/// Durable record store for computed translations. Records are create-only;
/// eviction, if any, belongs to the backend.
#[async_trait]
pub trait TranslationStore: Send + Sync {
    async fn find(
        &self,
        key: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> anyhow::Result<Option<TranslationRecord>>;

    async fn create(&self, record: TranslationRecord) -> anyhow::Result<()>;
}

/// In-process store backed by a concurrent map. Grows without bound.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, TranslationRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl TranslationStore for MemoryStore {
    async fn find(
        &self,
        key: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> anyhow::Result<Option<TranslationRecord>> {
        Ok(self.records.get(key).map(|r| r.value().clone()).filter(|r| {
            r.source_language_code == source_lang && r.target_language_code == target_lang
        }))
    }

    async fn create(&self, record: TranslationRecord) -> anyhow::Result<()> {
        self.records
            .insert(record.original_text_hash.clone(), record);
        Ok(())
    }
}
