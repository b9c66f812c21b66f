use std::sync::Arc;

use crate::cache::MemoryStore;
use crate::config::Config;
use crate::engine::TranslationEngine;
use crate::services::{HttpCompletionService, HttpTokenizer};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub engine: Arc<TranslationEngine>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let tokenizer = Arc::new(HttpTokenizer::new(config.services.tokenizer_url.clone()));
        let completion = Arc::new(HttpCompletionService::new(
            config.services.completion_url.clone(),
        ));
        let store = Arc::new(MemoryStore::new());

        let engine = Arc::new(TranslationEngine::new(tokenizer, completion, store));
        Self { config, engine }
    }
}
