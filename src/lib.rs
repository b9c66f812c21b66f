//! AI-enhanced phrase translation backend.
//!
//! The core is the alignment-and-parsing engine: extracting structured
//! fields from a free-form completion response, reconciling AI-proposed
//! segment correspondences with tokenized sentences, coloring aligned and
//! unaligned tokens, and content-addressed reuse of computed results. The
//! HTTP layer, tokenizer and completion clients are thin plumbing around it.

pub mod align;
pub mod cache;
pub mod colors;
pub mod config;
pub mod engine;
pub mod error;
pub mod locator;
pub mod parser;
pub mod prompt;
pub mod routes;
pub mod services;
pub mod state;
pub mod types;
