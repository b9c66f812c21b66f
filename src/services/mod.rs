//! External collaborator clients: syntax tokenizer and completion service.

pub mod completion;
pub mod tokenizer;

pub use completion::{CompletionService, HttpCompletionService};
pub use tokenizer::{HttpTokenizer, SyntaxTokenizer};
