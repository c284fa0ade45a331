pub mod dictionary;
pub mod loader;
pub mod phonetic;
pub mod processor;
pub mod prompt;
pub mod retriever;
pub mod tabular;
pub mod translator;

pub use dictionary::KhitanGlossary;
pub use loader::{GlossaryLoader, TabularLoad};
pub use processor::KhitanProcessor;
pub use retriever::{ContextMatch, ContextRetriever, DEFAULT_MAX_CONTEXT_ENTRIES, NO_MATCH_FALLBACK};
pub use tabular::TextEncoding;
pub use translator::DeepSeekClient;
