pub mod dictionary;
pub mod error;
pub mod language;
pub mod preprocess;
pub mod types;

pub use dictionary::{Dictionary, DictionaryMetadata, Entry, LoadError, MatchType, SourceKind};
pub use error::QueryError;
pub use language::{ContextBlock, Direction, LanguageProcessor, ParseDirectionError, Token};
pub use preprocess::{DefaultPreprocessor, Preprocessor, normalize_phonetic};
