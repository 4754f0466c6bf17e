//! Knowledge base infrastructure - Lexical retrieval over a persisted collection

mod lexical;

pub use lexical::{LexicalRetriever, LexicalRetrieverConfig, KNOWLEDGE_BASE_KEY};
