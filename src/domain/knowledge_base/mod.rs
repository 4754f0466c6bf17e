//! Knowledge base domain - Documents and lexical similarity

mod document;
mod retriever;
mod seed;
mod term_vector;

pub use document::{
    format_context, Document, DocumentMetadata, NewDocument, RetrievedDocument, SourceRef,
};
pub use retriever::DocumentRetriever;
pub use seed::seed_documents;
pub use term_vector::{content_hash, cosine_similarity, IndexEntry, ScoredResult, TermVector};

#[cfg(test)]
pub use retriever::MockDocumentRetriever;
