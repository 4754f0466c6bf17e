//! Document retriever trait

use async_trait::async_trait;

use super::document::{Document, NewDocument, RetrievedDocument};

#[cfg(test)]
use mockall::automock;

/// Ranks stored documents against free-text queries
///
/// None of the operations fail: persistence problems are handled inside the
/// implementation and the in-memory collection stays authoritative.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    /// Returns at most `top_k` documents ordered by descending similarity
    async fn query(&self, text: &str, top_k: usize) -> Vec<RetrievedDocument>;

    /// Adds (or replaces, when the id already exists) a document, returning its id
    async fn add_document(&self, document: NewDocument) -> String;

    /// Removes a document, returns false if the id was unknown
    async fn remove_document(&self, id: &str) -> bool;

    /// Snapshot of the collection in index order
    async fn documents(&self) -> Vec<Document>;
}
