//! Term-frequency retriever backed by a key-value store
//!
//! The whole collection is held in memory and written back to the store
//! after every mutation. Ranking is plain cosine similarity between term
//! vectors of the query and of each document's content.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use moka::sync::Cache as MokaCache;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::knowledge_base::{
    content_hash, cosine_similarity, seed_documents, Document, DocumentRetriever, IndexEntry,
    NewDocument, RetrievedDocument, ScoredResult, TermVector,
};
use crate::domain::storage::{KeyValueStore, KeyValueStoreExt};

/// Store key holding the document collection
pub const KNOWLEDGE_BASE_KEY: &str = "n8nKnowledgeBase";

/// Configuration for the lexical retriever
#[derive(Debug, Clone)]
pub struct LexicalRetrieverConfig {
    /// Maximum number of memoized term vectors
    pub term_cache_capacity: u64,
}

impl Default for LexicalRetrieverConfig {
    fn default() -> Self {
        Self {
            term_cache_capacity: 1000,
        }
    }
}

impl LexicalRetrieverConfig {
    pub fn with_term_cache_capacity(mut self, capacity: u64) -> Self {
        self.term_cache_capacity = capacity;
        self
    }
}

/// Documents and their index entries, kept position-aligned
#[derive(Default)]
struct State {
    documents: Vec<Document>,
    index: Vec<IndexEntry>,
}

impl State {
    fn position(&self, id: &str) -> Option<usize> {
        self.documents.iter().position(|d| d.id == id)
    }
}

#[derive(Clone)]
struct CachedVector {
    text: Arc<str>,
    vector: Arc<TermVector>,
}

pub struct LexicalRetriever {
    store: Arc<dyn KeyValueStore>,
    state: RwLock<State>,
    term_cache: MokaCache<i32, CachedVector>,
}

impl fmt::Debug for LexicalRetriever {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LexicalRetriever")
            .field("store", &self.store)
            .field("cached_vectors", &self.term_cache.entry_count())
            .finish_non_exhaustive()
    }
}

impl LexicalRetriever {
    /// Loads the collection from the store, seeding it when absent
    ///
    /// A failed read falls back to the built-in corpus without writing it
    /// back, so a flaky store is never overwritten.
    pub async fn initialize(store: Arc<dyn KeyValueStore>, config: LexicalRetrieverConfig) -> Self {
        let (documents, persist) = match store.get_typed::<Vec<Document>>(KNOWLEDGE_BASE_KEY).await
        {
            Ok(Some(documents)) => {
                debug!(count = documents.len(), "Loaded knowledge base from store");
                (documents, false)
            }
            Ok(None) => {
                info!("No stored knowledge base, seeding built-in documents");
                (seed_documents(), true)
            }
            Err(e) => {
                warn!(error = %e, "Failed to load knowledge base, using built-in documents");
                (seed_documents(), false)
            }
        };

        let retriever = Self {
            store,
            state: RwLock::new(State::default()),
            term_cache: MokaCache::builder()
                .max_capacity(config.term_cache_capacity)
                .build(),
        };

        {
            let mut state = retriever.state.write().await;
            for document in documents {
                if retriever.upsert(&mut state, document) {
                    warn!("Stored knowledge base contained a duplicate document id");
                }
            }

            if persist {
                retriever.persist(&state).await;
            }

            info!(documents = state.documents.len(), "Knowledge base initialized");
        }

        retriever
    }

    /// Term vector of `text`, memoized by content hash
    pub fn compute_term_vector(&self, text: &str) -> Arc<TermVector> {
        let key = content_hash(text);

        if let Some(cached) = self.term_cache.get(&key) {
            // distinct texts can share a hash
            if *cached.text == *text {
                return cached.vector;
            }
        }

        let vector = Arc::new(TermVector::from_text(text));
        self.term_cache.insert(
            key,
            CachedVector {
                text: Arc::from(text),
                vector: Arc::clone(&vector),
            },
        );
        vector
    }

    /// Scores every index entry against `text`, best first
    ///
    /// Equal scores keep index order.
    pub async fn rank(&self, text: &str) -> Vec<ScoredResult> {
        let query = self.compute_term_vector(text);
        let state = self.state.read().await;
        Self::score(&state, &query)
    }

    pub async fn document(&self, id: &str) -> Option<Document> {
        let state = self.state.read().await;
        state.position(id).map(|i| state.documents[i].clone())
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn score(state: &State, query: &TermVector) -> Vec<ScoredResult> {
        let mut results: Vec<ScoredResult> = state
            .index
            .iter()
            .map(|entry| ScoredResult {
                id: entry.id.clone(),
                score: cosine_similarity(query, &entry.vector),
                metadata: entry.metadata.clone(),
            })
            .collect();

        // sort_by is stable
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }

    fn index_entry(&self, document: &Document) -> IndexEntry {
        IndexEntry {
            id: document.id.clone(),
            vector: TermVector::clone(&self.compute_term_vector(&document.content)),
            metadata: document.metadata(),
        }
    }

    /// Inserts or replaces in place, returns true when an entry was replaced
    fn upsert(&self, state: &mut State, document: Document) -> bool {
        let entry = self.index_entry(&document);

        match state.position(&document.id) {
            Some(i) => {
                state.documents[i] = document;
                state.index[i] = entry;
                true
            }
            None => {
                state.documents.push(document);
                state.index.push(entry);
                false
            }
        }
    }

    fn generate_id(state: &State) -> String {
        let base = format!("doc-{}", Utc::now().timestamp_millis());
        if state.position(&base).is_none() {
            return base;
        }

        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if state.position(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    async fn persist(&self, state: &State) {
        if let Err(e) = self.store.set_typed(KNOWLEDGE_BASE_KEY, &state.documents).await {
            warn!(error = %e, "Failed to persist knowledge base");
        }
    }
}

#[async_trait]
impl DocumentRetriever for LexicalRetriever {
    async fn query(&self, text: &str, top_k: usize) -> Vec<RetrievedDocument> {
        if top_k == 0 {
            return Vec::new();
        }

        let query = self.compute_term_vector(text);
        let state = self.state.read().await;

        Self::score(&state, &query)
            .into_iter()
            .take(top_k)
            .filter_map(|result| {
                state.position(&result.id).map(|i| RetrievedDocument {
                    document: state.documents[i].clone(),
                    score: result.score,
                })
            })
            .collect()
    }

    async fn add_document(&self, document: NewDocument) -> String {
        let mut state = self.state.write().await;

        let id = match document.id.clone().filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => Self::generate_id(&state),
        };

        let replaced = self.upsert(&mut state, document.into_document(id.clone()));
        info!(id = %id, replaced, "Document added to knowledge base");

        self.persist(&state).await;
        id
    }

    async fn remove_document(&self, id: &str) -> bool {
        let mut state = self.state.write().await;

        let removed = match state.position(id) {
            Some(i) => {
                state.documents.remove(i);
                state.index.remove(i);
                true
            }
            None => false,
        };

        if removed {
            info!(id = %id, "Document removed from knowledge base");
        } else {
            debug!(id = %id, "Document to remove not found");
        }

        self.persist(&state).await;
        removed
    }

    async fn documents(&self) -> Vec<Document> {
        self.state.read().await.documents.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockKeyValueStore;
    use serde_json::json;

    async fn seeded() -> (Arc<MockKeyValueStore>, LexicalRetriever) {
        let store = Arc::new(MockKeyValueStore::new());
        let retriever =
            LexicalRetriever::initialize(store.clone(), LexicalRetrieverConfig::default()).await;
        (store, retriever)
    }

    fn stored_ids(store: &MockKeyValueStore) -> Vec<String> {
        store
            .snapshot(KNOWLEDGE_BASE_KEY)
            .and_then(|v| v.as_array().cloned())
            .unwrap_or_default()
            .iter()
            .map(|d| d["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_initialize_seeds_and_persists() {
        let (store, retriever) = seeded().await;

        assert_eq!(retriever.len().await, 8);
        assert_eq!(store.write_count(), 1);
        assert_eq!(stored_ids(&store).len(), 8);
        assert_eq!(stored_ids(&store)[0], "api-workflows");
    }

    #[tokio::test]
    async fn test_initialize_uses_stored_collection() {
        let store = Arc::new(MockKeyValueStore::new().with_entry(
            KNOWLEDGE_BASE_KEY,
            json!([{ "id": "only", "title": "Only", "content": "cron schedule", "category": "x" }]),
        ));

        let retriever =
            LexicalRetriever::initialize(store.clone(), LexicalRetrieverConfig::default()).await;

        assert_eq!(retriever.len().await, 1);
        assert_eq!(store.write_count(), 0);
        let doc = retriever.document("only").await.unwrap();
        assert!(doc.tags.is_empty());
    }

    #[tokio::test]
    async fn test_initialize_read_failure_falls_back_without_writing() {
        let store = Arc::new(MockKeyValueStore::new().with_read_error("disk unavailable"));

        let retriever =
            LexicalRetriever::initialize(store.clone(), LexicalRetrieverConfig::default()).await;

        assert_eq!(retriever.len().await, 8);
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_initialize_collapses_duplicate_ids() {
        let store = Arc::new(MockKeyValueStore::new().with_entry(
            KNOWLEDGE_BASE_KEY,
            json!([
                { "id": "a", "title": "First", "content": "one" },
                { "id": "b", "title": "Second", "content": "two" },
                { "id": "a", "title": "Third", "content": "three" }
            ]),
        ));

        let retriever =
            LexicalRetriever::initialize(store, LexicalRetrieverConfig::default()).await;
        let docs = retriever.documents().await;

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "a");
        assert_eq!(docs[0].title, "Third");
    }

    #[tokio::test]
    async fn test_query_is_deterministic() {
        let (_, retriever) = seeded().await;

        let first = retriever.query("how do I fix authentication errors", 5).await;
        let second = retriever.query("how do I fix authentication errors", 5).await;

        let ids = |r: &[RetrievedDocument]| {
            r.iter().map(|d| d.id().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(ids(&first), ids(&second));
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.score.to_bits(), b.score.to_bits());
        }
    }

    #[tokio::test]
    async fn test_query_caps_results() {
        let (_, retriever) = seeded().await;

        for k in [0, 1, 3, 8, 20] {
            assert_eq!(retriever.query("workflow", k).await.len(), k.min(8));
        }
    }

    #[tokio::test]
    async fn test_query_orders_by_descending_score() {
        let (_, retriever) = seeded().await;

        let results = retriever.query("workflow nodes connections json", 8).await;

        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for result in &results {
            assert!((0.0..=1.0).contains(&result.score));
        }
    }

    #[tokio::test]
    async fn test_trigger_query_prefers_triggers_overview() {
        let (_, retriever) = seeded().await;

        let results = retriever.query("N8N trigger webhook configuration", 2).await;
        let ranked = retriever.rank("N8N trigger webhook configuration").await;

        assert_eq!(results[0].title(), "N8N Triggers Overview");
        let position = |id: &str| ranked.iter().position(|r| r.id == id).unwrap();
        assert!(position("triggers-overview") < position("mspc-integration"));
    }

    #[tokio::test]
    async fn test_empty_query_scores_zero() {
        let (_, retriever) = seeded().await;

        let results = retriever.query("", 3).await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.score == 0.0));
    }

    #[tokio::test]
    async fn test_ties_keep_index_order() {
        let (_, retriever) = seeded().await;

        let ranked = retriever.rank("").await;
        let ids: Vec<_> = retriever.documents().await.into_iter().map(|d| d.id).collect();

        assert_eq!(ranked.iter().map(|r| r.id.clone()).collect::<Vec<_>>(), ids);
    }

    #[tokio::test]
    async fn test_added_document_matches_itself() {
        let (store, retriever) = seeded().await;
        let content = "Zendesk ticket escalation via pagerduty incident routing";

        let id = retriever
            .add_document(NewDocument::new("Escalation", content).with_category("custom"))
            .await;

        let results = retriever.query(content, 1).await;
        assert_eq!(results[0].id(), id);
        assert!((results[0].score - 1.0).abs() < 1e-12);
        assert_eq!(retriever.len().await, 9);
        assert!(stored_ids(&store).contains(&id));
    }

    #[tokio::test]
    async fn test_generated_ids_are_unique() {
        let (_, retriever) = seeded().await;

        let a = retriever.add_document(NewDocument::new("A", "alpha")).await;
        let b = retriever.add_document(NewDocument::new("B", "beta")).await;

        assert!(a.starts_with("doc-"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_add_with_existing_id_replaces_in_place() {
        let (_, retriever) = seeded().await;

        let id = retriever
            .add_document(
                NewDocument::new("Replaced", "kubernetes helm chart").with_id("triggers-overview"),
            )
            .await;

        let docs = retriever.documents().await;
        assert_eq!(id, "triggers-overview");
        assert_eq!(docs.len(), 8);
        assert_eq!(docs[2].title, "Replaced");

        let results = retriever.query("kubernetes helm", 1).await;
        assert_eq!(results[0].id(), "triggers-overview");
        assert!(retriever.query("cron syntax midnight", 8).await.iter().all(|r| {
            r.id() != "triggers-overview" || r.score == 0.0
        }));
    }

    #[tokio::test]
    async fn test_removed_document_is_never_returned() {
        let (store, retriever) = seeded().await;

        assert!(retriever.remove_document("common-errors").await);

        for text in ["authentication failed errors", "", "workflow"] {
            let results = retriever.query(text, 10).await;
            assert!(results.iter().all(|r| r.id() != "common-errors"));
        }
        assert_eq!(retriever.len().await, 7);
        assert!(!stored_ids(&store).contains(&"common-errors".to_string()));
    }

    #[tokio::test]
    async fn test_remove_unknown_id_still_persists() {
        let (store, retriever) = seeded().await;
        let writes = store.write_count();

        assert!(!retriever.remove_document("missing").await);
        assert_eq!(store.write_count(), writes + 1);
        assert_eq!(retriever.len().await, 8);
    }

    #[tokio::test]
    async fn test_persistence_failure_is_swallowed() {
        let (store, retriever) = seeded().await;
        store.fail_writes("quota exceeded");

        let id = retriever.add_document(NewDocument::new("Kept", "in memory only")).await;

        assert!(retriever.document(&id).await.is_some());
        assert!(!stored_ids(&store).contains(&id));
        assert!(retriever.remove_document(&id).await);
    }

    #[tokio::test]
    async fn test_term_vector_cache_reuses_vectors() {
        let (_, retriever) = seeded().await;

        let first = retriever.compute_term_vector("Hello, World!");
        let second = retriever.compute_term_vector("Hello, World!");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *retriever.compute_term_vector("hello world"));
    }

    #[tokio::test]
    async fn test_term_vector_cache_is_bounded() {
        let retriever = LexicalRetriever::initialize(
            Arc::new(MockKeyValueStore::new()),
            LexicalRetrieverConfig::default().with_term_cache_capacity(2),
        )
        .await;

        for i in 0..20 {
            retriever.compute_term_vector(&format!("webhook trigger number {}", i));
        }
        retriever.term_cache.run_pending_tasks();

        assert!(retriever.term_cache.entry_count() <= 2);
        assert_eq!(retriever.query("webhook trigger", 8).await.len(), 8);
    }

    #[tokio::test]
    async fn test_hash_collisions_get_distinct_vectors() {
        let (_, retriever) = seeded().await;
        assert_eq!(content_hash("Aa"), content_hash("BB"));

        let first = retriever.compute_term_vector("Aa");
        let second = retriever.compute_term_vector("BB");

        assert_ne!(*first, *second);
        assert_eq!(first.get("aa"), 1);
        assert_eq!(second.get("bb"), 1);
        assert_eq!(second.get("aa"), 0);
        assert_eq!(*retriever.compute_term_vector("Aa"), *first);
    }

    #[tokio::test]
    async fn test_survives_reload_from_store() {
        let (store, retriever) = seeded().await;
        retriever
            .add_document(NewDocument::new("Slack", "slack alerts").with_id("slack"))
            .await;

        let reloaded = LexicalRetriever::initialize(store, LexicalRetrieverConfig::default()).await;

        assert_eq!(reloaded.len().await, 9);
        assert_eq!(reloaded.query("slack alerts", 1).await[0].id(), "slack");
    }
}
