//! Knowledge base document entities

use serde::{Deserialize, Serialize};

/// A knowledge entry searched by the retriever
///
/// The serialized shape (`id`, `title`, `content`, `category`, `tags`) is the
/// persisted record format, so field names must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Document {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Denormalized metadata copy kept alongside the index entry
    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            title: self.title.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Document to be added; the id is generated when absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NewDocument {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            category: String::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Converts into a stored document using the given id
    pub fn into_document(self, id: String) -> Document {
        Document {
            id,
            title: self.title,
            content: self.content,
            category: self.category,
            tags: self.tags,
        }
    }
}

/// Title, category and tags of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
}

/// A document returned by a query together with its similarity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    #[serde(flatten)]
    pub document: Document,
    pub score: f64,
}

impl RetrievedDocument {
    pub fn id(&self) -> &str {
        &self.document.id
    }

    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Short reference used when citing sources
    pub fn source_ref(&self) -> SourceRef {
        SourceRef {
            id: self.document.id.clone(),
            title: self.document.title.clone(),
            score: self.score,
        }
    }
}

/// Reference to a document used as grounding context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub id: String,
    pub title: String,
    pub score: f64,
}

/// Renders retrieved documents as a prompt context block
///
/// Each document becomes `[title]\ncontent\n`; blocks are joined with a newline.
pub fn format_context(documents: &[RetrievedDocument]) -> String {
    documents
        .iter()
        .map(|doc| format!("[{}]\n{}\n", doc.document.title, doc.document.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_serialization_shape() {
        let doc = Document::new("api-workflows", "Workflow API", "POST /workflows", "api")
            .with_tags(["workflow", "api"]);

        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["id"], "api-workflows");
        assert_eq!(json["title"], "Workflow API");
        assert_eq!(json["content"], "POST /workflows");
        assert_eq!(json["category"], "api");
        assert_eq!(json["tags"], serde_json::json!(["workflow", "api"]));
    }

    #[test]
    fn test_document_deserialize_without_optional_fields() {
        let doc: Document = serde_json::from_value(serde_json::json!({
            "id": "doc-1",
            "title": "Title",
            "content": "Body"
        }))
        .unwrap();

        assert_eq!(doc.category, "");
        assert!(doc.tags.is_empty());
    }

    #[test]
    fn test_retrieved_document_flattens() {
        let retrieved = RetrievedDocument {
            document: Document::new("doc-1", "Title", "Body", "misc"),
            score: 0.5,
        };

        let json = serde_json::to_value(&retrieved).unwrap();
        assert_eq!(json["id"], "doc-1");
        assert_eq!(json["score"], 0.5);
    }

    #[test]
    fn test_format_context() {
        let docs = vec![
            RetrievedDocument {
                document: Document::new("a", "First", "one", ""),
                score: 1.0,
            },
            RetrievedDocument {
                document: Document::new("b", "Second", "two", ""),
                score: 0.5,
            },
        ];

        assert_eq!(format_context(&docs), "[First]\none\n\n[Second]\ntwo\n");
        assert_eq!(format_context(&[]), "");
    }

    #[test]
    fn test_new_document_into_document() {
        let doc = NewDocument::new("Title", "Body")
            .with_category("notes")
            .with_tags(["x"])
            .into_document("doc-9".to_string());

        assert_eq!(doc.id, "doc-9");
        assert_eq!(doc.category, "notes");
        assert_eq!(doc.tags, vec!["x".to_string()]);
    }
}
