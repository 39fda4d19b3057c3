use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::value::Fields;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    /// Last segment of the document path.
    pub id: String,
    pub fields: Fields,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitResult {
    pub document_ids: Vec<String>,
    pub commit_time: Option<DateTime<Utc>>,
}

impl CommitResult {
    pub fn written(&self) -> usize {
        self.document_ids.len()
    }
}

/// The narrow slice of a document database the tools need.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document of a top-level collection.
    async fn list_documents(&self, collection: &str) -> Result<Vec<StoredDocument>>;

    /// Creates all documents in one atomic commit, each under a fresh generated id.
    async fn batch_create(&self, collection: &str, documents: &[Fields]) -> Result<CommitResult>;
}
