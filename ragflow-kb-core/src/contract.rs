//! # contract: data model and the knowledge-base API seam
//!
//! This module defines the records exchanged with a knowledge-base management API
//! and the [`KnowledgeBaseApi`] trait the rest of the crate drives.
//!
//! ## Interface & Extensibility
//! - Implement [`KnowledgeBaseApi`] to talk to a concrete backend (the CLI crate ships a
//!   `reqwest` client for RAGFlow).
//! - All methods are async and return [`KbResult`]; transport details stay in the implementor.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall`, so tests can script page sequences and failures
//!   through `MockKnowledgeBaseApi`.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

use crate::error::KbResult;

/// Absent keys and explicit `null`s both fall back to the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A knowledge base ("dataset") as listed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub document_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunk_count: u64,
}

/// Processing status of a document. Unknown remote statuses are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentStatus {
    Success,
    Running,
    Unstart,
    Fail,
    Other(String),
}

impl DocumentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DocumentStatus::Success => "SUCCESS",
            DocumentStatus::Running => "RUNNING",
            DocumentStatus::Unstart => "UNSTART",
            DocumentStatus::Fail => "FAIL",
            DocumentStatus::Other(s) => s,
        }
    }

    /// Single-glyph marker shown next to the status in table output.
    pub fn marker(&self) -> &'static str {
        match self {
            DocumentStatus::Success => "✅",
            DocumentStatus::Running => "🔄",
            DocumentStatus::Unstart => "⏸",
            DocumentStatus::Fail => "❌",
            DocumentStatus::Other(_) => "⚪",
        }
    }
}

impl Default for DocumentStatus {
    fn default() -> Self {
        DocumentStatus::Other("N/A".to_string())
    }
}

impl From<String> for DocumentStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SUCCESS" => DocumentStatus::Success,
            "RUNNING" => DocumentStatus::Running,
            "UNSTART" => DocumentStatus::Unstart,
            "FAIL" => DocumentStatus::Fail,
            _ => DocumentStatus::Other(s),
        }
    }
}

impl From<&str> for DocumentStatus {
    fn from(s: &str) -> Self {
        DocumentStatus::from(s.to_string())
    }
}

impl From<DocumentStatus> for String {
    fn from(status: DocumentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One document inside a knowledge base, flattened for rendering.
///
/// Deserialization is optimistic: absent fields fall back to defaults and the
/// identifier is also accepted under the wire name `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    #[serde(alias = "id", default, deserialize_with = "null_as_default")]
    pub document_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chunk_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: DocumentStatus,
    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub size: u64,
}

/// One page of a document listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPage {
    pub docs: Vec<DocumentRecord>,
    /// False once the backend has served its last page.
    pub has_more: bool,
}

/// Read-only access to a knowledge-base management API.
///
/// Implementors attach credentials to every call and never retry; a failed call
/// surfaces as an error and aborts whatever drove it.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait KnowledgeBaseApi: Send + Sync {
    /// List every knowledge base visible to the configured credential, in API order.
    async fn list_knowledge_bases(&self) -> KbResult<Vec<KnowledgeBase>>;

    /// Fetch one page of documents. Pages are numbered from 1.
    async fn list_documents(
        &self,
        kb_id: &str,
        page: u32,
        page_size: u32,
    ) -> KbResult<DocumentPage>;
}
