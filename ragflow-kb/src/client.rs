#![doc = "RAGFlow HTTP client: the reqwest-backed implementation of `KnowledgeBaseApi`."]
//
//! # RAGFlow client (CLI <-> Core)
//!
//! This module wires the [`KnowledgeBaseApi`] trait from `ragflow-kb-core` to a live
//! RAGFlow server.
//!
//! - `GET {api_url}/datasets` lists knowledge bases.
//! - `GET {api_url}/datasets/{id}/documents?page=&page_size=` lists one page of documents.
//!
//! Every response is wrapped in an envelope `{ "code", "message", "data" }`; a non-zero
//! code is an API error even when the HTTP status is 200. Requests carry the API key as
//! a bearer token and are never retried.

use async_trait::async_trait;
use ragflow_kb_core::config::Settings;
use ragflow_kb_core::contract::{DocumentPage, DocumentRecord, KnowledgeBase, KnowledgeBaseApi};
use ragflow_kb_core::{KbError, KbResult};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Longest slice of an error body echoed back to the user.
const MAX_ERROR_BODY: usize = 300;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<T>,
}

#[derive(Debug, Default, Deserialize)]
struct DocsData {
    #[serde(default)]
    docs: Vec<DocumentRecord>,
    #[serde(default)]
    total: Option<u64>,
}

pub struct RagflowClient {
    http: Client,
    base: Url,
    api_key: String,
}

impl RagflowClient {
    pub fn new(settings: &Settings) -> KbResult<Self> {
        let base = Url::parse(&settings.api_url).map_err(|e| {
            tracing::error!(error = ?e, api_url = %settings.api_url, "Invalid api_url");
            KbError::Config(format!("invalid api_url {:?}: {e}", settings.api_url))
        })?;
        if base.cannot_be_a_base() {
            return Err(KbError::Config(format!(
                "api_url {:?} cannot be used as a base URL",
                settings.api_url
            )));
        }
        tracing::info!(
            api_url = %base,
            api_key_set = !settings.api_key.is_empty(),
            "Initialized RAGFlow client"
        );
        Ok(Self {
            http: Client::new(),
            base,
            api_key: settings.api_key.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get<T>(&self, url: Url, query: &[(&str, String)]) -> KbResult<T>
    where
        T: DeserializeOwned + Default,
    {
        tracing::debug!(url = %url, ?query, "GET");
        let response = self
            .http
            .get(url.clone())
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %url, "Request failed");
                KbError::Api(format!("request to {url} failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Failed to read response body");
            KbError::Api(format!("failed to read response from {url}: {e}"))
        })?;

        if !status.is_success() {
            tracing::error!(status = %status, url = %url, "API returned error status");
            let snippet: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(KbError::Api(format!("HTTP {status} from {url}: {snippet}")));
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Malformed response body");
            KbError::Api(format!("malformed response from {url}: {e}"))
        })?;

        if envelope.code != 0 {
            let message = envelope
                .message
                .unwrap_or_else(|| "unknown error".to_string());
            tracing::error!(code = envelope.code, message = %message, url = %url, "API returned error code");
            return Err(KbError::Api(format!(
                "{url} returned code {}: {message}",
                envelope.code
            )));
        }

        Ok(envelope.data.unwrap_or_default())
    }
}

/// Whether another page may follow the one just received.
fn has_more(received: usize, page: u32, page_size: u32, total: Option<u64>) -> bool {
    if received == 0 || (received as u64) < u64::from(page_size) {
        return false;
    }
    match total {
        Some(total) => u64::from(page) * u64::from(page_size) < total,
        None => true,
    }
}

#[async_trait]
impl KnowledgeBaseApi for RagflowClient {
    async fn list_knowledge_bases(&self) -> KbResult<Vec<KnowledgeBase>> {
        tracing::info!("Listing knowledge bases");
        let kbs: Vec<KnowledgeBase> = self.get(self.endpoint(&["datasets"]), &[]).await?;
        tracing::info!(count = kbs.len(), "Fetched knowledge bases");
        Ok(kbs)
    }

    async fn list_documents(
        &self,
        kb_id: &str,
        page: u32,
        page_size: u32,
    ) -> KbResult<DocumentPage> {
        let url = self.endpoint(&["datasets", kb_id, "documents"]);
        let data: DocsData = self
            .get(
                url,
                &[("page", page.to_string()), ("page_size", page_size.to_string())],
            )
            .await?;
        let has_more = has_more(data.docs.len(), page, page_size, data.total);
        tracing::debug!(kb_id, page, received = data.docs.len(), total = ?data.total, has_more, "Fetched document page");
        Ok(DocumentPage {
            docs: data.docs,
            has_more,
        })
    }
}
