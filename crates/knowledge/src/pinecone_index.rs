//! Pinecone-hosted vector index.
//!
//! Queries the index's data-plane host (`POST {host}/query`) with the
//! `Api-Key` header. Only the query path is implemented; the index is
//! populated out of band.

use crate::vector_index::{VectorIndex, VectorMatch};
use nurture_core::{AppError, AppResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

/// Client for a single Pinecone index.
#[derive(Debug, Clone)]
pub struct PineconeIndex {
    client: Client,
    name: String,
    host: String,
    api_key: String,
}

impl PineconeIndex {
    /// Connect to the index served at `host`; `https://` is assumed when no
    /// scheme is given.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the HTTP client cannot be built.
    pub fn new(name: &str, host: &str, api_key: &str) -> AppResult<Self> {
        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build index client: {}", e)))?;

        Ok(Self {
            client,
            name: name.to_string(),
            host,
            api_key: api_key.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait::async_trait]
impl VectorIndex for PineconeIndex {
    fn backend_name(&self) -> &str {
        "pinecone"
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        include_metadata: bool,
    ) -> AppResult<Vec<VectorMatch>> {
        tracing::debug!("Querying Pinecone index '{}' (top_k={})", self.name, top_k);

        let url = format!("{}/query", self.host);
        let body = QueryRequest {
            vector,
            top_k,
            include_metadata,
            include_values: false,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to reach index '{}': {}", self.name, e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Index '{}' query failed ({}): {}",
                self.name, status, error_text
            )));
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to parse index response: {}", e)))?;

        tracing::debug!("Index '{}' returned {} matches", self.name, parsed.matches.len());

        Ok(parsed.matches)
    }
}
