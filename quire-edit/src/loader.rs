//! Document loading.
//!
//! [`DocumentLoader`] is the seam to whatever fetches documents. The edit
//! workflow only sees `{data, is_loading, is_error}`; timeouts and retries
//! belong to the loader.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::urls::FetchTarget;

/// The outcome of one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadResult {
    pub data: Option<Value>,
    pub is_loading: bool,
    pub is_error: bool,
}

impl LoadResult {
    /// Nothing was requested.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn loaded(data: Value) -> Self {
        Self {
            data: Some(data),
            is_loading: false,
            is_error: false,
        }
    }

    pub fn failed() -> Self {
        Self {
            data: None,
            is_loading: false,
            is_error: true,
        }
    }
}

/// Fetches the document behind a [`FetchTarget`].
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, target: &FetchTarget) -> LoadResult;
}

/// Loads documents from the REST API over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpDocumentLoader {
    client: reqwest::Client,
}

impl HttpDocumentLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (headers, cookies, timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentLoader for HttpDocumentLoader {
    async fn load(&self, target: &FetchTarget) -> LoadResult {
        let Some(url) = target.url() else {
            return LoadResult::empty();
        };

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(%url, %e, "document request failed");
                return LoadResult::failed();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "document request returned an error status");
            return LoadResult::failed();
        }

        match response.json::<Value>().await {
            Ok(data) => {
                debug!(%url, "document loaded");
                LoadResult::loaded(data)
            }
            Err(e) => {
                warn!(%url, %e, "document response was not JSON");
                LoadResult::failed()
            }
        }
    }
}
