use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use super::cache::CatalogFetcher;
use super::tree::{CatalogDocument, SourceNode};
use crate::error::{Error, Result};
use crate::retry::{retry_transient, Backoff, Transient};

/// Fetches whole catalog forests from the upstream sqdata endpoint
pub struct HttpCatalogFetcher {
    client: reqwest::Client,
    base_url: String,
    backoff: Backoff,
}

/// Why a single fetch attempt failed
#[derive(Debug)]
enum FetchFailure {
    Transport(reqwest::Error),
    Status(StatusCode, String),
    Decode(reqwest::Error),
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchFailure::Transport(e) => write!(f, "request failed: {}", e),
            FetchFailure::Status(status, body) => {
                write!(f, "API returned status {}: {}", status.as_u16(), body)
            }
            FetchFailure::Decode(e) => write!(f, "invalid catalog document: {}", e),
        }
    }
}

/// Network errors, 429 and 5xx are worth repeating; other 4xx and bad documents are final
impl Transient for FetchFailure {
    fn is_transient(&self) -> bool {
        match self {
            FetchFailure::Transport(_) => true,
            FetchFailure::Status(status, _) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            FetchFailure::Decode(_) => false,
        }
    }
}

impl HttpCatalogFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            backoff: Backoff::CATALOG,
        })
    }

    #[cfg(test)]
    fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    async fn fetch_once(&self, language: &str) -> std::result::Result<Vec<SourceNode>, FetchFailure> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("language", language)])
            .send()
            .await
            .map_err(FetchFailure::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchFailure::Status(status, body));
        }

        let document: CatalogDocument = response.json().await.map_err(FetchFailure::Decode)?;
        Ok(document.sources)
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self, language: &str) -> Result<Vec<SourceNode>> {
        retry_transient(self.backoff, &format!("Catalog fetch for {}", language), || {
            self.fetch_once(language)
        })
        .await
        .map_err(|e| Error::CatalogUnavailable {
            language: language.to_string(),
            reason: e.to_string(),
        })
    }
}
