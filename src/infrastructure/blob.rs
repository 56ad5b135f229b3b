// src/infrastructure/blob.rs
//! Remote blob store over plain HTTP
//!
//! Objects live at `{endpoint}/{prefix}/{key}`, S3 style: `PUT` stores and
//! `DELETE` removes. The address handed back by `url` is the object's own URL,
//! built without a request; a missing object only shows up when it is fetched.

use crate::application::BlobStore;
use crate::domain::DomainError;
use crate::infrastructure::config::{ApiConfig, StorageConfig};
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{StatusCode, Url};
use std::time::Duration;
use tracing::{debug, instrument};

pub struct HttpBlobStore {
    client: reqwest::Client,
    base: Url,
    prefix: Vec<String>,
    authorization: Option<String>,
}

impl HttpBlobStore {
    pub fn new(endpoint: &str, prefix: &str, timeout: Duration) -> Result<Self, DomainError> {
        let base = Url::parse(endpoint)
            .map_err(|e| DomainError::Config(format!("Invalid storage endpoint {endpoint}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(DomainError::Config(format!(
                "Storage endpoint cannot be a base URL: {endpoint}"
            )));
        }
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base,
            prefix: prefix
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            authorization: None,
        })
    }

    pub fn from_config(storage: &StorageConfig, api: &ApiConfig) -> Result<Self, DomainError> {
        Self::new(&storage.endpoint, &storage.prefix, api.timeout())
    }

    /// Send this value in `Authorization` on every request
    pub fn with_authorization(mut self, token: impl Into<String>) -> Self {
        self.authorization = Some(token.into());
        self
    }

    /// Object address; the key is one percent-encoded path segment
    pub fn object_url(&self, key: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(self.prefix.iter())
                .push(key);
        }
        url
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let request = self.client.request(method, url);
        match &self.authorization {
            Some(token) => request.header(AUTHORIZATION, token),
            None => request,
        }
    }
}

fn status_error(action: &str, key: &str, status: StatusCode) -> DomainError {
    DomainError::BlobStore(format!("{action} {key} failed: HTTP {status}"))
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    #[instrument(level = "debug", skip(self, bytes), fields(len = bytes.len()))]
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let response = self
            .request(reqwest::Method::PUT, self.object_url(key))
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(bytes.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error("put", key, status));
        }
        debug!(key, "Stored blob");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn url(&self, key: &str) -> Result<String, DomainError> {
        Ok(self.object_url(key).to_string())
    }

    #[instrument(level = "debug", skip(self))]
    async fn remove(&self, key: &str) -> Result<(), DomainError> {
        let response = self
            .request(reqwest::Method::DELETE, self.object_url(key))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                debug!(key, "Removed blob");
                Ok(())
            }
            StatusCode::NOT_FOUND => {
                debug!(key, "Blob already removed");
                Ok(())
            }
            status => Err(status_error("remove", key, status)),
        }
    }
}
