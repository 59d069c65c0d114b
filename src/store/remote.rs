//! Remote sheet backing medium: a CSV document behind an HTTP endpoint.
//!
//! - load    → `GET <url>` (no caching, 404 or empty body = empty set)
//! - persist → `PUT <url>` with the whole CSV document

use super::RecordStore;
use super::codec;
use crate::errors::{AppError, AppResult};
use crate::models::RecordSet;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::debug;

pub struct RemoteSheetStore {
    url: String,
    token: Option<String>,
    client: Client,
}

impl RemoteSheetStore {
    pub fn new(url: &str, token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            url: url.trim().to_string(),
            token: token.filter(|t| !t.is_empty()),
            client,
        })
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let rb = self.client.request(method, &self.url);
        match &self.token {
            Some(t) => rb.bearer_auth(t),
            None => rb,
        }
    }
}

impl RecordStore for RemoteSheetStore {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> AppResult<RecordSet> {
        let resp = self
            .request(Method::GET)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .map_err(|e| AppError::ReadFailure(format!("{}: {e}", self.url)))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            debug!(url = %self.url, "remote sheet not found, starting empty");
            return Ok(RecordSet::new());
        }
        if !status.is_success() {
            return Err(AppError::ReadFailure(format!("{}: HTTP {status}", self.url)));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::ReadFailure(format!("{}: {e}", self.url)))?;

        let set = codec::decode(body.as_bytes())?;
        debug!(url = %self.url, records = set.len(), "loaded records");
        Ok(set)
    }

    fn persist(&self, set: &RecordSet) -> AppResult<()> {
        let body = codec::encode_to_string(set)?;

        let resp = self
            .request(Method::PUT)
            .header(CONTENT_TYPE, "text/csv; charset=utf-8")
            .body(body)
            .send()
            .map_err(|e| AppError::StorageUnavailable(format!("{}: {e}", self.url)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::StorageUnavailable(format!(
                "{}: HTTP {status}",
                self.url
            )));
        }

        debug!(url = %self.url, records = set.len(), "persisted records");
        Ok(())
    }
}
