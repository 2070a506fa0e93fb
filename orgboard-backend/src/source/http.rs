use async_trait::async_trait;
use std::time::Duration;
use url::Url;

use super::retry::{is_reqwest_error_retryable, is_retryable_status, RetryPolicy};
use super::{Dataset, SheetSource, SourceError};
use crate::normalizer::SheetTable;

/// Fetches datasets from the spreadsheet web app over HTTPS
pub struct HttpSheetSource {
    client: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl HttpSheetSource {
    pub fn new(base_url: &str, timeout: Duration, max_attempts: u32) -> Result<Self, SourceError> {
        let base_url = Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("orgboard/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::new(max_attempts),
        })
    }

    /// Base URL with `type=<dataset>` appended, keeping any existing query
    pub fn dataset_url(&self, dataset: Dataset) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("type", dataset.as_str());
        url
    }

    async fn fetch_once(&self, url: &Url) -> Result<SheetTable, (SourceError, bool)> {
        let response = match self.client.get(url.clone()).send().await {
            Ok(r) => r,
            Err(e) => {
                let retryable = is_reqwest_error_retryable(&e);
                return Err((SourceError::Http(e), retryable));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let code = status.as_u16();
            return Err((SourceError::Status(code), is_retryable_status(code)));
        }

        let body = match response.bytes().await {
            Ok(b) => b,
            Err(e) => {
                let retryable = is_reqwest_error_retryable(&e);
                return Err((SourceError::Http(e), retryable));
            }
        };

        decode_table(&body).map_err(|e| (e, false))
    }
}

#[async_trait]
impl SheetSource for HttpSheetSource {
    async fn fetch_table(&self, dataset: Dataset) -> Result<SheetTable, SourceError> {
        let url = self.dataset_url(dataset);
        let mut attempt = 1;

        loop {
            log::debug!("[source] GET {} (attempt {})", url, attempt);
            match self.fetch_once(&url).await {
                Ok(table) => return Ok(table),
                Err((e, retryable)) => {
                    let delay = if retryable { self.retry.backoff_after(attempt) } else { None };
                    match delay {
                        Some(delay) => {
                            log::warn!(
                                "[source] {} fetch attempt {} failed: {}, retrying in {}s",
                                dataset,
                                attempt,
                                e,
                                delay.as_secs()
                            );
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        None => return Err(e),
                    }
                }
            }
        }
    }
}

/// Parse a response body into rows. Anything but an array of arrays is rejected.
pub(crate) fn decode_table(body: &[u8]) -> Result<SheetTable, SourceError> {
    serde_json::from_slice::<SheetTable>(body).map_err(|e| SourceError::Decode(e.to_string()))
}
