use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use lead_api::{DownstreamError, Forwarded, LeadRecord, LeadStore};

/// Google Sheets (Apps Script web app) как хранилище заявок.
///
/// POST с записью в JSON, без auth заголовков и без ретраев. Любой
/// HTTP статус принимается; не-JSON тело логируется и отбрасывается.
pub struct SheetsStore {
    http: reqwest::Client,
    url: String,
}

impl SheetsStore {
    /// `timeout = None` — таймаут клиента по умолчанию.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, DownstreamError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| DownstreamError::client(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    async fn post(&self, record: &LeadRecord) -> Result<Forwarded, DownstreamError> {
        let resp = self
            .http
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| DownstreamError::request(format!("downstream request: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "downstream returned non-success status");
        }

        let text = resp
            .text()
            .await
            .map_err(|e| DownstreamError::body(format!("downstream read: {e}")))?;

        let body = match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    status = status.as_u16(),
                    error = %e,
                    body_len = text.len(),
                    "downstream response is not JSON"
                );
                None
            }
        };

        Ok(Forwarded {
            status: status.as_u16(),
            body,
        })
    }
}

impl LeadStore for SheetsStore {
    fn forward(
        &self,
        record: &LeadRecord,
    ) -> Pin<Box<dyn Future<Output = Result<Forwarded, DownstreamError>> + Send + '_>> {
        let record = record.clone();
        Box::pin(async move { self.post(&record).await })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}
