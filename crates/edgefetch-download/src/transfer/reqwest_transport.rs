//! reqwest implementation of [`HttpTransport`].

use async_trait::async_trait;
use edgefetch_core::download::{AcquireError, AcquireResult};
use edgefetch_core::settings::EngineSettings;
use futures_util::TryStreamExt;
use reqwest::Client;
use reqwest::header::RANGE;

use super::http::{HttpTransport, TransferRequest, TransferResponse};

/// Transport over a shared reqwest client.
///
/// No total request timeout is set: bodies may take hours. Stalls are caught
/// by the downloader's read idle timeout instead.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client from engine settings.
    pub fn new(settings: &EngineSettings) -> AcquireResult<Self> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| AcquireError::configuration(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub const fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: TransferRequest) -> AcquireResult<TransferResponse> {
        let mut builder = self.client.get(&request.url);
        if let Some(offset) = request.range_start {
            builder = builder.header(RANGE, format!("bytes={offset}-"));
        }
        if let Some(token) = request.bearer_token.as_deref() {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let content_length = response.content_length();
        let body = Box::pin(response.bytes_stream().map_err(map_reqwest_error));

        Ok(TransferResponse {
            status,
            content_length,
            body,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> AcquireError {
    let kind = if err.is_timeout() {
        "TimedOut"
    } else if err.is_connect() {
        "ConnectionRefused"
    } else if err.is_body() || err.is_decode() {
        "UnexpectedEof"
    } else {
        "Network"
    };
    AcquireError::transient(kind, err.to_string())
}
