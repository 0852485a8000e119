use std::time::Duration;

use dashboard_logging::{dash_debug, dash_warn};
use fraudscope_core::{AnalysisResult, CandidateFile};
use futures_util::StreamExt;
use url::Url;

use crate::codec::{decode_analysis, decode_error_detail, encode_upload};
use crate::{ProbeError, TransportError, UploadError};

pub const UPLOAD_PATH: &str = "upload";

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    /// Unset means the request may hang; the upload then stays in flight.
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    pub max_response_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: 64 * 1024 * 1024,
        }
    }
}

#[async_trait::async_trait]
pub trait ScoringBackend: Send + Sync {
    /// One reachability check against the backend root.
    async fn probe(&self) -> Result<(), ProbeError>;

    /// Submits a batch and decodes the scored result.
    async fn upload(&self, file: CandidateFile) -> Result<AnalysisResult, UploadError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, TransportError> {
        let mut base = Url::parse(&settings.base_url)
            .map_err(|err| TransportError::InvalidUrl(err.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(TransportError::InvalidUrl(settings.base_url.clone()));
        }
        // Keep any path prefix when joining endpoint names.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::ClientBuild(err.to_string()))?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base
            .join(path)
            .map_err(|err| TransportError::InvalidUrl(err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, TransportError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(len) = response.content_length() {
            if len > max_bytes {
                return Err(TransportError::TooLarge { max_bytes });
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if body.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(TransportError::TooLarge { max_bytes });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

#[async_trait::async_trait]
impl ScoringBackend for ReqwestBackend {
    async fn probe(&self) -> Result<(), ProbeError> {
        let response = self
            .client
            .get(self.base.clone())
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                detail: status.canonical_reason().unwrap_or_default().to_string(),
            }
            .into());
        }

        let body = self.read_body(response).await?;
        serde_json::from_slice::<serde_json::Value>(&body)
            .map_err(|err| ProbeError::NotJson(err.to_string()))?;
        Ok(())
    }

    async fn upload(&self, file: CandidateFile) -> Result<AnalysisResult, UploadError> {
        let url = self.endpoint(UPLOAD_PATH)?;
        let submitted_name = file.name.clone();
        dash_debug!(
            "POST {} file={:?} bytes={}",
            url,
            submitted_name,
            file.bytes.len()
        );
        let form = encode_upload(file)?;

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let body = self.read_body(response).await?;
        if !status.is_success() {
            let detail = decode_error_detail(&body).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or_default().to_string()
            });
            dash_warn!("Upload rejected with {}: {}", status, detail);
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                detail,
            }
            .into());
        }

        let mut result = decode_analysis(&body)?;
        if result.filename.is_empty() {
            result.filename = submitted_name;
        }
        Ok(result)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    TransportError::Network(err.to_string())
}
