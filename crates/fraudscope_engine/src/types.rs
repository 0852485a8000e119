use fraudscope_core::{AnalysisResult, AttemptId, BackendStatus};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
    #[error("http client setup failed: {0}")]
    ClientBuild(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("http status {status}: {detail}")]
    HttpStatus { status: u16, detail: String },
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed analysis payload: {0}")]
    Json(String),
    #[error("inconsistent analysis payload: {0}")]
    Inconsistent(String),
    #[error("malformed export at line {line}: {message}")]
    MalformedExport { line: usize, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("liveness response is not JSON: {0}")]
    NotJson(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ProbeFinished(BackendStatus),
    UploadFinished {
        attempt: AttemptId,
        result: Result<AnalysisResult, UploadError>,
    },
    CountersAdvanced { transactions: u64, fraud: u64 },
}
