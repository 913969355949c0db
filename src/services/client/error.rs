use std::path::PathBuf;

use http::StatusCode;

/// etcd 客户端错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Failed to read TLS material {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("Invalid endpoint {endpoint}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("No cluster endpoints available")]
    NoEndpoints,
    /// etcd 返回的结构化错误，例如 100 (Key not found)
    #[error("etcd error {code}: {message} ({cause}) [{index}]")]
    Etcd {
        code: u32,
        message: String,
        cause: String,
        index: u64,
    },
    #[error("Unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl StoreError {
    /// etcd 错误码，非 etcd 错误时为 None
    pub fn etcd_code(&self) -> Option<u32> {
        match self {
            StoreError::Etcd { code, .. } => Some(*code),
            _ => None,
        }
    }
}
