use reqwest::{Method, StatusCode};
use thiserror::Error;

use crate::credential::{CredentialType, Operation};

/// Errors produced by a CredHub client implementation.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("credhub request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("credhub authentication failed")]
    Unauthorized,
    #[error("credhub rate limit exceeded")]
    RateLimited,
    #[error("credhub API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode credhub response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("credential not found: {0}")]
    NotFound(String),
}

impl ClientError {
    pub fn from_status(status: StatusCode, body: String) -> Self {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return ClientError::Unauthorized;
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return ClientError::RateLimited;
        }
        ClientError::Status {
            status: status.as_u16(),
            body: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        }
    }
}

/// Errors surfaced by enumeration and lifecycle operations.
#[derive(Debug, Error)]
pub enum CredHubError {
    #[error("failed to list credentials under path {prefix:?}: {source}")]
    ListCredentials { prefix: String, source: ClientError },
    #[error("failed to list certificate metadata: {source}")]
    ListCertificates { source: ClientError },
    #[error("failed to fetch versions for {path}: {source}")]
    FetchVersions { path: String, source: ClientError },
    #[error("failed to get certificate meta for: {name} got: {source}")]
    CertificateMetadata { name: String, source: ClientError },
    #[error("failed request for {name}: {method} {path} with body: {body} got: {source}")]
    Request {
        name: String,
        method: Method,
        path: String,
        body: String,
        source: ClientError,
    },
    #[error("failed to delete credential {name}: {source}")]
    DeleteCredential { name: String, source: ClientError },
    #[error("failed to regenerate credential {name}: {source}")]
    RegenerateCredential { name: String, source: ClientError },
    #[error("{operation} not supported for type: {credential_type}")]
    Unsupported {
        operation: Operation,
        credential_type: CredentialType,
    },
}

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required setting {0} is not set")]
    Missing(&'static str),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
