//! The CredHub collaborator surface.
//!
//! Enumeration and lifecycle code only talk to CredHub through [`CredHubClient`],
//! so tests can substitute an in-memory implementation for [`HttpCredHubClient`].

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::ClientError;

mod http;

pub use http::HttpCredHubClient;

/// Entry returned by the find-by-path listing.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialSummary {
    pub name: String,
    #[serde(default)]
    pub version_created_at: Option<DateTime<Utc>>,
}

/// Certificate metadata as returned by `GET /api/v1/certificates`.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub signed_by: Option<String>,
    #[serde(default)]
    pub signs: Vec<String>,
    #[serde(default)]
    pub versions: Vec<CertificateVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CertificateVersion {
    pub id: String,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transitional: bool,
    #[serde(default)]
    pub certificate_authority: bool,
    #[serde(default)]
    pub self_signed: bool,
    #[serde(default)]
    pub generated: Option<bool>,
}

/// Raw response of a generic request; the caller decodes the body.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// Operations consumed from the credential service. Implementations are shared
/// across enumeration workers and must tolerate concurrent calls.
pub trait CredHubClient: Send + Sync {
    /// Lists credential names under `prefix`; `""` lists everything.
    fn find_by_path(&self, prefix: &str) -> Result<Vec<CredentialSummary>, ClientError>;

    fn get_all_certificates_metadata(&self) -> Result<Vec<CertificateMetadata>, ClientError>;

    fn get_certificate_metadata_by_name(
        &self,
        name: &str,
    ) -> Result<CertificateMetadata, ClientError>;

    /// Issues an arbitrary API request. Non-success statuses are errors.
    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
        authenticated: bool,
    ) -> Result<ApiResponse, ClientError>;

    /// Deletes every version of the credential called `name`.
    fn delete(&self, name: &str) -> Result<(), ClientError>;

    fn regenerate(&self, name: &str) -> Result<(), ClientError>;
}
