//! Credential value objects as returned by the CredHub data endpoint.

use std::fmt;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use x509_parser::pem::parse_x509_pem;

/// Credential types CredHub can store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CredentialType {
    Certificate,
    Password,
    Value,
    Json,
    User,
    Ssh,
    Rsa,
    #[serde(other)]
    Other,
}

impl CredentialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialType::Certificate => "certificate",
            CredentialType::Password => "password",
            CredentialType::Value => "value",
            CredentialType::Json => "json",
            CredentialType::User => "user",
            CredentialType::Ssh => "ssh",
            CredentialType::Rsa => "rsa",
            CredentialType::Other => "other",
        }
    }

    /// Whether `operation` may be attempted for credentials of this type.
    pub fn supports(&self, operation: Operation) -> bool {
        match operation {
            Operation::DeleteVersion => *self == CredentialType::Certificate,
            Operation::Regenerate | Operation::UpdateTransitional => true,
        }
    }

    /// Picks the endpoint family used to regenerate a credential of this type.
    pub fn regenerate_route(&self) -> RegenerateRoute {
        match self {
            CredentialType::Certificate => RegenerateRoute::Certificate,
            _ => RegenerateRoute::ByName,
        }
    }
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle operations that can be applied to a single credential version.
///
/// Only `DeleteVersion` is restricted locally. `Regenerate` and
/// `UpdateTransitional` are accepted for every type and left to CredHub to
/// refuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DeleteVersion,
    Regenerate,
    UpdateTransitional,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::DeleteVersion => "deleting a credential version",
            Operation::Regenerate => "regenerating a credential",
            Operation::UpdateTransitional => "updating the transitional version",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegenerateRoute {
    /// `POST /api/v1/certificates/<id>/regenerate`
    Certificate,
    /// The client's generic regenerate-by-name call.
    ByName,
}

/// One version of one named credential.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "CredentialRecord")]
pub struct Credential {
    pub name: String,
    pub id: String,
    #[serde(rename = "type")]
    pub credential_type: CredentialType,
    pub certificate_authority: bool,
    pub transitional: bool,
    pub version_created_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        credential_type: CredentialType,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            credential_type,
            certificate_authority: false,
            transitional: false,
            version_created_at: None,
        }
    }

    pub fn with_certificate_authority(mut self, certificate_authority: bool) -> Self {
        self.certificate_authority = certificate_authority;
        self
    }

    pub fn is_certificate(&self) -> bool {
        self.credential_type == CredentialType::Certificate
    }
}

/// Wire shape of an entry in `GET /api/v1/data` responses.
#[derive(Deserialize)]
struct CredentialRecord {
    id: String,
    name: String,
    #[serde(rename = "type")]
    credential_type: CredentialType,
    #[serde(default)]
    version_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    value: serde_json::Value,
    // Present when the record is our own serialized form.
    #[serde(default)]
    certificate_authority: Option<bool>,
    #[serde(default)]
    transitional: Option<bool>,
}

impl From<CredentialRecord> for Credential {
    fn from(record: CredentialRecord) -> Self {
        let is_certificate = record.credential_type == CredentialType::Certificate;
        let certificate_authority = record.certificate_authority.unwrap_or_else(|| {
            is_certificate
                && record
                    .value
                    .get("certificate")
                    .and_then(|value| value.as_str())
                    .map(|pem| is_certificate_authority(&record.name, pem))
                    .unwrap_or(false)
        });
        let transitional = record.transitional.unwrap_or_else(|| {
            record
                .value
                .get("transitional")
                .and_then(|value| value.as_bool())
                .unwrap_or(false)
        });

        Self {
            name: record.name,
            id: record.id,
            credential_type: record.credential_type,
            certificate_authority,
            transitional,
            version_created_at: record.version_created_at,
        }
    }
}

/// Reads the basic constraints CA flag from a PEM encoded certificate.
pub fn is_certificate_authority(name: &str, pem: &str) -> bool {
    let (_, pem_block) = match parse_x509_pem(pem.as_bytes()) {
        Ok(parsed) => parsed,
        Err(err) => {
            debug!("[credhub-credential] {name}: certificate PEM unreadable: {err}");
            return false;
        }
    };
    match pem_block.parse_x509() {
        Ok(cert) => cert.is_ca(),
        Err(err) => {
            debug!("[credhub-credential] {name}: certificate DER unreadable: {err}");
            false
        }
    }
}
