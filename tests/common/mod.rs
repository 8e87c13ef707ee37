#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use credhub_inventory::ClientError;
use credhub_inventory::client::{
    ApiResponse, CertificateMetadata, CertificateVersion, CredHubClient, CredentialSummary,
};
use reqwest::Method;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FindByPath(String),
    ListCertificates,
    CertificateMetadata(String),
    Request {
        method: Method,
        path: String,
        query: Vec<(String, String)>,
        body: Option<Value>,
    },
    Delete(String),
    Regenerate(String),
}

/// In-memory CredHub that records every call made against it.
#[derive(Default)]
pub struct MockCredHub {
    listed: Vec<String>,
    certificates: Vec<CertificateMetadata>,
    versions: BTreeMap<String, Vec<Value>>,
    failing_paths: HashSet<String>,
    fail_find_by_path: bool,
    fail_certificates: bool,
    fail_metadata: bool,
    fail_mutations: bool,
    calls: Mutex<Vec<Call>>,
}

fn version_record(name: &str, id: &str, credential_type: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": credential_type,
        "version_created_at": "2024-05-01T10:00:00Z",
        "value": {}
    })
}

fn server_error(detail: &str) -> ClientError {
    ClientError::Status {
        status: 500,
        body: detail.to_string(),
    }
}

impl MockCredHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// A credential returned by find-by-path with the given version ids.
    pub fn with_credential(mut self, name: &str, credential_type: &str, ids: &[&str]) -> Self {
        self.listed.push(name.to_string());
        self.versions.entry(name.to_string()).or_default().extend(
            ids.iter()
                .map(|id| version_record(name, id, credential_type)),
        );
        self
    }

    /// A certificate visible through the certificate metadata listing only.
    pub fn with_certificate(mut self, name: &str, cert_id: &str, ids: &[&str]) -> Self {
        self.certificates.push(CertificateMetadata {
            id: cert_id.to_string(),
            name: name.to_string(),
            signed_by: None,
            signs: Vec::new(),
            versions: ids
                .iter()
                .map(|id| CertificateVersion {
                    id: id.to_string(),
                    expiry_date: None,
                    transitional: false,
                    certificate_authority: false,
                    self_signed: false,
                    generated: Some(true),
                })
                .collect(),
        });
        self.versions
            .entry(name.to_string())
            .or_insert_with(|| {
                ids.iter()
                    .map(|id| version_record(name, id, "certificate"))
                    .collect()
            });
        self
    }

    /// A certificate returned by both listings.
    pub fn with_listed_certificate(self, name: &str, cert_id: &str, ids: &[&str]) -> Self {
        self.with_credential(name, "certificate", ids)
            .with_certificate(name, cert_id, ids)
    }

    pub fn failing_path(mut self, name: &str) -> Self {
        self.failing_paths.insert(name.to_string());
        self
    }

    pub fn failing_find_by_path(mut self) -> Self {
        self.fail_find_by_path = true;
        self
    }

    pub fn failing_certificates(mut self) -> Self {
        self.fail_certificates = true;
        self
    }

    pub fn failing_metadata(mut self) -> Self {
        self.fail_metadata = true;
        self
    }

    pub fn failing_mutations(mut self) -> Self {
        self.fail_mutations = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of version fetches issued for `name`.
    pub fn fetch_count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| match call {
                Call::Request { method, path, query, .. } => {
                    *method == Method::GET
                        && path == "/api/v1/data"
                        && query.iter().any(|(k, v)| k == "name" && v == name)
                }
                _ => false,
            })
            .count()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| match call {
                Call::Request { method, .. } => *method != Method::GET,
                Call::Delete(_) | Call::Regenerate(_) => true,
                _ => false,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CredHubClient for MockCredHub {
    fn find_by_path(&self, prefix: &str) -> Result<Vec<CredentialSummary>, ClientError> {
        self.record(Call::FindByPath(prefix.to_string()));
        if self.fail_find_by_path {
            return Err(server_error("find-by-path unavailable"));
        }
        Ok(self
            .listed
            .iter()
            .filter(|name| name.starts_with(prefix))
            .map(|name| CredentialSummary {
                name: name.clone(),
                version_created_at: None,
            })
            .collect())
    }

    fn get_all_certificates_metadata(&self) -> Result<Vec<CertificateMetadata>, ClientError> {
        self.record(Call::ListCertificates);
        if self.fail_certificates {
            return Err(server_error("certificates unavailable"));
        }
        Ok(self.certificates.clone())
    }

    fn get_certificate_metadata_by_name(
        &self,
        name: &str,
    ) -> Result<CertificateMetadata, ClientError> {
        self.record(Call::CertificateMetadata(name.to_string()));
        if self.fail_metadata {
            return Err(server_error("metadata unavailable"));
        }
        self.certificates
            .iter()
            .find(|cert| cert.name == name)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(name.to_string()))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
        _authenticated: bool,
    ) -> Result<ApiResponse, ClientError> {
        self.record(Call::Request {
            method: method.clone(),
            path: path.to_string(),
            query: query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.cloned(),
        });

        if method == Method::GET && path == "/api/v1/data" {
            let name = query
                .iter()
                .find(|(k, _)| *k == "name")
                .map(|(_, v)| *v)
                .unwrap_or_default();
            if self.failing_paths.contains(name) {
                return Err(server_error(&format!("cannot read {name}")));
            }
            let data = self.versions.get(name).cloned().unwrap_or_default();
            return Ok(ApiResponse {
                body: json!({ "data": data }).to_string().into_bytes(),
            });
        }

        if self.fail_mutations {
            return Err(server_error("mutation rejected"));
        }
        Ok(ApiResponse {
            body: b"{}".to_vec(),
        })
    }

    fn delete(&self, name: &str) -> Result<(), ClientError> {
        self.record(Call::Delete(name.to_string()));
        if self.fail_mutations {
            return Err(server_error("mutation rejected"));
        }
        Ok(())
    }

    fn regenerate(&self, name: &str) -> Result<(), ClientError> {
        self.record(Call::Regenerate(name.to_string()));
        if self.fail_mutations {
            return Err(server_error("mutation rejected"));
        }
        Ok(())
    }
}
