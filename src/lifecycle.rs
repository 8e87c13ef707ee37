//! Certificate rotation steps: delete a version, regenerate, and move the
//! transitional version pointer.

use log::info;
use reqwest::Method;
use serde_json::{Value, json};

use crate::client::{CertificateMetadata, CredHubClient};
use crate::credential::{Credential, Operation, RegenerateRoute};
use crate::error::CredHubError;

/// Stateless lifecycle operations against a single credential version.
pub struct CertificateLifecycle<'a> {
    client: &'a dyn CredHubClient,
}

impl<'a> CertificateLifecycle<'a> {
    pub fn new(client: &'a dyn CredHubClient) -> Self {
        Self { client }
    }

    /// Deletes the version `cred` refers to. When it is the last remaining
    /// version the whole credential is deleted instead.
    pub fn delete(&self, cred: &Credential) -> Result<(), CredHubError> {
        ensure_supported(cred, Operation::DeleteVersion)?;
        let meta = self.certificate_metadata(cred)?;

        if meta.versions.len() > 1 {
            let path = format!("/api/v1/certificates/{}/versions/{}", meta.id, cred.id);
            info!("[credhub-lifecycle] deleting version {} of {}", cred.id, cred.name);
            return self.send(cred, Method::DELETE, &path, None);
        }

        info!(
            "[credhub-lifecycle] deleting {} (only one version remains)",
            cred.name
        );
        self.client
            .delete(&cred.name)
            .map_err(|source| CredHubError::DeleteCredential {
                name: cred.name.clone(),
                source,
            })
    }

    /// Regenerates the credential. A certificate authority regenerated through
    /// the certificates endpoint becomes the new transitional version.
    pub fn regenerate(&self, cred: &Credential) -> Result<(), CredHubError> {
        ensure_supported(cred, Operation::Regenerate)?;
        match cred.credential_type.regenerate_route() {
            RegenerateRoute::Certificate => {
                let meta = self.certificate_metadata(cred)?;
                let path = format!("/api/v1/certificates/{}/regenerate", meta.id);
                let body = json!({ "set_as_transitional": cred.certificate_authority });
                info!(
                    "[credhub-lifecycle] regenerating certificate {} (transitional={})",
                    cred.name, cred.certificate_authority
                );
                self.send(cred, Method::POST, &path, Some(body))
            }
            RegenerateRoute::ByName => {
                info!("[credhub-lifecycle] regenerating {} by name", cred.name);
                self.client
                    .regenerate(&cred.name)
                    .map_err(|source| CredHubError::RegenerateCredential {
                        name: cred.name.clone(),
                        source,
                    })
            }
        }
    }

    /// Points the certificate's transitional version at `cred`, or clears it
    /// when `remove` is set.
    pub fn update_transitional(&self, cred: &Credential, remove: bool) -> Result<(), CredHubError> {
        ensure_supported(cred, Operation::UpdateTransitional)?;
        let meta = self.certificate_metadata(cred)?;
        let path = format!(
            "/api/v1/certificates/{}/update_transitional_version",
            meta.id
        );
        let version = if remove {
            Value::Null
        } else {
            Value::String(cred.id.clone())
        };
        info!(
            "[credhub-lifecycle] setting transitional version of {} to {}",
            cred.name, version
        );
        self.send(cred, Method::PUT, &path, Some(json!({ "version": version })))
    }

    fn certificate_metadata(&self, cred: &Credential) -> Result<CertificateMetadata, CredHubError> {
        self.client
            .get_certificate_metadata_by_name(&cred.name)
            .map_err(|source| CredHubError::CertificateMetadata {
                name: cred.name.clone(),
                source,
            })
    }

    fn send(
        &self,
        cred: &Credential,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<(), CredHubError> {
        self.client
            .request(method.clone(), path, &[], body.as_ref(), true)
            .map(|_| ())
            .map_err(|source| CredHubError::Request {
                name: cred.name.clone(),
                method,
                path: path.to_string(),
                body: body.map_or_else(|| "none".to_string(), |body| body.to_string()),
                source,
            })
    }
}

fn ensure_supported(cred: &Credential, operation: Operation) -> Result<(), CredHubError> {
    if cred.credential_type.supports(operation) {
        Ok(())
    } else {
        Err(CredHubError::Unsupported {
            operation,
            credential_type: cred.credential_type,
        })
    }
}
