use log::debug;
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde_json::json;
use zeroize::Zeroizing;

use super::{ApiResponse, CertificateMetadata, CredHubClient, CredentialSummary};
use crate::config::CredHubConfig;
use crate::error::{ClientError, ConfigError};

const DATA_PATH: &str = "/api/v1/data";
const CERTIFICATES_PATH: &str = "/api/v1/certificates";
const REGENERATE_PATH: &str = "/api/v1/regenerate";

/// `CredHubClient` backed by the CredHub REST API.
///
/// The underlying `reqwest` client pools connections and is safe to share
/// between enumeration workers.
pub struct HttpCredHubClient {
    client: Client,
    server: String,
    access_token: Option<Zeroizing<String>>,
}

#[derive(Debug, Deserialize)]
struct FindByPathResponse {
    #[serde(default)]
    credentials: Vec<CredentialSummary>,
}

#[derive(Debug, Deserialize)]
struct CertificatesResponse {
    #[serde(default)]
    certificates: Vec<CertificateMetadata>,
}

impl HttpCredHubClient {
    pub fn new(config: &CredHubConfig) -> Result<Self, ConfigError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            server: config.server.clone(),
            access_token: config.access_token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.server, path)
        } else {
            format!("{}/{}", self.server, path)
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        self.request(Method::GET, path, query, None, true)?.json()
    }
}

impl CredHubClient for HttpCredHubClient {
    fn find_by_path(&self, prefix: &str) -> Result<Vec<CredentialSummary>, ClientError> {
        let response: FindByPathResponse = self.get_json(DATA_PATH, &[("path", prefix)])?;
        Ok(response.credentials)
    }

    fn get_all_certificates_metadata(&self) -> Result<Vec<CertificateMetadata>, ClientError> {
        let response: CertificatesResponse = self.get_json(CERTIFICATES_PATH, &[])?;
        Ok(response.certificates)
    }

    fn get_certificate_metadata_by_name(
        &self,
        name: &str,
    ) -> Result<CertificateMetadata, ClientError> {
        let response: CertificatesResponse =
            self.get_json(CERTIFICATES_PATH, &[("name", name)])?;
        response
            .certificates
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(name.to_string()))
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&serde_json::Value>,
        authenticated: bool,
    ) -> Result<ApiResponse, ClientError> {
        let url = self.url(path);
        debug!("[credhub-http] {method} {url}");

        let mut builder = self
            .client
            .request(method, &url)
            .header(ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if authenticated {
            if let Some(token) = &self.access_token {
                builder = builder.bearer_auth(token.as_str());
            }
        }

        let response = builder.send()?;
        let status = response.status();
        let bytes = response.bytes()?;
        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).into_owned();
            return Err(ClientError::from_status(status, text));
        }

        Ok(ApiResponse {
            body: bytes.to_vec(),
        })
    }

    fn delete(&self, name: &str) -> Result<(), ClientError> {
        self.request(Method::DELETE, DATA_PATH, &[("name", name)], None, true)?;
        Ok(())
    }

    fn regenerate(&self, name: &str) -> Result<(), ClientError> {
        let body = json!({ "name": name });
        self.request(Method::POST, REGENERATE_PATH, &[], Some(&body), true)?;
        Ok(())
    }
}
