use reqwest::Method;
use serde::Deserialize;

use crate::client::CredHubClient;
use crate::credential::Credential;
use crate::error::{ClientError, CredHubError};

const DATA_PATH: &str = "/api/v1/data";

#[derive(Deserialize)]
struct VersionsResponse {
    #[serde(default)]
    data: Vec<Credential>,
}

/// Fetches the full version history of one credential name.
pub struct VersionFetcher<'a> {
    client: &'a dyn CredHubClient,
}

impl<'a> VersionFetcher<'a> {
    pub fn new(client: &'a dyn CredHubClient) -> Self {
        Self { client }
    }

    pub fn fetch_versions(&self, path: &str) -> Result<Vec<Credential>, CredHubError> {
        let wrap = |source: ClientError| CredHubError::FetchVersions {
            path: path.to_string(),
            source,
        };
        let response = self
            .client
            .request(Method::GET, DATA_PATH, &[("name", path)], None, true)
            .map_err(wrap)?;
        let versions: VersionsResponse = response.json().map_err(wrap)?;
        Ok(versions.data)
    }
}
