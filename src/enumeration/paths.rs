use std::collections::BTreeSet;

use log::debug;

use crate::client::CredHubClient;
use crate::error::CredHubError;

/// Builds the set of credential names to enumerate from two listings.
pub struct PathCollector<'a> {
    client: &'a dyn CredHubClient,
}

impl<'a> PathCollector<'a> {
    pub fn new(client: &'a dyn CredHubClient) -> Self {
        Self { client }
    }

    /// Returns every unique credential name, sorted. Either listing failing
    /// aborts discovery.
    pub fn discover_paths(&self) -> Result<Vec<String>, CredHubError> {
        let mut paths = BTreeSet::new();

        let credentials =
            self.client
                .find_by_path("")
                .map_err(|source| CredHubError::ListCredentials {
                    prefix: String::new(),
                    source,
                })?;
        debug!(
            "[credhub-find] find-by-path listed {} credential(s)",
            credentials.len()
        );
        paths.extend(credentials.into_iter().map(|cred| cred.name));

        // A certificate whose only version is transitional is missing from the
        // find-by-path listing, so certificate names are merged in separately.
        let certificates = self
            .client
            .get_all_certificates_metadata()
            .map_err(|source| CredHubError::ListCertificates { source })?;
        debug!(
            "[credhub-find] certificate metadata listed {} certificate(s)",
            certificates.len()
        );
        paths.extend(certificates.into_iter().map(|cert| cert.name));

        Ok(paths.into_iter().collect())
    }
}
