use std::sync::Arc;

use log::info;

use crate::client::CredHubClient;
use crate::credential::Credential;
use crate::enumeration::{PathCollector, VersionFetcher, WorkerPool};
use crate::error::CredHubError;
use crate::lifecycle::CertificateLifecycle;

/// Caller-facing operations over a CredHub instance.
pub trait CredHub: Send + Sync {
    /// Every version of every credential, in no particular order.
    fn find_all(&self) -> Result<Vec<Credential>, CredHubError>;
    fn regenerate(&self, cred: &Credential) -> Result<(), CredHubError>;
    fn delete(&self, cred: &Credential) -> Result<(), CredHubError>;
    fn update_transitional(&self, cred: &Credential, remove: bool) -> Result<(), CredHubError>;
}

/// Default [`CredHub`] implementation on top of a shared client.
#[derive(Clone)]
pub struct CredHubService {
    client: Arc<dyn CredHubClient>,
    pool: WorkerPool,
}

impl CredHubService {
    pub fn new(client: Arc<dyn CredHubClient>, concurrency: usize) -> Self {
        Self {
            client,
            pool: WorkerPool::new(concurrency),
        }
    }

    fn lifecycle(&self) -> CertificateLifecycle<'_> {
        CertificateLifecycle::new(self.client.as_ref())
    }
}

impl CredHub for CredHubService {
    fn find_all(&self) -> Result<Vec<Credential>, CredHubError> {
        let paths = PathCollector::new(self.client.as_ref()).discover_paths()?;
        info!("[credhub-find] discovered {} unique path(s)", paths.len());

        let fetcher = VersionFetcher::new(self.client.as_ref());
        let credentials = self
            .pool
            .enumerate(paths, |path| fetcher.fetch_versions(path))?;
        info!("[credhub-find] found {} credential version(s)", credentials.len());
        Ok(credentials)
    }

    fn regenerate(&self, cred: &Credential) -> Result<(), CredHubError> {
        self.lifecycle().regenerate(cred)
    }

    fn delete(&self, cred: &Credential) -> Result<(), CredHubError> {
        self.lifecycle().delete(cred)
    }

    fn update_transitional(&self, cred: &Credential, remove: bool) -> Result<(), CredHubError> {
        self.lifecycle().update_transitional(cred, remove)
    }
}
