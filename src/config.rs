use std::time::Duration;

use log::warn;
use zeroize::Zeroizing;

use crate::error::ConfigError;

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONCURRENCY: usize = 50;

const SERVER_VAR: &str = "CREDHUB_SERVER";
const TOKEN_VAR: &str = "CREDHUB_ACCESS_TOKEN";
const TIMEOUT_VAR: &str = "CREDHUB_HTTP_TIMEOUT_SECS";
const CONCURRENCY_VAR: &str = "CREDHUB_FIND_CONCURRENCY";

/// Connection and enumeration settings.
#[derive(Clone)]
pub struct CredHubConfig {
    /// Base URL without a trailing slash.
    pub server: String,
    pub access_token: Option<Zeroizing<String>>,
    pub timeout: Duration,
    /// Number of concurrent version fetch workers.
    pub concurrency: usize,
}

impl CredHubConfig {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: normalize_server(&server.into()),
            access_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, so callers and tests need not touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server = lookup(SERVER_VAR)
            .map(|raw| normalize_server(&raw))
            .filter(|server| !server.is_empty())
            .ok_or(ConfigError::Missing(SERVER_VAR))?;

        let access_token = lookup(TOKEN_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|token| !token.is_empty())
            .map(Zeroizing::new);

        let timeout_secs = resolve_positive(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS);
        let concurrency = resolve_positive(&lookup, CONCURRENCY_VAR, DEFAULT_CONCURRENCY as u64);

        Ok(Self {
            server,
            access_token,
            timeout: Duration::from_secs(timeout_secs),
            concurrency: concurrency as usize,
        })
    }
}

impl std::fmt::Debug for CredHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredHubConfig")
            .field("server", &self.server)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("concurrency", &self.concurrency)
            .finish()
    }
}

fn normalize_server(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn resolve_positive<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => value,
        _ => {
            warn!("[credhub-config] invalid {key} value {raw:?}; using default {default}");
            default
        }
    }
}
