//! Enumerates every credential version stored in CredHub and drives the
//! certificate rotation steps (version delete, regenerate, transitional flag).

pub mod client;
pub mod config;
pub mod credential;
pub mod enumeration;
pub mod error;
pub mod lifecycle;
pub mod service;

pub use client::{CredHubClient, HttpCredHubClient};
pub use config::CredHubConfig;
pub use credential::{Credential, CredentialType, Operation};
pub use error::{ClientError, ConfigError, CredHubError};
pub use service::{CredHub, CredHubService};
