use std::sync::Arc;

use anyhow::{Context, Result};
use credhub_inventory::{CredHub, CredHubConfig, CredHubService, HttpCredHubClient};
use log::info;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = CredHubConfig::from_env().context("failed to load CredHub configuration")?;
    info!("[credhub] connecting to {}", config.server);

    let client = HttpCredHubClient::new(&config).context("failed to build CredHub client")?;
    let credhub = CredHubService::new(Arc::new(client), config.concurrency);

    let credentials = credhub.find_all().context("failed to enumerate credentials")?;
    println!("{}", serde_json::to_string_pretty(&credentials)?);
    Ok(())
}
