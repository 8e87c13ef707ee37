use std::collections::HashSet;

use anyhow::{Result, anyhow};
use credhub_inventory::{CredHub, CredHubClient};

use super::test_utils::load_credhub;

#[test]
fn live_find_all_has_unique_versions() -> Result<()> {
    let credhub = load_credhub()?;
    let credentials = credhub.service.find_all()?;

    let mut seen = HashSet::new();
    for cred in &credentials {
        if !seen.insert((cred.name.as_str(), cred.id.as_str())) {
            return Err(anyhow!(
                "duplicate credential version {} of {}",
                cred.id,
                cred.name
            ));
        }
    }

    Ok(())
}

#[test]
fn live_find_all_covers_every_certificate() -> Result<()> {
    let credhub = load_credhub()?;
    let certificates = credhub.client.get_all_certificates_metadata()?;
    let credentials = credhub.service.find_all()?;

    let names: HashSet<&str> = credentials.iter().map(|c| c.name.as_str()).collect();
    for cert in &certificates {
        if !names.contains(cert.name.as_str()) {
            return Err(anyhow!("certificate {} missing from result", cert.name));
        }
    }

    Ok(())
}
