//! `forge whoami`: report the authenticated package-registry user.

use lifeforge_core::registry::RegistryClient;

pub async fn run(registry: &RegistryClient) -> Result<(), String> {
    let username = registry.whoami().await.map_err(|e| e.to_string())?;
    println!("{}", username);
    Ok(())
}
