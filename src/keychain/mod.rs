// Keychain abstraction for the provider credential
// Windows: Credential Manager
// macOS/Linux: OS keychain via the keyring crate

use anyhow::{Context, Result};
use keyring::Entry;
use thiserror::Error;

pub const KEYCHAIN_SERVICE: &str = "debate-room";
pub const KEYCHAIN_USER: &str = "api_key";
/// Environment override for headless deployments.
pub const API_KEY_ENV: &str = "DEBATE_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "no API key configured: set {API_KEY_ENV} or store one in the OS keychain \
         under service \"{KEYCHAIN_SERVICE}\" (debate-server store-key)"
    )]
    MissingCredential,
}

pub struct Keychain;

impl Keychain {
    pub fn new() -> Self {
        Keychain
    }

    pub fn store(&self, service: &str, username: &str, password: &str) -> Result<()> {
        let entry = Entry::new(service, username).context("Failed to create keychain entry")?;
        entry
            .set_password(password)
            .context("Failed to store API key in keychain")?;
        Ok(())
    }

    pub fn retrieve(&self, service: &str, username: &str) -> Result<String> {
        let entry = Entry::new(service, username).context("Failed to create keychain entry")?;
        let password = entry
            .get_password()
            .context("Failed to retrieve API key from keychain")?;
        Ok(password)
    }
}

impl Default for Keychain {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the single required credential: environment variable first, then
/// the OS keychain. Absence is a fatal configuration error surfaced to the
/// user before any round is attempted, never a panic.
pub fn resolve_api_key() -> Result<String, ConfigError> {
    if let Ok(key) = std::env::var(API_KEY_ENV) {
        if !key.trim().is_empty() {
            return Ok(key);
        }
    }
    match Keychain::new().retrieve(KEYCHAIN_SERVICE, KEYCHAIN_USER) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingCredential),
    }
}
