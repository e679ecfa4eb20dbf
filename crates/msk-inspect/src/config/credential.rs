//! Static access key storage with optional keyring support
//!
//! Profiles normally rely on the AWS credential chain. When a profile does
//! carry static keys, the secret can be kept out of the config file:
//! - `keyring:<name>` looks the value up in the OS keyring (feature
//!   `secure-storage`)
//! - an environment variable, when set, always wins over the file

use super::error::{ConfigError, Result};
use std::env;

/// Prefix that marks a value as a keyring reference
const KEYRING_PREFIX: &str = "keyring:";

/// Service name for keyring entries
#[cfg(feature = "secure-storage")]
const SERVICE_NAME: &str = "msk-inspect";

/// Where new secrets are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialStorage {
    #[cfg(feature = "secure-storage")]
    Keyring,
    Plaintext,
}

/// Resolves and stores profile secrets
#[derive(Debug)]
pub struct CredentialStore {
    storage: CredentialStorage,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore {
    /// Pick the keyring when it is usable, plaintext otherwise
    pub fn new() -> Self {
        #[cfg(feature = "secure-storage")]
        {
            if keyring::Entry::new(SERVICE_NAME, "__probe__").is_ok() {
                return Self::with_storage(CredentialStorage::Keyring);
            }
        }
        Self::with_storage(CredentialStorage::Plaintext)
    }

    pub fn with_storage(storage: CredentialStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> CredentialStorage {
        self.storage
    }

    /// Store `value` and return what should be written to the config file
    pub fn store_credential(&self, key: &str, value: &str) -> Result<String> {
        match self.storage {
            #[cfg(feature = "secure-storage")]
            CredentialStorage::Keyring => {
                let entry = keyring::Entry::new(SERVICE_NAME, key)
                    .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
                entry.set_password(value).map_err(|e| {
                    ConfigError::KeyringError(format!("Failed to store '{}': {}", key, e))
                })?;
                Ok(format!("{}{}", KEYRING_PREFIX, key))
            }
            CredentialStorage::Plaintext => {
                let _ = key;
                Ok(value.to_string())
            }
        }
    }

    /// Resolve a stored value.
    ///
    /// Resolution order:
    /// 1. `env_var`, if given and set
    /// 2. keyring lookup for `keyring:` references
    /// 3. the value itself
    pub fn get_credential(&self, value: &str, env_var: Option<&str>) -> Result<String> {
        if let Some(var) = env_var
            && let Ok(env_value) = env::var(var)
        {
            return Ok(env_value);
        }

        let Some(key) = value.strip_prefix(KEYRING_PREFIX) else {
            return Ok(value.to_string());
        };

        #[cfg(feature = "secure-storage")]
        {
            let entry = keyring::Entry::new(SERVICE_NAME, key)
                .map_err(|e| ConfigError::KeyringError(e.to_string()))?;
            entry.get_password().map_err(|e| {
                ConfigError::KeyringError(format!("Failed to read '{}' from keyring: {}", key, e))
            })
        }
        #[cfg(not(feature = "secure-storage"))]
        {
            Err(ConfigError::CredentialError(format!(
                "'{}' references the keyring but the secure-storage feature is not enabled",
                key
            )))
        }
    }

    pub fn is_keyring_reference(value: &str) -> bool {
        value.starts_with(KEYRING_PREFIX)
    }
}
