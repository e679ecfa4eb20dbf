//! Configuration management for MSK test targets
//!
//! Handles loading profiles from a TOML file with environment variable
//! expansion and per-field environment overrides.
//!
//! ```toml
//! default_profile = "staging"
//!
//! [profiles.staging]
//! region = "us-east-1"
//! aws_profile = "staging-readonly"
//! cluster_arn = "${STAGING_CLUSTER_ARN}"
//!
//! [profiles.local]
//! region = "us-east-1"
//! endpoint_url = "http://localhost:4566"
//! access_key_id = "test"
//! secret_access_key = "keyring:local-secret"
//! ```

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::credential::CredentialStore;
use super::error::{ConfigError, Result};
use crate::session::{AwsSessionProvider, StaticCredentials};

/// Overrides the config file location
pub const ENV_CONFIG_PATH: &str = "MSK_INSPECT_CONFIG";
/// Selects the profile when none is given explicitly
pub const ENV_PROFILE: &str = "MSK_INSPECT_PROFILE";
pub const ENV_REGION: &str = "MSK_INSPECT_REGION";
pub const ENV_ENDPOINT_URL: &str = "MSK_INSPECT_ENDPOINT_URL";
pub const ENV_ASSUME_ROLE_ARN: &str = "MSK_INSPECT_ASSUME_ROLE_ARN";
pub const ENV_ACCESS_KEY_ID: &str = "MSK_INSPECT_ACCESS_KEY_ID";
pub const ENV_SECRET_ACCESS_KEY: &str = "MSK_INSPECT_SECRET_ACCESS_KEY";
pub const ENV_SESSION_TOKEN: &str = "MSK_INSPECT_SESSION_TOKEN";
pub const ENV_CLUSTER_ARN: &str = "MSK_INSPECT_CLUSTER_ARN";
pub const ENV_CONFIGURATION_ARN: &str = "MSK_INSPECT_CONFIGURATION_ARN";

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is named explicitly
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// One MSK environment
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Profile {
    pub region: String,
    /// Named profile in the shared AWS config files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_profile: Option<String>,
    /// Custom management API endpoint (emulators, VPC endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    /// Role assumed on top of the base credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assume_role_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,
    /// Supports the `keyring:` prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    /// Cluster the suite targets by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_arn: Option<String>,
    /// Configuration the suite targets by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration_arn: Option<String>,
}

impl Profile {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            ..Default::default()
        }
    }

    /// Region after environment override
    pub fn resolve_region(&self) -> Result<String> {
        CredentialStore::new().get_credential(&self.region, Some(ENV_REGION))
    }

    /// Default cluster ARN after environment override
    pub fn resolve_cluster_arn(&self) -> Result<Option<String>> {
        resolve_optional(&CredentialStore::new(), self.cluster_arn.as_deref(), ENV_CLUSTER_ARN)
    }

    /// Default configuration ARN after environment override
    pub fn resolve_configuration_arn(&self) -> Result<Option<String>> {
        resolve_optional(
            &CredentialStore::new(),
            self.configuration_arn.as_deref(),
            ENV_CONFIGURATION_ARN,
        )
    }

    /// Build the session provider this profile describes
    pub fn session_provider(&self) -> Result<AwsSessionProvider> {
        let store = CredentialStore::new();
        let mut provider = AwsSessionProvider::new();

        if let Some(name) = &self.aws_profile {
            provider = provider.aws_profile(name);
        }
        if let Some(url) = resolve_optional(&store, self.endpoint_url.as_deref(), ENV_ENDPOINT_URL)? {
            provider = provider.endpoint_url(url);
        }
        if let Some(role) =
            resolve_optional(&store, self.assume_role_arn.as_deref(), ENV_ASSUME_ROLE_ARN)?
        {
            provider = provider.assume_role(role);
        }
        if let Some(credentials) = self.resolve_static_credentials(&store)? {
            provider = provider.static_credentials(credentials);
        }

        Ok(provider)
    }

    fn resolve_static_credentials(
        &self,
        store: &CredentialStore,
    ) -> Result<Option<StaticCredentials>> {
        let access_key_id =
            resolve_optional(store, self.access_key_id.as_deref(), ENV_ACCESS_KEY_ID)?;
        let secret_access_key =
            resolve_optional(store, self.secret_access_key.as_deref(), ENV_SECRET_ACCESS_KEY)?;

        match (access_key_id, secret_access_key) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::IncompleteCredentials {
                present: "access_key_id",
                missing: "secret_access_key",
            }),
            (None, Some(_)) => Err(ConfigError::IncompleteCredentials {
                present: "secret_access_key",
                missing: "access_key_id",
            }),
            (Some(access_key_id), Some(secret_access_key)) => {
                let session_token =
                    resolve_optional(store, self.session_token.as_deref(), ENV_SESSION_TOKEN)?;
                Ok(Some(StaticCredentials {
                    access_key_id,
                    secret_access_key,
                    session_token,
                }))
            }
        }
    }
}

/// Environment wins; otherwise resolve the configured value, if any
fn resolve_optional(
    store: &CredentialStore,
    value: Option<&str>,
    env_var: &str,
) -> Result<Option<String>> {
    if let Ok(env_value) = std::env::var(env_var) {
        return Ok(Some(env_value));
    }
    value.map(|v| store.get_credential(v, None)).transpose()
}

impl Config {
    /// Resolve which profile to use.
    ///
    /// Resolution order: explicit name, `MSK_INSPECT_PROFILE`,
    /// `default_profile`, then the alphabetically first profile.
    pub fn resolve_profile(&self, explicit_profile: Option<&str>) -> Result<String> {
        if let Some(profile_name) = explicit_profile {
            return Ok(profile_name.to_string());
        }

        if let Ok(profile_name) = std::env::var(ENV_PROFILE) {
            return Ok(profile_name);
        }

        if let Some(ref default) = self.default_profile {
            return Ok(default.clone());
        }

        self.list_profiles()
            .first()
            .map(|(name, _)| name.to_string())
            .ok_or_else(|| ConfigError::NoProfiles {
                suggestion: format!(
                    "Add a [profiles.<name>] section to {} or set {}.",
                    Self::config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|_| "the config file".to_string()),
                    ENV_CONFIG_PATH
                ),
            })
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Resolve and look up the profile in one step
    pub fn active_profile(&self, explicit_profile: Option<&str>) -> Result<(String, &Profile)> {
        let name = self.resolve_profile(explicit_profile)?;
        let profile = self.profile(&name)?;
        debug!("Using MSK profile '{}' (region {})", name, profile.region);
        Ok((name, profile))
    }

    /// Load configuration from the standard location
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path. A missing file is an empty config.
    pub fn load_from_path(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config file at {}", config_path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| ConfigError::LoadError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        let expanded_content = Self::expand_env_vars(&content);
        let config: Config = toml::from_str(&expanded_content)?;

        Ok(config)
    }

    /// Save configuration to the standard location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to_path(&config_path)
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::SaveError {
                path: parent.display().to_string(),
                source: e,
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| ConfigError::SaveError {
            path: config_path.display().to_string(),
            source: e,
        })?;

        Ok(())
    }

    /// Set or update a profile
    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Remove a profile, clearing the default if it pointed there
    pub fn remove_profile(&mut self, name: &str) -> Option<Profile> {
        if self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        self.profiles.remove(name)
    }

    /// List all profiles sorted by name
    pub fn list_profiles(&self) -> Vec<(&String, &Profile)> {
        let mut profiles: Vec<_> = self.profiles.iter().collect();
        profiles.sort_by_key(|(name, _)| *name);
        profiles
    }

    /// Path of the configuration file.
    ///
    /// `MSK_INSPECT_CONFIG` wins. Otherwise:
    /// - Linux: ~/.config/msk-inspect/config.toml
    /// - macOS: ~/Library/Application Support/io.msk-inspect.msk-inspect/config.toml
    /// - Windows: %APPDATA%\msk-inspect\msk-inspect\config\config.toml
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            return Ok(PathBuf::from(path));
        }

        let proj_dirs = ProjectDirs::from("io", "msk-inspect", "msk-inspect")
            .ok_or(ConfigError::ConfigDirError)?;

        Ok(proj_dirs.config_dir().join("config.toml"))
    }

    /// Expand `${VAR}` and `${VAR:-default}` references.
    ///
    /// Unset variables without a default are left as written, so profiles
    /// that are never used do not need their variables set.
    fn expand_env_vars(content: &str) -> String {
        shellexpand::env_with_context_no_errors(content, |var| std::env::var(var).ok()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn staging() -> Profile {
        Profile {
            region: "us-east-1".to_string(),
            aws_profile: Some("staging-readonly".to_string()),
            cluster_arn: Some("arn:aws:kafka:us-east-1:123456789012:cluster/orders/1".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_serialization_round_trip() {
        let mut config = Config::default();
        config.set_profile("staging".to_string(), staging());
        config.default_profile = Some("staging".to_string());

        let serialized = toml::to_string(&config).unwrap();
        assert!(!serialized.contains("endpoint_url"));

        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.default_profile, config.default_profile);
        assert_eq!(deserialized.profiles["staging"], staging());
    }

    #[test]
    #[serial_test::serial]
    fn test_profile_resolution_order() {
        unsafe {
            std::env::remove_var(ENV_PROFILE);
        }

        let mut config = Config::default();
        config.set_profile("zeta".to_string(), Profile::new("eu-west-1"));
        config.set_profile("alpha".to_string(), Profile::new("us-west-2"));

        // First alphabetically
        assert_eq!(config.resolve_profile(None).unwrap(), "alpha");

        config.default_profile = Some("zeta".to_string());
        assert_eq!(config.resolve_profile(None).unwrap(), "zeta");

        // Explicit beats default
        assert_eq!(config.resolve_profile(Some("alpha")).unwrap(), "alpha");

        unsafe {
            std::env::set_var(ENV_PROFILE, "alpha");
        }
        assert_eq!(config.resolve_profile(None).unwrap(), "alpha");
        unsafe {
            std::env::remove_var(ENV_PROFILE);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_no_profiles_error() {
        unsafe {
            std::env::remove_var(ENV_PROFILE);
        }
        let config = Config::default();
        let err = config.resolve_profile(None).unwrap_err();
        assert!(matches!(err, ConfigError::NoProfiles { .. }));
    }

    #[test]
    fn test_active_profile_not_found() {
        let config = Config::default();
        let err = config.active_profile(Some("missing")).unwrap_err();
        assert!(matches!(err, ConfigError::ProfileNotFound { ref name } if name == "missing"));
    }

    #[test]
    fn test_remove_profile_clears_default() {
        let mut config = Config::default();
        config.set_profile("staging".to_string(), staging());
        config.default_profile = Some("staging".to_string());

        assert!(config.remove_profile("staging").is_some());
        assert!(config.default_profile.is_none());
        assert!(config.profiles.is_empty());
    }

    #[test]
    #[serial_test::serial]
    fn test_env_var_expansion() {
        unsafe {
            std::env::set_var("TEST_MSK_CLUSTER_ARN", "arn:aws:kafka:eu-west-1:1:cluster/x/y");
            std::env::remove_var("TEST_MSK_UNSET_REGION");
        }

        let content = r#"
[profiles.test]
region = "${TEST_MSK_UNSET_REGION:-eu-west-1}"
cluster_arn = "${TEST_MSK_CLUSTER_ARN}"
endpoint_url = "${TEST_MSK_NEVER_SET}"
"#;

        let expanded = Config::expand_env_vars(content);
        assert!(expanded.contains("arn:aws:kafka:eu-west-1:1:cluster/x/y"));
        assert!(expanded.contains(r#"region = "eu-west-1""#));
        assert!(expanded.contains("${TEST_MSK_NEVER_SET}"));

        unsafe {
            std::env::remove_var("TEST_MSK_CLUSTER_ARN");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_region_env_override() {
        let profile = Profile::new("us-east-1");
        unsafe {
            std::env::set_var(ENV_REGION, "ap-southeast-2");
        }
        assert_eq!(profile.resolve_region().unwrap(), "ap-southeast-2");
        unsafe {
            std::env::remove_var(ENV_REGION);
        }
        assert_eq!(profile.resolve_region().unwrap(), "us-east-1");
    }

    #[test]
    #[serial_test::serial]
    fn test_target_arns_env_override() {
        unsafe {
            std::env::remove_var(ENV_CLUSTER_ARN);
            std::env::set_var(
                ENV_CONFIGURATION_ARN,
                "arn:aws:kafka:us-east-1:123456789012:configuration/override/2",
            );
        }
        let profile = staging();

        assert_eq!(
            profile.resolve_cluster_arn().unwrap().as_deref(),
            Some("arn:aws:kafka:us-east-1:123456789012:cluster/orders/1")
        );
        assert_eq!(
            profile.resolve_configuration_arn().unwrap().as_deref(),
            Some("arn:aws:kafka:us-east-1:123456789012:configuration/override/2")
        );

        unsafe {
            std::env::remove_var(ENV_CONFIGURATION_ARN);
        }
        assert_eq!(profile.resolve_configuration_arn().unwrap(), None);
    }

    #[test]
    #[serial_test::serial]
    fn test_incomplete_static_credentials() {
        unsafe {
            std::env::remove_var(ENV_ACCESS_KEY_ID);
            std::env::remove_var(ENV_SECRET_ACCESS_KEY);
        }
        let profile = Profile {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            ..Profile::new("us-east-1")
        };

        let err = profile.session_provider().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::IncompleteCredentials {
                missing: "secret_access_key",
                ..
            }
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_static_credentials_resolved() {
        unsafe {
            std::env::remove_var(ENV_ACCESS_KEY_ID);
            std::env::set_var(ENV_SECRET_ACCESS_KEY, "from-env");
        }
        let profile = Profile {
            access_key_id: Some("AKIDEXAMPLE".to_string()),
            secret_access_key: Some("from-file".to_string()),
            ..Profile::new("us-east-1")
        };

        let creds = profile
            .resolve_static_credentials(&CredentialStore::new())
            .unwrap()
            .unwrap();
        assert_eq!(creds.access_key_id, "AKIDEXAMPLE");
        assert_eq!(creds.secret_access_key, "from-env");

        unsafe {
            std::env::remove_var(ENV_SECRET_ACCESS_KEY);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_config_path_env_override() {
        unsafe {
            std::env::set_var(ENV_CONFIG_PATH, "/tmp/msk-inspect-test/config.toml");
        }
        assert_eq!(
            Config::config_path().unwrap(),
            PathBuf::from("/tmp/msk-inspect-test/config.toml")
        );
        unsafe {
            std::env::remove_var(ENV_CONFIG_PATH);
        }
    }
}
