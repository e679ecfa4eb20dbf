//! Authenticated, region-scoped sessions
//!
//! A [`SessionProvider`] turns a region into a ready [`KafkaApi`] handle or an
//! [`AuthError`]. [`AwsSessionProvider`] resolves credentials through the
//! standard AWS chain (environment, shared config, SSO, IMDS), optionally
//! assumes a role, and checks that credentials can actually be produced
//! before handing the session out.

use std::sync::Arc;

use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use aws_sdk_kafka::error::DisplayErrorContext;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::api::KafkaApi;
use crate::aws::AwsKafkaApi;
use crate::error::AuthError;

/// Session name used when assuming a role
const ROLE_SESSION_NAME: &str = "msk-inspect";

/// Provider name attached to static credentials from a profile
const STATIC_PROVIDER_NAME: &str = "msk-inspect-profile";

/// Produces an authenticated management API handle for a region
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn open_session(&self, region: &str) -> Result<Arc<dyn KafkaApi>, AuthError>;
}

/// Long-lived access keys supplied explicitly instead of the default chain
#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &self.session_token.as_ref().map(|_| "** redacted **"))
            .finish()
    }
}

/// Session provider backed by `aws-config`
#[derive(Debug, Clone, Default)]
pub struct AwsSessionProvider {
    aws_profile: Option<String>,
    endpoint_url: Option<String>,
    assume_role_arn: Option<String>,
    static_credentials: Option<StaticCredentials>,
}

impl AwsSessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a named profile from the shared AWS config files
    pub fn aws_profile(mut self, name: impl Into<String>) -> Self {
        self.aws_profile = Some(name.into());
        self
    }

    /// Send requests to a custom endpoint (e.g. a local emulator)
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Assume this role on top of the base credentials
    pub fn assume_role(mut self, role_arn: impl Into<String>) -> Self {
        self.assume_role_arn = Some(role_arn.into());
        self
    }

    pub fn static_credentials(mut self, credentials: StaticCredentials) -> Self {
        self.static_credentials = Some(credentials);
        self
    }

    /// Load shared AWS configuration for `region` and verify credentials
    pub async fn load_sdk_config(&self, region: &str) -> Result<SdkConfig, AuthError> {
        if region.trim().is_empty() {
            return Err(AuthError::new(region, "region must not be empty"));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .retry_config(RetryConfig::disabled());

        if let Some(profile) = &self.aws_profile {
            debug!("Using AWS shared config profile: {}", profile);
            loader = loader.profile_name(profile);
        }
        if let Some(url) = &self.endpoint_url {
            info!("Using custom MSK endpoint: {}", url);
            loader = loader.endpoint_url(url);
        }
        if let Some(creds) = &self.static_credentials {
            debug!("Using static credentials for access key {}", creds.access_key_id);
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                creds.session_token.clone(),
                None,
                STATIC_PROVIDER_NAME,
            ));
        }

        let mut sdk_config = loader.load().await;

        if let Some(role_arn) = &self.assume_role_arn {
            info!("Assuming role {}", role_arn);
            let provider = AssumeRoleProvider::builder(role_arn)
                .session_name(ROLE_SESSION_NAME)
                .configure(&sdk_config)
                .build()
                .await;
            sdk_config = sdk_config
                .into_builder()
                .credentials_provider(SharedCredentialsProvider::new(provider))
                .build();
        }

        verify_credentials(&sdk_config, region).await?;
        Ok(sdk_config)
    }
}

#[async_trait]
impl SessionProvider for AwsSessionProvider {
    async fn open_session(&self, region: &str) -> Result<Arc<dyn KafkaApi>, AuthError> {
        let sdk_config = self.load_sdk_config(region).await?;
        Ok(Arc::new(AwsKafkaApi::new(&sdk_config)))
    }
}

/// Resolve credentials once so a broken chain fails at construction time
async fn verify_credentials(sdk_config: &SdkConfig, region: &str) -> Result<(), AuthError> {
    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| AuthError::new(region, "no credentials provider configured"))?;

    let credentials = provider
        .provide_credentials()
        .await
        .map_err(|e| AuthError::new(region, DisplayErrorContext(&e).to_string()))?;

    debug!(
        "Resolved credentials for region {} (access key {}...)",
        region,
        key_prefix(credentials.access_key_id())
    );
    Ok(())
}

fn key_prefix(access_key_id: &str) -> String {
    access_key_id.chars().take(4).collect()
}
