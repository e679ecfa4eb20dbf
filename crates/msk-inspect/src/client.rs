//! Read-only metadata queries against an MSK cluster
//!
//! [`ClusterMetadataClient`] wraps a region-scoped [`KafkaApi`] handle. Each
//! query builds one request, makes one remote call and extracts one field.
//! Every query comes in two forms:
//!
//! - `get_*` returns [`Result`], passing remote errors through untouched
//! - `require_*` takes a [`TestContext`] and aborts the test on error
//!
//! ```rust,ignore
//! use msk_inspect::ClusterMetadataClient;
//!
//! let client = ClusterMetadataClient::new("us-east-1").await?;
//! let config_arn = "arn:aws:kafka:us-east-1:123456789012:configuration/base/abc";
//! let revision = client.get_latest_configuration_revision(config_arn).await?;
//! let props = client.get_server_properties_map(config_arn, revision).await?;
//! assert_eq!(props["auto.create.topics.enable"], "false");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::api::KafkaApi;
use crate::config::Profile;
use crate::error::{MskError, Result};
use crate::properties::parse_server_properties;
use crate::session::{AwsSessionProvider, SessionProvider};
use crate::testing::{TestContext, must_succeed};
use crate::types::{
    BootstrapBrokers, ClusterInfo, ConfigurationRevision, DescribeClusterRequest,
    DescribeConfigurationRequest, DescribeConfigurationRevisionRequest,
    GetBootstrapBrokersRequest,
};

/// Region-scoped query facade over the MSK management API
#[derive(Clone)]
pub struct ClusterMetadataClient {
    region: String,
    api: Arc<dyn KafkaApi>,
}

impl fmt::Debug for ClusterMetadataClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterMetadataClient")
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}

impl ClusterMetadataClient {
    /// Connect using the default AWS credential chain
    pub async fn new(region: &str) -> Result<Self> {
        Self::with_provider(&AwsSessionProvider::default(), region).await
    }

    /// Connect through any session provider
    pub async fn with_provider<P>(provider: &P, region: &str) -> Result<Self>
    where
        P: SessionProvider + ?Sized,
    {
        debug!("Opening MSK session for region {}", region);
        let api = provider.open_session(region).await?;
        info!("MSK metadata client ready for region {}", region);
        Ok(Self::from_api(region, api))
    }

    /// Connect using the settings of a config profile
    pub async fn from_profile(profile: &Profile) -> Result<Self> {
        let region = profile.resolve_region()?;
        let provider = profile.session_provider()?;
        Self::with_provider(&provider, &region).await
    }

    /// Wrap an existing API handle
    pub fn from_api(region: impl Into<String>, api: Arc<dyn KafkaApi>) -> Self {
        Self {
            region: region.into(),
            api,
        }
    }

    /// Connect, or abort the test on failure
    pub async fn require_new<C: TestContext + ?Sized>(t: &C, region: &str) -> Self {
        must_succeed(t, Self::new(region).await)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    // -------------------------------------------------------------------------
    // Cluster
    // -------------------------------------------------------------------------

    /// Describe the cluster identified by `cluster_arn`
    pub async fn get_cluster_info(&self, cluster_arn: &str) -> Result<ClusterInfo> {
        non_empty("cluster ARN", cluster_arn)?;
        let response = self
            .api
            .describe_cluster(DescribeClusterRequest {
                cluster_arn: cluster_arn.to_string(),
            })
            .await?;

        response.cluster_info.ok_or(MskError::MissingField {
            operation: "DescribeCluster",
            field: "cluster_info",
        })
    }

    pub async fn require_cluster_info<C: TestContext + ?Sized>(
        &self,
        t: &C,
        cluster_arn: &str,
    ) -> ClusterInfo {
        must_succeed(t, self.get_cluster_info(cluster_arn).await)
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Name of the configuration identified by `configuration_arn`
    pub async fn get_configuration_name(&self, configuration_arn: &str) -> Result<String> {
        non_empty("configuration ARN", configuration_arn)?;
        let description = self
            .api
            .describe_configuration(DescribeConfigurationRequest {
                arn: configuration_arn.to_string(),
            })
            .await?;

        description.name.ok_or(MskError::MissingField {
            operation: "DescribeConfiguration",
            field: "name",
        })
    }

    pub async fn require_configuration_name<C: TestContext + ?Sized>(
        &self,
        t: &C,
        configuration_arn: &str,
    ) -> String {
        must_succeed(t, self.get_configuration_name(configuration_arn).await)
    }

    /// Latest revision entry of a configuration, with its timestamp and
    /// description
    pub async fn get_latest_configuration_revision_info(
        &self,
        configuration_arn: &str,
    ) -> Result<ConfigurationRevision> {
        non_empty("configuration ARN", configuration_arn)?;
        let description = self
            .api
            .describe_configuration(DescribeConfigurationRequest {
                arn: configuration_arn.to_string(),
            })
            .await?;

        description.latest_revision.ok_or(MskError::MissingField {
            operation: "DescribeConfiguration",
            field: "latest_revision",
        })
    }

    pub async fn require_latest_configuration_revision_info<C: TestContext + ?Sized>(
        &self,
        t: &C,
        configuration_arn: &str,
    ) -> ConfigurationRevision {
        must_succeed(
            t,
            self.get_latest_configuration_revision_info(configuration_arn)
                .await,
        )
    }

    /// Latest revision number of a configuration
    pub async fn get_latest_configuration_revision(&self, configuration_arn: &str) -> Result<i64> {
        let latest = self
            .get_latest_configuration_revision_info(configuration_arn)
            .await?;

        latest.revision.ok_or(MskError::MissingField {
            operation: "DescribeConfiguration",
            field: "latest_revision.revision",
        })
    }

    pub async fn require_latest_configuration_revision<C: TestContext + ?Sized>(
        &self,
        t: &C,
        configuration_arn: &str,
    ) -> i64 {
        must_succeed(
            t,
            self.get_latest_configuration_revision(configuration_arn)
                .await,
        )
    }

    /// Raw `server.properties` content of one configuration revision
    pub async fn get_server_properties(
        &self,
        configuration_arn: &str,
        revision: i64,
    ) -> Result<Vec<u8>> {
        non_empty("configuration ARN", configuration_arn)?;
        let description = self
            .api
            .describe_configuration_revision(DescribeConfigurationRevisionRequest {
                arn: configuration_arn.to_string(),
                revision,
            })
            .await?;

        description.server_properties.ok_or(MskError::MissingField {
            operation: "DescribeConfigurationRevision",
            field: "server_properties",
        })
    }

    pub async fn require_server_properties<C: TestContext + ?Sized>(
        &self,
        t: &C,
        configuration_arn: &str,
        revision: i64,
    ) -> Vec<u8> {
        must_succeed(
            t,
            self.get_server_properties(configuration_arn, revision)
                .await,
        )
    }

    /// Server properties of one revision, parsed into key/value pairs
    pub async fn get_server_properties_map(
        &self,
        configuration_arn: &str,
        revision: i64,
    ) -> Result<BTreeMap<String, String>> {
        let raw = self
            .get_server_properties(configuration_arn, revision)
            .await?;
        Ok(parse_server_properties(&raw))
    }

    pub async fn require_server_properties_map<C: TestContext + ?Sized>(
        &self,
        t: &C,
        configuration_arn: &str,
        revision: i64,
    ) -> BTreeMap<String, String> {
        must_succeed(
            t,
            self.get_server_properties_map(configuration_arn, revision)
                .await,
        )
    }

    // -------------------------------------------------------------------------
    // Bootstrap brokers
    // -------------------------------------------------------------------------

    /// Every bootstrap broker string the cluster currently exposes
    pub async fn get_bootstrap_brokers(&self, cluster_arn: &str) -> Result<BootstrapBrokers> {
        non_empty("cluster ARN", cluster_arn)?;
        let brokers = self
            .api
            .get_bootstrap_brokers(GetBootstrapBrokersRequest {
                cluster_arn: cluster_arn.to_string(),
            })
            .await?;
        Ok(brokers)
    }

    pub async fn require_bootstrap_brokers<C: TestContext + ?Sized>(
        &self,
        t: &C,
        cluster_arn: &str,
    ) -> BootstrapBrokers {
        must_succeed(t, self.get_bootstrap_brokers(cluster_arn).await)
    }

    /// Plaintext bootstrap broker connection string
    pub async fn get_broker_connection_string(&self, cluster_arn: &str) -> Result<String> {
        let brokers = self.get_bootstrap_brokers(cluster_arn).await?;
        brokers.plaintext.ok_or(MskError::MissingField {
            operation: "GetBootstrapBrokers",
            field: "bootstrap_broker_string",
        })
    }

    pub async fn require_broker_connection_string<C: TestContext + ?Sized>(
        &self,
        t: &C,
        cluster_arn: &str,
    ) -> String {
        must_succeed(t, self.get_broker_connection_string(cluster_arn).await)
    }

    /// TLS bootstrap broker connection string
    pub async fn get_broker_connection_string_tls(&self, cluster_arn: &str) -> Result<String> {
        let brokers = self.get_bootstrap_brokers(cluster_arn).await?;
        brokers.tls.ok_or(MskError::MissingField {
            operation: "GetBootstrapBrokers",
            field: "bootstrap_broker_string_tls",
        })
    }

    pub async fn require_broker_connection_string_tls<C: TestContext + ?Sized>(
        &self,
        t: &C,
        cluster_arn: &str,
    ) -> String {
        must_succeed(t, self.get_broker_connection_string_tls(cluster_arn).await)
    }
}

fn non_empty(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MskError::Validation(format!("{} must not be empty", what)));
    }
    Ok(())
}
