//! [`KafkaApi`] backed by `aws-sdk-kafka`

use std::fmt::Debug;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_kafka::config::{self, retry::RetryConfig};
use aws_sdk_kafka::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_kafka::primitives::DateTime as SdkDateTime;
use aws_sdk_kafka::{Client, types};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::api::KafkaApi;
use crate::error::{RemoteApiError, RemoteErrorKind};
use crate::types::{
    BootstrapBrokers, BrokerSoftwareInfo, ClusterInfo, ConfigurationDescription,
    ConfigurationRevision, ConfigurationRevisionDescription, DescribeClusterRequest,
    DescribeClusterResponse, DescribeConfigurationRequest, DescribeConfigurationRevisionRequest,
    GetBootstrapBrokersRequest,
};

/// MSK management API client
#[derive(Debug, Clone)]
pub struct AwsKafkaApi {
    client: Client,
}

impl AwsKafkaApi {
    /// Build from shared AWS configuration
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self::from_conf(config::Builder::from(sdk_config).build())
    }

    /// Build from a service-specific configuration.
    ///
    /// SDK-level retries are always switched off so every query maps to
    /// exactly one request.
    pub fn from_conf(conf: config::Config) -> Self {
        let conf = conf
            .to_builder()
            .retry_config(RetryConfig::disabled())
            .build();
        Self {
            client: Client::from_conf(conf),
        }
    }
}

#[async_trait]
impl KafkaApi for AwsKafkaApi {
    async fn describe_cluster(
        &self,
        request: DescribeClusterRequest,
    ) -> Result<DescribeClusterResponse, RemoteApiError> {
        debug!(cluster_arn = %request.cluster_arn, "DescribeCluster");
        let output = self
            .client
            .describe_cluster()
            .cluster_arn(request.cluster_arn)
            .send()
            .await
            .map_err(|e| remote_error("DescribeCluster", e))?;

        Ok(DescribeClusterResponse {
            cluster_info: output.cluster_info.map(cluster_info),
        })
    }

    async fn describe_configuration(
        &self,
        request: DescribeConfigurationRequest,
    ) -> Result<ConfigurationDescription, RemoteApiError> {
        debug!(arn = %request.arn, "DescribeConfiguration");
        let output = self
            .client
            .describe_configuration()
            .arn(request.arn)
            .send()
            .await
            .map_err(|e| remote_error("DescribeConfiguration", e))?;

        Ok(ConfigurationDescription {
            arn: output.arn,
            name: output.name,
            description: output.description,
            kafka_versions: output.kafka_versions.unwrap_or_default(),
            state: output.state.map(|s| s.as_str().to_string()),
            creation_time: output.creation_time.as_ref().and_then(timestamp),
            latest_revision: output.latest_revision.map(configuration_revision),
        })
    }

    async fn describe_configuration_revision(
        &self,
        request: DescribeConfigurationRevisionRequest,
    ) -> Result<ConfigurationRevisionDescription, RemoteApiError> {
        debug!(arn = %request.arn, revision = request.revision, "DescribeConfigurationRevision");
        let output = self
            .client
            .describe_configuration_revision()
            .arn(request.arn)
            .revision(request.revision)
            .send()
            .await
            .map_err(|e| remote_error("DescribeConfigurationRevision", e))?;

        Ok(ConfigurationRevisionDescription {
            arn: output.arn,
            revision: output.revision,
            description: output.description,
            creation_time: output.creation_time.as_ref().and_then(timestamp),
            server_properties: output.server_properties.map(|blob| blob.into_inner()),
        })
    }

    async fn get_bootstrap_brokers(
        &self,
        request: GetBootstrapBrokersRequest,
    ) -> Result<BootstrapBrokers, RemoteApiError> {
        debug!(cluster_arn = %request.cluster_arn, "GetBootstrapBrokers");
        let output = self
            .client
            .get_bootstrap_brokers()
            .cluster_arn(request.cluster_arn)
            .send()
            .await
            .map_err(|e| remote_error("GetBootstrapBrokers", e))?;

        Ok(BootstrapBrokers {
            plaintext: output.bootstrap_broker_string,
            tls: output.bootstrap_broker_string_tls,
            sasl_scram: output.bootstrap_broker_string_sasl_scram,
            sasl_iam: output.bootstrap_broker_string_sasl_iam,
            public_tls: output.bootstrap_broker_string_public_tls,
        })
    }
}

/// Classify an SDK failure without losing the service's code and message
fn remote_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> RemoteApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    trace!(operation, error = %DisplayErrorContext(&err), "remote call failed");

    let (kind, code, message) = match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            (RemoteErrorKind::Transport, None, None)
        }
        _ => match err.as_service_error() {
            Some(service) => (
                service
                    .code()
                    .map(RemoteErrorKind::from_code)
                    .unwrap_or(RemoteErrorKind::Other),
                service.code().map(str::to_string),
                service.message().map(str::to_string),
            ),
            None => (RemoteErrorKind::Other, None, None),
        },
    };

    RemoteApiError {
        operation,
        kind,
        code,
        message: message.unwrap_or_else(|| DisplayErrorContext(&err).to_string()),
    }
}

fn timestamp(value: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

fn cluster_info(info: types::ClusterInfo) -> ClusterInfo {
    ClusterInfo {
        cluster_arn: info.cluster_arn,
        cluster_name: info.cluster_name,
        state: info.state.map(|s| s.as_str().to_string()),
        current_version: info.current_version,
        number_of_broker_nodes: info.number_of_broker_nodes,
        creation_time: info.creation_time.as_ref().and_then(timestamp),
        current_broker_software_info: info.current_broker_software_info.map(|sw| {
            BrokerSoftwareInfo {
                configuration_arn: sw.configuration_arn,
                configuration_revision: sw.configuration_revision,
                kafka_version: sw.kafka_version,
            }
        }),
        zookeeper_connect_string: info.zookeeper_connect_string,
        zookeeper_connect_string_tls: info.zookeeper_connect_string_tls,
        tags: info.tags.unwrap_or_default(),
    }
}

fn configuration_revision(revision: types::ConfigurationRevision) -> ConfigurationRevision {
    ConfigurationRevision {
        revision: revision.revision,
        creation_time: revision.creation_time.as_ref().and_then(timestamp),
        description: revision.description,
    }
}
