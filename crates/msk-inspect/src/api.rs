//! Remote management API abstraction
//!
//! [`KafkaApi`] exposes the MSK request shapes the metadata queries need.
//! Production code uses [`AwsKafkaApi`](crate::aws::AwsKafkaApi); tests swap
//! in a mock so no live endpoint is required.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::error::RemoteApiError;
use crate::types::{
    BootstrapBrokers, ConfigurationDescription, ConfigurationRevisionDescription,
    DescribeClusterRequest, DescribeClusterResponse, DescribeConfigurationRequest,
    DescribeConfigurationRevisionRequest, GetBootstrapBrokersRequest,
};

/// One method per remote call. Each method issues exactly one request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait KafkaApi: Send + Sync {
    async fn describe_cluster(
        &self,
        request: DescribeClusterRequest,
    ) -> Result<DescribeClusterResponse, RemoteApiError>;

    async fn describe_configuration(
        &self,
        request: DescribeConfigurationRequest,
    ) -> Result<ConfigurationDescription, RemoteApiError>;

    async fn describe_configuration_revision(
        &self,
        request: DescribeConfigurationRevisionRequest,
    ) -> Result<ConfigurationRevisionDescription, RemoteApiError>;

    async fn get_bootstrap_brokers(
        &self,
        request: GetBootstrapBrokersRequest,
    ) -> Result<BootstrapBrokers, RemoteApiError>;
}
