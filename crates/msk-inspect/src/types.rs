//! Request and response shapes for the MSK management API
//!
//! These mirror the subset of the MSK REST contract the queries use. They are
//! owned by this crate so [`KafkaApi`](crate::KafkaApi) implementations do not
//! have to speak `aws-sdk-kafka` types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// `DescribeCluster` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeClusterRequest {
    pub cluster_arn: String,
}

/// `DescribeConfiguration` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigurationRequest {
    pub arn: String,
}

/// `DescribeConfigurationRevision` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeConfigurationRevisionRequest {
    pub arn: String,
    pub revision: i64,
}

/// `GetBootstrapBrokers` input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBootstrapBrokersRequest {
    pub cluster_arn: String,
}

/// `DescribeCluster` output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescribeClusterResponse {
    pub cluster_info: Option<ClusterInfo>,
}

/// Cluster metadata as reported by the management API
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterInfo {
    pub cluster_arn: Option<String>,
    pub cluster_name: Option<String>,
    /// Lifecycle state, e.g. `ACTIVE`, `CREATING`, `UPDATING`
    pub state: Option<String>,
    /// Opaque version token used for optimistic updates
    pub current_version: Option<String>,
    pub number_of_broker_nodes: Option<i32>,
    pub creation_time: Option<DateTime<Utc>>,
    pub current_broker_software_info: Option<BrokerSoftwareInfo>,
    pub zookeeper_connect_string: Option<String>,
    pub zookeeper_connect_string_tls: Option<String>,
    pub tags: HashMap<String, String>,
}

/// Broker software the cluster currently runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerSoftwareInfo {
    pub configuration_arn: Option<String>,
    pub configuration_revision: Option<i64>,
    pub kafka_version: Option<String>,
}

/// `DescribeConfiguration` output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationDescription {
    pub arn: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub kafka_versions: Vec<String>,
    pub state: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    pub latest_revision: Option<ConfigurationRevision>,
}

/// One revision entry of a configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationRevision {
    pub revision: Option<i64>,
    pub creation_time: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

/// `DescribeConfigurationRevision` output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationRevisionDescription {
    pub arn: Option<String>,
    pub revision: Option<i64>,
    pub description: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
    /// Raw `server.properties` content of this revision
    pub server_properties: Option<Vec<u8>>,
}

/// `GetBootstrapBrokers` output
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapBrokers {
    pub plaintext: Option<String>,
    pub tls: Option<String>,
    pub sasl_scram: Option<String>,
    pub sasl_iam: Option<String>,
    pub public_tls: Option<String>,
}
