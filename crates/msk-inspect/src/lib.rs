//! # msk-inspect
//!
//! Read-only metadata queries against AWS Managed Streaming for Kafka (MSK),
//! built for infrastructure test suites that need to assert on what a
//! deployment actually produced.
//!
//! ## What Lives Here
//!
//! - **[`ClusterMetadataClient`]** - one query per piece of metadata: cluster
//!   info, configuration name and latest revision, server properties of a
//!   revision, bootstrap broker strings
//! - **[`KafkaApi`]** - the remote API seam; [`AwsKafkaApi`] talks to MSK via
//!   `aws-sdk-kafka`, tests substitute their own
//! - **[`SessionProvider`]** - turns a region into an authenticated handle
//! - **[`config`]** - named profiles in a TOML file
//! - **[`testing`]** - the abort-on-failure convention and test logging
//!
//! ## Two Calling Conventions
//!
//! ```rust,ignore
//! use msk_inspect::{ClusterMetadataClient, LibTest};
//!
//! // Strict: errors come back to the caller
//! let client = ClusterMetadataClient::new("us-east-1").await?;
//! let info = client.get_cluster_info(cluster_arn).await?;
//!
//! // Convenience: errors fail the test on the spot
//! let t = LibTest;
//! let tls = client.require_broker_connection_string_tls(&t, cluster_arn).await;
//! ```
//!
//! Nothing here retries, caches or paginates: each query is exactly one
//! remote request.

pub mod api;
pub mod aws;
pub mod client;
pub mod config;
pub mod error;
pub mod properties;
pub mod session;
pub mod testing;
pub mod types;

pub use api::KafkaApi;
pub use aws::AwsKafkaApi;
pub use client::ClusterMetadataClient;
pub use config::{Config, ConfigError, Profile};
pub use error::{AuthError, MskError, RemoteApiError, RemoteErrorKind, Result};
pub use properties::parse_server_properties;
pub use session::{AwsSessionProvider, SessionProvider, StaticCredentials};
pub use testing::{LibTest, TestContext, init_test_logging, must_succeed};
pub use types::{
    BootstrapBrokers, BrokerSoftwareInfo, ClusterInfo, ConfigurationDescription,
    ConfigurationRevision, ConfigurationRevisionDescription,
};
