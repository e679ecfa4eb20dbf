//! Profile configuration for MSK test targets
//!
//! A profile names one MSK environment: the region to query, which AWS
//! credentials to use and optional endpoint or role overrides. Profiles live
//! in a TOML file so suites can switch targets without code changes.
//!
//! # Features
//!
//! - Multiple named profiles with a default
//! - Environment variable expansion in config files
//! - Platform-specific config file locations
//! - Optional OS keyring storage for static access keys

#![allow(clippy::module_inception)]

pub mod config;
pub mod credential;
pub mod error;

// Re-export main types for convenience
pub use config::{Config, Profile};
pub use credential::{CredentialStorage, CredentialStore};
pub use error::{ConfigError, Result};
