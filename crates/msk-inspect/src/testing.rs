//! Test-harness integration
//!
//! Every query has a strict form returning [`Result`] and a `require_*` form
//! that aborts the calling test instead. The abort goes through a
//! [`TestContext`], so suites with their own harness can decide how a failed
//! requirement is reported. Under plain `cargo test`, use [`LibTest`].
//!
//! ```rust,ignore
//! use msk_inspect::{ClusterMetadataClient, LibTest};
//!
//! #[tokio::test]
//! async fn brokers_expose_tls() {
//!     let t = LibTest;
//!     let client = ClusterMetadataClient::require_new(&t, "us-east-1").await;
//!     let brokers = client.require_broker_connection_string_tls(&t, CLUSTER_ARN).await;
//!     assert!(brokers.contains(":9094"));
//! }
//! ```

use std::fmt::Display;
use std::sync::Once;

use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is not set
const DEFAULT_TEST_FILTER: &str = "msk_inspect=info";

/// Handle onto the running test that can stop it immediately
pub trait TestContext {
    /// Name reported alongside the failure
    fn name(&self) -> String {
        "unnamed test".to_string()
    }

    /// Report `message` and end the test. Never returns.
    fn fail_now(&self, message: &str) -> !;
}

/// [`TestContext`] for the standard libtest harness.
///
/// libtest names each test thread after the test, so that name is used in
/// the failure report. Failing panics, which libtest records as a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibTest;

impl TestContext for LibTest {
    fn name(&self) -> String {
        std::thread::current()
            .name()
            .unwrap_or("unnamed test")
            .to_string()
    }

    fn fail_now(&self, message: &str) -> ! {
        panic!("{}: {}", self.name(), message)
    }
}

/// Unwrap `result`, or abort the test through `t` with the error as reason
#[track_caller]
pub fn must_succeed<T, E, C>(t: &C, result: Result<T, E>) -> T
where
    E: Display,
    C: TestContext + ?Sized,
{
    match result {
        Ok(value) => value,
        Err(err) => {
            error!(test = %t.name(), error = %err, "required operation failed");
            t.fail_now(&format!("received unexpected error: {}", err))
        }
    }
}

/// Install a `tracing` subscriber that writes through libtest's capture.
///
/// Honors `RUST_LOG`; safe to call from every test.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));

        // Another subscriber may already be installed by the host suite
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_test_writer().with_target(true).compact())
            .try_init();
    });
}
