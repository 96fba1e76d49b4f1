//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at startup. Later calls are no-ops, whatever their profile.
/// Log output goes to stderr; stdout is left to command output.
/// `RUST_LOG` overrides the default filter of every profile.
///
/// # Profiles
///
/// - **Development**: Human-readable logs, `nxmeta=debug`
/// - **Production**: JSON structured logs, `nxmeta=info` (`--json-logs`)
/// - **Test**: Bare registry; tests install their own capture layer
///
/// # Example
///
/// ```
/// use nxmeta_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter_for(profile))
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(filter_for(profile))
                .init();
        }
        Profile::Test => {
            // init_test_capture() may already own the global subscriber
            tracing_subscriber::registry().try_init().ok();
        }
    });
}

/// `RUST_LOG` if set, else the profile's default directive
fn filter_for(profile: Profile) -> EnvFilter {
    let default = match profile {
        Profile::Development => "nxmeta=debug",
        Profile::Production | Profile::Test => "nxmeta=info",
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
