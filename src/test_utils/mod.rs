//! Test utilities for depmgr
//!
//! Logging setup and terse constructors for dependencies, managed
//! declarations and management roots, shared by unit and integration tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use depmgr::test_utils::{dep, init_test_logging, managed_version, root_manager};
//! use depmgr::management::ManagementPreset;
//!
//! init_test_logging(None);
//! let child = root_manager(ManagementPreset::Default).derive_child(&[managed_version("g:a", "2.0")]);
//! assert!(child.manage(&dep("g:a:1.0", "compile")).is_some());
//! ```

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::{Artifact, Dependency, Exclusion};
use crate::management::{DependencyManager, ManagementPreset};
use crate::scope::LegacySystemScopeHandler;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, else `RUST_LOG` when set, else stays silent.
///
/// ```bash
/// RUST_LOG=depmgr=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Parse a coordinate, panicking on malformed test input.
pub fn artifact(coordinate: &str) -> Artifact {
    coordinate.parse().unwrap_or_else(|e| panic!("bad test coordinate {coordinate}: {e}"))
}

/// A dependency on `coordinate` in `scope`.
pub fn dep(coordinate: &str, scope: &str) -> Dependency {
    Dependency::new(artifact(coordinate), scope)
}

/// A managed declaration setting the version of `group:artifact`.
pub fn managed_version(group_artifact: &str, version: &str) -> Dependency {
    Dependency::new(artifact(group_artifact).with_version(version), "")
}

/// A managed declaration adding exclusions to `group:artifact`.
pub fn managed_exclusions(group_artifact: &str, exclusions: &[&str]) -> Dependency {
    Dependency::new(artifact(group_artifact), "").with_exclusions(
        exclusions
            .iter()
            .map(|spec| spec.parse::<Exclusion>().unwrap_or_else(|e| panic!("bad test exclusion: {e}"))),
    )
}

/// A root snapshot with the legacy scope policy.
pub fn root_manager(preset: ManagementPreset) -> DependencyManager {
    DependencyManager::new(preset, LegacySystemScopeHandler::shared())
}
