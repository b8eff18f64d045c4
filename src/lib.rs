//! depmgr - dependency management derivation for transitive dependency trees
//!
//! When a dependency tree is expanded, every node may carry *managed*
//! declarations that pin the version, scope, optionality, exclusions or local
//! system path of dependencies found further down. depmgr keeps those rules in
//! an immutable [`management::DependencyManager`] snapshot that is derived
//! once per node and queried for every child.
//!
//! # Architecture Overview
//!
//! - A snapshot records its depth and the nearest-wins override maps gathered
//!   so far. Deriving a child never mutates the parent, so sibling subtrees can
//!   be expanded in any order, or in parallel, from the same parent.
//! - Scalar overrides (version, scope, optional, local path) keep the first
//!   declaration seen walking down from the root. Exclusions accumulate.
//! - Two thresholds decide *where* management happens: `derive_until` stops
//!   collecting new rules at a depth, `apply_from` starts applying them.
//! - What counts as "system" scope and where its local path lives is a
//!   pluggable [`scope::SystemScopeHandler`].
//!
//! # Core Modules
//!
//! - [`core`] - Artifacts, exclusions, dependencies, tree nodes and errors
//! - [`management`] - Snapshots, presets, override maps and management records
//! - [`scope`] - System scope policies
//! - [`collector`] - Reference tree expansion (depth-first, breadth-first, parallel)
//! - [`config`] - `depmgr.toml` management configuration
//! - [`cli`] - The `depmgr` command line
//!
//! # Presets
//!
//! | Preset       | derive_until | apply_from |
//! |--------------|--------------|------------|
//! | `default`    | unbounded    | 0          |
//! | `transitive` | unbounded    | 2          |
//! | `classic`    | 2            | 2          |
//!
//! # Example
//!
//! ```rust,no_run
//! use depmgr::core::{Artifact, Dependency};
//! use depmgr::management::{DependencyManager, ManagementPreset};
//! use depmgr::scope::LegacySystemScopeHandler;
//!
//! let root = DependencyManager::new(ManagementPreset::Default, LegacySystemScopeHandler::shared());
//! let pin = Dependency::new(Artifact::new("org.example", "lib", "2.0"), "");
//! let child = root.derive_child(&[pin]);
//!
//! let found = Dependency::new(Artifact::new("org.example", "lib", "1.0"), "compile");
//! let management = child.manage(&found).expect("managed");
//! assert_eq!(management.version.as_deref(), Some("2.0"));
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod constants;
pub mod core;
pub mod management;
pub mod scope;

// test_utils is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
