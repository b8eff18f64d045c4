//! Dependency management derivation engine.
//!
//! While a dependency tree is expanded, every node may carry managed
//! declarations ("whatever depends on `g:a` below me gets version 2.0").
//! This module accumulates those declarations along each root-to-node path
//! and answers, for every dependency encountered, which overrides apply.
//!
//! # Components
//!
//! - [`ManagementKey`] / [`KeyScheme`] - coordinate identity used for matching
//! - [`OverrideMaps`] - persistent maps of managed versions, scopes,
//!   optionality, local paths and exclusions
//! - [`DependencyManager`] - immutable snapshot at one depth, with
//!   [`derive_child`](DependencyManager::derive_child) and
//!   [`manage`](DependencyManager::manage)
//! - [`DependencyManagement`] - the override record for one dependency
//! - [`ManagementPreset`] - named threshold pairs
//!
//! # Merge Rules
//!
//! | Override   | Rule across depths                          |
//! |------------|---------------------------------------------|
//! | version    | nearest to the root wins                    |
//! | scope      | nearest to the root wins                    |
//! | optional   | nearest to the root wins                    |
//! | local path | nearest to the root wins (system scope only) |
//! | exclusions | union of every declaration on the path      |
//!
//! Results depend only on the path from the root, so breadth-first,
//! depth-first and parallel traversals all observe the same overrides.
//!
//! # Thresholds
//!
//! `apply_from` is the first depth at which [`DependencyManager::manage`]
//! returns anything; `derive_until` is the depth from which
//! [`DependencyManager::derive_child`] stops admitting entries. Past
//! `derive_until` the depth keeps increasing, so `apply_from` stays
//! meaningful at any depth.

mod key;
mod manager;
mod maps;
mod preset;
mod record;

pub use key::{KeyScheme, ManagementKey};
pub use manager::DependencyManager;
pub use maps::OverrideMaps;
pub use preset::ManagementPreset;
pub use record::{DependencyManagement, ManagedFields};
