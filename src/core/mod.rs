//! Core types for depmgr
//!
//! The vocabulary shared by every other module:
//!
//! - [`Artifact`] and [`Exclusion`] - repository coordinates and the patterns
//!   that prune them from a subtree
//! - [`Dependency`] and [`DependencyNode`] - declarations as they appear in a
//!   dependency tree, including the managed-dependency declarations a node
//!   carries for its descendants
//! - [`DepmgrError`] and [`ErrorContext`] - the error type used wherever the
//!   crate touches the outside world, with user-friendly rendering

mod artifact;
mod dependency;
pub mod error;

pub use artifact::{Artifact, Exclusion};
pub use dependency::{Dependency, DependencyNode};
pub use error::{DepmgrError, ErrorContext, user_friendly_error};
