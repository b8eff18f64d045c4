//! System scope classification.
//!
//! "System" scope marks a dependency that is never looked up in a
//! repository: it names a file on the local filesystem through an artifact
//! property, and has no descriptor of its own. Which scope labels count as
//! system, and which property holds the path, is decided by the consumer
//! through a [`SystemScopeHandler`] injected into the
//! [`DependencyManager`](crate::management::DependencyManager) and into the
//! collector. Nothing here touches the filesystem; checking that the path
//! exists is done by [`crate::collector::verify_system_paths`].
//!
//! Two policies are provided:
//!
//! - [`LegacySystemScopeHandler`] - exactly the label `system`, path in the
//!   `localPath` property
//! - [`LabelSetScopeHandler`] - any set of labels and any property key,
//!   usually built from configuration
//!
//! # Examples
//!
//! ```rust
//! use depmgr::core::Artifact;
//! use depmgr::scope::{LegacySystemScopeHandler, SystemScopeHandler};
//!
//! let handler = LegacySystemScopeHandler;
//! assert!(handler.is_system_scope("system"));
//! assert!(!handler.is_system_scope("compile"));
//!
//! let artifact = Artifact::new("com.sun", "tools", "1.8").with_property("localPath", "/opt/tools.jar");
//! assert_eq!(handler.system_path(&artifact), Some("/opt/tools.jar"));
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::constants::{LOCAL_PATH_PROPERTY, SYSTEM_SCOPE};
use crate::core::{Artifact, Dependency, DependencyNode};

/// Policy deciding what counts as system scope and where the local path lives.
///
/// Implementations must be stateless or internally immutable: one instance is
/// shared by every snapshot of a management lineage and used from parallel
/// subtree expansions without synchronization.
pub trait SystemScopeHandler: Send + Sync + fmt::Debug {
    /// Whether `scope` is a system scope label.
    fn is_system_scope(&self, scope: &str) -> bool;

    /// Whether `dependency` is in system scope.
    fn is_system_dependency(&self, dependency: &Dependency) -> bool {
        self.is_system_scope(&dependency.scope)
    }

    /// Whether the node's dependency is in system scope; `false` for the root.
    fn is_system_node(&self, node: &DependencyNode) -> bool {
        node.dependency.as_ref().is_some_and(|dependency| self.is_system_dependency(dependency))
    }

    /// The local path the artifact declares, if any.
    fn system_path<'a>(&self, artifact: &'a Artifact) -> Option<&'a str>;

    /// Set (`Some`) or remove (`None`) the local path in a property map.
    fn set_system_path(&self, properties: &mut BTreeMap<String, String>, path: Option<&str>);
}

/// The classic policy: only `system` is a system scope, path in `localPath`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LegacySystemScopeHandler;

impl LegacySystemScopeHandler {
    /// The legacy policy as a shareable handle.
    pub fn shared() -> Arc<dyn SystemScopeHandler> {
        Arc::new(Self)
    }
}

impl SystemScopeHandler for LegacySystemScopeHandler {
    fn is_system_scope(&self, scope: &str) -> bool {
        scope == SYSTEM_SCOPE
    }

    fn system_path<'a>(&self, artifact: &'a Artifact) -> Option<&'a str> {
        artifact.property(LOCAL_PATH_PROPERTY)
    }

    fn set_system_path(&self, properties: &mut BTreeMap<String, String>, path: Option<&str>) {
        set_property(properties, LOCAL_PATH_PROPERTY, path);
    }
}

/// A policy accepting a configurable set of labels and path property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSetScopeHandler {
    labels: BTreeSet<String>,
    path_property: String,
}

impl LabelSetScopeHandler {
    /// Create a handler classifying every label in `labels` as system scope.
    pub fn new(
        labels: impl IntoIterator<Item = impl Into<String>>,
        path_property: impl Into<String>,
    ) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            path_property: path_property.into(),
        }
    }

    /// Labels treated as system scope.
    pub fn labels(&self) -> &BTreeSet<String> {
        &self.labels
    }

    /// Property key holding the local path.
    pub fn path_property(&self) -> &str {
        &self.path_property
    }
}

impl SystemScopeHandler for LabelSetScopeHandler {
    fn is_system_scope(&self, scope: &str) -> bool {
        self.labels.contains(scope)
    }

    fn system_path<'a>(&self, artifact: &'a Artifact) -> Option<&'a str> {
        artifact.property(&self.path_property)
    }

    fn set_system_path(&self, properties: &mut BTreeMap<String, String>, path: Option<&str>) {
        set_property(properties, &self.path_property, path);
    }
}

fn set_property(properties: &mut BTreeMap<String, String>, key: &str, value: Option<&str>) {
    match value {
        Some(value) => {
            properties.insert(key.to_string(), value.to_string());
        }
        None => {
            properties.remove(key);
        }
    }
}
