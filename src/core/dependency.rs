//! Dependency declarations and the graph nodes that carry them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::{Artifact, Exclusion};

/// A declared dependency on an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    /// The artifact depended upon.
    pub artifact: Artifact,
    /// Scope label, empty when undeclared.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
    /// Optionality, `None` when undeclared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    /// Artifacts removed from this dependency's subtree.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub exclusions: BTreeSet<Exclusion>,
}

impl Dependency {
    /// Create a dependency with the given scope and nothing else declared.
    pub fn new(artifact: Artifact, scope: impl Into<String>) -> Self {
        Self {
            artifact,
            scope: scope.into(),
            optional: None,
            exclusions: BTreeSet::new(),
        }
    }

    /// Declare optionality.
    #[must_use]
    pub const fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }

    /// Add exclusions.
    #[must_use]
    pub fn with_exclusions(mut self, exclusions: impl IntoIterator<Item = Exclusion>) -> Self {
        self.exclusions.extend(exclusions);
        self
    }

    /// Effective optionality; undeclared means required.
    pub fn is_optional(&self) -> bool {
        self.optional.unwrap_or(false)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact)?;
        if !self.scope.is_empty() {
            write!(f, " ({})", self.scope)?;
        }
        if self.is_optional() {
            write!(f, " [optional]")?;
        }
        Ok(())
    }
}

/// A node of a dependency tree as handed to the management engine.
///
/// The root node carries no dependency of its own. `managed` holds the
/// managed-dependency declarations read from this node's descriptor; they
/// affect the node's descendants, never the node itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyNode {
    /// The dependency this node stands for, `None` for the root.
    pub dependency: Option<Dependency>,
    /// Managed-dependency declarations attached to this node.
    pub managed: Vec<Dependency>,
    /// Direct dependencies of this node.
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    /// Create a root node.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a node for `dependency`.
    pub fn new(dependency: Dependency) -> Self {
        Self {
            dependency: Some(dependency),
            managed: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach a managed-dependency declaration.
    #[must_use]
    pub fn with_managed(mut self, managed: Dependency) -> Self {
        self.managed.push(managed);
        self
    }

    /// Attach a child node.
    #[must_use]
    pub fn with_child(mut self, child: DependencyNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes below this one.
    pub fn descendant_count(&self) -> usize {
        self.children.iter().map(|child| 1 + child.descendant_count()).sum()
    }
}
