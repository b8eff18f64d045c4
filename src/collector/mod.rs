//! Reference traversal over dependency trees.
//!
//! The collector plays the role of a graph builder around the management
//! engine: for every child dependency it asks the current
//! [`DependencyManager`] for overrides, builds the effective dependency,
//! prunes children excluded along the path, and derives the snapshot passed
//! to the child's own children.
//!
//! Three traversal orders are supported and produce identical trees:
//!
//! - [`Traversal::DepthFirst`] - recursive, one sibling after another
//! - [`Traversal::BreadthFirst`] - level by level from a work queue
//! - [`Traversal::Parallel`] - siblings expanded concurrently with `rayon`,
//!   all sharing their parent's snapshot
//!
//! # Example
//!
//! ```rust
//! use depmgr::collector::{Collector, Traversal};
//! use depmgr::core::{Artifact, Dependency, DependencyNode};
//! use depmgr::management::{DependencyManager, ManagementPreset};
//! use depmgr::scope::LegacySystemScopeHandler;
//!
//! let root = DependencyNode::root()
//!     .with_managed(Dependency::new(Artifact::new("g", "a", "2.0"), ""))
//!     .with_child(DependencyNode::new(Dependency::new(Artifact::new("g", "a", ""), "compile")));
//!
//! let manager = DependencyManager::new(ManagementPreset::Default, LegacySystemScopeHandler::shared());
//! let resolved = Collector::new(manager).collect(&root, Traversal::DepthFirst);
//! assert_eq!(resolved[0].dependency.artifact.version, "2.0");
//! ```

mod system_path;
mod tree_file;

pub use system_path::verify_system_paths;
pub use tree_file::{load_tree, parse_tree};

use im::OrdSet;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::VecDeque;

use crate::core::{Dependency, DependencyNode, Exclusion};
use crate::management::{DependencyManager, ManagedFields};

/// Order in which the collector expands the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Traversal {
    /// Recursive depth-first expansion.
    #[default]
    #[value(name = "dfs")]
    DepthFirst,
    /// Level-by-level expansion from a queue.
    #[value(name = "bfs")]
    BreadthFirst,
    /// Depth-first with siblings expanded in parallel.
    Parallel,
}

/// A dependency after management, with its resolved children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNode {
    /// The effective dependency.
    pub dependency: Dependency,
    /// Version declared before management, when management changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premanaged_version: Option<String>,
    /// Scope declared before management, when management changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premanaged_scope: Option<String>,
    /// Depth of the snapshot that managed this dependency.
    pub depth: usize,
    /// Which fields management overrode.
    pub managed: ManagedFields,
    /// Whether the effective dependency is system-scoped.
    pub system: bool,
    /// Resolved children.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    /// Number of nodes in this subtree, this one included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ResolvedNode::len).sum::<usize>()
    }

    /// Always `false`; a resolved node contains at least itself.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Visit this node and its descendants depth-first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ResolvedNode)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// Walks dependency trees, applying management from a root snapshot.
#[derive(Debug, Clone)]
pub struct Collector {
    root_manager: DependencyManager,
}

impl Collector {
    /// Create a collector starting from `root_manager` (normally depth 0).
    pub fn new(root_manager: DependencyManager) -> Self {
        Self {
            root_manager,
        }
    }

    /// The root snapshot.
    pub fn root_manager(&self) -> &DependencyManager {
        &self.root_manager
    }

    /// Resolve the children of `root` in the given order.
    pub fn collect(&self, root: &DependencyNode, traversal: Traversal) -> Vec<ResolvedNode> {
        tracing::debug!(
            "Collecting {} node(s) {:?} from management depth {}",
            root.descendant_count(),
            traversal,
            self.root_manager.depth()
        );

        let no_exclusions = OrdSet::new();
        match traversal {
            Traversal::DepthFirst => self.expand(root, &self.root_manager, &no_exclusions),
            Traversal::BreadthFirst => self.collect_breadth_first(root),
            Traversal::Parallel => self.expand_parallel(root, &self.root_manager, &no_exclusions),
        }
    }

    fn expand(
        &self,
        node: &DependencyNode,
        manager: &DependencyManager,
        excluded: &OrdSet<Exclusion>,
    ) -> Vec<ResolvedNode> {
        let child_manager = manager.derive_child(&node.managed);
        node.children
            .iter()
            .filter_map(|child| {
                let (mut resolved, child_excluded) = resolve(child, &child_manager, excluded)?;
                resolved.children = self.expand(child, &child_manager, &child_excluded);
                Some(resolved)
            })
            .collect()
    }

    fn expand_parallel(
        &self,
        node: &DependencyNode,
        manager: &DependencyManager,
        excluded: &OrdSet<Exclusion>,
    ) -> Vec<ResolvedNode> {
        let child_manager = manager.derive_child(&node.managed);
        node.children
            .par_iter()
            .filter_map(|child| {
                let (mut resolved, child_excluded) = resolve(child, &child_manager, excluded)?;
                resolved.children = self.expand_parallel(child, &child_manager, &child_excluded);
                Some(resolved)
            })
            .collect()
    }

    fn collect_breadth_first(&self, root: &DependencyNode) -> Vec<ResolvedNode> {
        struct Pending<'a> {
            parent: Option<usize>,
            node: &'a DependencyNode,
            manager: DependencyManager,
            excluded: OrdSet<Exclusion>,
        }

        let mut arena: Vec<Option<ResolvedNode>> = Vec::new();
        let mut links: Vec<Vec<usize>> = Vec::new();
        let mut top_level = Vec::new();
        let mut queue = VecDeque::new();

        let root_children_manager = self.root_manager.derive_child(&root.managed);
        for child in &root.children {
            queue.push_back(Pending {
                parent: None,
                node: child,
                manager: root_children_manager.clone(),
                excluded: OrdSet::new(),
            });
        }

        while let Some(pending) = queue.pop_front() {
            let Some((resolved, excluded)) = resolve(pending.node, &pending.manager, &pending.excluded)
            else {
                continue;
            };

            let index = arena.len();
            arena.push(Some(resolved));
            links.push(Vec::new());
            match pending.parent {
                Some(parent) => links[parent].push(index),
                None => top_level.push(index),
            }

            let grandchild_manager = pending.manager.derive_child(&pending.node.managed);
            for grandchild in &pending.node.children {
                queue.push_back(Pending {
                    parent: Some(index),
                    node: grandchild,
                    manager: grandchild_manager.clone(),
                    excluded: excluded.clone(),
                });
            }
        }

        top_level.into_iter().filter_map(|index| assemble(index, &mut arena, &links)).collect()
    }
}

/// Manage one child and compute the exclusions its descendants inherit.
///
/// Returns `None` when the child is excluded by an ancestor or carries no
/// dependency.
fn resolve(
    node: &DependencyNode,
    manager: &DependencyManager,
    excluded: &OrdSet<Exclusion>,
) -> Option<(ResolvedNode, OrdSet<Exclusion>)> {
    let declared = node.dependency.as_ref()?;

    if let Some(exclusion) = excluded.iter().find(|exclusion| exclusion.matches(&declared.artifact)) {
        tracing::debug!("Excluding {} (matched {})", declared.artifact, exclusion);
        return None;
    }

    let management = manager.manage(declared);
    let (dependency, managed) = match &management {
        Some(management) => (management.apply_to(declared), management.managed_fields()),
        None => (declared.clone(), ManagedFields::default()),
    };

    let premanaged_version = (dependency.artifact.version != declared.artifact.version)
        .then(|| declared.artifact.version.clone());
    let premanaged_scope = (dependency.scope != declared.scope).then(|| declared.scope.clone());

    let mut inherited = excluded.clone();
    inherited.extend(dependency.exclusions.iter().cloned());

    let system = manager.scope_handler().is_system_dependency(&dependency);
    let resolved = ResolvedNode {
        dependency,
        premanaged_version,
        premanaged_scope,
        depth: manager.depth(),
        managed,
        system,
        children: Vec::new(),
    };
    Some((resolved, inherited))
}

fn assemble(index: usize, arena: &mut [Option<ResolvedNode>], links: &[Vec<usize>]) -> Option<ResolvedNode> {
    let mut node = arena[index].take()?;
    node.children = links[index].iter().filter_map(|&child| assemble(child, arena, links)).collect();
    Some(node)
}
