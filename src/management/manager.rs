//! The immutable, depth-aware management snapshot.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::{DependencyManagement, KeyScheme, ManagementPreset, OverrideMaps};
use crate::core::Dependency;
use crate::scope::{LegacySystemScopeHandler, SystemScopeHandler};

/// Accumulated dependency management at one depth of a dependency tree.
///
/// A snapshot is created once for the root (depth 0, no overrides) and a new
/// one is derived at every node, one level deeper, folding in that node's
/// managed declarations. Snapshots are never mutated: siblings may share one
/// and expand their subtrees concurrently.
///
/// Scalar overrides follow nearest-wins: the declaration closest to the root
/// is kept and deeper ones for the same key are ignored. Exclusions
/// accumulate along the path instead.
///
/// # Examples
///
/// ```rust
/// use depmgr::core::{Artifact, Dependency};
/// use depmgr::management::{DependencyManager, ManagementPreset};
/// use depmgr::scope::LegacySystemScopeHandler;
///
/// let root = DependencyManager::new(ManagementPreset::Default, LegacySystemScopeHandler::shared());
/// let managed = Dependency::new(Artifact::new("g", "a", "2.0"), "");
/// let child = root.derive_child(&[managed]);
///
/// let declared = Dependency::new(Artifact::new("g", "a", ""), "compile");
/// let management = child.manage(&declared).unwrap();
/// assert_eq!(management.version.as_deref(), Some("2.0"));
/// ```
#[derive(Clone)]
pub struct DependencyManager {
    depth: usize,
    derive_until: usize,
    apply_from: usize,
    key_scheme: KeyScheme,
    maps: OverrideMaps,
    scope_handler: Arc<dyn SystemScopeHandler>,
}

impl DependencyManager {
    /// Create a root snapshot with the thresholds of `preset`.
    pub fn new(preset: ManagementPreset, scope_handler: Arc<dyn SystemScopeHandler>) -> Self {
        let (derive_until, apply_from) = preset.thresholds();
        Self {
            depth: 0,
            derive_until,
            apply_from,
            key_scheme: KeyScheme::default(),
            maps: OverrideMaps::default(),
            scope_handler,
        }
    }

    /// Apply management everywhere, direct dependencies included.
    pub fn apply_everywhere(scope_handler: Arc<dyn SystemScopeHandler>) -> Self {
        Self::new(ManagementPreset::Default, scope_handler)
    }

    /// Apply management only below the direct dependencies.
    pub fn transitive(scope_handler: Arc<dyn SystemScopeHandler>) -> Self {
        Self::new(ManagementPreset::Transitive, scope_handler)
    }

    /// Apply management below the direct dependencies, inheriting it only
    /// from the first levels.
    pub fn classic(scope_handler: Arc<dyn SystemScopeHandler>) -> Self {
        Self::new(ManagementPreset::Classic, scope_handler)
    }

    /// The default preset with the legacy scope policy.
    #[deprecated(note = "pass the scope handler explicitly with `DependencyManager::new`")]
    pub fn legacy() -> Self {
        Self::apply_everywhere(LegacySystemScopeHandler::shared())
    }

    /// Use `key_scheme` to match declarations against dependencies.
    ///
    /// Only meaningful on a root snapshot; derived snapshots inherit it.
    #[must_use]
    pub fn with_key_scheme(mut self, key_scheme: KeyScheme) -> Self {
        self.key_scheme = key_scheme;
        self
    }

    /// Number of derivation steps from the root.
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Depth from which derivation stops admitting new entries.
    pub const fn derive_until(&self) -> usize {
        self.derive_until
    }

    /// Depth from which overrides are applied.
    pub const fn apply_from(&self) -> usize {
        self.apply_from
    }

    /// Key scheme of this lineage.
    pub const fn key_scheme(&self) -> KeyScheme {
        self.key_scheme
    }

    /// The accumulated override maps.
    pub const fn maps(&self) -> &OverrideMaps {
        &self.maps
    }

    /// The scope policy shared by this lineage.
    pub fn scope_handler(&self) -> &Arc<dyn SystemScopeHandler> {
        &self.scope_handler
    }

    /// Whether [`derive_child`](Self::derive_child) still admits new entries.
    pub const fn is_deriving(&self) -> bool {
        self.depth < self.derive_until
    }

    /// Whether [`manage`](Self::manage) returns overrides at this depth.
    pub const fn is_applying(&self) -> bool {
        self.depth >= self.apply_from
    }

    /// Derive the snapshot for the children of a node declaring `managed`.
    ///
    /// The result is one level deeper. Past `derive_until` it shares this
    /// snapshot's maps unchanged, but its depth still increases.
    pub fn derive_child(&self, managed: &[Dependency]) -> Self {
        let mut child = self.clone();
        child.depth = self.depth.saturating_add(1);

        if !self.is_deriving() {
            if !managed.is_empty() {
                tracing::trace!(
                    "Ignoring {} managed declaration(s) at depth {} (derive_until={})",
                    managed.len(),
                    self.depth,
                    self.derive_until
                );
            }
            return child;
        }

        let mut admitted = 0usize;
        for declaration in managed {
            let key = self.key_scheme.key(&declaration.artifact);
            if child.maps.merge_declaration(&key, declaration, self.scope_handler.as_ref()) {
                admitted += 1;
            }
        }

        if !managed.is_empty() {
            tracing::debug!(
                "Derived management depth {} -> {}: {} of {} declaration(s) admitted",
                self.depth,
                child.depth,
                admitted,
                managed.len()
            );
        }

        child
    }

    /// The overrides to apply to `dependency`, or `None` if there are none.
    ///
    /// Always `None` above `apply_from`.
    pub fn manage(&self, dependency: &Dependency) -> Option<DependencyManagement> {
        if !self.is_applying() {
            return None;
        }

        let handler = self.scope_handler.as_ref();
        let key = self.key_scheme.key(&dependency.artifact);
        let mut management = DependencyManagement {
            version: self.maps.versions().get(&key).cloned(),
            scope: self.maps.scopes().get(&key).cloned(),
            optional: self.maps.optionals().get(&key).copied(),
            properties: None,
            exclusions: self.maps.exclusions().get(&key).cloned(),
        };

        // Managed out of system scope: the local path no longer applies.
        if let Some(scope) = &management.scope
            && !handler.is_system_scope(scope)
            && handler.system_path(&dependency.artifact).is_some()
        {
            let mut properties = dependency.artifact.properties.clone();
            handler.set_system_path(&mut properties, None);
            management.properties = Some(properties);
        }

        let effective_scope = management.scope.as_deref().unwrap_or(&dependency.scope);
        if handler.is_system_scope(effective_scope)
            && let Some(path) = self.maps.local_paths().get(&key)
        {
            let mut properties = management
                .properties
                .take()
                .unwrap_or_else(|| dependency.artifact.properties.clone());
            handler.set_system_path(&mut properties, Some(path));
            management.properties = Some(properties);
        }

        if management.is_empty() {
            return None;
        }

        tracing::trace!(
            "Managing {} at depth {}: {:?}",
            key,
            self.depth,
            management.managed_fields().labels()
        );
        Some(management)
    }
}

impl fmt::Debug for DependencyManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyManager")
            .field("depth", &self.depth)
            .field("derive_until", &self.derive_until)
            .field("apply_from", &self.apply_from)
            .field("key_scheme", &self.key_scheme)
            .field("maps", &self.maps)
            .field("scope_handler", &self.scope_handler)
            .finish()
    }
}

// The scope handler is not part of a snapshot's identity.
impl PartialEq for DependencyManager {
    fn eq(&self, other: &Self) -> bool {
        self.depth == other.depth
            && self.derive_until == other.derive_until
            && self.apply_from == other.apply_from
            && self.key_scheme == other.key_scheme
            && self.maps == other.maps
    }
}

impl Eq for DependencyManager {}

impl Hash for DependencyManager {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.depth.hash(state);
        self.derive_until.hash(state);
        self.apply_from.hash(state);
        self.key_scheme.hash(state);
        self.maps.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Artifact, Exclusion};
    use std::collections::HashSet;

    fn manager(preset: ManagementPreset) -> DependencyManager {
        DependencyManager::new(preset, LegacySystemScopeHandler::shared())
    }

    fn managed_version(artifact_id: &str, version: &str) -> Dependency {
        Dependency::new(Artifact::new("g", artifact_id, version), "")
    }

    fn declared(artifact_id: &str) -> Dependency {
        Dependency::new(Artifact::new("g", artifact_id, "1.0"), "compile")
    }

    fn managed_exclusion(artifact_id: &str, excluded: &str) -> Dependency {
        Dependency::new(Artifact::new("g", artifact_id, ""), "")
            .with_exclusions([Exclusion::new("x", excluded)])
    }

    #[test]
    fn test_depth_counts_derivations() {
        let mut current = manager(ManagementPreset::Default);
        for expected in 1..=5 {
            current = current.derive_child(&[]);
            assert_eq!(current.depth(), expected);
        }
    }

    #[test]
    fn test_nearest_declaration_wins() {
        let depth1 = manager(ManagementPreset::Default).derive_child(&[managed_version("a", "2.0")]);
        let depth2 = depth1.derive_child(&[managed_version("a", "3.0")]);

        assert_eq!(depth2.manage(&declared("a")).unwrap().version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_first_declaration_at_same_node_wins() {
        let child = manager(ManagementPreset::Default)
            .derive_child(&[managed_version("a", "1.1"), managed_version("a", "1.2")]);
        assert_eq!(child.manage(&declared("a")).unwrap().version.as_deref(), Some("1.1"));
    }

    #[test]
    fn test_fields_are_managed_independently() {
        let scope_only = Dependency::new(Artifact::new("g", "a", ""), "test");
        let optional_only = Dependency::new(Artifact::new("g", "b", ""), "").with_optional(true);
        let child = manager(ManagementPreset::Default).derive_child(&[scope_only, optional_only]);

        let a = child.manage(&declared("a")).unwrap();
        assert_eq!(a.version, None);
        assert_eq!(a.scope.as_deref(), Some("test"));
        assert_eq!(a.optional, None);

        let b = child.manage(&declared("b")).unwrap();
        assert_eq!(b.scope, None);
        assert_eq!(b.optional, Some(true));

        assert!(child.manage(&declared("c")).is_none());
    }

    #[test]
    fn test_exclusions_accumulate_across_depths() {
        let depth1 = manager(ManagementPreset::Default).derive_child(&[managed_exclusion("k", "a")]);
        let depth2 = depth1.derive_child(&[managed_exclusion("k", "b")]);
        let depth3 = depth2.derive_child(&[managed_version("k", "9.9")]);

        let exclusions = depth3.manage(&declared("k")).unwrap().exclusions.unwrap();
        assert_eq!(exclusions.len(), 2);
        assert!(exclusions.contains(&Exclusion::new("x", "a")));
        assert!(exclusions.contains(&Exclusion::new("x", "b")));
    }

    #[test]
    fn test_apply_from_gates_management() {
        let preset = ManagementPreset::Custom {
            derive_until: usize::MAX,
            apply_from: 2,
        };
        let depth1 = manager(preset).derive_child(&[managed_version("a", "2.0")]);
        let depth2 = depth1.derive_child(&[]);

        assert!(manager(preset).manage(&declared("a")).is_none());
        assert!(depth1.manage(&declared("a")).is_none());
        assert_eq!(depth2.manage(&declared("a")).unwrap().version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_derive_until_freezes_maps_but_not_depth() {
        let preset = ManagementPreset::Custom {
            derive_until: 1,
            apply_from: 0,
        };
        let depth1 = manager(preset).derive_child(&[managed_version("a", "1.0")]);
        let depth2 = depth1.derive_child(&[managed_version("b", "2.0")]);

        assert_eq!(depth2.depth(), 2);
        assert_eq!(depth2.maps(), depth1.maps());
        assert!(depth2.manage(&declared("b")).is_none());
        assert_eq!(depth2.manage(&declared("a")).unwrap().version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_parent_is_unaffected_by_derivation() {
        let parent = manager(ManagementPreset::Default).derive_child(&[managed_version("a", "1.0")]);
        let before = parent.manage(&declared("b"));

        let _child = parent.derive_child(&[managed_version("b", "2.0"), managed_exclusion("a", "z")]);

        assert_eq!(parent.manage(&declared("b")), before);
        assert!(parent.manage(&declared("a")).unwrap().exclusions.is_none());
    }

    #[test]
    fn test_managed_scope_out_of_system_removes_local_path() {
        let child = manager(ManagementPreset::Default)
            .derive_child(&[Dependency::new(Artifact::new("g", "a", ""), "compile")]);
        let system = Dependency::new(
            Artifact::new("g", "a", "1.0").with_property("localPath", "/a.jar").with_property("k", "v"),
            "system",
        );

        let management = child.manage(&system).unwrap();
        let properties = management.properties.unwrap();
        assert!(!properties.contains_key("localPath"));
        assert_eq!(properties.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn test_managed_local_path_applies_to_system_scope() {
        let managed = Dependency::new(
            Artifact::new("g", "a", "").with_property("localPath", "/managed/a.jar"),
            "system",
        );
        let child = manager(ManagementPreset::Default).derive_child(&[managed]);

        let plain = Dependency::new(Artifact::new("g", "a", "1.0"), "compile");
        let management = child.manage(&plain).unwrap();
        assert_eq!(management.scope.as_deref(), Some("system"));
        assert_eq!(
            management.properties.unwrap().get("localPath").map(String::as_str),
            Some("/managed/a.jar")
        );
    }

    #[test]
    fn test_key_scheme_controls_matching() {
        let tests_jar = Dependency::new(Artifact::new("g", "a", "").with_classifier("tests"), "compile");

        let full = manager(ManagementPreset::Default).derive_child(&[managed_version("a", "2.0")]);
        assert!(full.manage(&tests_jar).is_none());

        let loose = manager(ManagementPreset::Default)
            .with_key_scheme(KeyScheme::GroupArtifact)
            .derive_child(&[managed_version("a", "2.0")]);
        assert_eq!(loose.manage(&tests_jar).unwrap().version.as_deref(), Some("2.0"));
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a = manager(ManagementPreset::Default).derive_child(&[managed_version("a", "2.0")]);
        let b = manager(ManagementPreset::Default).derive_child(&[managed_version("a", "2.0")]);
        let c = manager(ManagementPreset::Default).derive_child(&[managed_version("a", "3.0")]);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<DependencyManager> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_constructor_uses_default_preset() {
        let legacy = DependencyManager::legacy();
        assert_eq!(legacy.apply_from(), 0);
        assert_eq!(legacy.derive_until(), usize::MAX);
        assert!(legacy.scope_handler().is_system_scope("system"));
    }
}
