//! Persistent override maps and the nearest-wins merge.
//!
//! The maps are `im` ordered maps: cloning one is O(1) and an insert copies
//! only the path to the touched leaf, so a derived snapshot shares almost all
//! of its storage with its parent while the parent stays untouched.

use im::{OrdMap, OrdSet};

use super::ManagementKey;
use crate::core::{Dependency, Exclusion};
use crate::scope::SystemScopeHandler;

/// The five override maps of a management snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OverrideMaps {
    versions: OrdMap<ManagementKey, String>,
    scopes: OrdMap<ManagementKey, String>,
    optionals: OrdMap<ManagementKey, bool>,
    local_paths: OrdMap<ManagementKey, String>,
    exclusions: OrdMap<ManagementKey, OrdSet<Exclusion>>,
}

impl OverrideMaps {
    /// Managed versions.
    pub fn versions(&self) -> &OrdMap<ManagementKey, String> {
        &self.versions
    }

    /// Managed scopes.
    pub fn scopes(&self) -> &OrdMap<ManagementKey, String> {
        &self.scopes
    }

    /// Managed optionality flags.
    pub fn optionals(&self) -> &OrdMap<ManagementKey, bool> {
        &self.optionals
    }

    /// Managed local paths of system-scoped declarations.
    pub fn local_paths(&self) -> &OrdMap<ManagementKey, String> {
        &self.local_paths
    }

    /// Accumulated managed exclusions.
    pub fn exclusions(&self) -> &OrdMap<ManagementKey, OrdSet<Exclusion>> {
        &self.exclusions
    }

    /// Whether no override of any kind is recorded.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
            && self.scopes.is_empty()
            && self.optionals.is_empty()
            && self.local_paths.is_empty()
            && self.exclusions.is_empty()
    }

    /// Fold one managed declaration into the maps.
    ///
    /// Scalars are only recorded for keys that hold none yet; exclusions are
    /// unioned into whatever the key already holds. Empty versions, empty
    /// scopes and empty exclusion sets are ignored. Returns whether anything
    /// changed.
    pub(crate) fn merge_declaration(
        &mut self,
        key: &ManagementKey,
        declaration: &Dependency,
        scope_handler: &dyn SystemScopeHandler,
    ) -> bool {
        let mut changed = false;

        let version = &declaration.artifact.version;
        if !version.is_empty() {
            changed |= insert_if_absent(&mut self.versions, key, || version.clone());
        }

        if !declaration.scope.is_empty() {
            changed |= insert_if_absent(&mut self.scopes, key, || declaration.scope.clone());
        }

        if let Some(optional) = declaration.optional {
            changed |= insert_if_absent(&mut self.optionals, key, || optional);
        }

        if scope_handler.is_system_scope(&declaration.scope)
            && let Some(path) = scope_handler.system_path(&declaration.artifact)
        {
            changed |= insert_if_absent(&mut self.local_paths, key, || path.to_string());
        }

        if !declaration.exclusions.is_empty() {
            changed |= union_into(&mut self.exclusions, key, declaration.exclusions.iter().cloned());
        }

        changed
    }
}

/// Record `value()` under `key` unless the key is already present.
pub(crate) fn insert_if_absent<V: Clone>(
    map: &mut OrdMap<ManagementKey, V>,
    key: &ManagementKey,
    value: impl FnOnce() -> V,
) -> bool {
    if map.contains_key(key) {
        return false;
    }
    map.insert(key.clone(), value());
    true
}

/// Union `exclusions` into the set held by `key`, creating it if needed.
pub(crate) fn union_into(
    map: &mut OrdMap<ManagementKey, OrdSet<Exclusion>>,
    key: &ManagementKey,
    exclusions: impl IntoIterator<Item = Exclusion>,
) -> bool {
    let existing = map.get(key).cloned().unwrap_or_default();
    let merged = existing.clone().union(exclusions.into_iter().collect());
    if merged.len() == existing.len() {
        return false;
    }
    map.insert(key.clone(), merged);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Artifact;
    use crate::management::KeyScheme;
    use crate::scope::LegacySystemScopeHandler;

    fn key(artifact_id: &str) -> ManagementKey {
        KeyScheme::Full.key(&Artifact::new("g", artifact_id, ""))
    }

    #[test]
    fn test_insert_if_absent_keeps_first_value() {
        let mut map = OrdMap::new();
        assert!(insert_if_absent(&mut map, &key("a"), || "1.0".to_string()));
        assert!(!insert_if_absent(&mut map, &key("a"), || "2.0".to_string()));
        assert_eq!(map.get(&key("a")).map(String::as_str), Some("1.0"));
    }

    #[test]
    fn test_union_into_accumulates() {
        let mut map = OrdMap::new();
        assert!(union_into(&mut map, &key("a"), [Exclusion::new("x", "one")]));
        assert!(union_into(&mut map, &key("a"), [Exclusion::new("x", "two")]));
        assert!(!union_into(&mut map, &key("a"), [Exclusion::new("x", "one")]));

        let set = map.get(&key("a")).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(&Exclusion::new("x", "one")));
        assert!(set.contains(&Exclusion::new("x", "two")));
    }

    #[test]
    fn test_clone_is_unaffected_by_merge() {
        let handler = LegacySystemScopeHandler;
        let mut parent = OverrideMaps::default();
        let declaration = Dependency::new(Artifact::new("g", "a", "1.0"), "runtime");
        parent.merge_declaration(&key("a"), &declaration, &handler);

        let mut child = parent.clone();
        let other = Dependency::new(Artifact::new("g", "b", "3.0"), "");
        assert!(child.merge_declaration(&key("b"), &other, &handler));

        assert_eq!(parent.versions().len(), 1);
        assert_eq!(child.versions().len(), 2);
        assert_eq!(parent.scopes().get(&key("a")).map(String::as_str), Some("runtime"));
    }

    #[test]
    fn test_merge_ignores_empty_values() {
        let handler = LegacySystemScopeHandler;
        let mut maps = OverrideMaps::default();
        let declaration = Dependency::new(Artifact::new("g", "a", ""), "");

        assert!(!maps.merge_declaration(&key("a"), &declaration, &handler));
        assert!(maps.is_empty());
    }

    #[test]
    fn test_merge_records_local_path_only_for_system_scope() {
        let handler = LegacySystemScopeHandler;
        let mut maps = OverrideMaps::default();

        let compile = Dependency::new(
            Artifact::new("g", "a", "1").with_property("localPath", "/a.jar"),
            "compile",
        );
        maps.merge_declaration(&key("a"), &compile, &handler);
        assert!(maps.local_paths().is_empty());

        let system = Dependency::new(
            Artifact::new("g", "b", "1").with_property("localPath", "/b.jar"),
            "system",
        );
        maps.merge_declaration(&key("b"), &system, &handler);
        assert_eq!(maps.local_paths().get(&key("b")).map(String::as_str), Some("/b.jar"));
    }
}
