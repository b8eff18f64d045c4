//! Override records returned by [`DependencyManager::manage`](super::DependencyManager::manage).

use im::OrdSet;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::{Dependency, Exclusion};

/// The overrides to apply to one dependency.
///
/// Every field is independent: a dependency may receive only a version, only
/// extra exclusions, or any combination. `exclusions` is the full accumulated
/// set for the dependency's key and is meant to be unioned into the
/// dependency's own exclusions, never to replace them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyManagement {
    /// Managed version.
    pub version: Option<String>,
    /// Managed scope label.
    pub scope: Option<String>,
    /// Managed optionality.
    pub optional: Option<bool>,
    /// Replacement artifact properties (system path set or removed).
    pub properties: Option<BTreeMap<String, String>>,
    /// Managed exclusions to add.
    pub exclusions: Option<OrdSet<Exclusion>>,
}

impl DependencyManagement {
    /// Whether the record carries no override at all.
    pub fn is_empty(&self) -> bool {
        self.version.is_none()
            && self.scope.is_none()
            && self.optional.is_none()
            && self.properties.is_none()
            && self.exclusions.is_none()
    }

    /// Which fields this record overrides.
    pub fn managed_fields(&self) -> ManagedFields {
        ManagedFields {
            version: self.version.is_some(),
            scope: self.scope.is_some(),
            optional: self.optional.is_some(),
            properties: self.properties.is_some(),
            exclusions: self.exclusions.is_some(),
        }
    }

    /// Build the effective dependency record.
    ///
    /// Scalars and properties are replaced; exclusions are unioned.
    pub fn apply_to(&self, dependency: &Dependency) -> Dependency {
        let mut effective = dependency.clone();

        if let Some(version) = &self.version {
            effective.artifact.version = version.clone();
        }
        if let Some(scope) = &self.scope {
            effective.scope = scope.clone();
        }
        if let Some(optional) = self.optional {
            effective.optional = Some(optional);
        }
        if let Some(properties) = &self.properties {
            effective.artifact.properties = properties.clone();
        }
        if let Some(exclusions) = &self.exclusions {
            effective.exclusions.extend(exclusions.iter().cloned());
        }

        effective
    }
}

/// Flags recording which fields of a dependency were managed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManagedFields {
    /// Version was overridden.
    pub version: bool,
    /// Scope was overridden.
    pub scope: bool,
    /// Optionality was overridden.
    pub optional: bool,
    /// Properties were rewritten.
    pub properties: bool,
    /// Exclusions were added.
    pub exclusions: bool,
}

impl ManagedFields {
    /// Whether any field was managed.
    pub fn any(&self) -> bool {
        self.version || self.scope || self.optional || self.properties || self.exclusions
    }

    /// Names of the managed fields, in declaration order.
    pub fn labels(&self) -> Vec<&'static str> {
        [
            (self.version, "version"),
            (self.scope, "scope"),
            (self.optional, "optional"),
            (self.properties, "properties"),
            (self.exclusions, "exclusions"),
        ]
        .into_iter()
        .filter_map(|(set, label)| set.then_some(label))
        .collect()
    }
}
