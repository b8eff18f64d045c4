//! TOML dependency tree files.
//!
//! ```toml
//! [root]
//! managed = [
//!     { group = "org.slf4j", artifact = "slf4j-api", version = "2.0.9" },
//!     { group = "com.sun", artifact = "tools", scope = "system", system_path = "/opt/jdk/lib/tools.jar" },
//! ]
//!
//! [[root.children]]
//! group = "org.example"
//! artifact = "app-core"
//! version = "1.0"
//! scope = "compile"
//! exclusions = ["commons-logging:commons-logging"]
//!
//! [[root.children.children]]
//! group = "org.slf4j"
//! artifact = "slf4j-api"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::constants::{DEFAULT_EXTENSION, INLINE_SOURCE};
use crate::core::{Artifact, Dependency, DependencyNode, DepmgrError, Exclusion};
use crate::scope::SystemScopeHandler;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TreeFile {
    #[serde(default)]
    root: RootSpec,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RootSpec {
    #[serde(default)]
    managed: Vec<CoordinateSpec>,
    #[serde(default)]
    children: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
struct NodeSpec {
    #[serde(flatten)]
    coordinate: CoordinateSpec,
    #[serde(default)]
    managed: Vec<CoordinateSpec>,
    #[serde(default)]
    children: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
struct CoordinateSpec {
    group: String,
    artifact: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    classifier: String,
    #[serde(default)]
    extension: Option<String>,
    #[serde(default)]
    scope: String,
    #[serde(default)]
    optional: Option<bool>,
    #[serde(default)]
    exclusions: Vec<String>,
    #[serde(default)]
    system_path: Option<String>,
    #[serde(default)]
    properties: BTreeMap<String, String>,
    // Collects keys no field claims. Within a node entry this also sees the
    // keys of the node itself, minus `managed` and `children`.
    #[serde(flatten)]
    unknown: BTreeMap<String, toml::Value>,
}

impl CoordinateSpec {
    fn to_dependency(&self, scope_handler: &dyn SystemScopeHandler) -> Result<Dependency, DepmgrError> {
        if !self.unknown.is_empty() {
            let keys: Vec<&str> = self.unknown.keys().map(String::as_str).collect();
            return Err(DepmgrError::TreeParseError {
                file: INLINE_SOURCE.to_string(),
                reason: format!("unknown key(s) {} in entry {}:{}", keys.join(", "), self.group, self.artifact),
            });
        }

        let mut properties = self.properties.clone();
        if let Some(path) = &self.system_path {
            scope_handler.set_system_path(&mut properties, Some(path));
        }

        let artifact = Artifact::new(&self.group, &self.artifact, &self.version)
            .with_classifier(&self.classifier)
            .with_extension(self.extension.as_deref().unwrap_or(DEFAULT_EXTENSION))
            .with_properties(properties);

        let exclusions =
            self.exclusions.iter().map(|spec| spec.parse::<Exclusion>()).collect::<Result<Vec<_>, _>>()?;

        let mut dependency = Dependency::new(artifact, &self.scope).with_exclusions(exclusions);
        dependency.optional = self.optional;
        Ok(dependency)
    }
}

impl NodeSpec {
    fn to_node(&self, scope_handler: &dyn SystemScopeHandler) -> Result<DependencyNode, DepmgrError> {
        Ok(DependencyNode {
            dependency: Some(self.coordinate.to_dependency(scope_handler)?),
            managed: to_managed(&self.managed, scope_handler)?,
            children: self
                .children
                .iter()
                .map(|child| child.to_node(scope_handler))
                .collect::<Result<_, _>>()?,
        })
    }
}

fn to_managed(
    specs: &[CoordinateSpec],
    scope_handler: &dyn SystemScopeHandler,
) -> Result<Vec<Dependency>, DepmgrError> {
    specs.iter().map(|spec| spec.to_dependency(scope_handler)).collect()
}

/// Parse a dependency tree from TOML text.
///
/// `system_path` entries are stored in the property chosen by `scope_handler`.
///
/// # Errors
///
/// Returns [`DepmgrError::TreeParseError`] for malformed TOML and
/// [`DepmgrError::InvalidExclusion`] for malformed exclusion patterns.
pub fn parse_tree(
    content: &str,
    scope_handler: &dyn SystemScopeHandler,
) -> Result<DependencyNode, DepmgrError> {
    let file: TreeFile = toml::from_str(content).map_err(|e| DepmgrError::TreeParseError {
        file: INLINE_SOURCE.to_string(),
        reason: e.to_string(),
    })?;

    Ok(DependencyNode {
        dependency: None,
        managed: to_managed(&file.root.managed, scope_handler)?,
        children: file
            .root
            .children
            .iter()
            .map(|child| child.to_node(scope_handler))
            .collect::<Result<_, _>>()?,
    })
}

/// Read and parse a dependency tree file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_tree(path: &Path, scope_handler: &dyn SystemScopeHandler) -> Result<DependencyNode> {
    let content = std::fs::read_to_string(path)
        .map_err(DepmgrError::from)
        .with_context(|| format!("Failed to read dependency tree from {}", path.display()))?;

    let tree = parse_tree(&content, scope_handler).map_err(|error| match error {
        DepmgrError::TreeParseError {
            reason,
            ..
        } => DepmgrError::TreeParseError {
            file: path.display().to_string(),
            reason,
        },
        other => other,
    })?;

    tracing::debug!("Loaded {} dependency node(s) from {}", tree.descendant_count(), path.display());
    Ok(tree)
}
