//! Artifact coordinates and exclusion patterns.
//!
//! An [`Artifact`] identifies one file in a repository by its
//! `group:artifact[:extension[:classifier]]:version` coordinate and carries a
//! free-form property map. System-scoped artifacts use a property to name the
//! local file backing them; see [`crate::scope`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{DEFAULT_EXTENSION, EXCLUSION_WILDCARD};
use crate::core::DepmgrError;

/// A repository artifact coordinate plus its properties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Artifact {
    /// Group identifier, e.g. `org.example`.
    pub group_id: String,
    /// Artifact identifier, e.g. `core`.
    pub artifact_id: String,
    /// Classifier, empty when the artifact is the main one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub classifier: String,
    /// File extension, `jar` unless declared otherwise.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Version, empty when the declaring descriptor left it to management.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    /// Free-form artifact properties.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

impl Artifact {
    /// Create an artifact with the default extension and no classifier.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: String::new(),
            extension: default_extension(),
            version: version.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Replace the classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into();
        self
    }

    /// Replace the extension.
    #[must_use]
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Replace the version.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set a single property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace the whole property map.
    #[must_use]
    pub fn with_properties(mut self, properties: BTreeMap<String, String>) -> Self {
        self.properties = properties;
        self
    }

    /// Look up a property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// `group:artifact`, the part of the coordinate exclusions usually match on.
    pub fn versionless_id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.extension)?;
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

impl FromStr for Artifact {
    type Err = DepmgrError;

    /// Parse `group:artifact`, `group:artifact:version`,
    /// `group:artifact:extension:version` or
    /// `group:artifact:extension:classifier:version`.
    fn from_str(coordinate: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = coordinate.split(':').collect();
        let invalid = |reason: &str| DepmgrError::InvalidCoordinate {
            coordinate: coordinate.to_string(),
            reason: reason.to_string(),
        };

        if !(2..=5).contains(&parts.len()) {
            return Err(invalid("expected between 2 and 5 ':'-separated parts"));
        }
        if parts[0].is_empty() || parts[1].is_empty() {
            return Err(invalid("group and artifact must not be empty"));
        }

        let artifact = Self::new(parts[0], parts[1], "");
        Ok(match parts.as_slice() {
            [_, _] => artifact,
            [_, _, version] => artifact.with_version(*version),
            [_, _, extension, version] => artifact.with_extension(*extension).with_version(*version),
            [_, _, extension, classifier, version] => artifact
                .with_extension(*extension)
                .with_classifier(*classifier)
                .with_version(*version),
            _ => unreachable!("length checked above"),
        })
    }
}

/// A pattern removing matching artifacts from a dependency's subtree.
///
/// Every field may be `*`. Field order gives exclusions a total order so
/// they can be kept in sorted, structurally shared sets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Exclusion {
    /// Group pattern.
    pub group_id: String,
    /// Artifact pattern.
    pub artifact_id: String,
    /// Classifier pattern.
    pub classifier: String,
    /// Extension pattern.
    pub extension: String,
}

impl Exclusion {
    /// Exclude `group:artifact` for any classifier and extension.
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: EXCLUSION_WILDCARD.to_string(),
            extension: EXCLUSION_WILDCARD.to_string(),
        }
    }

    /// Whether `artifact` falls under this exclusion.
    pub fn matches(&self, artifact: &Artifact) -> bool {
        field_matches(&self.group_id, &artifact.group_id)
            && field_matches(&self.artifact_id, &artifact.artifact_id)
            && field_matches(&self.classifier, &artifact.classifier)
            && field_matches(&self.extension, &artifact.extension)
    }
}

fn field_matches(pattern: &str, value: &str) -> bool {
    pattern == EXCLUSION_WILDCARD || pattern == value
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.classifier == EXCLUSION_WILDCARD && self.extension == EXCLUSION_WILDCARD {
            write!(f, "{}:{}", self.group_id, self.artifact_id)
        } else {
            write!(f, "{}:{}:{}:{}", self.group_id, self.artifact_id, self.classifier, self.extension)
        }
    }
}

impl FromStr for Exclusion {
    type Err = DepmgrError;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = spec.split(':').collect();
        if parts.iter().any(|part| part.is_empty()) {
            return Err(DepmgrError::InvalidExclusion {
                exclusion: spec.to_string(),
            });
        }

        match parts.as_slice() {
            [group, artifact] => Ok(Self::new(*group, *artifact)),
            [group, artifact, classifier, extension] => Ok(Self {
                group_id: (*group).to_string(),
                artifact_id: (*artifact).to_string(),
                classifier: (*classifier).to_string(),
                extension: (*extension).to_string(),
            }),
            _ => Err(DepmgrError::InvalidExclusion {
                exclusion: spec.to_string(),
            }),
        }
    }
}
