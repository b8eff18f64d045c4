//! Management keys: the identity under which overrides are recorded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Artifact;

/// Which coordinate fields take part in a [`ManagementKey`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyScheme {
    /// Group, artifact, classifier and extension.
    #[default]
    Full,
    /// Group and artifact only; classifier and extension are ignored.
    GroupArtifact,
}

impl KeyScheme {
    /// Extract the key of `artifact` under this scheme.
    pub fn key(self, artifact: &Artifact) -> ManagementKey {
        ManagementKey::new(artifact, self)
    }
}

/// Coordinate-derived identity matching managed declarations to dependencies.
///
/// Version is never part of the key. Ordering is structural, which lets the
/// override maps be persistent ordered maps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ManagementKey {
    group_id: String,
    artifact_id: String,
    classifier: Option<String>,
    extension: Option<String>,
}

impl ManagementKey {
    /// Extract the key of `artifact` under `scheme`.
    pub fn new(artifact: &Artifact, scheme: KeyScheme) -> Self {
        let (classifier, extension) = match scheme {
            KeyScheme::Full => (Some(artifact.classifier.clone()), Some(artifact.extension.clone())),
            KeyScheme::GroupArtifact => (None, None),
        };

        Self {
            group_id: artifact.group_id.clone(),
            artifact_id: artifact.artifact_id.clone(),
            classifier,
            extension,
        }
    }
}

impl fmt::Display for ManagementKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if let Some(extension) = &self.extension {
            write!(f, ":{extension}")?;
        }
        if let Some(classifier) = self.classifier.as_deref().filter(|c| !c.is_empty()) {
            write!(f, ":{classifier}")?;
        }
        Ok(())
    }
}
