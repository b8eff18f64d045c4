//! Local path verification for system-scoped dependencies.

use std::path::Path;

use super::ResolvedNode;
use crate::core::DepmgrError;
use crate::scope::SystemScopeHandler;

/// Check that every system-scoped dependency in `nodes` names an existing file.
///
/// System-scoped dependencies are never fetched from a repository, so a
/// missing path property or a path that is not a regular file fails
/// resolution. Returns the number of system-scoped dependencies verified.
///
/// # Errors
///
/// - [`DepmgrError::SystemPathMissing`] when the path property is absent
/// - [`DepmgrError::SystemPathNotFound`] when the path is not an existing file
pub fn verify_system_paths(
    nodes: &[ResolvedNode],
    scope_handler: &dyn SystemScopeHandler,
) -> Result<usize, DepmgrError> {
    let mut system_nodes = Vec::new();
    for node in nodes {
        node.walk(&mut |resolved| {
            if resolved.system {
                system_nodes.push(resolved);
            }
        });
    }

    for node in &system_nodes {
        let artifact = &node.dependency.artifact;
        let Some(path) = scope_handler.system_path(artifact) else {
            return Err(DepmgrError::SystemPathMissing {
                coordinate: artifact.to_string(),
            });
        };

        if !Path::new(path).is_file() {
            return Err(DepmgrError::SystemPathNotFound {
                coordinate: artifact.to_string(),
                path: path.to_string(),
            });
        }
        tracing::debug!("Verified system path {} for {}", path, artifact);
    }

    Ok(system_nodes.len())
}
