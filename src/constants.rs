//! Global constants used throughout the depmgr codebase.
//!
//! Property keys, scope labels and depth thresholds that are shared between
//! the management engine, the scope policies and the configuration layer.

/// Artifact property naming the local file backing a system-scoped artifact.
pub const LOCAL_PATH_PROPERTY: &str = "localPath";

/// Scope label classified as "system" by the legacy scope policy.
pub const SYSTEM_SCOPE: &str = "system";

/// Extension assumed when a coordinate does not declare one.
pub const DEFAULT_EXTENSION: &str = "jar";

/// Wildcard accepted in any exclusion coordinate field.
pub const EXCLUSION_WILDCARD: &str = "*";

/// Depth threshold meaning "never stop deriving".
pub const UNBOUNDED_DEPTH: usize = usize::MAX;

/// Depth at which the transitive and classic presets start applying
/// management (i.e. below the direct dependencies of the root).
pub const BELOW_DIRECT_DEPTH: usize = 2;

/// Environment variable pointing at a management configuration file.
pub const CONFIG_ENV_VAR: &str = "DEPMGR_CONFIG";

/// Source label for TOML parsed from a string rather than a named file.
pub const INLINE_SOURCE: &str = "<input>";
