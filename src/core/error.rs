//! Error handling for depmgr
//!
//! The management engine itself is total: deriving a child snapshot or asking
//! for an override never fails. Errors only arise at the edges of the crate,
//! when configuration and dependency trees are read from disk, when
//! coordinates are parsed, and when the reference collector verifies that
//! system-scoped dependencies point at real files.
//!
//! # Architecture
//!
//! - [`DepmgrError`] - Enumerated error types for every failure at those edges
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Use [`user_friendly_error`] to convert any [`anyhow::Error`] into an
//! [`ErrorContext`] suitable for CLI display.
//!
//! # Examples
//!
//! ```rust,no_run
//! use depmgr::core::{DepmgrError, ErrorContext, user_friendly_error};
//!
//! let error = DepmgrError::SystemPathMissing {
//!     coordinate: "com.example:tools:jar:1.0".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows coloured error with suggestions
//! ```

use colored::Colorize;
use std::fmt;

use crate::constants::INLINE_SOURCE;
use thiserror::Error;

/// The main error type for depmgr operations
///
/// # Error Categories
///
/// ## Configuration and Parsing
/// - [`ConfigError`] - Management configuration is inconsistent
/// - [`InvalidPreset`] - Unknown management preset name
/// - [`InvalidCoordinate`] - Artifact coordinate string could not be parsed
/// - [`InvalidExclusion`] - Exclusion pattern could not be parsed
/// - [`TreeParseError`] - Dependency tree file is malformed
/// - [`TomlError`] - TOML parsing errors from [`toml::de::Error`]
///
/// ## Resolution
/// - [`SystemPathMissing`] - System-scoped dependency names no local path
/// - [`SystemPathNotFound`] - System-scoped dependency names a path that is not a file
///
/// [`ConfigError`]: DepmgrError::ConfigError
/// [`InvalidPreset`]: DepmgrError::InvalidPreset
/// [`InvalidCoordinate`]: DepmgrError::InvalidCoordinate
/// [`InvalidExclusion`]: DepmgrError::InvalidExclusion
/// [`TreeParseError`]: DepmgrError::TreeParseError
/// [`TomlError`]: DepmgrError::TomlError
/// [`SystemPathMissing`]: DepmgrError::SystemPathMissing
/// [`SystemPathNotFound`]: DepmgrError::SystemPathNotFound
#[derive(Error, Debug)]
pub enum DepmgrError {
    /// Management configuration is inconsistent
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Preset name is not one of `default`, `transitive` or `classic`
    #[error("Unknown management preset: {name}")]
    InvalidPreset {
        /// The preset name that was requested
        name: String,
    },

    /// Artifact coordinate could not be parsed
    ///
    /// Coordinates follow `group:artifact[:extension[:classifier]]:version`.
    #[error("Invalid artifact coordinate '{coordinate}': {reason}")]
    InvalidCoordinate {
        /// The coordinate string as written
        coordinate: String,
        /// Why it was rejected
        reason: String,
    },

    /// Exclusion pattern could not be parsed
    ///
    /// Exclusions follow `group:artifact` or `group:artifact:classifier:extension`,
    /// with `*` accepted in every position.
    #[error("Invalid exclusion '{exclusion}'")]
    InvalidExclusion {
        /// The exclusion string as written
        exclusion: String,
    },

    /// Dependency tree file is malformed
    #[error("Invalid dependency tree in {file}: {reason}")]
    TreeParseError {
        /// Path of the tree file
        file: String,
        /// Parser or validation message
        reason: String,
    },

    /// A system-scoped dependency carries no local path property
    #[error("System-scoped dependency '{coordinate}' does not declare a local path")]
    SystemPathMissing {
        /// Coordinate of the offending dependency
        coordinate: String,
    },

    /// A system-scoped dependency points at a path that is not an existing file
    #[error("System-scoped dependency '{coordinate}' points to missing file {path}")]
    SystemPathNotFound {
        /// Coordinate of the offending dependency
        coordinate: String,
        /// The declared local path
        path: String,
    },

    /// Reading a configuration or tree file failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML deserialization error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Generic error for cases not covered by specific variants
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for DepmgrError {
    fn clone(&self) -> Self {
        match self {
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::InvalidPreset {
                name,
            } => Self::InvalidPreset {
                name: name.clone(),
            },
            Self::InvalidCoordinate {
                coordinate,
                reason,
            } => Self::InvalidCoordinate {
                coordinate: coordinate.clone(),
                reason: reason.clone(),
            },
            Self::InvalidExclusion {
                exclusion,
            } => Self::InvalidExclusion {
                exclusion: exclusion.clone(),
            },
            Self::TreeParseError {
                file,
                reason,
            } => Self::TreeParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::SystemPathMissing {
                coordinate,
            } => Self::SystemPathMissing {
                coordinate: coordinate.clone(),
            },
            Self::SystemPathNotFound {
                coordinate,
                path,
            } => Self::SystemPathNotFound {
                coordinate: coordinate.clone(),
                path: path.clone(),
            },
            // io::Error and toml::de::Error are not Clone; keep kind and message
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a suggestion and extra details for CLI display
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: DepmgrError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context without suggestion or details.
    #[must_use]
    pub const fn new(error: DepmgrError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error context to stderr with terminal colors.
    ///
    /// - Error message: red and bold
    /// - Details: yellow
    /// - Suggestion: green
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`DepmgrError`] variants, [`std::io::Error`] and
/// [`toml::de::Error`]; everything else is reported with its full cause chain.
/// Context attached to a [`DepmgrError`] is kept in the details.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(depmgr_error) = error.downcast_ref::<DepmgrError>() {
        let ctx = create_error_context(depmgr_error.clone());
        return with_context_details(ctx, &error, depmgr_error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::NotFound
    {
        return ErrorContext::new(DepmgrError::Other {
            message: error_chain_message(&error),
        })
        .with_suggestion("Check that the file exists and the path is correct");
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(DepmgrError::TreeParseError {
            file: INLINE_SOURCE.to_string(),
            reason: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers");
    }

    ErrorContext::new(DepmgrError::Other {
        message: error_chain_message(&error),
    })
}

fn error_chain_message(error: &anyhow::Error) -> String {
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    message
}

/// Prepend the context messages wrapped around `inner` to the details.
fn with_context_details(mut ctx: ErrorContext, error: &anyhow::Error, inner: &DepmgrError) -> ErrorContext {
    let inner_message = inner.to_string();
    let contexts: Vec<String> = error
        .chain()
        .map(std::string::ToString::to_string)
        .take_while(|message| *message != inner_message)
        .collect();
    if contexts.is_empty() {
        return ctx;
    }

    let context = contexts.join(": ");
    let details = match ctx.details.take() {
        Some(existing) => format!("{context}\n{existing}"),
        None => context,
    };
    ctx.with_details(details)
}

fn create_error_context(error: DepmgrError) -> ErrorContext {
    match &error {
        DepmgrError::IoError(io_error) if io_error.kind() == std::io::ErrorKind::NotFound => {
            ErrorContext::new(error).with_suggestion("Check that the file exists and the path is correct")
        }

        DepmgrError::InvalidPreset {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Use one of: default, transitive, classic")
            .with_details(
                "Presets only differ in the depths at which management is inherited and applied",
            ),

        DepmgrError::InvalidCoordinate {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Write coordinates as group:artifact[:extension[:classifier]]:version"),

        DepmgrError::InvalidExclusion {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Write exclusions as group:artifact or group:artifact:classifier:extension"),

        DepmgrError::SystemPathMissing {
            coordinate,
        } => {
            let details = format!(
                "'{coordinate}' is in system scope, so it is never fetched from a repository and must name a local file"
            );
            ErrorContext::new(error)
                .with_suggestion("Set system_path on the dependency or on its managed declaration")
                .with_details(details)
        }

        DepmgrError::SystemPathNotFound {
            path,
            ..
        } => {
            let details = format!("No regular file exists at {path}");
            ErrorContext::new(error)
                .with_suggestion("Fix the declared system path or create the file")
                .with_details(details)
        }

        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DepmgrError::InvalidPreset {
            name: "nearest".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown management preset: nearest");

        let error = DepmgrError::SystemPathNotFound {
            coordinate: "g:a:jar:1.0".to_string(),
            path: "/opt/lib/a.jar".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "System-scoped dependency 'g:a:jar:1.0' points to missing file /opt/lib/a.jar"
        );
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new(DepmgrError::ConfigError {
            message: "labels must not be empty".to_string(),
        })
        .with_suggestion("Add at least one label");

        let display = format!("{ctx}");
        assert!(display.contains("labels must not be empty"));
        assert!(display.contains("Suggestion: Add at least one label"));
    }

    #[test]
    fn test_user_friendly_error_system_path() {
        let error = anyhow::Error::from(DepmgrError::SystemPathMissing {
            coordinate: "g:a:jar:1.0".to_string(),
        });

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, DepmgrError::SystemPathMissing { .. }));
        assert!(ctx.suggestion.is_some());
        assert!(ctx.details.as_deref().unwrap().contains("g:a:jar:1.0"));
    }

    #[test]
    fn test_user_friendly_error_keeps_chain() {
        let error = anyhow::anyhow!("root cause").context("reading tree");

        let ctx = user_friendly_error(error);
        let message = ctx.error.to_string();
        assert!(message.starts_with("reading tree"));
        assert!(message.contains("1: root cause"));
    }

    #[test]
    fn test_clone_io_error_keeps_kind_and_message() {
        let error = DepmgrError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        match error.clone() {
            DepmgrError::IoError(e) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
                assert!(e.to_string().contains("gone"));
            }
            other => panic!("Expected IoError, got {other:?}"),
        }
    }

    #[test]
    fn test_user_friendly_error_keeps_context_as_details() {
        let toml_error = toml::from_str::<toml::Table>("preset = ").unwrap_err();
        let error = anyhow::Error::from(DepmgrError::from(toml_error))
            .context("Failed to parse management config from depmgr.toml");

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, DepmgrError::Other { .. }));
        assert!(ctx.error.to_string().starts_with("TOML parsing error"));
        assert_eq!(
            ctx.details.as_deref(),
            Some("Failed to parse management config from depmgr.toml")
        );
    }

    #[test]
    fn test_user_friendly_error_context_precedes_existing_details() {
        let error = anyhow::Error::from(DepmgrError::SystemPathNotFound {
            coordinate: "g:a:jar:1.0".to_string(),
            path: "/opt/a.jar".to_string(),
        })
        .context("checking deps.toml");

        let ctx = user_friendly_error(error);
        let details = ctx.details.unwrap();
        assert!(details.starts_with("checking deps.toml\n"));
        assert!(details.contains("No regular file exists at /opt/a.jar"));
    }

    #[test]
    fn test_user_friendly_error_io_not_found() {
        let error = anyhow::Error::from(DepmgrError::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "No such file",
        )))
        .context("Failed to read dependency tree from deps.toml");

        let ctx = user_friendly_error(error);
        assert!(matches!(ctx.error, DepmgrError::IoError(_)));
        assert!(ctx.suggestion.is_some());
        assert_eq!(ctx.details.as_deref(), Some("Failed to read dependency tree from deps.toml"));
    }
}
