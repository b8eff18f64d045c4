//! Command-line interface for depmgr.
//!
//! # Available Commands
//!
//! - `tree` - expand a dependency tree file and print every dependency after
//!   management, annotated with what was overridden
//! - `check` - expand a tree and verify that every system-scoped dependency
//!   points at an existing file
//!
//! # Examples
//!
//! ```bash
//! # Print the managed tree using the default preset
//! depmgr tree deps.toml
//!
//! # Only manage transitive dependencies, expanding breadth-first, as JSON
//! depmgr tree deps.toml --preset transitive --traversal bfs --format json
//!
//! # Use a management config and verify system paths
//! depmgr --config depmgr.toml check deps.toml
//! ```

mod check;
mod tree;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::collector::{Collector, load_tree};
use crate::config::ManagementConfig;
use crate::constants::CONFIG_ENV_VAR;
use crate::core::DependencyNode;
use crate::management::{DependencyManager, ManagementPreset};

/// Runtime settings derived from global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter directive; `None` disables logging.
    pub log_level: Option<String>,
    /// Management configuration file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Install the tracing subscriber for this configuration.
    ///
    /// `RUST_LOG` takes precedence over the default level, but not over
    /// `--verbose`.
    pub fn init_logging(&self, verbose: bool) {
        let Some(level) = &self.log_level else {
            return;
        };

        let filter = if verbose {
            EnvFilter::new(level)
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Main CLI structure for depmgr.
#[derive(Parser)]
#[command(
    name = "depmgr",
    about = "Dependency management derivation for transitive dependency trees",
    version,
    long_about = "depmgr expands dependency trees and applies nearest-wins dependency management \
                  (versions, scopes, optionality, exclusions and system paths) at every level."
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Disable all logging.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Management configuration file.
    #[arg(long, global = true, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a dependency tree after management.
    Tree(tree::TreeCommand),

    /// Verify the local files of system-scoped dependencies.
    Check(check::CheckCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Returns the command's error for the caller to render.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        config.init_logging(self.verbose);
        self.execute_with_config(config)
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("depmgr=debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns the command's error for the caller to render.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        match self.command {
            Commands::Tree(cmd) => cmd.execute(&config),
            Commands::Check(cmd) => cmd.execute(&config),
        }
    }
}

/// A loaded tree together with the collector that expands it.
struct Session {
    collector: Collector,
    tree: DependencyNode,
}

fn open_session(config: &CliConfig, tree_path: &Path, preset: Option<ManagementPreset>) -> Result<Session> {
    let management = ManagementConfig::load_with_optional(config.config_path.clone())?;

    let mut manager = management.build_manager()?;
    if let Some(preset) = preset {
        manager = DependencyManager::new(preset, manager.scope_handler().clone())
            .with_key_scheme(management.key);
    }

    let tree = load_tree(tree_path, manager.scope_handler().as_ref())?;
    Ok(Session {
        collector: Collector::new(manager),
        tree,
    })
}
