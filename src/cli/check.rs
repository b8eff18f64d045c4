//! `depmgr check` - verify system-scoped dependencies.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use super::{CliConfig, open_session};
use crate::collector::{Traversal, verify_system_paths};
use crate::management::ManagementPreset;

/// Expand a dependency tree and check the local files of system-scoped dependencies.
#[derive(Args)]
pub struct CheckCommand {
    /// Dependency tree file (TOML).
    file: PathBuf,

    /// Management preset, overriding the configuration file.
    #[arg(long)]
    preset: Option<ManagementPreset>,
}

impl CheckCommand {
    pub(super) fn execute(self, config: &CliConfig) -> Result<()> {
        let session = open_session(config, &self.file, self.preset)?;
        let resolved = session.collector.collect(&session.tree, Traversal::DepthFirst);

        let handler = session.collector.root_manager().scope_handler();
        let verified = verify_system_paths(&resolved, handler.as_ref())?;

        println!("{} {} system-scoped dependencies verified", "✓".green(), verified);
        Ok(())
    }
}
