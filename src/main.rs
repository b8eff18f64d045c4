//! depmgr CLI entry point
//!
//! Parses arguments, runs the command and renders failures as user-friendly
//! errors:
//! - `tree` - print a dependency tree after management
//! - `check` - verify the local files of system-scoped dependencies

use anyhow::Result;
use clap::Parser;
use depmgr::cli;
use depmgr::core::error::user_friendly_error;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute() {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
