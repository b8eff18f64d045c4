//! `depmgr tree` - print a dependency tree after management.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use super::{CliConfig, open_session};
use crate::collector::{ResolvedNode, Traversal};
use crate::management::ManagementPreset;

/// Output format of the tree command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented tree with management annotations.
    #[default]
    Text,
    /// The resolved nodes as JSON.
    Json,
}

/// Expand a dependency tree file and print it after management.
#[derive(Args)]
pub struct TreeCommand {
    /// Dependency tree file (TOML).
    file: PathBuf,

    /// Management preset, overriding the configuration file.
    #[arg(long)]
    preset: Option<ManagementPreset>,

    /// Expansion order.
    #[arg(long, value_enum, default_value_t = Traversal::DepthFirst)]
    traversal: Traversal,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

impl TreeCommand {
    pub(super) fn execute(self, config: &CliConfig) -> Result<()> {
        let session = open_session(config, &self.file, self.preset)?;
        let resolved = session.collector.collect(&session.tree, self.traversal);

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&resolved)?),
            OutputFormat::Text => print!("{}", render_text(&resolved)),
        }
        Ok(())
    }
}

/// Render resolved nodes as an indented tree followed by a summary line.
pub(crate) fn render_text(nodes: &[ResolvedNode]) -> String {
    let mut result = String::new();
    for node in nodes {
        result.push_str(&format!("{}\n", describe(node)));
        render_children(&node.children, "", &mut result);
    }

    let mut total = 0usize;
    let mut managed = 0usize;
    for node in nodes {
        node.walk(&mut |resolved| {
            total += 1;
            if resolved.managed.any() {
                managed += 1;
            }
        });
    }
    result.push_str(&format!("\n{total} dependencies, {managed} managed\n"));
    result
}

fn render_children(children: &[ResolvedNode], prefix: &str, result: &mut String) {
    for (i, child) in children.iter().enumerate() {
        let is_last = i == children.len() - 1;
        let connector = if is_last {
            "└── "
        } else {
            "├── "
        };
        result.push_str(&format!("{prefix}{connector}{}\n", describe(child)));

        let child_prefix = if is_last {
            format!("{prefix}    ")
        } else {
            format!("{prefix}│   ")
        };
        render_children(&child.children, &child_prefix, result);
    }
}

fn describe(node: &ResolvedNode) -> String {
    let mut line = node.dependency.to_string();

    if node.system {
        line.push_str(&format!(" {}", "[system]".cyan()));
    }

    if node.managed.any() {
        let mut notes = Vec::new();
        if let Some(version) = &node.premanaged_version {
            let from = if version.is_empty() {
                "unset"
            } else {
                version.as_str()
            };
            notes.push(format!("version from {from}"));
        }
        if let Some(scope) = &node.premanaged_scope {
            let from = if scope.is_empty() {
                "unset"
            } else {
                scope.as_str()
            };
            notes.push(format!("scope from {from}"));
        }
        for label in node.managed.labels() {
            if (label == "version" && node.premanaged_version.is_some())
                || (label == "scope" && node.premanaged_scope.is_some())
            {
                continue;
            }
            notes.push(label.to_string());
        }
        line.push_str(&format!(" {}", format!("(managed: {})", notes.join(", ")).yellow()));
    }

    line
}
