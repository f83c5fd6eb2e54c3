//! Command-line interface definitions for the `dropkit` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `dropkit` binary.
#[derive(Debug, Parser)]
#[command(
    name = "dropkit",
    about = "Render cloud-init bootstrap documents for new development machines",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Render the cloud-init document for the configured profile.
    #[command(name = "render", about = "Render the cloud-init document")]
    Render(RenderCommand),
    /// Check that a template parses and list the variables it uses.
    #[command(name = "check", about = "Validate a template and list its variables")]
    Check(CheckCommand),
}

/// Arguments for the `dropkit render` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct RenderCommand {
    /// Template file to render instead of the built-in template.
    #[arg(long, value_name = "PATH")]
    pub(crate) template: Option<String>,
    /// Write the document to this file instead of standard output.
    #[arg(long, short, value_name = "PATH")]
    pub(crate) output: Option<String>,
    /// Account name created on the machine.
    #[arg(long, value_name = "NAME")]
    pub(crate) username: Option<String>,
    /// Display name used for the account and git configuration.
    #[arg(long, value_name = "NAME")]
    pub(crate) full_name: Option<String>,
    /// Email used for git configuration.
    #[arg(long, value_name = "EMAIL")]
    pub(crate) email: Option<String>,
    /// Public key to authorise; repeat for several keys.
    ///
    /// When given, the configured keys file is not read.
    #[arg(long = "ssh-key", value_name = "KEY")]
    pub(crate) ssh_keys: Vec<String>,
    /// Include the Tailscale installer.
    #[arg(long, conflicts_with = "no_tailscale")]
    pub(crate) tailscale: bool,
    /// Leave out the Tailscale installer.
    #[arg(long)]
    pub(crate) no_tailscale: bool,
}

impl RenderCommand {
    /// Resolves the pair of Tailscale flags into an optional override.
    pub(crate) const fn tailscale_override(&self) -> Option<bool> {
        if self.tailscale {
            Some(true)
        } else if self.no_tailscale {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the `dropkit check` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct CheckCommand {
    /// Template file to check instead of the built-in template.
    #[arg(long, value_name = "PATH")]
    pub(crate) template: Option<String>,
}
