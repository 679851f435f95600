//! CLI argument definitions for `stagehand`.
//!
//! Kept apart from the entrypoint so the binary only orchestrates.

use crate::tools::ToolKind;
use crate::version::ArtifactVersion;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use stagehand_common::Sha256Digest;

/// Provision versioned tool releases and build verified native packages.
#[derive(Parser, Debug)]
#[command(name = "stagehand")]
#[command(version, about)]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Install Bitcoin Core 27.0 into the default data directory:\n",
    "    $ stagehand install --tool bitcoin --version 27.0\n\n",
    "  Build the deb and rpm installers described in packaging.toml:\n",
    "    $ stagehand package --config packaging.toml --format deb --format rpm\n\n",
    "  Write a SHA-256 manifest for built installers:\n",
    "    $ stagehand hash-manifest --output dist/hashes.txt dist/*.deb dist/*.rpm\n",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        global = true,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// Log level implied by `-q` and `-v` flags.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download and unpack a tool release, reusing an existing install.
    Install(InstallArgs),

    /// Build native installers with the packaging tool.
    Package(PackageArgs),

    /// Write a SHA-256 manifest for release files.
    HashManifest(HashManifestArgs),
}

/// Arguments for the install command.
#[derive(Args, Debug, Clone)]
pub struct InstallArgs {
    /// Tool to install.
    #[arg(long, value_enum)]
    pub tool: ToolKind,

    /// Release version, e.g. `27.0`.
    #[arg(long, value_name = "VERSION")]
    pub version: ArtifactVersion,

    /// Directory releases are unpacked into [default: platform data dir].
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<Utf8PathBuf>,

    /// Expected SHA-256 of the release archive.
    #[arg(long, value_name = "HEX")]
    pub sha256: Option<Sha256Digest>,

    /// Print the bin directory on stdout.
    #[arg(long)]
    pub print_path: bool,
}

/// Arguments for the package command.
#[derive(Args, Debug, Clone)]
pub struct PackageArgs {
    /// Packaging configuration file.
    #[arg(long, value_name = "FILE")]
    pub config: Utf8PathBuf,

    /// Packaging tool, overriding the configuration.
    #[arg(long, value_name = "PATH")]
    pub tool: Option<Utf8PathBuf>,

    /// Build only this format (repeatable) [default: all configured].
    #[arg(long = "format", value_name = "TAG")]
    pub formats: Vec<String>,

    /// Per-format time limit in seconds, overriding the configuration.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: Option<u64>,
}

/// Arguments for the hash-manifest command.
#[derive(Args, Debug, Clone)]
pub struct HashManifestArgs {
    /// Manifest file to write.
    #[arg(long, value_name = "FILE")]
    pub output: Utf8PathBuf,

    /// Platform label for every line [default: host platform label].
    #[arg(long, value_name = "LABEL")]
    pub label: Option<String>,

    /// Files to hash, in manifest order.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<Utf8PathBuf>,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
