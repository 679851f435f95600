//! Stagehand installer library.
//!
//! Provisions pinned releases of third-party binaries for the host platform,
//! drives an external packaging tool to build native installers, and writes
//! SHA-256 manifests for the results. It backs the `stagehand` CLI binary and
//! can be used directly from build tooling and tests.
//!
//! # Modules
//!
//! - [`artefact`] - Archive download and extraction
//! - [`binary_installer`] - Cache-aware release provisioning
//! - [`cli`] - Command-line argument definitions
//! - [`commands`] - Handlers for each CLI subcommand
//! - [`dirs`] - Platform-specific default directories
//! - [`error`] - Provisioning and CLI error types
//! - [`hash_manifest`] - SHA-256 manifest generation
//! - [`layout`] - Install directory layout
//! - [`output`] - Progress messages and shell snippets
//! - [`packaging`] - Native installer generation
//! - [`search_path`] - `PATH` registration helpers
//! - [`tools`] - Registered tools and their download URLs
//! - [`version`] - Validated release version strings

pub mod artefact;
pub mod binary_installer;
pub mod cli;
pub mod commands;
pub mod dirs;
pub mod error;
pub mod hash_manifest;
pub mod layout;
pub mod output;
pub mod packaging;
pub mod search_path;
pub mod tools;
pub mod version;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
