//! Command handlers behind the `stagehand` binary.
//!
//! Each handler takes its collaborators explicitly so the binary can wire
//! real implementations and tests can substitute stubs.

use crate::artefact::download::ArtefactDownloader;
use crate::artefact::extraction::ArtefactExtractor;
use crate::binary_installer::{BinaryInstaller, Installer};
use crate::cli::{HashManifestArgs, InstallArgs, PackageArgs};
use crate::dirs::{BaseDirs, default_install_dir};
use crate::error::CliError;
use crate::hash_manifest::{HashManifest, write_manifest};
use crate::layout::InstallLayout;
use crate::output::{ShellSnippet, installed_message, packaged_message, write_stderr_line};
use crate::packaging::{
    BuiltPackage, DEFAULT_PACKAGING_TIMEOUT, PackageFactory, PackagingFile, ProcessRunner,
};
use camino::Utf8PathBuf;
use stagehand_common::{Platform, UnsupportedPlatform};
use std::fmt::Display;
use std::io::Write;
use std::time::Duration;

/// Result type for command handlers.
pub type Result<T> = std::result::Result<T, CliError>;

/// Output streams for a command.
pub struct Console<'a> {
    /// Receives machine-readable results.
    pub stdout: &'a mut dyn Write,
    /// Receives progress messages.
    pub stderr: &'a mut dyn Write,
    /// Suppresses progress messages.
    pub quiet: bool,
}

impl Console<'_> {
    fn progress(&mut self, message: impl Display) {
        if !self.quiet {
            write_stderr_line(self.stderr, message);
        }
    }
}

/// Collaborators used by [`run_install`].
pub struct InstallContext<'a> {
    /// Source of the default install directory.
    pub dirs: &'a dyn BaseDirs,
    /// Fetches release archives.
    pub downloader: &'a dyn ArtefactDownloader,
    /// Unpacks release archives.
    pub extractor: &'a dyn ArtefactExtractor,
}

/// Install the requested tool release and return its bin directory.
///
/// The host platform is checked before anything else, so an unsupported
/// host never reaches the network.
///
/// # Errors
///
/// Returns [`CliError::UnsupportedPlatform`] for an unsupported host,
/// [`CliError::NoInstallDir`] when no install directory is available, and
/// [`CliError::Install`] when provisioning fails.
pub fn run_install(
    args: &InstallArgs,
    host: std::result::Result<Platform, UnsupportedPlatform>,
    context: &InstallContext<'_>,
    console: &mut Console<'_>,
) -> Result<Utf8PathBuf> {
    let platform = host?;
    let install_dir = match &args.install_dir {
        Some(dir) => dir.clone(),
        None => default_install_dir(context.dirs).ok_or(CliError::NoInstallDir)?,
    };

    let tool = args.tool.tool();
    let mut installer = BinaryInstaller::new(
        tool.as_ref(),
        platform,
        InstallLayout::new(install_dir),
        context.downloader,
        context.extractor,
    );
    if let Some(digest) = &args.sha256 {
        installer = installer.with_expected_sha256(digest.clone());
    }

    let bin_dir = installer.install(&args.version)?;
    console.progress(installed_message(
        tool.component(),
        args.version.as_str(),
        &bin_dir,
    ));
    if args.print_path {
        writeln!(console.stdout, "{bin_dir}")?;
    } else {
        console.progress("");
        console.progress(ShellSnippet::new(&bin_dir).display_text());
    }
    Ok(bin_dir)
}

/// Build the configured packages.
///
/// # Errors
///
/// Returns [`CliError::Packaging`] if the configuration is unusable or any
/// format fails.
pub fn run_package(
    args: &PackageArgs,
    runner: &dyn ProcessRunner,
    console: &mut Console<'_>,
) -> Result<Vec<BuiltPackage>> {
    let file = PackagingFile::load(&args.config)?;
    let formats = file.select_formats(&args.formats)?;
    let tool = args.tool.clone().unwrap_or_else(|| file.tool());
    let timeout = args
        .timeout_secs
        .or(file.timeout_secs)
        .map_or(DEFAULT_PACKAGING_TIMEOUT, Duration::from_secs);

    let tags: Vec<&str> = formats.iter().map(|format| format.tag.as_str()).collect();
    console.progress(format!(
        "Packaging {} {} as {}",
        file.app.name,
        file.app.version,
        tags.join(", ")
    ));

    let built = PackageFactory::new(tool, runner)
        .with_timeout(timeout)
        .create_packages(&file.app, &formats)?;
    console.progress(packaged_message(built.len(), &file.app.output_dir));
    Ok(built)
}

/// Hash the given files and write the manifest.
///
/// The host platform label is used when no label is given; only then does
/// an unsupported host matter.
///
/// # Errors
///
/// Returns [`CliError::UnsupportedPlatform`] when the label must come from
/// an unsupported host, and [`CliError::Manifest`] when hashing or writing
/// fails.
pub fn run_hash_manifest(
    args: &HashManifestArgs,
    host: std::result::Result<Platform, UnsupportedPlatform>,
    console: &mut Console<'_>,
) -> Result<HashManifest> {
    let label = match &args.label {
        Some(label) => label.clone(),
        None => host?.label().to_owned(),
    };
    let manifest = HashManifest::generate(&args.files, &label)?;
    write_manifest(&args.output, &manifest)?;
    console.progress(format!(
        "Wrote {} hashes to {}",
        manifest.len(),
        args.output
    ));
    Ok(manifest)
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
