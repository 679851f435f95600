//! Packaging configuration.
//!
//! A packaging run is described by a TOML file:
//!
//! ```toml
//! tool = "/usr/lib/jvm/jdk-22/bin/jpackage"  # optional, defaults to `jpackage`
//! timeout_secs = 900                          # optional
//!
//! [app]
//! name = "Bisq2"
//! vendor = "Bisq"
//! version = "2.1.0"
//! license_file = "LICENSE"
//! main_artifact = "desktop-app-2.1.0-all.jar"
//! main_entry_point = "bisq.desktop_app_launcher.DesktopAppLauncher"
//! runtime_args = ["-Xss1M", "-XX:+UseG1GC"]
//! input_dir = "build/packaging/input"
//! runtime_image_dir = "build/packaging/runtime"
//! output_dir = "build/packaging/out"
//!
//! [[format]]
//! tag = "deb"
//! extra_arguments = ["--linux-package-name", "bisq2"]
//! ```

use super::error::{PackagingError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::collections::HashSet;

/// Packaging tool used when the configuration names none.
pub const DEFAULT_PACKAGING_TOOL: &str = "jpackage";

/// First year of the default copyright range.
pub const DEFAULT_COPYRIGHT_START_YEAR: u32 = 2013;

const fn default_copyright_start_year() -> u32 {
    DEFAULT_COPYRIGHT_START_YEAR
}

/// Application metadata shared by every package format in a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppPackagingConfig {
    /// Application name.
    pub name: String,
    /// Vendor name.
    pub vendor: String,
    /// Application version string.
    pub version: String,
    /// License file bundled into the installer.
    pub license_file: Utf8PathBuf,
    /// File name of the main artifact inside `input_dir`.
    pub main_artifact: String,
    /// Fully qualified entry point.
    pub main_entry_point: String,
    /// Runtime options, joined with spaces into one tool argument.
    #[serde(default)]
    pub runtime_args: Vec<String>,
    /// Staged application directory.
    pub input_dir: Utf8PathBuf,
    /// Runtime image bundled with the application.
    pub runtime_image_dir: Utf8PathBuf,
    /// Directory that receives the packages.
    pub output_dir: Utf8PathBuf,
    /// First year of the copyright notice.
    #[serde(default = "default_copyright_start_year")]
    pub copyright_start_year: u32,
    /// Copyright holder; the vendor when absent.
    #[serde(default)]
    pub copyright_holder: Option<String>,
}

impl AppPackagingConfig {
    /// The copyright holder, falling back to the vendor.
    #[must_use]
    pub fn copyright_holder(&self) -> &str {
        self.copyright_holder.as_deref().unwrap_or(&self.vendor)
    }

    /// Resolve relative paths against `base`, typically the directory
    /// holding the configuration file.
    pub fn rebase(&mut self, base: &Utf8Path) {
        for path in [
            &mut self.license_file,
            &mut self.input_dir,
            &mut self.runtime_image_dir,
            &mut self.output_dir,
        ] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Check that every required text field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::InvalidConfig`] naming the first empty
    /// field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("name", self.name.as_str()),
            ("vendor", self.vendor.as_str()),
            ("version", self.version.as_str()),
            ("main_artifact", self.main_artifact.as_str()),
            ("main_entry_point", self.main_entry_point.as_str()),
            ("license_file", self.license_file.as_str()),
            ("input_dir", self.input_dir.as_str()),
            ("runtime_image_dir", self.runtime_image_dir.as_str()),
            ("output_dir", self.output_dir.as_str()),
        ];
        match required.iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(PackagingError::InvalidConfig {
                reason: format!("app.{field} must not be empty"),
            }),
            None => Ok(()),
        }
    }
}

/// One native package type to build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageFormatConfig {
    /// Value passed as `--type` (e.g. `deb`, `rpm`, `dmg`, `exe`).
    pub tag: String,
    /// Arguments appended for this format only, in order.
    #[serde(default)]
    pub extra_arguments: Vec<String>,
}

impl PackageFormatConfig {
    /// A format with no extra arguments.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            extra_arguments: Vec::new(),
        }
    }

    /// Append format-specific arguments.
    #[must_use]
    pub fn with_extra_arguments<I, S>(mut self, arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_arguments
            .extend(arguments.into_iter().map(Into::into));
        self
    }
}

/// Check that format tags are usable as directory names and are unique.
///
/// # Errors
///
/// Returns [`PackagingError::NoFormats`] for an empty list and
/// [`PackagingError::InvalidConfig`] for a malformed or repeated tag.
pub fn validate_formats(formats: &[PackageFormatConfig]) -> Result<()> {
    if formats.is_empty() {
        return Err(PackagingError::NoFormats);
    }
    let mut seen = HashSet::new();
    for format in formats {
        let tag = format.tag.as_str();
        let well_formed = !tag.is_empty()
            && tag
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !well_formed {
            return Err(PackagingError::InvalidConfig {
                reason: format!("format tag \"{tag}\" must be non-empty ASCII alphanumerics, '-' or '_'"),
            });
        }
        if !seen.insert(tag) {
            return Err(PackagingError::InvalidConfig {
                reason: format!("format tag \"{tag}\" is listed more than once"),
            });
        }
    }
    Ok(())
}

/// The contents of a packaging configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagingFile {
    /// Packaging tool to invoke.
    #[serde(default)]
    pub tool: Option<Utf8PathBuf>,
    /// Upper bound on each tool run, in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Application metadata.
    pub app: AppPackagingConfig,
    /// Formats to build, in order.
    #[serde(default, rename = "format")]
    pub formats: Vec<PackageFormatConfig>,
}

impl PackagingFile {
    /// Read and validate the configuration at `path`.
    ///
    /// Relative paths in `[app]` are taken relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::ConfigRead`] if the file is unreadable,
    /// [`PackagingError::ConfigParse`] for malformed TOML, and the
    /// validation errors of [`PackagingFile::parse`].
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PackagingError::ConfigRead {
            path: path.to_owned(),
            source,
        })?;
        let mut file = Self::parse(&text, path)?;
        if let Some(base) = path.parent() {
            file.app.rebase(base);
        }
        Ok(file)
    }

    /// Parse and validate configuration text; `origin` is used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::ConfigParse`] for malformed TOML and
    /// [`PackagingError::InvalidConfig`] or [`PackagingError::NoFormats`]
    /// when validation fails.
    pub fn parse(text: &str, origin: &Utf8Path) -> Result<Self> {
        let file: Self = toml::from_str(text).map_err(|source| PackagingError::ConfigParse {
            path: origin.to_owned(),
            source,
        })?;
        file.app.validate()?;
        validate_formats(&file.formats)?;
        if file.timeout_secs == Some(0) {
            return Err(PackagingError::InvalidConfig {
                reason: "timeout_secs must be positive".to_owned(),
            });
        }
        Ok(file)
    }

    /// The packaging tool, defaulting to [`DEFAULT_PACKAGING_TOOL`].
    #[must_use]
    pub fn tool(&self) -> Utf8PathBuf {
        self.tool
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_PACKAGING_TOOL))
    }

    /// The configured formats restricted to `wanted`, in configuration
    /// order. An empty `wanted` selects every format.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::InvalidConfig`] if a wanted tag is not
    /// configured.
    pub fn select_formats(&self, wanted: &[String]) -> Result<Vec<PackageFormatConfig>> {
        if let Some(unknown) = wanted
            .iter()
            .find(|tag| !self.formats.iter().any(|f| &f.tag == *tag))
        {
            return Err(PackagingError::InvalidConfig {
                reason: format!("format \"{unknown}\" is not configured"),
            });
        }
        Ok(self
            .formats
            .iter()
            .filter(|format| wanted.is_empty() || wanted.contains(&format.tag))
            .cloned()
            .collect())
    }
}
