//! Native installer generation, one packaging-tool run per format.
//!
//! Every run receives the same application arguments, a fresh scratch
//! directory named after its format tag, and the format's own arguments
//! ending in `--type <tag>`. Formats run sequentially; a failing format does
//! not stop later ones, but the run as a whole fails if any format did.

use super::config::{AppPackagingConfig, PackageFormatConfig, validate_formats};
use super::copyright::{copyright_notice, current_year};
use super::error::{PackagingError, Result};
use super::process::ProcessRunner;
use camino::{Utf8Path, Utf8PathBuf};
use log::{error, info};
use stagehand_common::reset_dir;
use std::time::Duration;

/// Default bound on a single packaging-tool run.
pub const DEFAULT_PACKAGING_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// A format that was packaged successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPackage {
    /// The format tag.
    pub format: String,
    /// The scratch directory used for the run.
    pub scratch_dir: Utf8PathBuf,
}

/// Drives the packaging tool for each requested format.
pub struct PackageFactory<'a> {
    tool: Utf8PathBuf,
    runner: &'a dyn ProcessRunner,
    timeout: Duration,
    year: Option<u32>,
}

impl<'a> PackageFactory<'a> {
    /// Create a factory invoking `tool` through `runner`.
    #[must_use]
    pub fn new(tool: impl Into<Utf8PathBuf>, runner: &'a dyn ProcessRunner) -> Self {
        Self {
            tool: tool.into(),
            runner,
            timeout: DEFAULT_PACKAGING_TIMEOUT,
            year: None,
        }
    }

    /// Override the per-run time bound.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fix the copyright end year instead of reading the clock.
    #[must_use]
    pub const fn with_copyright_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// The scratch directory for `format_tag`: a `temp_<tag>` sibling of
    /// the output directory.
    #[must_use]
    pub fn scratch_dir(output_dir: &Utf8Path, format_tag: &str) -> Utf8PathBuf {
        let base = output_dir.parent().unwrap_or(output_dir);
        base.join(format!("temp_{format_tag}"))
    }

    /// Arguments shared by every format, with all paths made absolute.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::PathResolution`] if a configured path
    /// cannot be made absolute, and [`PackagingError::Clock`] if the current
    /// year is needed and the clock is unusable.
    pub fn common_arguments(&self, app: &AppPackagingConfig) -> Result<Vec<String>> {
        let year = match self.year {
            Some(year) => year,
            None => current_year()?,
        };
        let notice = copyright_notice(app.copyright_start_year, year, app.copyright_holder());

        Ok(vec![
            "--dest".to_owned(),
            absolute(&app.output_dir)?.into_string(),
            "--name".to_owned(),
            app.name.clone(),
            "--copyright".to_owned(),
            notice,
            "--vendor".to_owned(),
            app.vendor.clone(),
            "--license-file".to_owned(),
            absolute(&app.license_file)?.into_string(),
            "--app-version".to_owned(),
            app.version.clone(),
            "--input".to_owned(),
            absolute(&app.input_dir)?.into_string(),
            "--main-jar".to_owned(),
            app.main_artifact.clone(),
            "--main-class".to_owned(),
            app.main_entry_point.clone(),
            "--java-options".to_owned(),
            app.runtime_args.join(" "),
            "--runtime-image".to_owned(),
            absolute(&app.runtime_image_dir)?.into_string(),
        ])
    }

    /// Arguments specific to `format`, ending with `--type <tag>`.
    #[must_use]
    pub fn format_arguments(format: &PackageFormatConfig) -> Vec<String> {
        let mut args = format.extra_arguments.clone();
        args.push("--type".to_owned());
        args.push(format.tag.clone());
        args
    }

    /// Build every format in order.
    ///
    /// # Errors
    ///
    /// Returns [`PackagingError::NoFormats`] or
    /// [`PackagingError::InvalidConfig`] before any run if the format list
    /// is empty or malformed, errors from [`Self::common_arguments`], and
    /// [`PackagingError::FormatsFailed`] once every format has been
    /// attempted if any of them failed.
    pub fn create_packages(
        &self,
        app: &AppPackagingConfig,
        formats: &[PackageFormatConfig],
    ) -> Result<Vec<BuiltPackage>> {
        validate_formats(formats)?;
        let common = self.common_arguments(app)?;
        let output_dir = absolute(&app.output_dir)?;

        let mut built = Vec::with_capacity(formats.len());
        let mut failures = Vec::new();
        for format in formats {
            match self.package_one(&common, &output_dir, format) {
                Ok(package) => built.push(package),
                Err(err) => {
                    error!(target: "packaging", "{err}");
                    failures.push(err);
                }
            }
        }

        if failures.is_empty() {
            Ok(built)
        } else {
            Err(PackagingError::FormatsFailed {
                attempted: formats.len(),
                failures,
            })
        }
    }

    fn package_one(
        &self,
        common: &[String],
        output_dir: &Utf8Path,
        format: &PackageFormatConfig,
    ) -> Result<BuiltPackage> {
        let tag = format.tag.as_str();
        let scratch_dir = Self::scratch_dir(output_dir, tag);
        reset_dir(&scratch_dir).map_err(|source| PackagingError::ScratchReset {
            format: tag.to_owned(),
            source,
        })?;

        let mut args = common.to_vec();
        args.push("--temp".to_owned());
        args.push(scratch_dir.to_string());
        args.extend(Self::format_arguments(format));

        info!(target: "packaging", "building {tag} package with {}", self.tool);
        let outcome = self
            .runner
            .run(&self.tool, &args, self.timeout)
            .map_err(|source| PackagingError::Spawn {
                format: tag.to_owned(),
                tool: self.tool.clone(),
                source,
            })?;

        if outcome.timed_out {
            return Err(PackagingError::TimedOut {
                format: tag.to_owned(),
                tool: self.tool.clone(),
                seconds: self.timeout.as_secs(),
            });
        }
        if !outcome.success() {
            let status = outcome
                .status
                .map_or_else(|| "no exit status".to_owned(), |status| status.to_string());
            return Err(PackagingError::ToolFailed {
                format: tag.to_owned(),
                tool: self.tool.clone(),
                status,
            });
        }

        info!(target: "packaging", "{tag} package finished");
        Ok(BuiltPackage {
            format: tag.to_owned(),
            scratch_dir,
        })
    }
}

fn absolute(path: &Utf8Path) -> Result<Utf8PathBuf> {
    let resolution_error = |reason: String| PackagingError::PathResolution {
        path: path.to_owned(),
        reason,
    };
    let resolved = std::path::absolute(path).map_err(|err| resolution_error(err.to_string()))?;
    Utf8PathBuf::from_path_buf(resolved)
        .map_err(|_| resolution_error("resolved path is not valid UTF-8".to_owned()))
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
