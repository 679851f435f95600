//! Native release packaging.
//!
//! [`PackageFactory`] drives an external packaging tool (by default
//! `jpackage`) once per requested format, using metadata loaded from a
//! [`PackagingFile`].

pub mod config;
pub mod copyright;
pub mod error;
pub mod factory;
pub mod process;

pub use config::{
    AppPackagingConfig, DEFAULT_COPYRIGHT_START_YEAR, DEFAULT_PACKAGING_TOOL,
    PackageFormatConfig, PackagingFile, validate_formats,
};
pub use error::PackagingError;
pub use factory::{BuiltPackage, DEFAULT_PACKAGING_TIMEOUT, PackageFactory};
pub use process::{ProcessOutcome, ProcessRunner, SystemProcessRunner};
