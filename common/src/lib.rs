//! Shared building blocks for stagehand: the host platform model, recursive
//! directory reset, and SHA-256 digests.

pub mod digest;
pub mod fs;
pub mod platform;

pub use digest::{InvalidDigest, Sha256Digest};
pub use fs::{FsError, remove_all, reset_dir};
pub use platform::{Platform, UnsupportedPlatform};
