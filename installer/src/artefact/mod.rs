//! Release archive retrieval and unpacking.
//!
//! # Sub-modules
//!
//! - [`download`] — Archive download trait and HTTP implementation.
//! - [`extraction`] — Suffix-dispatched extraction with path traversal
//!   protection.

pub mod download;
pub mod extraction;
