//! Patient identifier and sharded-path utilities.
//!
//! Every patient record is keyed by a 128-bit random identifier. To keep storage keys, URLs and
//! on-disk paths consistent, the registry uses a *canonical* textual form for identifiers:
//! **32 lowercase hexadecimal characters** (no hyphens).
//!
//! This crate provides:
//! - [`ShardableUuid`], a wrapper that always renders in canonical form once constructed.
//! - The sharding rule used by the file-backed store to derive a record directory from an
//!   identifier.
//!
//! ## Accepted input forms
//! [`ShardableUuid::parse`] accepts the canonical form and the common hyphenated form, in either
//! case. Whatever the input, the value is rendered back in canonical form, so
//! `550E8400-E29B-41D4-A716-446655440000` and `550e8400e29b41d4a716446655440000` name the same
//! record.
//!
//! ## Sharded directory layout
//! For a canonical identifier `u`, record data lives under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `patient_data/patients/55/0e/550e8400e29b41d4a716446655440000/`

mod service;

pub use service::ShardableUuid;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
