//! Shared value types for the patient registry.
//!
//! These types are used by the core service, the wire DTOs and the CLI, so they live in a crate
//! with no dependency on storage or transport.

mod diagnosis;
mod text;

pub use diagnosis::{Diagnosis, DiagnosisError};
pub use text::{NonEmptyText, TextError};
