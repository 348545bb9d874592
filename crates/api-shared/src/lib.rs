//! # API Shared
//!
//! Shared utilities and definitions for the patient registry APIs.
//!
//! Contains:
//! - Wire types (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `patreg-core` (record conversions) and `api-rest`.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
