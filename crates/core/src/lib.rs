//! # Patient Registry Core
//!
//! Core business logic for the patient registry.
//!
//! This crate contains the domain rules and persistence:
//! - Demographic validation with per-field error reporting
//! - Care-team assignment from the admitting diagnosis
//! - The deletion gate for diagnosed patients
//! - Interchangeable record stores (memory, SQLite, sharded YAML files)
//!
//! **No API concerns**: HTTP servers and wire DTOs belong in `api-rest` and `api-shared`.

pub mod care_team;
pub mod config;
pub mod constants;
pub mod error;
pub mod patient;
pub mod record;
pub mod store;
pub mod validation;

pub use config::{store_config_from_env_value, CoreConfig, StoreConfig};
pub use constants::DEFAULT_STORE_URL;
pub use error::{PatientError, PatientResult, StoreError, StoreResult};
pub use patient::PatientService;
pub use record::{Demographics, DemographicsDraft, PatientDraft, PatientRecord};
pub use store::{open_store, FileStore, MemoryStore, PatientStore, SqliteStore};
pub use validation::ValidationErrors;

pub use patreg_types::{Diagnosis, NonEmptyText};
pub use patreg_uuid::ShardableUuid;
