use crate::validation::ValidationErrors;
use patreg_types::Diagnosis;
use patreg_uuid::ShardableUuid;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error("Patient with ID {0} not found.")]
    NotFound(ShardableUuid),
    #[error("Cannot delete a patient with an assigned diagnosis other than Unspecified.")]
    DeletionNotPermitted {
        id: ShardableUuid,
        diagnosis: Diagnosis,
    },
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<ValidationErrors> for PatientError {
    fn from(errors: ValidationErrors) -> Self {
        PatientError::Validation(errors)
    }
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

/// Failures raised by a [`PatientStore`](crate::store::PatientStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("failed to apply database migrations: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("patient {0} already exists")]
    Duplicate(ShardableUuid),
    #[error("failed to create storage directory: {0}")]
    DirCreation(std::io::Error),
    #[error("failed to read patient file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write patient file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to remove patient directory: {0}")]
    FileRemove(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("patient file {path} does not match schema: {message}", path = path.display())]
    YamlDeserialization { path: PathBuf, message: String },
    #[error("stored record is corrupt: {0}")]
    Corrupt(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
