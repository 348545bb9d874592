//! File-backed storage: one YAML document per patient.
//!
//! Records live in a sharded tree under the configured root:
//!
//! ```text
//! <root>/patients/<s1>/<s2>/<uuid>/patient.yaml
//! ```
//!
//! where `s1`/`s2` are the first four hex characters of the canonical identifier. Writes go to a
//! temporary sibling file which is then renamed over `patient.yaml`, so readers never observe a
//! half-written document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use patreg_types::{Diagnosis, NonEmptyText};
use patreg_uuid::ShardableUuid;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::constants::{PATIENTS_DIR_NAME, PATIENT_FILE_NAME, PATIENT_TEMP_FILE_NAME};
use crate::error::{StoreError, StoreResult};
use crate::record::{Demographics, PatientRecord};
use crate::store::PatientStore;

#[derive(Clone, Debug)]
pub struct FileStore {
    patients_dir: PathBuf,
}

/// On-disk shape of `patient.yaml`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PatientFileWire {
    id: ShardableUuid,
    name: String,
    medical_record_number: String,
    age: u8,
    gender: String,
    #[serde(default)]
    contacts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    admitting_diagnosis: Option<Diagnosis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attending_physician: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    last_updated: DateTime<Utc>,
}

impl From<&PatientRecord> for PatientFileWire {
    fn from(record: &PatientRecord) -> Self {
        let d = record.demographics();
        Self {
            id: *record.id(),
            name: d.name.as_str().to_string(),
            medical_record_number: d.medical_record_number.as_str().to_string(),
            age: d.age,
            gender: d.gender.as_str().to_string(),
            contacts: d.contacts.clone(),
            admitting_diagnosis: record.admitting_diagnosis(),
            attending_physician: record.attending_physician().map(str::to_string),
            department: record.department().map(str::to_string),
            last_updated: Utc::now(),
        }
    }
}

impl TryFrom<PatientFileWire> for PatientRecord {
    type Error = StoreError;

    fn try_from(wire: PatientFileWire) -> StoreResult<Self> {
        let text = |value: &str, field: &str| {
            NonEmptyText::new(value)
                .map_err(|_| StoreError::Corrupt(format!("patient {}: empty {field}", wire.id)))
        };
        let demographics = Demographics {
            name: text(&wire.name, "name")?,
            medical_record_number: text(&wire.medical_record_number, "medicalRecordNumber")?,
            age: wire.age,
            gender: text(&wire.gender, "gender")?,
            contacts: wire.contacts.clone(),
        };

        Ok(PatientRecord::restore(
            wire.id,
            demographics,
            wire.admitting_diagnosis,
            wire.attending_physician,
            wire.department,
        ))
    }
}

/// Parses `patient.yaml` text, reporting the failing field path on schema mismatch.
fn parse_patient_file(path: &Path, yaml_text: &str) -> StoreResult<PatientRecord> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    let wire = match serde_path_to_error::deserialize::<_, PatientFileWire>(deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let field = err.path().to_string();
            let source = err.into_inner();
            let field = if field.is_empty() { "<root>" } else { field.as_str() };
            return Err(StoreError::YamlDeserialization {
                path: path.to_path_buf(),
                message: format!("at {field}: {source}"),
            });
        }
    };
    PatientRecord::try_from(wire)
}

impl FileStore {
    /// Opens (creating if needed) the store rooted at `root`.
    pub async fn open(root: &Path) -> StoreResult<Self> {
        let patients_dir = root.join(PATIENTS_DIR_NAME);
        fs::create_dir_all(&patients_dir)
            .await
            .map_err(StoreError::DirCreation)?;
        Ok(Self { patients_dir })
    }

    fn patient_file(&self, id: &ShardableUuid) -> PathBuf {
        id.sharded_dir(&self.patients_dir).join(PATIENT_FILE_NAME)
    }

    async fn write_record(&self, patient_dir: &Path, record: &PatientRecord) -> StoreResult<()> {
        let yaml = serde_yaml::to_string(&PatientFileWire::from(record))
            .map_err(StoreError::YamlSerialization)?;
        let temp_path = patient_dir.join(PATIENT_TEMP_FILE_NAME);
        fs::write(&temp_path, yaml)
            .await
            .map_err(StoreError::FileWrite)?;
        fs::rename(&temp_path, patient_dir.join(PATIENT_FILE_NAME))
            .await
            .map_err(StoreError::FileWrite)
    }

    /// Overwrites an existing record. `Ok(false)` if its directory vanished before the write.
    async fn replace_record(
        &self,
        patient_dir: &Path,
        record: &PatientRecord,
    ) -> StoreResult<bool> {
        match self.write_record(patient_dir, record).await {
            Ok(()) => Ok(true),
            Err(StoreError::FileWrite(e)) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn read_record(&self, path: &Path) -> StoreResult<Option<PatientRecord>> {
        match fs::read_to_string(path).await {
            Ok(contents) => parse_patient_file(path, &contents).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::FileRead(e)),
        }
    }
}

/// Subdirectories of `dir`. A directory that does not exist (never created, or removed by a
/// concurrent delete) has none.
async fn child_dirs(dir: &Path) -> StoreResult<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    let mut entries = match fs::read_dir(dir).await {
        Ok(it) => it,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(dirs),
        Err(e) => return Err(StoreError::FileRead(e)),
    };
    while let Some(entry) = entries.next_entry().await.map_err(StoreError::FileRead)? {
        let file_type = match entry.file_type().await {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(StoreError::FileRead(e)),
        };
        if file_type.is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

#[async_trait]
impl PatientStore for FileStore {
    async fn insert(&self, record: &PatientRecord) -> StoreResult<()> {
        let patient_dir = record.id().sharded_dir(&self.patients_dir);
        if let Some(shard_dir) = patient_dir.parent() {
            fs::create_dir_all(shard_dir)
                .await
                .map_err(StoreError::DirCreation)?;
        }
        match fs::create_dir(&patient_dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::Duplicate(*record.id()));
            }
            Err(e) => return Err(StoreError::DirCreation(e)),
        }
        self.write_record(&patient_dir, record).await
    }

    async fn get(&self, id: &ShardableUuid) -> StoreResult<Option<PatientRecord>> {
        self.read_record(&self.patient_file(id)).await
    }

    async fn list(&self) -> StoreResult<Vec<PatientRecord>> {
        let mut patients = Vec::new();
        for s1 in child_dirs(&self.patients_dir).await? {
            for s2 in child_dirs(&s1).await? {
                for id_dir in child_dirs(&s2).await? {
                    let patient_path = id_dir.join(PATIENT_FILE_NAME);
                    match self.read_record(&patient_path).await {
                        Ok(Some(record)) => patients.push(record),
                        Ok(None) => {}
                        Err(e) => {
                            tracing::warn!(
                                "skipping unreadable patient file {}: {}",
                                patient_path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }
        Ok(patients)
    }

    async fn update(&self, record: &PatientRecord) -> StoreResult<bool> {
        let patient_dir = record.id().sharded_dir(&self.patients_dir);
        match fs::metadata(patient_dir.join(PATIENT_FILE_NAME)).await {
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(StoreError::FileRead(e)),
        }
        self.replace_record(&patient_dir, record).await
    }

    async fn remove(&self, id: &ShardableUuid) -> StoreResult<bool> {
        match fs::remove_dir_all(id.sharded_dir(&self.patients_dir)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::FileRemove(e)),
        }
    }
}
