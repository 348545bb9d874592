//! Relational storage backed by SQLite through sqlx.
//!
//! The schema lives in `crates/core/migrations` and is applied on connect. Contacts are stored as
//! a JSON array in a text column; the diagnosis is stored by symbolic name, never by code.

use async_trait::async_trait;
use patreg_types::{Diagnosis, NonEmptyText};
use patreg_uuid::ShardableUuid;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{StoreError, StoreResult};
use crate::record::{Demographics, PatientRecord};
use crate::store::PatientStore;

const MAX_CONNECTIONS: u32 = 8;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT id, name, medical_record_number, age, gender, contacts, \
     admitting_diagnosis, attending_physician, department FROM patients";

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Connects to `url`, creating the database file if needed, and runs migrations.
    ///
    /// In-memory URLs (`sqlite::memory:`) get a single long-lived connection, since every new
    /// connection to an in-memory database would see an empty database of its own.
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let pool_options = SqlitePoolOptions::new().acquire_timeout(ACQUIRE_TIMEOUT);
        let pool_options = if in_memory {
            pool_options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            pool_options.max_connections(MAX_CONNECTIONS)
        };

        let pool = pool_options.connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct PatientRow {
    id: String,
    name: String,
    medical_record_number: String,
    age: i64,
    gender: String,
    contacts: String,
    admitting_diagnosis: Option<String>,
    attending_physician: Option<String>,
    department: Option<String>,
}

impl TryFrom<PatientRow> for PatientRecord {
    type Error = StoreError;

    fn try_from(row: PatientRow) -> StoreResult<Self> {
        let corrupt = |what: &str| StoreError::Corrupt(format!("patient {}: {what}", row.id));

        let id = ShardableUuid::parse(&row.id).map_err(|_| corrupt("invalid id"))?;
        let contacts: Vec<String> =
            serde_json::from_str(&row.contacts).map_err(|_| corrupt("invalid contacts"))?;
        let admitting_diagnosis = row
            .admitting_diagnosis
            .as_deref()
            .map(Diagnosis::from_str)
            .transpose()
            .map_err(|_| corrupt("unknown diagnosis"))?;
        let demographics = Demographics {
            name: NonEmptyText::new(&row.name).map_err(|_| corrupt("empty name"))?,
            medical_record_number: NonEmptyText::new(&row.medical_record_number)
                .map_err(|_| corrupt("empty medical record number"))?,
            age: u8::try_from(row.age).map_err(|_| corrupt("age out of range"))?,
            gender: NonEmptyText::new(&row.gender).map_err(|_| corrupt("empty gender"))?,
            contacts,
        };

        Ok(PatientRecord::restore(
            id,
            demographics,
            admitting_diagnosis,
            row.attending_physician,
            row.department,
        ))
    }
}

fn contacts_json(record: &PatientRecord) -> StoreResult<String> {
    serde_json::to_string(&record.demographics().contacts)
        .map_err(|e| StoreError::Corrupt(format!("failed to encode contacts: {e}")))
}

#[async_trait]
impl PatientStore for SqliteStore {
    async fn insert(&self, record: &PatientRecord) -> StoreResult<()> {
        let d = record.demographics();
        let result = sqlx::query(
            "INSERT INTO patients (id, name, medical_record_number, age, gender, contacts, \
             admitting_diagnosis, attending_physician, department) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(record.id().to_string())
        .bind(d.name.as_str())
        .bind(d.medical_record_number.as_str())
        .bind(i64::from(d.age))
        .bind(d.gender.as_str())
        .bind(contacts_json(record)?)
        .bind(record.admitting_diagnosis().map(Diagnosis::name))
        .bind(record.attending_physician())
        .bind(record.department())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate(*record.id()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, id: &ShardableUuid) -> StoreResult<Option<PatientRecord>> {
        let row = sqlx::query_as::<_, PatientRow>(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(PatientRecord::try_from).transpose()
    }

    async fn list(&self) -> StoreResult<Vec<PatientRecord>> {
        let rows = sqlx::query_as::<_, PatientRow>(&format!("{SELECT_COLUMNS} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(PatientRecord::try_from).collect()
    }

    async fn update(&self, record: &PatientRecord) -> StoreResult<bool> {
        let d = record.demographics();
        let result = sqlx::query(
            "UPDATE patients SET name = ?, medical_record_number = ?, age = ?, gender = ?, \
             contacts = ?, admitting_diagnosis = ?, attending_physician = ?, department = ? \
             WHERE id = ?",
        )
        .bind(d.name.as_str())
        .bind(d.medical_record_number.as_str())
        .bind(i64::from(d.age))
        .bind(d.gender.as_str())
        .bind(contacts_json(record)?)
        .bind(record.admitting_diagnosis().map(Diagnosis::name))
        .bind(record.attending_physician())
        .bind(record.department())
        .bind(record.id().to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove(&self, id: &ShardableUuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
