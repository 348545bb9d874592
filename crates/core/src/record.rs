//! Patient record types.
//!
//! A [`PatientRecord`] keeps its demographics in a separate [`Demographics`] value. The only
//! mutation a record supports is swapping that value ([`PatientRecord::with_demographics`]), so
//! identifier, diagnosis, physician and department cannot change after registration.

use crate::care_team;
use crate::validation::{validate_demographics, ValidationErrors};
use api_shared::dto;
use patreg_types::{Diagnosis, NonEmptyText};
use patreg_uuid::ShardableUuid;

/// Validated demographic fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Demographics {
    pub name: NonEmptyText,
    pub medical_record_number: NonEmptyText,
    pub age: u8,
    pub gender: NonEmptyText,
    pub contacts: Vec<String>,
}

/// Unvalidated demographics as supplied by a client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DemographicsDraft {
    pub name: Option<String>,
    pub medical_record_number: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub contacts: Vec<String>,
}

impl DemographicsDraft {
    /// See [`validate_demographics`].
    pub fn validate(self) -> Result<Demographics, ValidationErrors> {
        validate_demographics(self)
    }
}

/// Registration candidate: demographics plus an optional admitting diagnosis.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientDraft {
    pub demographics: DemographicsDraft,
    pub admitting_diagnosis: Option<Diagnosis>,
}

/// A registered patient.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatientRecord {
    id: ShardableUuid,
    demographics: Demographics,
    admitting_diagnosis: Option<Diagnosis>,
    attending_physician: Option<String>,
    department: Option<String>,
}

impl PatientRecord {
    /// Materialises a new record: fresh identifier, care team derived from the diagnosis.
    pub fn register(demographics: Demographics, admitting_diagnosis: Option<Diagnosis>) -> Self {
        let assignment = care_team::assign_optional(admitting_diagnosis);
        Self {
            id: ShardableUuid::new(),
            demographics,
            admitting_diagnosis,
            attending_physician: assignment.map(|a| a.attending_physician.to_string()),
            department: assignment.map(|a| a.department.to_string()),
        }
    }

    /// Rebuilds a record read back from storage.
    pub(crate) fn restore(
        id: ShardableUuid,
        demographics: Demographics,
        admitting_diagnosis: Option<Diagnosis>,
        attending_physician: Option<String>,
        department: Option<String>,
    ) -> Self {
        Self {
            id,
            demographics,
            admitting_diagnosis,
            attending_physician,
            department,
        }
    }

    /// Returns the record with its demographics replaced and everything else untouched.
    pub fn with_demographics(self, demographics: Demographics) -> Self {
        Self {
            demographics,
            ..self
        }
    }

    pub fn id(&self) -> &ShardableUuid {
        &self.id
    }

    pub fn demographics(&self) -> &Demographics {
        &self.demographics
    }

    pub fn admitting_diagnosis(&self) -> Option<Diagnosis> {
        self.admitting_diagnosis
    }

    pub fn attending_physician(&self) -> Option<&str> {
        self.attending_physician.as_deref()
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref()
    }

    /// The diagnosis preventing deletion, if there is one.
    ///
    /// Only records without a diagnosis or with `Unspecified` may be deleted.
    pub fn deletion_blocker(&self) -> Option<Diagnosis> {
        self.admitting_diagnosis
            .filter(|diagnosis| *diagnosis != Diagnosis::Unspecified)
    }
}

impl From<&PatientRecord> for dto::Patient {
    fn from(record: &PatientRecord) -> Self {
        let d = &record.demographics;
        dto::Patient {
            id: record.id.to_string(),
            name: d.name.as_str().to_string(),
            medical_record_number: d.medical_record_number.as_str().to_string(),
            age: d.age,
            gender: d.gender.as_str().to_string(),
            contacts: d.contacts.clone(),
            admitting_diagnosis: record.admitting_diagnosis,
            attending_physician: record.attending_physician.clone(),
            department: record.department.clone(),
        }
    }
}

impl From<PatientRecord> for dto::Patient {
    fn from(record: PatientRecord) -> Self {
        dto::Patient::from(&record)
    }
}

impl From<dto::UpdatePatientReq> for DemographicsDraft {
    fn from(req: dto::UpdatePatientReq) -> Self {
        DemographicsDraft {
            name: req.name,
            medical_record_number: req.medical_record_number,
            age: req.age,
            gender: req.gender,
            contacts: req.contacts.unwrap_or_default(),
        }
    }
}

impl From<dto::CreatePatientReq> for PatientDraft {
    fn from(req: dto::CreatePatientReq) -> Self {
        PatientDraft {
            demographics: DemographicsDraft {
                name: req.name,
                medical_record_number: req.medical_record_number,
                age: req.age,
                gender: req.gender,
                contacts: req.contacts.unwrap_or_default(),
            },
            admitting_diagnosis: req.admitting_diagnosis,
        }
    }
}
