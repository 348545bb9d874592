//! JSON wire types.
//!
//! Field names are camelCase on the wire. Diagnoses travel as their symbolic names.
//!
//! Request types keep every field optional so that a missing field reaches validation and is
//! reported alongside the other field errors, instead of failing JSON decoding as a whole.

use patreg_types::Diagnosis;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Health check response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// A registered patient as returned by every read and write endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Canonical identifier (32 lowercase hex characters).
    pub id: String,
    pub name: String,
    pub medical_record_number: String,
    pub age: u8,
    pub gender: String,
    pub contacts: Vec<String>,
    pub admitting_diagnosis: Option<Diagnosis>,
    /// Derived from the admitting diagnosis at registration.
    pub attending_physician: Option<String>,
    /// Derived from the admitting diagnosis at registration.
    pub department: Option<String>,
}

/// Body of `POST /patients`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientReq {
    pub name: Option<String>,
    pub medical_record_number: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub contacts: Option<Vec<String>>,
    pub admitting_diagnosis: Option<Diagnosis>,
}

/// Body of `PUT /patients/{id}`.
///
/// Only demographic fields exist here. Diagnosis, physician and department sent by a client are
/// ignored during decoding.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientReq {
    pub name: Option<String>,
    pub medical_record_number: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub contacts: Option<Vec<String>>,
}

/// Error body returned with every 4xx/5xx response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub message: String,
    /// Per-field messages keyed by wire field name. Omitted when empty.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ErrorRes {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: BTreeMap::new(),
        }
    }
}
