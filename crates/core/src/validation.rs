//! Input validation for patient demographics.
//!
//! Raw drafts arrive with every field optional. [`validate_demographics`] checks all of them,
//! collecting one or more messages per failing field, and only produces a [`Demographics`] value
//! when nothing failed. Field keys are the camelCase names used on the wire.

use crate::constants::{
    AGE_MAX, GENDER_MAX_CHARS, MRN_MAX_CHARS, NAME_MAX_CHARS, NAME_MIN_CHARS,
};
use crate::record::{Demographics, DemographicsDraft};
use patreg_types::NonEmptyText;
use std::collections::BTreeMap;
use std::fmt;

pub const FIELD_NAME: &str = "name";
pub const FIELD_MEDICAL_RECORD_NUMBER: &str = "medicalRecordNumber";
pub const FIELD_AGE: &str = "age";
pub const FIELD_GENDER: &str = "gender";
pub const FIELD_CONTACTS: &str = "contacts";

/// Per-field validation failures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.fields.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validates a draft and converts it into [`Demographics`].
///
/// Text fields are trimmed before length checks; the trimmed value is what gets stored.
///
/// # Errors
///
/// Returns every failing field at once:
/// - `name`: missing/blank, or not 2–100 characters
/// - `medicalRecordNumber`: missing/blank, or longer than 50 characters
/// - `age`: outside 0–120 (a missing age counts as 0)
/// - `gender`: missing/blank, or longer than 20 characters
/// - `contacts`: no entries
pub fn validate_demographics(draft: DemographicsDraft) -> Result<Demographics, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = required_text(&mut errors, FIELD_NAME, "Name is required.", draft.name);
    if let Some(name) = &name {
        if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name.char_len()) {
            errors.add(
                FIELD_NAME,
                format!(
                    "Name should be between {NAME_MIN_CHARS} and {NAME_MAX_CHARS} characters."
                ),
            );
        }
    }

    let medical_record_number = required_text(
        &mut errors,
        FIELD_MEDICAL_RECORD_NUMBER,
        "Medical Record Number is required.",
        draft.medical_record_number,
    );
    if let Some(mrn) = &medical_record_number {
        if mrn.char_len() > MRN_MAX_CHARS {
            errors.add(
                FIELD_MEDICAL_RECORD_NUMBER,
                format!("Medical Record Number must be at most {MRN_MAX_CHARS} characters."),
            );
        }
    }

    // An absent age is 0, which is in range.
    let age = match draft.age.unwrap_or(0) {
        age if (0..=AGE_MAX).contains(&age) => u8::try_from(age).ok(),
        _ => {
            errors.add(FIELD_AGE, format!("Age must be between 0 and {AGE_MAX}."));
            None
        }
    };

    let gender = required_text(&mut errors, FIELD_GENDER, "Gender is required.", draft.gender);
    if let Some(gender) = &gender {
        if gender.char_len() > GENDER_MAX_CHARS {
            errors.add(
                FIELD_GENDER,
                format!("Gender must be at most {GENDER_MAX_CHARS} characters."),
            );
        }
    }

    if draft.contacts.is_empty() {
        errors.add(FIELD_CONTACTS, "At least one contact is required.");
    }

    match (name, medical_record_number, age, gender) {
        (Some(name), Some(medical_record_number), Some(age), Some(gender)) if errors.is_empty() => {
            Ok(Demographics {
                name,
                medical_record_number,
                age,
                gender,
                contacts: draft.contacts,
            })
        }
        _ => Err(errors),
    }
}

fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    message: &str,
    value: Option<String>,
) -> Option<NonEmptyText> {
    match value.map(NonEmptyText::new) {
        Some(Ok(text)) => Some(text),
        _ => {
            errors.add(field, message);
            None
        }
    }
}
