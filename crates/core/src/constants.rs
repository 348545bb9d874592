//! Constants used throughout the registry core crate.
//!
//! Validation bounds, care-team names and storage paths live here so that the validation layer,
//! the stores and the tests agree on them.

/// Store URL used when none is configured.
pub const DEFAULT_STORE_URL: &str = "memory://";

/// Directory (under a file-store root) holding the sharded patient directories.
pub const PATIENTS_DIR_NAME: &str = "patients";

/// Filename of the per-patient YAML document in the file store.
pub const PATIENT_FILE_NAME: &str = "patient.yaml";

/// Temporary filename used while replacing a patient document.
pub const PATIENT_TEMP_FILE_NAME: &str = "patient.yaml.tmp";

/// Name must be at least this many characters once trimmed.
pub const NAME_MIN_CHARS: usize = 2;

/// Name must be at most this many characters once trimmed.
pub const NAME_MAX_CHARS: usize = 100;

/// Relational column width for the medical record number.
pub const MRN_MAX_CHARS: usize = 50;

/// Relational column width for gender.
pub const GENDER_MAX_CHARS: usize = 20;

/// Oldest accepted age in years (inclusive).
pub const AGE_MAX: i64 = 120;

/// Physician assigned to breast and lung cancer admissions.
pub const ONCOLOGY_PHYSICIAN: &str = "Dr. Susan Jones";

/// Department assigned to breast and lung cancer admissions.
pub const ONCOLOGY_DEPARTMENT: &str = "Department J";

/// Physician assigned to every other admitting diagnosis.
pub const GENERAL_PHYSICIAN: &str = "Dr. Ben Smith";

/// Department assigned to every other admitting diagnosis.
pub const GENERAL_DEPARTMENT: &str = "Department S";
