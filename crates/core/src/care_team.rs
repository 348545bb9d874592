//! Diagnosis-driven care-team assignment.
//!
//! The attending physician and department of a patient are never supplied by a client. They are
//! derived from the admitting diagnosis once, at registration.

use crate::constants::{
    GENERAL_DEPARTMENT, GENERAL_PHYSICIAN, ONCOLOGY_DEPARTMENT, ONCOLOGY_PHYSICIAN,
};
use patreg_types::Diagnosis;

/// Physician and department responsible for an admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CareAssignment {
    pub attending_physician: &'static str,
    pub department: &'static str,
}

/// Assigns the care team for a diagnosis.
///
/// Breast and lung cancer go to the oncology team; every other diagnosis, `Unspecified`
/// included, goes to the general team.
pub fn assign(diagnosis: Diagnosis) -> CareAssignment {
    match diagnosis {
        Diagnosis::BreastCancer | Diagnosis::LungCancer => CareAssignment {
            attending_physician: ONCOLOGY_PHYSICIAN,
            department: ONCOLOGY_DEPARTMENT,
        },
        _ => CareAssignment {
            attending_physician: GENERAL_PHYSICIAN,
            department: GENERAL_DEPARTMENT,
        },
    }
}

/// Like [`assign`], but a patient admitted without a diagnosis gets no care team.
pub fn assign_optional(diagnosis: Option<Diagnosis>) -> Option<CareAssignment> {
    diagnosis.map(assign)
}
