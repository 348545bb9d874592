//! Admitting diagnosis codes.
//!
//! On the wire a diagnosis is always its symbolic name (`"BreastCancer"`), never the numeric
//! code. Names are matched case-insensitively when read and written back in canonical casing.

use std::{fmt, str::FromStr};

/// Error returned when a diagnosis name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiagnosisError {
    #[error("unknown diagnosis '{0}'")]
    Unknown(String),
}

/// Admitting diagnosis recorded at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, utoipa::ToSchema)]
pub enum Diagnosis {
    Unspecified,
    BreastCancer,
    LungCancer,
    ProstateCancer,
    ColorectalCancer,
    PancreaticCancer,
    Leukemia,
    Lymphoma,
    Melanoma,
}

impl Diagnosis {
    /// Every diagnosis, in code order.
    pub const ALL: [Diagnosis; 9] = [
        Diagnosis::Unspecified,
        Diagnosis::BreastCancer,
        Diagnosis::LungCancer,
        Diagnosis::ProstateCancer,
        Diagnosis::ColorectalCancer,
        Diagnosis::PancreaticCancer,
        Diagnosis::Leukemia,
        Diagnosis::Lymphoma,
        Diagnosis::Melanoma,
    ];

    /// Canonical symbolic name.
    pub fn name(self) -> &'static str {
        match self {
            Diagnosis::Unspecified => "Unspecified",
            Diagnosis::BreastCancer => "BreastCancer",
            Diagnosis::LungCancer => "LungCancer",
            Diagnosis::ProstateCancer => "ProstateCancer",
            Diagnosis::ColorectalCancer => "ColorectalCancer",
            Diagnosis::PancreaticCancer => "PancreaticCancer",
            Diagnosis::Leukemia => "Leukemia",
            Diagnosis::Lymphoma => "Lymphoma",
            Diagnosis::Melanoma => "Melanoma",
        }
    }

    /// Numeric code (declaration order). Only used for display in the CLI; storage and the wire
    /// use [`Diagnosis::name`].
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Diagnosis {
    type Err = DiagnosisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Diagnosis::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DiagnosisError::Unknown(s.to_string()))
    }
}

impl serde::Serialize for Diagnosis {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> serde::Deserialize<'de> for Diagnosis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
