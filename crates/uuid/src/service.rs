//! Internal implementation of [`ShardableUuid`].

use crate::{UuidError, UuidResult};
use std::path::{Path, PathBuf};
use std::{fmt, str::FromStr};

use ::uuid::Uuid;

/// Canonical patient identifier (32 lowercase hex characters, no hyphens).
///
/// # Construction
/// - [`ShardableUuid::new`] generates a fresh random (v4) identifier for a new record.
/// - [`ShardableUuid::parse`] validates an externally supplied identifier (path segment, CLI
///   argument, stored row).
///
/// # Display format
/// `Display`, `to_string()` and serde serialisation always produce the canonical form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShardableUuid(Uuid);

impl Default for ShardableUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl ShardableUuid {
    /// Generates a new random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier in canonical or hyphenated form (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not one of the two accepted forms.
    /// Braced and URN forms are rejected.
    pub fn parse(input: &str) -> UuidResult<Self> {
        let accepted_len = input.len() == 32 || input.len() == 36;
        if accepted_len {
            if let Ok(uuid) = Uuid::parse_str(input) {
                return Ok(Self(uuid));
            }
        }
        Err(UuidError::InvalidInput(format!(
            "identifier must be 32 hex characters or a hyphenated UUID, got: '{}'",
            input
        )))
    }

    /// Returns `parent_dir/<s1>/<s2>/<uuid>/` where `s1`/`s2` are the first four hex characters.
    pub fn sharded_dir(&self, parent_dir: &Path) -> PathBuf {
        let canonical = self.0.simple().to_string();
        let s1 = &canonical[0..2];
        let s2 = &canonical[2..4];
        parent_dir.join(s1).join(s2).join(&canonical)
    }
}

impl fmt::Display for ShardableUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for ShardableUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShardableUuid::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ShardableUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ShardableUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ShardableUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}
