//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services. Request
//! handling never reads environment variables.

use crate::constants::DEFAULT_STORE_URL;
use crate::{PatientError, PatientResult};
use std::fmt;
use std::path::PathBuf;

/// Which [`PatientStore`](crate::store::PatientStore) backend to open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process-local map; contents are lost on exit.
    Memory,
    /// SQLite database; `url` is handed to sqlx unchanged.
    Sqlite { url: String },
    /// Sharded YAML files under `root`.
    File { root: PathBuf },
}

impl StoreConfig {
    /// Parse a store URL.
    ///
    /// Accepted forms:
    /// - `memory://` (or `memory`, `memory:`)
    /// - any `sqlite:` URL, e.g. `sqlite://patients.db` or `sqlite::memory:`
    /// - `file://<dir>` or `file:<dir>`
    ///
    /// # Errors
    ///
    /// Returns `PatientError::InvalidInput` for unknown schemes or a file URL without a path.
    pub fn from_url(url: &str) -> PatientResult<Self> {
        let url = url.trim();

        if matches!(url, "memory" | "memory:" | "memory://") {
            return Ok(StoreConfig::Memory);
        }

        if url.starts_with("sqlite:") {
            return Ok(StoreConfig::Sqlite {
                url: url.to_string(),
            });
        }

        if let Some(rest) = url
            .strip_prefix("file://")
            .or_else(|| url.strip_prefix("file:"))
        {
            if rest.trim().is_empty() {
                return Err(PatientError::InvalidInput(
                    "file store URL must name a directory".into(),
                ));
            }
            return Ok(StoreConfig::File {
                root: PathBuf::from(rest),
            });
        }

        Err(PatientError::InvalidInput(format!(
            "unsupported store URL '{url}' (expected memory://, sqlite:... or file://...)"
        )))
    }
}

impl fmt::Display for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreConfig::Memory => f.write_str("memory://"),
            StoreConfig::Sqlite { url } => f.write_str(url),
            StoreConfig::File { root } => write!(f, "file://{}", root.display()),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    store: StoreConfig,
}

impl CoreConfig {
    pub fn new(store: StoreConfig) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &StoreConfig {
        &self.store
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(StoreConfig::Memory)
    }
}

/// Parse the store configuration from an optional string value (typically `PATIENT_STORE_URL`).
///
/// If `value` is `None` or empty/whitespace, [`DEFAULT_STORE_URL`] is used.
pub fn store_config_from_env_value(value: Option<String>) -> PatientResult<StoreConfig> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    StoreConfig::from_url(value.as_deref().unwrap_or(DEFAULT_STORE_URL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_memory() {
        assert_eq!(
            store_config_from_env_value(None).unwrap(),
            StoreConfig::Memory
        );
        assert_eq!(
            store_config_from_env_value(Some("   ".into())).unwrap(),
            StoreConfig::Memory
        );
    }

    #[test]
    fn test_parses_sqlite_urls_verbatim() {
        assert_eq!(
            StoreConfig::from_url("sqlite://patients.db").unwrap(),
            StoreConfig::Sqlite {
                url: "sqlite://patients.db".into()
            }
        );
        assert_eq!(
            StoreConfig::from_url("sqlite::memory:").unwrap(),
            StoreConfig::Sqlite {
                url: "sqlite::memory:".into()
            }
        );
    }

    #[test]
    fn test_parses_file_urls() {
        assert_eq!(
            StoreConfig::from_url("file://patient_data").unwrap(),
            StoreConfig::File {
                root: PathBuf::from("patient_data")
            }
        );
        assert_eq!(
            StoreConfig::from_url("file:/var/lib/patreg").unwrap(),
            StoreConfig::File {
                root: PathBuf::from("/var/lib/patreg")
            }
        );
    }

    #[test]
    fn test_rejects_unknown_scheme_and_empty_file_path() {
        assert!(matches!(
            StoreConfig::from_url("postgres://localhost/patients"),
            Err(PatientError::InvalidInput(_))
        ));
        assert!(matches!(
            StoreConfig::from_url("file://"),
            Err(PatientError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for url in ["memory://", "sqlite://patients.db", "file://patient_data"] {
            let cfg = StoreConfig::from_url(url).unwrap();
            assert_eq!(StoreConfig::from_url(&cfg.to_string()).unwrap(), cfg);
        }
    }
}
