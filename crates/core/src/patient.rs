//! Patient service.
//!
//! [`PatientService`] owns the domain rules of the registry: validation before anything is
//! persisted, care-team assignment at registration, demographic-only updates and the deletion
//! gate. Persistence is delegated to whichever [`PatientStore`] the service was built with.

use std::sync::Arc;

use crate::config::CoreConfig;
use crate::error::{PatientError, PatientResult};
use crate::record::{DemographicsDraft, PatientDraft, PatientRecord};
use crate::store::{open_store, PatientStore};
use patreg_uuid::ShardableUuid;

/// Pure patient data operations - no API concerns
#[derive(Clone, Debug)]
pub struct PatientService {
    store: Arc<dyn PatientStore>,
}

impl PatientService {
    pub fn new(store: Arc<dyn PatientStore>) -> Self {
        Self { store }
    }

    /// Opens the store described by `cfg` and wraps it in a service.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::Storage`] if the backend cannot be opened (unreachable database,
    /// failed migration, unwritable directory).
    pub async fn from_config(cfg: &CoreConfig) -> PatientResult<Self> {
        let store = open_store(cfg.store()).await?;
        Ok(Self::new(store))
    }

    /// Every registered patient. Order is whatever the backend yields.
    pub async fn list(&self) -> PatientResult<Vec<PatientRecord>> {
        Ok(self.store.list().await?)
    }

    /// Fetches one patient.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if no record has this identifier.
    pub async fn get(&self, id: &ShardableUuid) -> PatientResult<PatientRecord> {
        self.store
            .get(id)
            .await?
            .ok_or(PatientError::NotFound(*id))
    }

    /// Registers a new patient.
    ///
    /// The demographics are validated first; if any field fails, every failing field is reported
    /// and nothing is written. Otherwise a fresh identifier is issued and, when an admitting
    /// diagnosis is given, the attending physician and department are derived from it.
    ///
    /// # Arguments
    ///
    /// * `draft` - Raw demographics plus the optional admitting diagnosis.
    ///
    /// # Returns
    ///
    /// The fully materialised record as stored.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - validation fails ([`PatientError::Validation`]),
    /// - the store rejects the insert ([`PatientError::Storage`]).
    pub async fn register(&self, draft: PatientDraft) -> PatientResult<PatientRecord> {
        let demographics = draft.demographics.validate()?;
        let record = PatientRecord::register(demographics, draft.admitting_diagnosis);

        self.store.insert(&record).await?;

        tracing::info!(
            "registered patient {} (diagnosis: {})",
            record.id(),
            record
                .admitting_diagnosis()
                .map_or("none", |diagnosis| diagnosis.name())
        );
        Ok(record)
    }

    /// Replaces the demographics of an existing patient.
    ///
    /// Identifier, diagnosis, physician and department are carried over untouched. The patch is
    /// validated before the record is looked up.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - the patch is invalid ([`PatientError::Validation`]),
    /// - the record does not exist, or vanished before the write ([`PatientError::NotFound`]),
    /// - the store fails ([`PatientError::Storage`]).
    pub async fn update_demographics(
        &self,
        id: &ShardableUuid,
        patch: DemographicsDraft,
    ) -> PatientResult<PatientRecord> {
        let demographics = patch.validate()?;
        let updated = self.get(id).await?.with_demographics(demographics);

        if !self.store.update(&updated).await? {
            return Err(PatientError::NotFound(*id));
        }

        tracing::info!("updated demographics for patient {}", id);
        Ok(updated)
    }

    /// Deletes a patient whose admitting diagnosis is absent or `Unspecified`.
    ///
    /// # Errors
    ///
    /// Returns a `PatientError` if:
    /// - the record does not exist ([`PatientError::NotFound`]),
    /// - the record carries any other diagnosis ([`PatientError::DeletionNotPermitted`]),
    /// - the store fails ([`PatientError::Storage`]).
    pub async fn delete(&self, id: &ShardableUuid) -> PatientResult<()> {
        let record = self.get(id).await?;

        if let Some(diagnosis) = record.deletion_blocker() {
            tracing::warn!(
                "refusing to delete patient {} with diagnosis {}",
                id,
                diagnosis
            );
            return Err(PatientError::DeletionNotPermitted { id: *id, diagnosis });
        }

        // A concurrent delete may already have removed it.
        if self.store.remove(id).await? {
            tracing::info!("deleted patient {}", id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::validation::{FIELD_AGE, FIELD_CONTACTS, FIELD_NAME};
    use crate::{FileStore, SqliteStore, StoreConfig};
    use patreg_types::Diagnosis;
    use std::collections::HashSet;

    fn alice(diagnosis: Option<Diagnosis>) -> PatientDraft {
        PatientDraft {
            demographics: alice_demographics(),
            admitting_diagnosis: diagnosis,
        }
    }

    fn alice_demographics() -> DemographicsDraft {
        DemographicsDraft {
            name: Some("Alice Smith".into()),
            medical_record_number: Some("MRN1".into()),
            age: Some(40),
            gender: Some("F".into()),
            contacts: vec!["555-0100".into()],
        }
    }

    fn memory_service() -> PatientService {
        PatientService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_scenario_breast_cancer_goes_to_department_j() {
        let service = memory_service();

        let record = service
            .register(alice(Some(Diagnosis::BreastCancer)))
            .await
            .expect("register should succeed");

        assert_eq!(record.attending_physician(), Some("Dr. Susan Jones"));
        assert_eq!(record.department(), Some("Department J"));
        assert_eq!(record.demographics().name.as_str(), "Alice Smith");
        assert_eq!(record.demographics().contacts, vec!["555-0100".to_string()]);
    }

    #[tokio::test]
    async fn test_scenario_unspecified_goes_to_department_s_and_is_deletable() {
        let service = memory_service();

        let record = service
            .register(alice(Some(Diagnosis::Unspecified)))
            .await
            .unwrap();
        assert_eq!(record.attending_physician(), Some("Dr. Ben Smith"));
        assert_eq!(record.department(), Some("Department S"));

        service.delete(record.id()).await.expect("delete should succeed");

        let err = service.get(record.id()).await.unwrap_err();
        assert!(matches!(err, PatientError::NotFound(id) if id == *record.id()));
    }

    #[tokio::test]
    async fn test_scenario_lung_cancer_blocks_deletion() {
        let service = memory_service();
        let record = service
            .register(alice(Some(Diagnosis::LungCancer)))
            .await
            .unwrap();

        let err = service.delete(record.id()).await.unwrap_err();
        assert!(matches!(
            err,
            PatientError::DeletionNotPermitted {
                diagnosis: Diagnosis::LungCancer,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Cannot delete a patient with an assigned diagnosis other than Unspecified."
        );

        assert_eq!(service.get(record.id()).await.unwrap(), record);
    }

    #[tokio::test]
    async fn test_scenario_age_out_of_range_creates_nothing() {
        let service = memory_service();
        let before = service.list().await.unwrap();

        let mut draft = alice(None);
        draft.demographics.age = Some(150);
        let err = service.register(draft).await.unwrap_err();

        match err {
            PatientError::Validation(errors) => {
                assert!(errors.contains(FIELD_AGE));
                assert_eq!(
                    errors.get(FIELD_AGE),
                    Some(&["Age must be between 0 and 120.".to_string()][..])
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(service.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_register_reports_every_failing_field() {
        let service = memory_service();
        let draft = PatientDraft {
            demographics: DemographicsDraft {
                name: Some("A".into()),
                age: Some(40),
                ..Default::default()
            },
            admitting_diagnosis: None,
        };

        let PatientError::Validation(errors) = service.register(draft).await.unwrap_err() else {
            panic!("expected validation error");
        };
        assert!(errors.contains(FIELD_NAME));
        assert!(errors.contains(FIELD_CONTACTS));
        assert!(!errors.contains(FIELD_AGE));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_without_diagnosis_has_no_care_team() {
        let service = memory_service();
        let record = service.register(alice(None)).await.unwrap();

        assert_eq!(record.admitting_diagnosis(), None);
        assert_eq!(record.attending_physician(), None);
        assert_eq!(record.department(), None);

        service.delete(record.id()).await.expect("no diagnosis is deletable");
    }

    #[tokio::test]
    async fn test_identifiers_are_unique() {
        let service = memory_service();
        let mut ids = HashSet::new();
        for _ in 0..50 {
            let record = service.register(alice(None)).await.unwrap();
            assert!(ids.insert(*record.id()));
        }
        assert_eq!(service.list().await.unwrap().len(), 50);
    }

    #[tokio::test]
    async fn test_assignment_is_deterministic_for_every_diagnosis() {
        let service = memory_service();
        for diagnosis in Diagnosis::ALL {
            let first = service.register(alice(Some(diagnosis))).await.unwrap();
            let second = service.register(alice(Some(diagnosis))).await.unwrap();

            assert_eq!(first.attending_physician(), second.attending_physician());
            assert_eq!(first.department(), second.department());
            assert_ne!(first.id(), second.id());
        }
    }

    #[tokio::test]
    async fn test_update_changes_only_demographics() {
        let service = memory_service();
        let original = service
            .register(alice(Some(Diagnosis::BreastCancer)))
            .await
            .unwrap();

        let patch = DemographicsDraft {
            name: Some("Alice Jones".into()),
            age: Some(41),
            contacts: vec!["555-0199".into(), "alice@example.com".into()],
            ..alice_demographics()
        };
        let updated = service
            .update_demographics(original.id(), patch)
            .await
            .expect("update should succeed");

        assert_eq!(updated.id(), original.id());
        assert_eq!(updated.admitting_diagnosis(), Some(Diagnosis::BreastCancer));
        assert_eq!(updated.attending_physician(), Some("Dr. Susan Jones"));
        assert_eq!(updated.department(), Some("Department J"));
        assert_eq!(updated.demographics().name.as_str(), "Alice Jones");
        assert_eq!(updated.demographics().age, 41);
        assert_eq!(updated.demographics().contacts.len(), 2);

        assert_eq!(service.get(original.id()).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_invalid_update_leaves_record_untouched() {
        let service = memory_service();
        let original = service.register(alice(None)).await.unwrap();

        let patch = DemographicsDraft {
            contacts: Vec::new(),
            ..alice_demographics()
        };
        let err = service
            .update_demographics(original.id(), patch)
            .await
            .unwrap_err();

        assert!(matches!(err, PatientError::Validation(ref e) if e.contains(FIELD_CONTACTS)));
        assert_eq!(service.get(original.id()).await.unwrap(), original);
    }

    #[tokio::test]
    async fn test_invalid_update_for_missing_patient_reports_validation() {
        let service = memory_service();
        let patch = DemographicsDraft {
            age: Some(-1),
            ..alice_demographics()
        };

        let err = service
            .update_demographics(&ShardableUuid::new(), patch)
            .await
            .unwrap_err();
        assert!(matches!(err, PatientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_patient_is_not_found_everywhere() {
        let service = memory_service();
        let id = ShardableUuid::new();

        let get = service.get(&id).await.unwrap_err();
        let update = service
            .update_demographics(&id, alice_demographics())
            .await
            .unwrap_err();
        let delete = service.delete(&id).await.unwrap_err();

        for err in [get, update, delete] {
            assert!(matches!(err, PatientError::NotFound(missing) if missing == id));
        }
        assert_eq!(
            PatientError::NotFound(id).to_string(),
            format!("Patient with ID {id} not found.")
        );
    }

    #[tokio::test]
    async fn test_every_assigned_diagnosis_blocks_deletion() {
        let service = memory_service();

        for diagnosis in Diagnosis::ALL {
            let record = service.register(alice(Some(diagnosis))).await.unwrap();
            let result = service.delete(record.id()).await;

            if diagnosis == Diagnosis::Unspecified {
                result.expect("Unspecified should be deletable");
                assert!(matches!(
                    service.get(record.id()).await,
                    Err(PatientError::NotFound(_))
                ));
            } else {
                let err = result.expect_err("diagnosed patient should not be deletable");
                assert!(matches!(
                    err,
                    PatientError::DeletionNotPermitted { diagnosis: d, .. } if d == diagnosis
                ));
                assert_eq!(service.get(record.id()).await.unwrap(), record);
            }
        }
    }

    #[tokio::test]
    async fn test_deleted_patient_is_not_found_everywhere() {
        let service = memory_service();
        let record = service.register(alice(None)).await.unwrap();
        let id = *record.id();
        service.delete(&id).await.unwrap();

        let get = service.get(&id).await.unwrap_err();
        let update = service
            .update_demographics(&id, alice_demographics())
            .await
            .unwrap_err();
        let delete = service.delete(&id).await.unwrap_err();

        for err in [get, update, delete] {
            assert!(matches!(err, PatientError::NotFound(missing) if missing == id));
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_racing_delete_reports_not_found() {
        #[derive(Debug, Default)]
        struct VanishingStore(MemoryStore);

        #[async_trait::async_trait]
        impl PatientStore for VanishingStore {
            async fn insert(&self, record: &PatientRecord) -> crate::StoreResult<()> {
                self.0.insert(record).await
            }
            async fn get(&self, id: &ShardableUuid) -> crate::StoreResult<Option<PatientRecord>> {
                self.0.get(id).await
            }
            async fn list(&self) -> crate::StoreResult<Vec<PatientRecord>> {
                self.0.list().await
            }
            async fn update(&self, record: &PatientRecord) -> crate::StoreResult<bool> {
                self.0.remove(record.id()).await?;
                self.0.update(record).await
            }
            async fn remove(&self, id: &ShardableUuid) -> crate::StoreResult<bool> {
                self.0.remove(id).await
            }
        }

        let service = PatientService::new(Arc::new(VanishingStore::default()));
        let record = service.register(alice(None)).await.unwrap();

        let err = service
            .update_demographics(record.id(), alice_demographics())
            .await
            .unwrap_err();
        assert!(matches!(err, PatientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lifecycle_on_every_backend() {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let services = [
            memory_service(),
            PatientService::new(Arc::new(SqliteStore::connect("sqlite::memory:").await.unwrap())),
            PatientService::new(Arc::new(FileStore::open(temp_dir.path()).await.unwrap())),
        ];

        for service in services {
            let kept = service
                .register(alice(Some(Diagnosis::Lymphoma)))
                .await
                .unwrap();
            let removable = service
                .register(alice(Some(Diagnosis::Unspecified)))
                .await
                .unwrap();

            service
                .update_demographics(
                    kept.id(),
                    DemographicsDraft {
                        gender: Some("Female".into()),
                        ..alice_demographics()
                    },
                )
                .await
                .unwrap();

            assert!(service.delete(kept.id()).await.is_err());
            service.delete(removable.id()).await.unwrap();

            let remaining = service.list().await.unwrap();
            assert_eq!(remaining.len(), 1);
            assert_eq!(remaining[0].id(), kept.id());
            assert_eq!(remaining[0].demographics().gender.as_str(), "Female");
            assert_eq!(remaining[0].department(), Some("Department S"));
        }
    }

    #[tokio::test]
    async fn test_from_config_opens_memory_store() {
        let service = PatientService::from_config(&CoreConfig::new(StoreConfig::Memory))
            .await
            .unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}
