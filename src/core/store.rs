use crate::core::{CommissionBackend, Result};
use crate::domain::calendar::TimeReference;
use crate::domain::model::{Commission, CommissionDraft, CommissionId};
use crate::domain::rewards::Rewards;
use crate::utils::error::DailiesError;
use crate::utils::validation::required_text;
use std::sync::{Mutex, MutexGuard};

/// Owns the canonical commission records.
///
/// Every operation holds the backend lock for its full duration, so
/// mutations are serialized and a reader never sees a half-applied change.
/// Callers only ever receive owned copies.
pub struct CommissionStore<B: CommissionBackend> {
    backend: Mutex<B>,
    time_reference: TimeReference,
    location: String,
}

impl<B: CommissionBackend> CommissionStore<B> {
    pub fn open(backend: B) -> Self {
        let time_reference = backend.time_reference();
        let location = backend.describe();
        tracing::info!(
            "Commission store opened on {} (days in {} time)",
            location,
            time_reference
        );
        Self {
            backend: Mutex::new(backend),
            time_reference,
            location,
        }
    }

    pub fn time_reference(&self) -> TimeReference {
        self.time_reference
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// All commissions on the calendar day containing `date_ms`, ascending
    /// by id (which is creation order).
    pub fn load_for_date(&self, date_ms: i64) -> Result<Vec<Commission>> {
        let day = self.time_reference.day_key(date_ms)?;
        let backend = self.lock()?;
        let mut commissions = backend.load_day(day)?;
        commissions.sort_by_key(|c| c.id);
        tracing::debug!("Loaded {} commissions for {}", commissions.len(), day);
        Ok(commissions)
    }

    pub fn create(&self, description: &str, realm: &str, rewards_payload: &str) -> Result<Commission> {
        let now_ms = chrono::Utc::now().timestamp_millis();
        self.create_at(description, realm, rewards_payload, now_ms)
    }

    pub fn create_at(
        &self,
        description: &str,
        realm: &str,
        rewards_payload: &str,
        created_at_ms: i64,
    ) -> Result<Commission> {
        // 先完成所有驗證，失敗時不碰 backend
        let draft = CommissionDraft {
            description: required_text("description", description)?,
            realm: required_text("realm", realm)?,
            rewards: Rewards::parse(rewards_payload)?,
            date: self.time_reference.day_key(created_at_ms)?,
            created_at_ms,
        };

        let mut backend = self.lock()?;
        let commission = backend.insert(draft)?;
        tracing::info!(
            "Created commission {} on {} in realm {}",
            commission.id,
            commission.date,
            commission.realm
        );
        Ok(commission)
    }

    /// Marks the commission completed. Completing twice is a no-op.
    pub fn complete(&self, id: CommissionId) -> Result<()> {
        let mut backend = self.lock()?;
        match backend.mark_completed(id)? {
            Some(true) => {
                tracing::debug!("Commission {} was already completed", id);
                Ok(())
            }
            Some(false) => {
                tracing::info!("Completed commission {}", id);
                Ok(())
            }
            None => Err(DailiesError::NotFoundError { id }),
        }
    }

    pub fn delete(&self, id: CommissionId) -> Result<()> {
        let mut backend = self.lock()?;
        if backend.remove(id)? {
            tracing::info!("Deleted commission {}", id);
            Ok(())
        } else {
            Err(DailiesError::NotFoundError { id })
        }
    }

    /// Releases the backing resource, reporting any final flush error.
    pub fn close(self) -> Result<()> {
        let backend = self
            .backend
            .into_inner()
            .map_err(|e| DailiesError::storage(format!("store lock poisoned: {}", e)))?;
        backend.close()?;
        tracing::info!("Commission store on {} closed", self.location);
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, B>> {
        self.backend
            .lock()
            .map_err(|e| DailiesError::storage(format!("store lock poisoned: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::memory::MemoryBackend;
    use crate::utils::error::ErrorCategory;
    use chrono::{TimeZone, Utc};

    fn store() -> CommissionStore<MemoryBackend> {
        CommissionStore::open(MemoryBackend::new(TimeReference::Utc))
    }

    fn at(d: u32, h: u32, m: u32) -> i64 {
        Utc.with_ymd_and_hms(2024, 5, d, h, m, 0)
            .unwrap()
            .timestamp_millis()
    }

    #[test]
    fn test_create_then_load_returns_single_record() {
        let store = store();
        let created = store
            .create_at("  Deliver 5 ore ", "Bastion", r#"{"gold":100,"xp":50}"#, at(1, 10, 0))
            .unwrap();

        assert_eq!(created.description, "Deliver 5 ore");
        assert!(!created.completed);

        let loaded = store.load_for_date(at(1, 10, 0)).unwrap();
        assert_eq!(loaded, vec![created]);
    }

    #[test]
    fn test_validation_failure_does_not_mutate() {
        let store = store();

        for (description, realm, rewards) in [
            ("", "Bastion", "{}"),
            ("Deliver", "  ", "{}"),
            ("Deliver", "Bastion", "{not json"),
        ] {
            let err = store
                .create_at(description, realm, rewards, at(1, 9, 0))
                .unwrap_err();
            assert_eq!(err.category(), ErrorCategory::Validation);
        }

        assert!(store.load_for_date(at(1, 9, 0)).unwrap().is_empty());

        // 失敗的建立不會消耗 id
        let first = store.create_at("Deliver", "Bastion", "{}", at(1, 9, 0)).unwrap();
        assert_eq!(first.id, CommissionId(1));
    }

    #[test]
    fn test_complete_is_idempotent() {
        let store = store();
        let c = store.create_at("Patrol", "Bastion", "[]", at(2, 8, 0)).unwrap();

        store.complete(c.id).unwrap();
        store.complete(c.id).unwrap();

        let loaded = store.load_for_date(at(2, 20, 0)).unwrap();
        assert!(loaded[0].completed);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let store = store();
        let c = store.create_at("Patrol", "Bastion", "[]", at(2, 8, 0)).unwrap();

        let missing = CommissionId(c.id.0 + 100);
        assert!(matches!(
            store.complete(missing),
            Err(DailiesError::NotFoundError { id }) if id == missing
        ));
        assert!(matches!(
            store.delete(missing),
            Err(DailiesError::NotFoundError { .. })
        ));

        let loaded = store.load_for_date(at(2, 8, 0)).unwrap();
        assert_eq!(loaded, vec![c]);
    }

    #[test]
    fn test_deleted_id_is_gone_and_not_reused() {
        let store = store();
        let first = store.create_at("One", "Bastion", "{}", at(3, 8, 0)).unwrap();
        store.delete(first.id).unwrap();

        assert!(store.load_for_date(at(3, 8, 0)).unwrap().is_empty());
        assert!(store.complete(first.id).is_err());
        assert!(store.delete(first.id).is_err());

        let second = store.create_at("Two", "Bastion", "{}", at(3, 8, 0)).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_poisoned_lock_is_a_storage_error() {
        let store = store();
        store.create_at("One", "Bastion", "{}", at(3, 8, 0)).unwrap();

        let crashed = std::thread::scope(|s| {
            s.spawn(|| {
                let _guard = store.lock().unwrap();
                panic!("writer crashed while holding the lock");
            })
            .join()
        });
        assert!(crashed.is_err());

        let err = store.load_for_date(at(3, 8, 0)).unwrap_err();
        assert!(matches!(err, DailiesError::StorageError { .. }));
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert!(store.create_at("Two", "Bastion", "{}", at(3, 8, 0)).is_err());
        assert!(store.close().is_err());
    }

    #[test]
    fn test_close_releases_backend() {
        let store = store();
        store.create_at("One", "Bastion", "{}", at(3, 8, 0)).unwrap();
        assert!(store.close().is_ok());
    }
}
