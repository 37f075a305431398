use crate::domain::calendar::{DayKey, TimeReference};
use crate::domain::model::{Commission, CommissionDraft, CommissionId};
use crate::utils::error::Result;

/// Persistence backing for the commission store.
///
/// Implementations own their resource (file, database handle) from
/// construction until [`CommissionBackend::close`] or drop. A failed
/// mutation must leave previously committed records untouched.
pub trait CommissionBackend: Send {
    /// Day convention the persisted day keys were computed with.
    fn time_reference(&self) -> TimeReference;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;

    /// Commissions of `day`, ascending by id.
    fn load_day(&self, day: DayKey) -> Result<Vec<Commission>>;

    /// Persists the draft under a freshly allocated id. Ids are never
    /// handed out twice, even after the record is removed.
    fn insert(&mut self, draft: CommissionDraft) -> Result<Commission>;

    /// `None` when absent, otherwise whether it was already completed.
    fn mark_completed(&mut self, id: CommissionId) -> Result<Option<bool>>;

    /// `false` when absent.
    fn remove(&mut self, id: CommissionId) -> Result<bool>;

    fn close(self) -> Result<()>
    where
        Self: Sized;
}
