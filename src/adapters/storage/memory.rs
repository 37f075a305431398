use crate::core::{Commission, CommissionBackend, CommissionDraft, CommissionId, Result};
use crate::domain::calendar::{DayKey, TimeReference};

/// Non-durable backend. Records live as long as the value.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    time_reference: TimeReference,
    next_id: i64,
    commissions: Vec<Commission>,
}

impl MemoryBackend {
    pub fn new(time_reference: TimeReference) -> Self {
        Self {
            time_reference,
            next_id: 1,
            commissions: Vec::new(),
        }
    }
}

impl CommissionBackend for MemoryBackend {
    fn time_reference(&self) -> TimeReference {
        self.time_reference
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }

    fn load_day(&self, day: DayKey) -> Result<Vec<Commission>> {
        Ok(self
            .commissions
            .iter()
            .filter(|c| c.date == day)
            .cloned()
            .collect())
    }

    fn insert(&mut self, draft: CommissionDraft) -> Result<Commission> {
        let commission = draft.into_commission(CommissionId(self.next_id));
        self.next_id += 1;
        self.commissions.push(commission.clone());
        Ok(commission)
    }

    fn mark_completed(&mut self, id: CommissionId) -> Result<Option<bool>> {
        Ok(self
            .commissions
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| std::mem::replace(&mut c.completed, true)))
    }

    fn remove(&mut self, id: CommissionId) -> Result<bool> {
        let before = self.commissions.len();
        self.commissions.retain(|c| c.id != id);
        Ok(self.commissions.len() != before)
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}
