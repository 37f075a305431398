use crate::app::notify::Notifier;
use crate::core::store::CommissionStore;
use crate::core::{Commission, CommissionBackend, CommissionId, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub locale: String,
    /// 啟動時由外層解析一次後注入
    pub dev_mode: bool,
    pub notifications: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            dev_mode: false,
            notifications: true,
        }
    }
}

/// Presentation-facing entry point. Forwards user actions to the store and
/// keeps locale, dev mode and notifications away from it.
pub struct DailiesApp<B: CommissionBackend, N: Notifier> {
    store: CommissionStore<B>,
    notifier: N,
    settings: AppSettings,
}

impl<B: CommissionBackend, N: Notifier> DailiesApp<B, N> {
    pub fn new(store: CommissionStore<B>, notifier: N, settings: AppSettings) -> Self {
        Self {
            store,
            notifier,
            settings,
        }
    }

    pub fn store(&self) -> &CommissionStore<B> {
        &self.store
    }

    /// Storage failures are logged and shown as an empty day.
    pub fn load_commissions(&self, date_ms: i64) -> Vec<Commission> {
        match self.store.load_for_date(date_ms) {
            Ok(commissions) => {
                tracing::debug!("Loaded dailies: {:?}", commissions);
                commissions
            }
            Err(e) => {
                tracing::error!("Error loading dailies: {} ({:?})", e, e.category());
                Vec::new()
            }
        }
    }

    pub fn create_task(&self, description: &str, realm: &str, rewards_json: &str) -> Result<Commission> {
        self.store.create(description, realm, rewards_json)
    }

    pub fn create_task_at(
        &self,
        description: &str,
        realm: &str,
        rewards_json: &str,
        created_at_ms: i64,
    ) -> Result<Commission> {
        self.store
            .create_at(description, realm, rewards_json, created_at_ms)
    }

    /// Completes the commission and announces it when notifications are on.
    pub fn complete_task(&self, id: CommissionId) -> Result<()> {
        self.store.complete(id)?;
        if self.settings.notifications {
            self.notify("Commission completed", &format!("Commission {} is done", id));
        }
        Ok(())
    }

    /// Same as [`complete_task`](Self::complete_task) but names the rewards
    /// in the notification.
    pub fn complete_commission(&self, commission: &Commission) -> Result<()> {
        self.store.complete(commission.id)?;
        if self.settings.notifications {
            let message = if commission.rewards.is_empty() {
                commission.description.clone()
            } else {
                format!("{}: {}", commission.description, commission.rewards.summary())
            };
            self.notify("Commission completed", &message);
        }
        Ok(())
    }

    pub fn delete_task(&self, id: CommissionId) -> Result<()> {
        self.store.delete(id)
    }

    pub fn is_dev(&self) -> bool {
        self.settings.dev_mode
    }

    pub fn locale(&self) -> &str {
        &self.settings.locale
    }

    /// Notification failures never reach the caller.
    pub fn notify(&self, title: &str, message: &str) {
        if let Err(e) = self.notifier.notify(title, message) {
            tracing::warn!("Error notifying: {}", e);
        }
    }

    pub fn shutdown(self) -> Result<()> {
        self.store.close()
    }
}
