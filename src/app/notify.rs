use crate::utils::error::Result;

/// Side channel for user-facing notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str) -> Result<()>;
}

/// Emits notifications as log events.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<()> {
        tracing::info!("🔔 {}: {}", title, message);
        Ok(())
    }
}
