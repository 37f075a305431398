pub mod dailies;
pub mod notify;

pub use dailies::{AppSettings, DailiesApp};
pub use notify::{LogNotifier, Notifier};
