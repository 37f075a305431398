pub mod store;

pub use crate::domain::model::{Commission, CommissionDraft, CommissionId};
pub use crate::domain::ports::CommissionBackend;
pub use crate::utils::error::Result;
