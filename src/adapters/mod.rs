// Adapters layer: concrete persistence backends behind the CommissionBackend port.

pub mod storage;
