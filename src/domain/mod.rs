// Domain layer: commission model, day keys, rewards and the persistence port.
// Depends only on std, serde and chrono.

pub mod calendar;
pub mod model;
pub mod ports;
pub mod rewards;
