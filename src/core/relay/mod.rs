//! Side-effect relay
//!
//! Completes billing provisioning and event emission for patients whose
//! creation left them pending.

pub mod report;
pub mod worker;

pub use report::{RelayFailure, RelayReport};
pub use worker::SideEffectRelay;
