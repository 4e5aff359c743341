//! Identity and credential primitives enforced across the gateway domain.

pub mod credential;
pub mod id;

pub use credential::*;
pub use id::*;
