//! Capability-based authorization: abilities derived from roles, and
//! per-operation policies evaluated against them.

pub mod ability;
pub mod capability;
pub mod policy;

pub use ability::{Ability, AbilityFactory};
pub use capability::{Action, Subject};
pub use policy::{Policy, PolicyEvaluator, RequestInfo};
