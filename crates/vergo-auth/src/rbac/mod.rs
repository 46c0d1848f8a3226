//! Organization role enforcement.

pub mod enforcer;

pub use enforcer::RbacEnforcer;
