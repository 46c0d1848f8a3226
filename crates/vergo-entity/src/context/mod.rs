//! Per-user tenancy context.

pub mod model;

pub use model::ActiveOrg;
