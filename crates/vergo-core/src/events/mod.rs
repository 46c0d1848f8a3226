//! Domain events emitted by the identity layer.
//!
//! Events are handed to an [`AuditSink`](crate::traits::AuditSink) on a
//! best-effort basis; the primary operation never depends on delivery.

pub mod audit;

pub use audit::{AuditAction, AuditEvent};
