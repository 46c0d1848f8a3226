//! Collaborator traits defined in `vergo-core` and implemented by other crates.

pub mod audit;
pub mod clock;
pub mod membership;

pub use audit::AuditSink;
pub use clock::{Clock, ManualClock, SystemClock};
pub use membership::MembershipLookup;
