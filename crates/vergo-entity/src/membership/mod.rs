//! Organization membership entities.

pub mod model;
pub mod role;

pub use model::Membership;
pub use role::OrgRole;
