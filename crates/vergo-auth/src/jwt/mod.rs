//! JWT issuance and verification.
//!
//! Access and refresh tokens are signed with different HS256 secrets, so a
//! token of one kind never verifies as the other.

pub mod claims;
pub mod decoder;
pub mod encoder;

pub use claims::{Claims, TokenKind};
pub use decoder::JwtDecoder;
pub use encoder::{IssuedRefresh, JwtEncoder, TokenPair};
