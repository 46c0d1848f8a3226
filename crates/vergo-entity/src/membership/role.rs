//! Organization role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a user can hold within an organization.
///
/// Roles are ordered by rank: Owner > Admin > Member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgRole {
    /// Regular member.
    Member,
    /// Can manage the organization.
    Admin,
    /// Owns the organization.
    Owner,
}

impl OrgRole {
    /// Return the rank (higher = more privileged).
    pub fn rank(&self) -> u8 {
        match self {
            Self::Member => 1,
            Self::Admin => 2,
            Self::Owner => 3,
        }
    }

    /// Check if this role ranks at least as high as `min`.
    pub fn has_at_least(&self, min: &OrgRole) -> bool {
        self.rank() >= min.rank()
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

impl PartialOrd for OrgRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrgRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returned when a stored role string is not one of the known roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown organization role: '{}'. Expected one of: member, admin, owner",
            self.0
        )
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for OrgRole {
    type Err = UnknownRole;

    /// Exact match only; stored roles are always lowercase.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
