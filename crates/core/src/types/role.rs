//! User role enumeration.
//!
//! The source schema stored roles as free-form strings compared via literals.
//! Here the role set is a closed enum so dispatch on a user's role is checked
//! exhaustively at compile time.

use serde::{Deserialize, Serialize};

/// Role of a Vistapro user.
///
/// `admin_id`/`super_admin_id` parent pointers only ever connect a Marketer
/// to an Admin or SuperAdmin, and an Admin to a SuperAdmin. MasterAdmin sits
/// above the whole hierarchy without a pointer; Dealers participate in sales
/// but never in the reporting hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Records sales; leaf of the hierarchy.
    Marketer,
    /// Manages a team of Marketers.
    Admin,
    /// Manages Admins and directly-assigned Marketers.
    SuperAdmin,
    /// Sees everything; no parent pointer, never a resolver root.
    MasterAdmin,
    /// Fulfils device orders; outside the reporting hierarchy.
    Dealer,
}

impl Role {
    /// Whether a user with this role may act as the root of a subordinate
    /// scope resolution.
    #[must_use]
    pub const fn is_reporting_root(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Marketer => write!(f, "marketer"),
            Self::Admin => write!(f, "admin"),
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::MasterAdmin => write!(f, "master_admin"),
            Self::Dealer => write!(f, "dealer"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "marketer" => Ok(Self::Marketer),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            "master_admin" => Ok(Self::MasterAdmin),
            "dealer" => Ok(Self::Dealer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
