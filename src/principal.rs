//! The actor behind a request.
//!
//! Every handler resolves the caller to a [`Principal`] exactly once (from
//! the bearer token, or `Anonymous` when none is present) and threads it
//! through the visibility and authorization checks. Staff bypasses all
//! ownership checks by definition.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role claim carried in tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Staff,
}

/// The authenticated or anonymous actor making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Student { id: Uuid },
    Teacher { id: Uuid },
    Staff { id: Uuid },
}

impl Principal {
    /// Build a principal from a verified token's subject and role claim.
    pub fn from_claims(id: Uuid, role: Role) -> Self {
        match role {
            Role::Student => Principal::Student { id },
            Role::Teacher => Principal::Teacher { id },
            Role::Staff => Principal::Staff { id },
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, Principal::Anonymous)
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, Principal::Staff { .. })
    }

    /// The principal's identifier, absent for `Anonymous`.
    pub fn id(&self) -> Option<Uuid> {
        match self {
            Principal::Anonymous => None,
            Principal::Student { id } | Principal::Teacher { id } | Principal::Staff { id } => {
                Some(*id)
            }
        }
    }

    /// The id under which this principal may own courses.
    ///
    /// Only teachers own courses; staff mutate anything but do not own, and
    /// this deliberately returns `None` for them so ownership comparisons
    /// stay separate from the staff bypass.
    pub fn teacher_id(&self) -> Option<Uuid> {
        match self {
            Principal::Teacher { id } => Some(*id),
            _ => None,
        }
    }
}
