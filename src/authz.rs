//! The authorization decision.
//!
//! A pure function gating per-action access. Read actions always pass here;
//! what a caller may *see* is the visibility predicate's concern, applied at
//! the listing/retrieval layer. Evaluation order matters and first match
//! wins, so a coarse failure (not authenticated, not a teacher) is reported
//! before an ownership failure.
//!
//! Lesson creation is a two-stage check: stage one asks whether the
//! principal may create lessons at all ([`authorize`] with
//! [`Action::Create`]), stage two asks whether they may create a lesson in
//! one specific course ([`authorize_lesson_create`]). The caller runs stage
//! two after resolving the payload's course reference.

use crate::error::{Error, Result};
use crate::model::{Course, Ownable, Resource};
use crate::principal::Principal;

/// The API actions subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    List,
    Retrieve,
    Create,
    Update,
    PartialUpdate,
    Destroy,
    NestedLessonsOfCourse,
}

impl Action {
    fn is_read(&self) -> bool {
        matches!(
            self,
            Action::List | Action::Retrieve | Action::NestedLessonsOfCourse
        )
    }
}

/// Why an action was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    NotTeacher,
    NotOwner,
    NotCourseOwner,
}

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    /// Translate the decision into the handler-facing result.
    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotAuthenticated) => Err(Error::NotAuthenticated),
            Decision::Deny(DenyReason::NotTeacher) => Err(Error::NotTeacher),
            Decision::Deny(DenyReason::NotOwner) => Err(Error::NotOwner),
            Decision::Deny(DenyReason::NotCourseOwner) => Err(Error::NotCourseOwner),
        }
    }
}

/// Decide whether `principal` may perform `action`, optionally against a
/// concrete resource.
///
/// `resource` is required for the ownership stage of mutations; passing
/// `None` for a mutation performs only the coarse checks (the caller must
/// re-invoke with the resource once loaded).
pub fn authorize(principal: &Principal, action: Action, resource: Option<Resource<'_>>) -> Decision {
    if action.is_read() {
        return Decision::Allow;
    }

    if action == Action::Create {
        return if principal.is_staff() || principal.teacher_id().is_some() {
            Decision::Allow
        } else {
            Decision::Deny(DenyReason::NotTeacher)
        };
    }

    // Update, PartialUpdate, Destroy
    if !principal.is_authenticated() {
        return Decision::Deny(DenyReason::NotAuthenticated);
    }
    if principal.is_staff() {
        return Decision::Allow;
    }
    let Some(teacher_id) = principal.teacher_id() else {
        return Decision::Deny(DenyReason::NotTeacher);
    };
    match resource {
        Some(resource) if resource.owner_teacher_id() != teacher_id => {
            Decision::Deny(DenyReason::NotOwner)
        }
        _ => Decision::Allow,
    }
}

/// Stage two of lesson creation: may `principal` add a lesson to this
/// specific course? Assumes stage one ([`Action::Create`]) already passed.
pub fn authorize_lesson_create(principal: &Principal, target: &Course) -> Decision {
    if principal.is_staff() {
        return Decision::Allow;
    }
    if principal.teacher_id() == Some(target.owner_teacher_id()) {
        Decision::Allow
    } else {
        Decision::Deny(DenyReason::NotCourseOwner)
    }
}
