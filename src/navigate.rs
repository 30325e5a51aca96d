//! Adjacent-lesson navigation.
//!
//! Computes the previous/next pointers shown on a lesson detail page.
//! Candidates come from the same course and are filtered through the
//! visibility predicate first, so a student never receives a pointer to an
//! unpublished sibling even if one sits numerically between two visible
//! lessons.

use serde::Serialize;
use uuid::Uuid;

use crate::model::{Course, Lesson, Resource};
use crate::principal::Principal;
use crate::visibility::is_visible;

/// Reduced projection of a neighboring lesson: just enough to render a
/// navigation link, never the full record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonLink {
    pub id: Uuid,
    pub title: String,
    pub order: u32,
    pub href: String,
}

impl LessonLink {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            order: lesson.order,
            href: format!("/api/lessons/{}", lesson.id),
        }
    }
}

/// The nearest visible siblings of a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Neighbors {
    pub previous: Option<LessonLink>,
    pub next: Option<LessonLink>,
}

/// Resolve the nearest visible previous/next lessons of `lesson` within
/// `course`, for `principal`.
///
/// Previous: maximum `order` below the current one, ties broken by latest
/// `created_at`. Next: minimum `order` above, ties broken by earliest
/// `created_at`. `siblings` may include the lesson itself and lessons from
/// other courses; both are ignored.
pub fn navigate(
    lesson: &Lesson,
    course: &Course,
    siblings: &[Lesson],
    principal: &Principal,
) -> Neighbors {
    let visible = |candidate: &&Lesson| {
        candidate.course_id == lesson.course_id
            && is_visible(principal, Resource::Lesson {
                lesson: candidate,
                course,
            })
    };

    let previous = siblings
        .iter()
        .filter(visible)
        .filter(|candidate| candidate.order < lesson.order)
        .max_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
        });

    let next = siblings
        .iter()
        .filter(visible)
        .filter(|candidate| candidate.order > lesson.order)
        .min_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
        });

    Neighbors {
        previous: previous.map(LessonLink::from),
        next: next.map(LessonLink::from),
    }
}
