//! The visibility predicate.
//!
//! One pure function decides whether a principal may see a resource. It is
//! applied to every candidate when filtering listings, and in single-object
//! retrieval it decides whether a hidden resource is masked as not-found.
//! It deliberately knows nothing about actions; mutation rights live in
//! [`crate::authz`].

use crate::model::{Course, Lesson, Ownable, Resource};
use crate::principal::Principal;

/// Whether `principal` may see `resource`.
///
/// Staff sees everything. A course is visible when published, or to the
/// teacher who owns it. A lesson is visible when both it and its course are
/// published, or to the teacher who owns the course. Anonymous and student
/// principals never see unpublished content.
pub fn is_visible(principal: &Principal, resource: Resource<'_>) -> bool {
    if principal.is_staff() {
        return true;
    }

    let published = match resource {
        Resource::Course(course) => course.is_published,
        Resource::Lesson { lesson, course } => lesson.is_published && course.is_published,
    };

    published || principal.teacher_id() == Some(resource.owner_teacher_id())
}

/// Filter a course listing down to what `principal` may see, preserving
/// the input order.
pub fn visible_courses<'a, I>(principal: &Principal, courses: I) -> Vec<&'a Course>
where
    I: IntoIterator<Item = &'a Course>,
{
    courses
        .into_iter()
        .filter(|course| is_visible(principal, Resource::Course(course)))
        .collect()
}

/// Filter lessons (each paired with its course) down to what `principal`
/// may see, preserving the input order.
pub fn visible_lessons<'a, I>(principal: &Principal, lessons: I) -> Vec<&'a Lesson>
where
    I: IntoIterator<Item = (&'a Lesson, &'a Course)>,
{
    lessons
        .into_iter()
        .filter(|(lesson, course)| is_visible(principal, Resource::Lesson { lesson, course }))
        .map(|(lesson, _)| lesson)
        .collect()
}
