//! Course and lesson records.
//!
//! Plain data carried between the store and the handlers. The only behavior
//! here is the [`Ownable`] capability: a course is owned by its teacher
//! directly, a lesson inherits its course's owner. No field on `Lesson`
//! stores an owner.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Course difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "beginner",
            Level::Intermediate => "intermediate",
            Level::Advanced => "advanced",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Level::Beginner),
            "intermediate" => Some(Level::Intermediate),
            "advanced" => Some(Level::Advanced),
            _ => None,
        }
    }
}

/// A course authored by one teacher.
///
/// `is_free` and `price` are independent fields; nothing forces
/// `price == 0` on free courses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub level: Level,
    pub duration_hours: u32,
    pub price: f64,
    pub is_free: bool,
    pub is_published: bool,
    pub teacher_id: Uuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A lesson inside a course.
///
/// `(course_id, order)` is unique, enforced by the storage layer. The
/// navigator relies on `order` being a strict ordering key within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub video_url: Option<String>,
    pub duration_minutes: u32,
    pub order: u32,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lesson {
    /// Tag-stripped preview of the first 200 characters of the content.
    pub fn content_preview(&self) -> String {
        if self.content.is_empty() {
            return String::new();
        }
        let text = strip_tags(&self.content);
        let preview: String = text.chars().take(200).collect();
        format!("{preview}...")
    }
}

/// Remove HTML tags from rich-text content.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Capability for resources with an owning teacher.
pub trait Ownable {
    fn owner_teacher_id(&self) -> Uuid;
}

impl Ownable for Course {
    fn owner_teacher_id(&self) -> Uuid {
        self.teacher_id
    }
}

/// A resource under access control: a course, or a lesson together with its
/// course. A lesson never appears without its course because both its owner
/// and its visibility derive from it.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Course(&'a Course),
    Lesson {
        lesson: &'a Lesson,
        course: &'a Course,
    },
}

impl Ownable for Resource<'_> {
    fn owner_teacher_id(&self) -> Uuid {
        match self {
            Resource::Course(course) => course.owner_teacher_id(),
            Resource::Lesson { course, .. } => course.owner_teacher_id(),
        }
    }
}
