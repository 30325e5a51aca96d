//! Course API module.
//!
//! Listings apply the visibility predicate per candidate, so drafts show up
//! only for their owner and for staff. Single-object retrieval masks hidden
//! courses as not-found in both representations. The nested lessons
//! endpoint mirrors the public course page: published lessons only, for
//! everyone.

use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authz::{self, Action};
use crate::error::{Error, Result};
use crate::lessons::LessonOut;
use crate::model::{Course, Lesson, Level, Resource};
use crate::module::Module;
use crate::render::{self, Representation};
use crate::response::{self, HttpResponse};
use crate::router::{Context, Router};
use crate::store;
use crate::visibility::is_visible;

/// Serialized course with its visible lessons embedded.
///
/// `lesson_count` counts every lesson of the course; `lessons` holds only
/// the ones the caller may see.
#[derive(Debug, Serialize)]
pub struct CourseOut {
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
    pub lessons: Vec<LessonOut>,
    pub lesson_count: u64,
}

impl CourseOut {
    pub fn build(course: &Course, visible_lessons: &[&Lesson], lesson_count: u64) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            short_description: course.short_description.clone(),
            level: course.level,
            duration_hours: course.duration_hours,
            price: course.price,
            is_free: course.is_free,
            is_published: course.is_published,
            teacher_id: course.teacher_id,
            created_at: course.created_at,
            updated_at: course.updated_at,
            lessons: visible_lessons.iter().map(|l| LessonOut::from(l)).collect(),
            lesson_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CourseCreate {
    title: String,
    description: String,
    #[serde(default)]
    short_description: String,
    level: Level,
    duration_hours: u32,
    price: f64,
    #[serde(default)]
    is_free: bool,
    #[serde(default)]
    is_published: bool,
}

#[derive(Debug, Deserialize)]
struct CourseUpdate {
    title: String,
    description: String,
    #[serde(default)]
    short_description: String,
    level: Level,
    duration_hours: u32,
    price: f64,
    is_free: bool,
    is_published: bool,
}

#[derive(Debug, Default, Deserialize)]
struct CoursePatch {
    title: Option<String>,
    description: Option<String>,
    short_description: Option<String>,
    level: Option<Level>,
    duration_hours: Option<u32>,
    price: Option<f64>,
    is_free: Option<bool>,
    is_published: Option<bool>,
}

async fn load_course(conn: &libsql::Connection, id: Uuid) -> Result<Course> {
    store::find_course(conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("course".into()))
}

fn require_visible(principal: &crate::Principal, course: &Course) -> Result<()> {
    if is_visible(principal, Resource::Course(course)) {
        Ok(())
    } else {
        // Masking: hidden answers exactly like missing.
        Err(Error::NotFound("course".into()))
    }
}

async fn list(ctx: Context) -> Result<HttpResponse> {
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let courses = store::list_courses(&conn).await?;
    let lessons = store::list_lessons(&conn).await?;
    let mut grouped: HashMap<Uuid, Vec<&Lesson>> = HashMap::new();
    for lesson in &lessons {
        grouped.entry(lesson.course_id).or_default().push(lesson);
    }

    let out: Vec<CourseOut> = courses
        .iter()
        .filter(|course| is_visible(&principal, Resource::Course(course)))
        .map(|course| {
            let all = grouped.get(&course.id).map(Vec::as_slice).unwrap_or(&[]);
            let visible: Vec<&Lesson> = all
                .iter()
                .copied()
                .filter(|lesson| is_visible(&principal, Resource::Lesson { lesson, course }))
                .collect();
            CourseOut::build(course, &visible, all.len() as u64)
        })
        .collect();

    response::ok(&out)
}

async fn create(ctx: Context) -> Result<HttpResponse> {
    let principal = ctx.principal()?;
    authz::authorize(&principal, Action::Create, None).into_result()?;
    let owner = principal.id().ok_or(Error::NotTeacher)?;

    let input: CourseCreate = ctx.json()?;
    let now = Timestamp::now();
    let course = Course {
        id: Uuid::new_v4(),
        title: input.title,
        description: input.description,
        short_description: input.short_description,
        level: input.level,
        duration_hours: input.duration_hours,
        price: input.price,
        is_free: input.is_free,
        is_published: input.is_published,
        // Ownership comes from the decision context, never the payload.
        teacher_id: owner,
        created_at: now,
        updated_at: now,
    };

    let conn = ctx.connection()?;
    store::insert_course(&conn, &course).await?;

    response::created(&CourseOut::build(&course, &[], 0))
}

async fn retrieve(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "course")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let course = load_course(&conn, id).await?;
    require_visible(&principal, &course)?;

    let lessons = store::list_lessons_by_course(&conn, course.id).await?;
    let visible: Vec<&Lesson> = lessons
        .iter()
        .filter(|lesson| is_visible(&principal, Resource::Lesson { lesson, course: &course }))
        .collect();

    match ctx.representation() {
        Representation::Rich => Ok(response::html(render::course_page(&course, &visible))),
        Representation::Plain => {
            response::ok(&CourseOut::build(&course, &visible, lessons.len() as u64))
        }
    }
}

async fn update(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "course")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let mut course = load_course(&conn, id).await?;
    require_visible(&principal, &course)?;
    authz::authorize(&principal, Action::Update, Some(Resource::Course(&course))).into_result()?;

    let input: CourseUpdate = ctx.json()?;
    course.title = input.title;
    course.description = input.description;
    course.short_description = input.short_description;
    course.level = input.level;
    course.duration_hours = input.duration_hours;
    course.price = input.price;
    course.is_free = input.is_free;
    course.is_published = input.is_published;
    course.updated_at = Timestamp::now();
    store::update_course(&conn, &course).await?;

    let lesson_count = store::count_lessons(&conn, course.id).await?;
    response::ok(&CourseOut::build(&course, &[], lesson_count))
}

async fn partial_update(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "course")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let mut course = load_course(&conn, id).await?;
    require_visible(&principal, &course)?;
    authz::authorize(
        &principal,
        Action::PartialUpdate,
        Some(Resource::Course(&course)),
    )
    .into_result()?;

    let input: CoursePatch = ctx.json()?;
    if let Some(title) = input.title {
        course.title = title;
    }
    if let Some(description) = input.description {
        course.description = description;
    }
    if let Some(short_description) = input.short_description {
        course.short_description = short_description;
    }
    if let Some(level) = input.level {
        course.level = level;
    }
    if let Some(duration_hours) = input.duration_hours {
        course.duration_hours = duration_hours;
    }
    if let Some(price) = input.price {
        course.price = price;
    }
    if let Some(is_free) = input.is_free {
        course.is_free = is_free;
    }
    if let Some(is_published) = input.is_published {
        course.is_published = is_published;
    }
    course.updated_at = Timestamp::now();
    store::update_course(&conn, &course).await?;

    let lesson_count = store::count_lessons(&conn, course.id).await?;
    response::ok(&CourseOut::build(&course, &[], lesson_count))
}

async fn destroy(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "course")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let course = load_course(&conn, id).await?;
    require_visible(&principal, &course)?;
    authz::authorize(&principal, Action::Destroy, Some(Resource::Course(&course))).into_result()?;

    store::delete_course(&conn, course.id).await?;
    Ok(response::no_content())
}

/// Nested endpoint: the published lessons of one course.
async fn nested_lessons(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "course")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let course = load_course(&conn, id).await?;
    require_visible(&principal, &course)?;

    // Published lessons only, for every caller; the course page shows the
    // public curriculum; drafts are managed through /api/lessons.
    let lessons = store::list_lessons_by_course(&conn, course.id).await?;
    let out: Vec<LessonOut> = lessons
        .iter()
        .filter(|l| l.is_published)
        .map(LessonOut::from)
        .collect();

    response::ok(&out)
}

/// Registers the `/api/courses` surface.
pub struct CourseModule;

impl Module for CourseModule {
    fn name(&self) -> &'static str {
        "courses"
    }

    fn routes(&self, router: &mut Router) {
        router.get("/api/courses", |ctx| list(ctx));
        router.post("/api/courses", |ctx| create(ctx));
        router.get("/api/courses/{id}", |ctx| retrieve(ctx));
        router.put("/api/courses/{id}", |ctx| update(ctx));
        router.patch("/api/courses/{id}", |ctx| partial_update(ctx));
        router.delete("/api/courses/{id}", |ctx| destroy(ctx));
        router.get("/api/courses/{id}/lessons", |ctx| nested_lessons(ctx));
    }
}
