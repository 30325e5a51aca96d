//! Lesson API module.
//!
//! Read endpoints are open; what they return is cut down by the visibility
//! predicate, and a single lesson the caller may not see answers 404 in
//! every representation: hidden content is indistinguishable from absent
//! content. Mutations run through the authorization decision, with lesson
//! creation doing its second, course-specific ownership stage here after
//! the payload's course reference is resolved.

use std::collections::HashMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::authz::{self, Action};
use crate::error::{Error, Result};
use crate::model::{Course, Lesson, Resource};
use crate::module::Module;
use crate::navigate::navigate;
use crate::render::{self, Representation};
use crate::response::{self, HttpResponse};
use crate::router::{Context, Router};
use crate::store;
use crate::visibility::is_visible;

/// Serialized lesson as returned by the API.
#[derive(Debug, Serialize)]
pub struct LessonOut {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub content: String,
    pub content_preview: String,
    pub video_url: Option<String>,
    pub duration_minutes: u32,
    pub order: u32,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LessonOut {
    pub fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            course_id: lesson.course_id,
            title: lesson.title.clone(),
            content: lesson.content.clone(),
            content_preview: lesson.content_preview(),
            video_url: lesson.video_url.clone(),
            duration_minutes: lesson.duration_minutes,
            order: lesson.order,
            is_published: lesson.is_published,
            created_at: lesson.created_at,
            updated_at: lesson.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct LessonCreate {
    course_id: Uuid,
    title: String,
    content: String,
    #[serde(default)]
    video_url: Option<String>,
    duration_minutes: u32,
    order: u32,
    #[serde(default)]
    is_published: bool,
}

#[derive(Debug, Deserialize)]
struct LessonUpdate {
    title: String,
    content: String,
    #[serde(default)]
    video_url: Option<String>,
    duration_minutes: u32,
    order: u32,
    is_published: bool,
}

#[derive(Debug, Default, Deserialize)]
struct LessonPatch {
    title: Option<String>,
    content: Option<String>,
    video_url: Option<String>,
    duration_minutes: Option<u32>,
    order: Option<u32>,
    is_published: Option<bool>,
}

/// Load a lesson together with its course; unknown id reads as not-found.
async fn load_lesson(conn: &libsql::Connection, id: Uuid) -> Result<(Lesson, Course)> {
    let lesson = store::find_lesson(conn, id)
        .await?
        .ok_or_else(|| Error::NotFound("lesson".into()))?;
    let course = store::find_course(conn, lesson.course_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("lesson {} has no course row", lesson.id)))?;
    Ok((lesson, course))
}

fn require_visible(principal: &crate::Principal, lesson: &Lesson, course: &Course) -> Result<()> {
    if is_visible(principal, Resource::Lesson { lesson, course }) {
        Ok(())
    } else {
        // Masking: hidden answers exactly like missing.
        Err(Error::NotFound("lesson".into()))
    }
}

fn duplicate_order(siblings: &[Lesson], order: u32, except: Option<Uuid>) -> bool {
    siblings
        .iter()
        .any(|l| l.order == order && Some(l.id) != except)
}

async fn list(ctx: Context) -> Result<HttpResponse> {
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let lessons = store::list_lessons(&conn).await?;
    let courses = store::list_courses(&conn).await?;
    let by_id: HashMap<Uuid, &Course> = courses.iter().map(|c| (c.id, c)).collect();

    let out: Vec<LessonOut> = lessons
        .iter()
        .filter(|lesson| {
            by_id
                .get(&lesson.course_id)
                .is_some_and(|course| is_visible(&principal, Resource::Lesson { lesson, course }))
        })
        .map(LessonOut::from)
        .collect();

    response::ok(&out)
}

async fn create(ctx: Context) -> Result<HttpResponse> {
    let principal = ctx.principal()?;
    // Stage one: may this principal create lessons at all?
    authz::authorize(&principal, Action::Create, None).into_result()?;

    let input: LessonCreate = ctx.json()?;
    let conn = ctx.connection()?;
    let course = store::find_course(&conn, input.course_id)
        .await?
        .ok_or_else(|| Error::ValidationFailed("unknown course".into()))?;

    // Stage two: may they create a lesson in this specific course?
    authz::authorize_lesson_create(&principal, &course).into_result()?;

    let siblings = store::list_lessons_by_course(&conn, course.id).await?;
    if duplicate_order(&siblings, input.order, None) {
        return Err(Error::ValidationFailed(
            "a lesson with this order already exists in the course".into(),
        ));
    }

    let now = Timestamp::now();
    let lesson = Lesson {
        id: Uuid::new_v4(),
        course_id: course.id,
        title: input.title,
        content: input.content,
        video_url: input.video_url,
        duration_minutes: input.duration_minutes,
        order: input.order,
        is_published: input.is_published,
        created_at: now,
        updated_at: now,
    };
    store::insert_lesson(&conn, &lesson).await?;

    response::created(&LessonOut::from(&lesson))
}

async fn retrieve(ctx: Context, forced_format: Option<&str>) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "lesson")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let (lesson, course) = load_lesson(&conn, id).await?;
    require_visible(&principal, &lesson, &course)?;

    let representation = match forced_format {
        Some(format) => render::select_representation(ctx.header("Accept"), Some(format)),
        None => ctx.representation(),
    };

    match representation {
        Representation::Rich => {
            let siblings = store::list_lessons_by_course(&conn, course.id).await?;
            let neighbors = navigate(&lesson, &course, &siblings, &principal);
            Ok(response::html(render::lesson_page(
                &lesson, &course, &neighbors,
            )))
        }
        Representation::Plain => response::ok(&LessonOut::from(&lesson)),
    }
}

async fn update(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "lesson")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let (mut lesson, course) = load_lesson(&conn, id).await?;
    require_visible(&principal, &lesson, &course)?;
    authz::authorize(
        &principal,
        Action::Update,
        Some(Resource::Lesson {
            lesson: &lesson,
            course: &course,
        }),
    )
    .into_result()?;

    let input: LessonUpdate = ctx.json()?;
    if input.order != lesson.order {
        let siblings = store::list_lessons_by_course(&conn, course.id).await?;
        if duplicate_order(&siblings, input.order, Some(lesson.id)) {
            return Err(Error::ValidationFailed(
                "a lesson with this order already exists in the course".into(),
            ));
        }
    }

    lesson.title = input.title;
    lesson.content = input.content;
    lesson.video_url = input.video_url;
    lesson.duration_minutes = input.duration_minutes;
    lesson.order = input.order;
    lesson.is_published = input.is_published;
    lesson.updated_at = Timestamp::now();
    store::update_lesson(&conn, &lesson).await?;

    response::ok(&LessonOut::from(&lesson))
}

async fn partial_update(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "lesson")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let (mut lesson, course) = load_lesson(&conn, id).await?;
    require_visible(&principal, &lesson, &course)?;
    authz::authorize(
        &principal,
        Action::PartialUpdate,
        Some(Resource::Lesson {
            lesson: &lesson,
            course: &course,
        }),
    )
    .into_result()?;

    let input: LessonPatch = ctx.json()?;
    if let Some(order) = input.order
        && order != lesson.order
    {
        let siblings = store::list_lessons_by_course(&conn, course.id).await?;
        if duplicate_order(&siblings, order, Some(lesson.id)) {
            return Err(Error::ValidationFailed(
                "a lesson with this order already exists in the course".into(),
            ));
        }
    }

    if let Some(title) = input.title {
        lesson.title = title;
    }
    if let Some(content) = input.content {
        lesson.content = content;
    }
    if let Some(video_url) = input.video_url {
        lesson.video_url = Some(video_url);
    }
    if let Some(duration_minutes) = input.duration_minutes {
        lesson.duration_minutes = duration_minutes;
    }
    if let Some(order) = input.order {
        lesson.order = order;
    }
    if let Some(is_published) = input.is_published {
        lesson.is_published = is_published;
    }
    lesson.updated_at = Timestamp::now();
    store::update_lesson(&conn, &lesson).await?;

    response::ok(&LessonOut::from(&lesson))
}

async fn destroy(ctx: Context) -> Result<HttpResponse> {
    let id = ctx.uuid_param("id", "lesson")?;
    let principal = ctx.principal()?;
    let conn = ctx.connection()?;

    let (lesson, course) = load_lesson(&conn, id).await?;
    require_visible(&principal, &lesson, &course)?;
    authz::authorize(
        &principal,
        Action::Destroy,
        Some(Resource::Lesson {
            lesson: &lesson,
            course: &course,
        }),
    )
    .into_result()?;

    store::delete_lesson(&conn, lesson.id).await?;
    Ok(response::no_content())
}

/// Registers the `/api/lessons` surface.
pub struct LessonModule;

impl Module for LessonModule {
    fn name(&self) -> &'static str {
        "lessons"
    }

    fn routes(&self, router: &mut Router) {
        router.get("/api/lessons", |ctx| list(ctx));
        router.post("/api/lessons", |ctx| create(ctx));
        router.get("/api/lessons/{id}", |ctx| async move {
            retrieve(ctx, None).await
        });
        router.get("/api/lessons/{id}/html", |ctx| async move {
            retrieve(ctx, Some("html")).await
        });
        router.put("/api/lessons/{id}", |ctx| update(ctx));
        router.patch("/api/lessons/{id}", |ctx| partial_update(ctx));
        router.delete("/api/lessons/{id}", |ctx| destroy(ctx));
    }
}
