//! Landing page and health check.
//!
//! The digest shows the public storefront: up to nine published courses and
//! the six freshest published lessons, for every caller alike. Drafts never
//! appear here, not even for their owner; the landing page is the
//! logged-out view of the platform.

use serde::Serialize;

use crate::courses::CourseOut;
use crate::error::Result;
use crate::lessons::LessonOut;
use crate::model::Lesson;
use crate::module::Module;
use crate::render::{self, Representation};
use crate::response::{self, HttpResponse};
use crate::router::{Context, Router};
use crate::store;

const DIGEST_COURSES: usize = 9;
const DIGEST_LESSONS: usize = 6;

#[derive(Debug, Serialize)]
struct Digest {
    courses: Vec<CourseOut>,
    latest_lessons: Vec<LessonOut>,
}

async fn home(ctx: Context) -> Result<HttpResponse> {
    let conn = ctx.connection()?;

    let courses = store::list_courses(&conn).await?;
    let lessons = store::list_lessons(&conn).await?;

    let digest_courses: Vec<_> = courses
        .iter()
        .filter(|c| c.is_published)
        .take(DIGEST_COURSES)
        .collect();

    let published_course = |lesson: &Lesson| {
        courses
            .iter()
            .any(|c| c.id == lesson.course_id && c.is_published)
    };
    let mut latest: Vec<&Lesson> = lessons
        .iter()
        .filter(|l| l.is_published && published_course(l))
        .collect();
    latest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    latest.truncate(DIGEST_LESSONS);

    match ctx.representation() {
        Representation::Rich => Ok(response::html(render::home_page(&digest_courses, &latest))),
        Representation::Plain => {
            let digest = Digest {
                courses: digest_courses
                    .iter()
                    .map(|course| {
                        let published: Vec<_> = lessons
                            .iter()
                            .filter(|l| l.course_id == course.id && l.is_published)
                            .collect();
                        let total = lessons.iter().filter(|l| l.course_id == course.id).count();
                        CourseOut::build(course, &published, total as u64)
                    })
                    .collect(),
                latest_lessons: latest.iter().map(|l| LessonOut::from(l)).collect(),
            };
            response::ok(&digest)
        }
    }
}

async fn health(_ctx: Context) -> Result<HttpResponse> {
    response::ok(&serde_json::json!({ "status": "ok" }))
}

/// Registers the landing page and health endpoints.
pub struct HomeModule;

impl Module for HomeModule {
    fn name(&self) -> &'static str {
        "home"
    }

    fn routes(&self, router: &mut Router) {
        router.get("/", |ctx| home(ctx));
        router.get("/health", |ctx| health(ctx));
    }
}
