//! Representation selection and the rich (HTML) pages.
//!
//! Content negotiation lives here and nowhere else: handlers ask once per
//! request whether to produce the rich (HTML) or plain (JSON)
//! representation, instead of re-deriving format logic inline. The pages
//! themselves are deliberately minimal string-built HTML; a real template
//! engine is an external collaborator, not part of this core.

use crate::model::{Course, Lesson};
use crate::navigate::Neighbors;

/// How a response should be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Templated HTML.
    Rich,
    /// Serialized JSON.
    Plain,
}

/// Decide the representation from the request's accept signal and an
/// explicit `format` override.
///
/// An explicit `html` override wins unless the accept signal strictly
/// requires JSON. Everything else is plain JSON.
pub fn select_representation(accept: Option<&str>, format: Option<&str>) -> Representation {
    if format == Some("html") && !strictly_requires_json(accept) {
        return Representation::Rich;
    }
    Representation::Plain
}

/// Whether the accept header admits only JSON (mentions `application/json`
/// with no room for HTML via `text/html` or a wildcard).
fn strictly_requires_json(accept: Option<&str>) -> bool {
    let Some(accept) = accept else {
        return false;
    };
    accept.contains("application/json") && !accept.contains("text/html") && !accept.contains("*/*")
}

/// Escape text for interpolation into HTML.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n\
         <body>{}</body></html>\n",
        escape(title),
        body
    )
}

/// Landing page digest: a selection of courses and the freshest lessons.
pub fn home_page(courses: &[&Course], latest_lessons: &[&Lesson]) -> String {
    let mut body = String::from("<h1>Lectern</h1>\n<h2>Courses</h2>\n<ul>\n");
    for course in courses {
        body.push_str(&format!(
            "<li><a href=\"/api/courses/{}?format=html\">{}</a> — {}</li>\n",
            course.id,
            escape(&course.title),
            escape(&course.short_description),
        ));
    }
    body.push_str("</ul>\n<h2>Latest lessons</h2>\n<ul>\n");
    for lesson in latest_lessons {
        body.push_str(&format!(
            "<li><a href=\"/api/lessons/{}/html\">{}</a></li>\n",
            lesson.id,
            escape(&lesson.title),
        ));
    }
    body.push_str("</ul>\n");
    page("Lectern", &body)
}

/// Course detail page with its visible lessons.
pub fn course_page(course: &Course, lessons: &[&Lesson]) -> String {
    let mut body = format!(
        "<h1>{}</h1>\n<p>{}</p>\n<p>Level: {} · {} hours</p>\n<h2>Lessons</h2>\n<ul>\n",
        escape(&course.title),
        escape(&course.description),
        course.level.as_str(),
        course.duration_hours,
    );
    for lesson in lessons {
        body.push_str(&format!(
            "<li><a href=\"/api/lessons/{}/html\">{}. {}</a></li>\n",
            lesson.id,
            lesson.order,
            escape(&lesson.title),
        ));
    }
    body.push_str("</ul>\n");
    page(&course.title, &body)
}

/// Lesson detail page with previous/next navigation.
///
/// The lesson content is rich text authored by the course owner and is
/// emitted as-is; titles and navigation labels are escaped.
pub fn lesson_page(lesson: &Lesson, course: &Course, neighbors: &Neighbors) -> String {
    let mut body = format!(
        "<p><a href=\"/api/courses/{}?format=html\">{}</a></p>\n<h1>{}</h1>\n<div>{}</div>\n",
        course.id,
        escape(&course.title),
        escape(&lesson.title),
        lesson.content,
    );
    if let Some(url) = &lesson.video_url {
        body.push_str(&format!("<p><a href=\"{}\">Video</a></p>\n", escape(url)));
    }
    body.push_str("<nav>");
    if let Some(previous) = &neighbors.previous {
        body.push_str(&format!(
            "<a href=\"{}/html\" rel=\"prev\">&larr; {}</a> ",
            previous.href,
            escape(&previous.title),
        ));
    }
    if let Some(next) = &neighbors.next {
        body.push_str(&format!(
            "<a href=\"{}/html\" rel=\"next\">{} &rarr;</a>",
            next.href,
            escape(&next.title),
        ));
    }
    body.push_str("</nav>\n");
    page(&lesson.title, &body)
}
