//! Course visibility, ownership, and mutation gating.

use lectern::Role;
use serde_json::json;
use uuid::Uuid;

use super::harness::{self, course, get, lesson, request, seed_course, seed_lesson, token};

#[tokio::test]
async fn anonymous_listing_hides_drafts() {
    let app = harness::start_app().await;
    let teacher = Uuid::new_v4();
    seed_course(&app, &course("Published Course", teacher, true)).await;
    seed_course(&app, &course("Draft Course", teacher, false)).await;

    let (status, body) = get(app.addr(), "/api/courses", None).await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("Published Course"));
    assert!(!body.contains("Draft Course"));
}

#[tokio::test]
async fn owner_listing_includes_own_drafts_only() {
    let app = harness::start_app().await;
    let owner = Uuid::new_v4();
    let other = Uuid::new_v4();
    seed_course(&app, &course("Own Draft", owner, false)).await;
    seed_course(&app, &course("Foreign Draft", other, false)).await;

    let bearer = token(Role::Teacher, owner);
    let (status, body) = get(app.addr(), "/api/courses", Some(&bearer)).await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("Own Draft"));
    assert!(!body.contains("Foreign Draft"));
}

#[tokio::test]
async fn staff_listing_includes_everything() {
    let app = harness::start_app().await;
    seed_course(&app, &course("Someone's Draft", Uuid::new_v4(), false)).await;

    let bearer = token(Role::Staff, Uuid::new_v4());
    let (status, body) = get(app.addr(), "/api/courses", Some(&bearer)).await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("Someone's Draft"));
}

#[tokio::test]
async fn students_and_anonymous_cannot_create() {
    let app = harness::start_app().await;
    let payload = json!({
        "title": "New",
        "description": "d",
        "level": "beginner",
        "duration_hours": 2,
        "price": 0.0
    });

    let student = token(Role::Student, Uuid::new_v4());
    let (status, body) =
        request(app.addr(), "POST", "/api/courses", Some(&student), Some(&payload)).await;
    assert_eq!(status, 403);
    assert!(body.contains("instructors"));

    let (status, _) = request(app.addr(), "POST", "/api/courses", None, Some(&payload)).await;
    app.shutdown().await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn create_assigns_ownership_from_the_token() {
    let app = harness::start_app().await;
    let teacher = Uuid::new_v4();
    let spoofed = Uuid::new_v4();
    // A teacher_id in the payload must be ignored.
    let payload = json!({
        "title": "Mine",
        "description": "d",
        "level": "advanced",
        "duration_hours": 2,
        "price": 10.0,
        "teacher_id": spoofed
    });

    let bearer = token(Role::Teacher, teacher);
    let (status, body) =
        request(app.addr(), "POST", "/api/courses", Some(&bearer), Some(&payload)).await;
    app.shutdown().await;

    assert_eq!(status, 201);
    assert!(body.contains(&teacher.to_string()));
    assert!(!body.contains(&spoofed.to_string()));
}

#[tokio::test]
async fn non_owner_teacher_cannot_update() {
    let app = harness::start_app().await;
    let c = course("Someone Else's", Uuid::new_v4(), true);
    seed_course(&app, &c).await;

    let bearer = token(Role::Teacher, Uuid::new_v4());
    let payload = json!({ "title": "Hijacked" });
    let (status, body) = request(
        app.addr(),
        "PATCH",
        &format!("/api/courses/{}", c.id),
        Some(&bearer),
        Some(&payload),
    )
    .await;
    app.shutdown().await;

    assert_eq!(status, 403);
    assert!(body.contains("course owner"));
}

#[tokio::test]
async fn staff_patch_succeeds_on_any_course() {
    let app = harness::start_app().await;
    let c = course("Anyone's Course", Uuid::new_v4(), true);
    seed_course(&app, &c).await;

    let bearer = token(Role::Staff, Uuid::new_v4());
    let payload = json!({ "is_published": false });
    let (status, body) = request(
        app.addr(),
        "PATCH",
        &format!("/api/courses/{}", c.id),
        Some(&bearer),
        Some(&payload),
    )
    .await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("\"is_published\":false"));
}

#[tokio::test]
async fn hidden_course_retrieval_is_masked_as_not_found() {
    let app = harness::start_app().await;
    let c = course("Hidden", Uuid::new_v4(), false);
    seed_course(&app, &c).await;

    // Plain JSON retrieval fails closed with 404.
    let (status, _) = get(app.addr(), &format!("/api/courses/{}", c.id), None).await;
    assert_eq!(status, 404);

    // Rich retrieval masks the same way, never 403.
    let (status, _) = get(
        app.addr(),
        &format!("/api/courses/{}?format=html", c.id),
        None,
    )
    .await;
    app.shutdown().await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn unknown_and_malformed_ids_read_the_same_as_hidden() {
    let app = harness::start_app().await;

    let (status, _) = get(app.addr(), &format!("/api/courses/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, 404);

    let (status, _) = get(app.addr(), "/api/courses/not-a-uuid", None).await;
    app.shutdown().await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn nested_lessons_are_published_only_even_for_the_owner() {
    let app = harness::start_app().await;
    let owner = Uuid::new_v4();
    let c = course("With Lessons", owner, true);
    seed_course(&app, &c).await;
    seed_lesson(&app, &lesson(c.id, "Public Lesson", 1, true)).await;
    seed_lesson(&app, &lesson(c.id, "Draft Lesson", 2, false)).await;

    let bearer = token(Role::Teacher, owner);
    let (status, body) = get(
        app.addr(),
        &format!("/api/courses/{}/lessons", c.id),
        Some(&bearer),
    )
    .await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("Public Lesson"));
    assert!(!body.contains("Draft Lesson"));
}

#[tokio::test]
async fn destroying_a_course_removes_its_lessons() {
    let app = harness::start_app().await;
    let owner = Uuid::new_v4();
    let c = course("Doomed", owner, true);
    seed_course(&app, &c).await;
    let l = lesson(c.id, "Orphan To Be", 1, true);
    seed_lesson(&app, &l).await;

    let bearer = token(Role::Teacher, owner);
    let (status, _) = request(
        app.addr(),
        "DELETE",
        &format!("/api/courses/{}", c.id),
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, 204);

    let (status, _) = get(app.addr(), &format!("/api/lessons/{}", l.id), Some(&bearer)).await;
    app.shutdown().await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn rich_course_page_renders_html() {
    let app = harness::start_app().await;
    let c = course("Readable", Uuid::new_v4(), true);
    seed_course(&app, &c).await;
    seed_lesson(&app, &lesson(c.id, "Chapter One", 1, true)).await;

    let (status, body) = get(
        app.addr(),
        &format!("/api/courses/{}?format=html", c.id),
        None,
    )
    .await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("<h1>Readable</h1>"));
    assert!(body.contains("Chapter One"));
}
