//! Lesson endpoints: listing filters, two-stage creation, masking.

use lectern::Role;
use serde_json::json;
use uuid::Uuid;

use super::harness::{self, course, get, lesson, request, seed_course, seed_lesson, token};

#[tokio::test]
async fn listing_hides_drafts_and_lessons_of_hidden_courses() {
    let app = harness::start_app().await;
    let teacher = Uuid::new_v4();
    let published = course("Open", teacher, true);
    let draft_course = course("Closed", teacher, false);
    seed_course(&app, &published).await;
    seed_course(&app, &draft_course).await;
    seed_lesson(&app, &lesson(published.id, "Visible Lesson", 1, true)).await;
    seed_lesson(&app, &lesson(published.id, "Draft Lesson", 2, false)).await;
    seed_lesson(&app, &lesson(draft_course.id, "Buried Lesson", 1, true)).await;

    let (status, body) = get(app.addr(), "/api/lessons", None).await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("Visible Lesson"));
    assert!(!body.contains("Draft Lesson"));
    assert!(!body.contains("Buried Lesson"));
}

#[tokio::test]
async fn owner_create_succeeds_with_a_preview() {
    let app = harness::start_app().await;
    let owner = Uuid::new_v4();
    let c = course("Mine", owner, true);
    seed_course(&app, &c).await;

    let bearer = token(Role::Teacher, owner);
    let payload = json!({
        "course_id": c.id,
        "title": "First",
        "content": "<p>Welcome to the course</p>",
        "duration_minutes": 15,
        "order": 1,
        "is_published": true
    });
    let (status, body) =
        request(app.addr(), "POST", "/api/lessons", Some(&bearer), Some(&payload)).await;
    app.shutdown().await;

    assert_eq!(status, 201);
    assert!(body.contains("\"content_preview\":\"Welcome to the course...\""));
}

#[tokio::test]
async fn teachers_cannot_add_lessons_to_foreign_courses() {
    let app = harness::start_app().await;
    let c = course("Not Yours", Uuid::new_v4(), true);
    seed_course(&app, &c).await;

    let bearer = token(Role::Teacher, Uuid::new_v4());
    let payload = json!({
        "course_id": c.id,
        "title": "Intruder",
        "content": "x",
        "duration_minutes": 5,
        "order": 1
    });
    let (status, body) =
        request(app.addr(), "POST", "/api/lessons", Some(&bearer), Some(&payload)).await;
    app.shutdown().await;

    assert_eq!(status, 403);
    assert!(body.contains("courses you own"));
}

#[tokio::test]
async fn students_cannot_create_lessons() {
    let app = harness::start_app().await;
    let c = course("Any", Uuid::new_v4(), true);
    seed_course(&app, &c).await;

    let bearer = token(Role::Student, Uuid::new_v4());
    let payload = json!({
        "course_id": c.id,
        "title": "Nope",
        "content": "x",
        "duration_minutes": 5,
        "order": 1
    });
    let (status, _) =
        request(app.addr(), "POST", "/api/lessons", Some(&bearer), Some(&payload)).await;
    app.shutdown().await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn unknown_course_and_duplicate_order_are_rejected() {
    let app = harness::start_app().await;
    let owner = Uuid::new_v4();
    let c = course("Ordered", owner, true);
    seed_course(&app, &c).await;
    seed_lesson(&app, &lesson(c.id, "Taken Slot", 1, true)).await;

    let bearer = token(Role::Teacher, owner);
    let missing = json!({
        "course_id": Uuid::new_v4(),
        "title": "Floating",
        "content": "x",
        "duration_minutes": 5,
        "order": 2
    });
    let (status, body) =
        request(app.addr(), "POST", "/api/lessons", Some(&bearer), Some(&missing)).await;
    assert_eq!(status, 400);
    assert!(body.contains("unknown course"));

    let clash = json!({
        "course_id": c.id,
        "title": "Clash",
        "content": "x",
        "duration_minutes": 5,
        "order": 1
    });
    let (status, body) =
        request(app.addr(), "POST", "/api/lessons", Some(&bearer), Some(&clash)).await;
    app.shutdown().await;
    assert_eq!(status, 400);
    assert!(body.contains("order"));
}

#[tokio::test]
async fn hidden_lesson_is_masked_in_every_representation() {
    let app = harness::start_app().await;
    let c = course("Host", Uuid::new_v4(), true);
    seed_course(&app, &c).await;
    let l = lesson(c.id, "Secret", 1, false);
    seed_lesson(&app, &l).await;

    let (status, _) = get(app.addr(), &format!("/api/lessons/{}", l.id), None).await;
    assert_eq!(status, 404);

    // The dedicated html route masks identically, never 403.
    let (status, _) = get(app.addr(), &format!("/api/lessons/{}/html", l.id), None).await;
    app.shutdown().await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn lesson_in_a_draft_course_is_hidden_even_when_published() {
    let app = harness::start_app().await;
    let c = course("Draft Host", Uuid::new_v4(), false);
    seed_course(&app, &c).await;
    let l = lesson(c.id, "Trapped", 1, true);
    seed_lesson(&app, &l).await;

    let student = token(Role::Student, Uuid::new_v4());
    let (status, _) = get(app.addr(), &format!("/api/lessons/{}", l.id), Some(&student)).await;
    app.shutdown().await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn html_route_serves_the_rich_page() {
    let app = harness::start_app().await;
    let c = course("Host", Uuid::new_v4(), true);
    seed_course(&app, &c).await;
    let l = lesson(c.id, "Readable", 1, true);
    seed_lesson(&app, &l).await;

    let (status, body) = get(app.addr(), &format!("/api/lessons/{}/html", l.id), None).await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("<h1>Readable</h1>"));
    assert!(body.contains("<p>Readable content</p>"));
}

#[tokio::test]
async fn owner_patch_updates_and_keeps_course_binding() {
    let app = harness::start_app().await;
    let owner = Uuid::new_v4();
    let c = course("Host", owner, true);
    seed_course(&app, &c).await;
    let l = lesson(c.id, "Old Title", 1, true);
    seed_lesson(&app, &l).await;

    let bearer = token(Role::Teacher, owner);
    let payload = json!({ "title": "New Title" });
    let (status, body) = request(
        app.addr(),
        "PATCH",
        &format!("/api/lessons/{}", l.id),
        Some(&bearer),
        Some(&payload),
    )
    .await;
    app.shutdown().await;

    assert_eq!(status, 200);
    assert!(body.contains("New Title"));
    assert!(body.contains(&c.id.to_string()));
}

#[tokio::test]
async fn invalid_bearer_token_is_rejected_on_reads() {
    let app = harness::start_app().await;

    let (status, _) = get(app.addr(), "/api/lessons", Some("not-a-real-token")).await;
    app.shutdown().await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn tampered_role_claim_is_rejected() {
    use base64::Engine;

    let app = harness::start_app().await;
    let bearer = token(Role::Teacher, Uuid::new_v4());

    // Rewrite the role claim inside the payload without re-signing.
    let parts: Vec<&str> = bearer.split('.').collect();
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let payload = String::from_utf8(engine.decode(parts[1]).unwrap()).unwrap();
    let forged_payload = engine.encode(payload.replace("teacher", "staff"));
    let forged = format!("{}.{}.{}", parts[0], forged_payload, parts[2]);

    let (status, _) = get(app.addr(), "/api/lessons", Some(&forged)).await;
    app.shutdown().await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn owner_destroy_returns_no_content() {
    let app = harness::start_app().await;
    let owner = Uuid::new_v4();
    let c = course("Host", owner, true);
    seed_course(&app, &c).await;
    let l = lesson(c.id, "Ephemeral", 1, true);
    seed_lesson(&app, &l).await;

    let bearer = token(Role::Teacher, owner);
    let (status, _) = request(
        app.addr(),
        "DELETE",
        &format!("/api/lessons/{}", l.id),
        Some(&bearer),
        None,
    )
    .await;
    assert_eq!(status, 204);

    let (status, _) = get(app.addr(), &format!("/api/lessons/{}", l.id), Some(&bearer)).await;
    app.shutdown().await;
    assert_eq!(status, 404);
}
