//! libsql-backed persistence for courses and lessons.
//!
//! The access-control core never touches this module; handlers load
//! snapshots here, run the pure decision functions on them, and come back
//! to persist. `(course_id, ord)` uniqueness is enforced by the schema.
//!
//! Listing order is fixed here: courses newest-first, lessons by `ord`
//! ascending with `created_at` as tiebreak.

use jiff::Timestamp;
use libsql::{Connection, params};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::model::{Course, Lesson, Level};

/// Create tables if they do not exist yet.
pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            short_description TEXT NOT NULL DEFAULT '',
            level TEXT NOT NULL,
            duration_hours INTEGER NOT NULL,
            price REAL NOT NULL,
            is_free INTEGER NOT NULL,
            is_published INTEGER NOT NULL,
            teacher_id TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        )",
        (),
    )
    .await?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS lessons (
            id TEXT PRIMARY KEY,
            course_id TEXT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            video_url TEXT,
            duration_minutes INTEGER NOT NULL,
            ord INTEGER NOT NULL,
            is_published INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL,
            UNIQUE (course_id, ord)
        )",
        (),
    )
    .await?;

    Ok(())
}

fn course_from_row(row: &libsql::Row) -> Result<Course> {
    let id: String = row.get(0)?;
    let level: String = row.get(4)?;
    let teacher_id: String = row.get(9)?;
    Ok(Course {
        id: Uuid::parse_str(&id).map_err(|e| Error::Internal(format!("bad course id: {e}")))?,
        title: row.get(1)?,
        description: row.get(2)?,
        short_description: row.get(3)?,
        level: Level::parse(&level)
            .ok_or_else(|| Error::Internal(format!("unknown level: {level}")))?,
        duration_hours: row.get::<i64>(5)? as u32,
        price: row.get(6)?,
        is_free: row.get::<i64>(7)? != 0,
        is_published: row.get::<i64>(8)? != 0,
        teacher_id: Uuid::parse_str(&teacher_id)
            .map_err(|e| Error::Internal(format!("bad teacher id: {e}")))?,
        created_at: Timestamp::from_second(row.get::<i64>(10)?)?,
        updated_at: Timestamp::from_second(row.get::<i64>(11)?)?,
    })
}

fn lesson_from_row(row: &libsql::Row) -> Result<Lesson> {
    let id: String = row.get(0)?;
    let course_id: String = row.get(1)?;
    Ok(Lesson {
        id: Uuid::parse_str(&id).map_err(|e| Error::Internal(format!("bad lesson id: {e}")))?,
        course_id: Uuid::parse_str(&course_id)
            .map_err(|e| Error::Internal(format!("bad course id: {e}")))?,
        title: row.get(2)?,
        content: row.get(3)?,
        video_url: row.get(4)?,
        duration_minutes: row.get::<i64>(5)? as u32,
        order: row.get::<i64>(6)? as u32,
        is_published: row.get::<i64>(7)? != 0,
        created_at: Timestamp::from_second(row.get::<i64>(8)?)?,
        updated_at: Timestamp::from_second(row.get::<i64>(9)?)?,
    })
}

const COURSE_COLUMNS: &str = "id, title, description, short_description, level, duration_hours, \
                              price, is_free, is_published, teacher_id, created_at, updated_at";

const LESSON_COLUMNS: &str = "id, course_id, title, content, video_url, duration_minutes, ord, \
                              is_published, created_at, updated_at";

pub async fn find_course(conn: &Connection, id: Uuid) -> Result<Option<Course>> {
    let mut rows = conn
        .query(
            &format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = ?1"),
            params![id.to_string()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(course_from_row(&row)?)),
        None => Ok(None),
    }
}

/// All courses, newest first.
pub async fn list_courses(conn: &Connection) -> Result<Vec<Course>> {
    let mut rows = conn
        .query(
            &format!("SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at DESC, id"),
            (),
        )
        .await?;
    let mut courses = Vec::new();
    while let Some(row) = rows.next().await? {
        courses.push(course_from_row(&row)?);
    }
    Ok(courses)
}

pub async fn insert_course(conn: &Connection, course: &Course) -> Result<()> {
    conn.execute(
        "INSERT INTO courses (id, title, description, short_description, level, duration_hours, \
         price, is_free, is_published, teacher_id, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            course.id.to_string(),
            course.title.clone(),
            course.description.clone(),
            course.short_description.clone(),
            course.level.as_str(),
            course.duration_hours as i64,
            course.price,
            course.is_free as i64,
            course.is_published as i64,
            course.teacher_id.to_string(),
            course.created_at.as_second(),
            course.updated_at.as_second(),
        ],
    )
    .await?;
    Ok(())
}

pub async fn update_course(conn: &Connection, course: &Course) -> Result<()> {
    conn.execute(
        "UPDATE courses SET title = ?2, description = ?3, short_description = ?4, level = ?5, \
         duration_hours = ?6, price = ?7, is_free = ?8, is_published = ?9, updated_at = ?10 \
         WHERE id = ?1",
        params![
            course.id.to_string(),
            course.title.clone(),
            course.description.clone(),
            course.short_description.clone(),
            course.level.as_str(),
            course.duration_hours as i64,
            course.price,
            course.is_free as i64,
            course.is_published as i64,
            course.updated_at.as_second(),
        ],
    )
    .await?;
    Ok(())
}

/// Delete a course and, with it, its lessons (cascade is explicit so it does
/// not depend on the connection's foreign-key pragma).
pub async fn delete_course(conn: &Connection, id: Uuid) -> Result<()> {
    conn.execute(
        "DELETE FROM lessons WHERE course_id = ?1",
        params![id.to_string()],
    )
    .await?;
    conn.execute("DELETE FROM courses WHERE id = ?1", params![id.to_string()])
        .await?;
    Ok(())
}

pub async fn find_lesson(conn: &Connection, id: Uuid) -> Result<Option<Lesson>> {
    let mut rows = conn
        .query(
            &format!("SELECT {LESSON_COLUMNS} FROM lessons WHERE id = ?1"),
            params![id.to_string()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(lesson_from_row(&row)?)),
        None => Ok(None),
    }
}

/// All lessons across courses, in the default ordering.
pub async fn list_lessons(conn: &Connection) -> Result<Vec<Lesson>> {
    let mut rows = conn
        .query(
            &format!("SELECT {LESSON_COLUMNS} FROM lessons ORDER BY ord, created_at"),
            (),
        )
        .await?;
    let mut lessons = Vec::new();
    while let Some(row) = rows.next().await? {
        lessons.push(lesson_from_row(&row)?);
    }
    Ok(lessons)
}

/// Lessons of a single course, ordered by `ord` then `created_at`.
pub async fn list_lessons_by_course(conn: &Connection, course_id: Uuid) -> Result<Vec<Lesson>> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {LESSON_COLUMNS} FROM lessons WHERE course_id = ?1 \
                 ORDER BY ord, created_at"
            ),
            params![course_id.to_string()],
        )
        .await?;
    let mut lessons = Vec::new();
    while let Some(row) = rows.next().await? {
        lessons.push(lesson_from_row(&row)?);
    }
    Ok(lessons)
}

pub async fn count_lessons(conn: &Connection, course_id: Uuid) -> Result<u64> {
    let mut rows = conn
        .query(
            "SELECT COUNT(*) FROM lessons WHERE course_id = ?1",
            params![course_id.to_string()],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(row.get::<i64>(0)? as u64),
        None => Ok(0),
    }
}

pub async fn insert_lesson(conn: &Connection, lesson: &Lesson) -> Result<()> {
    conn.execute(
        "INSERT INTO lessons (id, course_id, title, content, video_url, duration_minutes, ord, \
         is_published, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            lesson.id.to_string(),
            lesson.course_id.to_string(),
            lesson.title.clone(),
            lesson.content.clone(),
            lesson.video_url.clone(),
            lesson.duration_minutes as i64,
            lesson.order as i64,
            lesson.is_published as i64,
            lesson.created_at.as_second(),
            lesson.updated_at.as_second(),
        ],
    )
    .await?;
    Ok(())
}

pub async fn update_lesson(conn: &Connection, lesson: &Lesson) -> Result<()> {
    conn.execute(
        "UPDATE lessons SET title = ?2, content = ?3, video_url = ?4, duration_minutes = ?5, \
         ord = ?6, is_published = ?7, updated_at = ?8 WHERE id = ?1",
        params![
            lesson.id.to_string(),
            lesson.title.clone(),
            lesson.content.clone(),
            lesson.video_url.clone(),
            lesson.duration_minutes as i64,
            lesson.order as i64,
            lesson.is_published as i64,
            lesson.updated_at.as_second(),
        ],
    )
    .await?;
    Ok(())
}

pub async fn delete_lesson(conn: &Connection, id: Uuid) -> Result<()> {
    conn.execute("DELETE FROM lessons WHERE id = ?1", params![id.to_string()])
        .await?;
    Ok(())
}
