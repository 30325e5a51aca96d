//! Shared harness: server startup, seeding, tokens, raw HTTP requests.

use std::net::SocketAddr;
use std::sync::Arc;

use jiff::Timestamp;
use lectern::config::{Auth, Config, Database, Server as ServerConfig};
use lectern::model::{Course, Lesson, Level};
use lectern::{Module, Role, server, store};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32b!";

/// A running server with its backing database file.
pub struct TestApp {
    pub server: server::Server,
    pub db: lectern::DbHandle,
    _db_file: tempfile::NamedTempFile,
}

impl TestApp {
    pub fn addr(&self) -> SocketAddr {
        self.server.addr()
    }

    pub fn conn(&self) -> libsql::Connection {
        self.db.connect().expect("failed to open connection")
    }

    pub async fn shutdown(self) {
        self.server.shutdown().await.unwrap();
    }
}

/// Start a test server on a random port with all modules registered.
pub async fn start_app() -> TestApp {
    start_app_with(|_| {}).await
}

/// Start a test server with a config tweak applied before startup.
pub async fn start_app_with(tweak: impl FnOnce(&mut Config)) -> TestApp {
    let db_file = tempfile::NamedTempFile::new().expect("failed to create db file");
    let mut config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: Database {
            url: db_file.path().to_str().unwrap().to_string(),
        },
        auth: Auth {
            jwt_secret: JWT_SECRET.to_string(),
            token_expiry_days: 1,
            demo_tokens: false,
        },
    };
    tweak(&mut config);

    let db = Arc::new(
        lectern::db::connect(&config.database.url)
            .await
            .expect("failed to connect"),
    );
    let conn = db.connect().unwrap();
    store::init_schema(&conn).await.unwrap();

    let mut router = lectern::Router::new();
    lectern::home::HomeModule.routes(&mut router);
    lectern::courses::CourseModule.routes(&mut router);
    lectern::lessons::LessonModule.routes(&mut router);
    lectern::demo::DemoTokenModule.routes(&mut router);

    let server = server::start(config, Some(db.clone()), router.into_handle())
        .await
        .expect("failed to start test server");

    TestApp {
        server,
        db,
        _db_file: db_file,
    }
}

/// Mint a token for a principal with the given role.
pub fn token(role: Role, id: Uuid) -> String {
    let auth = Auth {
        jwt_secret: JWT_SECRET.to_string(),
        token_expiry_days: 1,
        demo_tokens: false,
    };
    lectern::auth::create_token(&auth, id, role).unwrap()
}

pub fn course(title: &str, teacher_id: Uuid, published: bool) -> Course {
    let now = Timestamp::now();
    Course {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: format!("{title} description"),
        short_description: format!("{title} pitch"),
        level: Level::Beginner,
        duration_hours: 8,
        price: 25.0,
        is_free: false,
        is_published: published,
        teacher_id,
        created_at: now,
        updated_at: now,
    }
}

pub fn lesson(course_id: Uuid, title: &str, order: u32, published: bool) -> Lesson {
    let now = Timestamp::now();
    Lesson {
        id: Uuid::new_v4(),
        course_id,
        title: title.to_string(),
        content: format!("<p>{title} content</p>"),
        video_url: None,
        duration_minutes: 20,
        order,
        is_published: published,
        created_at: now,
        updated_at: now,
    }
}

pub async fn seed_course(app: &TestApp, course: &Course) {
    store::insert_course(&app.conn(), course).await.unwrap();
}

pub async fn seed_lesson(app: &TestApp, lesson: &Lesson) {
    store::insert_lesson(&app.conn(), lesson).await.unwrap();
}

/// Send a request and return (status, body).
pub async fn request(
    addr: SocketAddr,
    method: &str,
    path: &str,
    bearer: Option<&str>,
    body: Option<&serde_json::Value>,
) -> (u16, String) {
    let payload = body.map(|b| b.to_string()).unwrap_or_default();
    let mut raw = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\n");
    if let Some(bearer) = bearer {
        raw.push_str(&format!("Authorization: Bearer {bearer}\r\n"));
    }
    if !payload.is_empty() {
        raw.push_str(&format!(
            "Content-Type: application/json\r\nContent-Length: {}\r\n",
            payload.len()
        ));
    }
    raw.push_str("Connection: close\r\n\r\n");
    raw.push_str(&payload);

    let mut stream = TcpStream::connect(addr).await.expect("failed to connect");
    stream.write_all(raw.as_bytes()).await.expect("failed to write");

    let mut buf = Vec::new();
    let _ = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        stream.read_to_end(&mut buf),
    )
    .await;

    let text = String::from_utf8_lossy(&buf).to_string();
    let status: u16 = text
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("no status line in response:\n{text}"));
    let body = text
        .split_once("\r\n\r\n")
        .map(|(_, b)| b.to_string())
        .unwrap_or_default();
    (status, body)
}

pub async fn get(addr: SocketAddr, path: &str, bearer: Option<&str>) -> (u16, String) {
    request(addr, "GET", path, bearer, None).await
}
