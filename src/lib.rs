//! Lectern - learning-management backend.
//!
//! Instructors publish courses composed of ordered lessons; students browse
//! published content; the API serves both HTML and JSON. The interesting
//! part is the access-control core, three pure decision modules the HTTP
//! layer defers to:
//!
//! - **visibility**: may this principal see this resource at all
//! - **authz**: may this principal perform this action on it
//! - **navigate**: which previous/next lesson links may be shown
//!
//! Around that core sits conventional server plumbing:
//!
//! - **Config**: layered configuration (file → env → CLI)
//! - **Database**: libsql/Turso abstraction supporting local and remote databases
//! - **Auth**: JWT token creation and validation, resolving a [`Principal`]
//! - **Router**: HTTP routing with path parameters
//! - **Server**: Hyper-based HTTP server
//! - **Module**: trait for pluggable API modules
//!
//! # Example
//!
//! ```ignore
//! use lectern::{ConfigLoader, Module, Router};
//!
//! #[tokio::main]
//! async fn main() -> lectern::Result<()> {
//!     let loader = ConfigLoader::default();
//!     let config = loader.load(None, None, None, None, Some("secret"))?;
//!
//!     let db = std::sync::Arc::new(lectern::db::connect(&config.database.url).await?);
//!     lectern::store::init_schema(&lectern::db::connection(&db)?).await?;
//!
//!     let mut router = Router::new();
//!     lectern::courses::CourseModule.routes(&mut router);
//!     lectern::lessons::LessonModule.routes(&mut router);
//!
//!     lectern::server::run(config, Some(db), router.into_handle()).await
//! }
//! ```

pub mod auth;
pub mod authz;
pub mod config;
pub mod courses;
pub mod db;
pub mod demo;
pub mod error;
pub mod home;
pub mod lessons;
pub mod model;
pub mod module;
pub mod navigate;
pub mod principal;
pub mod render;
pub mod response;
pub mod router;
pub mod server;
pub mod store;
pub mod visibility;

// Re-export main types at crate root
pub use authz::{Action, Decision, DenyReason};
pub use config::{Config, ConfigLoader, SharedConfig};
pub use db::Handle as DbHandle;
pub use error::{Error, Result};
pub use model::{Course, Lesson, Level, Ownable, Resource};
pub use module::Module;
pub use principal::{Principal, Role};
pub use render::Representation;
pub use router::{Context, Router};

// Re-export commonly used dependencies for convenience
pub use hyper::Method;
pub use serde_json::json;
