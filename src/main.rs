use std::path::PathBuf;
use std::sync::Arc;

use lectern::{ConfigLoader, Module, Router};

#[tokio::main]
async fn main() -> lectern::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config_path = std::env::var("LECTERN_CONFIG").ok().map(PathBuf::from);
    let loader = ConfigLoader::default();
    let config = loader.load(config_path.as_deref(), None, None, None, None)?;

    let db = Arc::new(lectern::db::connect(&config.database.url).await?);
    let conn = lectern::db::connection(&db)?;
    lectern::store::init_schema(&conn).await?;

    let mut router = Router::new();
    lectern::home::HomeModule.routes(&mut router);
    lectern::courses::CourseModule.routes(&mut router);
    lectern::lessons::LessonModule.routes(&mut router);
    lectern::demo::DemoTokenModule.routes(&mut router);

    lectern::server::run(config, Some(db), router.into_handle()).await
}
