use sea_orm::{Database, DatabaseConnection};

use engine::Engine;
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn register(engine: &Engine, username: &str, display_name: Option<&str>) {
    engine
        .register_user(username, "correcthorse", display_name)
        .await
        .unwrap();
}
