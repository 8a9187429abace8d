use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::config::db::db_url;
use backend::routes;
use backend::state::app_state::AppState;
use backend::{FsMediaStore, TaskRegistry};
use migration::MigratorTrait as _;

mod telemetry;

/// Languages the deployment serves; providers without content for a
/// language are dropped at registry construction.
const LANGUAGES: &[&str] = &["ru", "en"];

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    let url = match db_url() {
        Ok(url) => url,
        Err(e) => {
            eprintln!("Failed to resolve database URL: {e}");
            std::process::exit(1);
        }
    };
    let db = match sea_orm::Database::connect(&url).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Failed to connect to the database: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    // External corpus sources are wired by the deployment; the stored
    // corpus alone is enough to run rooms.
    let tasks = match TaskRegistry::build(&db, LANGUAGES, Vec::new()).await {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            eprintln!("Failed to build the task registry: {e}");
            std::process::exit(1);
        }
    };

    let media_root = std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".to_string());
    let media = Arc::new(FsMediaStore::new(media_root, "/media"));

    let app_state = AppState::new(db, tasks, media);
    let data = web::Data::new(app_state);

    tracing::info!(host = %host, port, "starting paintparty backend");

    HttpServer::new(move || {
        App::new()
            .wrap(actix_cors::Cors::permissive())
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
