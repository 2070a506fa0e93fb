use actix_cors::Cors;
use actix_files::{Files, NamedFile};
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod config;
mod controllers;
mod db;
mod directory;
mod models;
mod normalizer;
mod reports;
mod source;
mod sync;

use config::Config;
use db::Database;
use directory::DirectoryHandle;
use source::HttpSheetSource;

pub struct AppState {
    pub db: Arc<Database>,
    pub directory: Arc<DirectoryHandle>,
}

/// SPA fallback handler - serves index.html for client-side routing
async fn spa_fallback(index: web::Data<PathBuf>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open(index.as_path())?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).map_err(std::io::Error::other)?;
    let db = Arc::new(db);

    let source = HttpSheetSource::new(
        &config.source_url,
        Duration::from_secs(config.source_timeout_secs),
        config.source_max_attempts,
    )
    .map_err(std::io::Error::other)?;

    // Requests are only served once both datasets have been synced
    log::info!("Syncing organization and account data from the sheet");
    let directory = Arc::new(DirectoryHandle::new());
    let summary = sync::sync_all(&source, &db, &directory).await;
    if !summary.organizations.is_loaded() || !summary.accounts.is_loaded() {
        log::warn!("Sync incomplete, reports depending on the missing data will answer 503: {:?}", summary);
    }

    let frontend_dir = config.frontend_dir.clone();
    log::info!("Starting server on {}:{}", config.bind_address, config.port);
    if !frontend_dir.is_empty() {
        log::info!("Serving frontend from: {}", frontend_dir);
    }

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        let mut app = App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                directory: Arc::clone(&directory),
            }))
            .wrap(Logger::default())
            .wrap(cors)
            .configure(controllers::health::config_routes)
            .configure(controllers::js_reports::config)
            .configure(controllers::sql_reports::config);

        // Serve static files only if the frontend exists
        if !frontend_dir.is_empty() {
            let index = PathBuf::from(&frontend_dir).join("index.html");
            app = app.app_data(web::Data::new(index)).service(
                Files::new("/", frontend_dir.clone())
                    .index_file("index.html")
                    .default_handler(web::to(spa_fallback)),
            );
        }

        app
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
