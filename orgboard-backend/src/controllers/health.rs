use actix_web::{web, HttpResponse, Responder};

use crate::source::Dataset;
use crate::AppState;

/// Version from Cargo.toml, available at compile time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/health").route(web::get().to(health_check)));
    cfg.service(web::resource("/api/version").route(web::get().to(get_version)));
}

async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let stored = |dataset: Dataset| match state.db.count_rows(dataset) {
        Ok(n) => Some(n),
        Err(e) => {
            log::error!("[health] Failed to count {} rows: {}", dataset, e);
            None
        }
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": VERSION,
        "organizations": state.directory.organizations().map(|o| o.len()),
        "accounts": state.directory.accounts().map(|a| a.len()),
        "stored": {
            "organization": stored(Dataset::Organization),
            "account": stored(Dataset::Account),
        }
    }))
}

async fn get_version() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "version": VERSION
    }))
}
