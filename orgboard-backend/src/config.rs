use std::env;

/// Spreadsheet web app the datasets are published from
pub const DEFAULT_SOURCE_URL: &str = "https://script.google.com/macros/s/AKfycbznKRzB_I-SplYy6RAs0fiwvgsHl6SSI2LlhlpPYd_kmF2U9QXqpCeI1HfrZgyoA8Zumw/exec";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub database_url: String,
    pub source_url: String,
    pub source_timeout_secs: u64,
    pub source_max_attempts: u32,
    /// Empty when static file serving is disabled or no frontend was found
    pub frontend_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "./database.sqlite3".to_string()),
            source_url: env::var("SOURCE_URL").unwrap_or_else(|_| DEFAULT_SOURCE_URL.to_string()),
            source_timeout_secs: env::var("SOURCE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .expect("SOURCE_TIMEOUT_SECS must be a valid number"),
            source_max_attempts: env::var("SOURCE_MAX_ATTEMPTS")
                .unwrap_or_else(|_| "3".to_string())
                .parse::<u32>()
                .expect("SOURCE_MAX_ATTEMPTS must be a valid number")
                .max(1),
            frontend_dir: resolve_frontend_dir(),
        }
    }
}

/// Pick the directory holding the static frontend.
/// Set DISABLE_FRONTEND=1 to serve the API only.
fn resolve_frontend_dir() -> String {
    let disabled = env::var("DISABLE_FRONTEND")
        .map(|v| v == "1" || v.to_lowercase() == "true")
        .unwrap_or(false);
    if disabled {
        log::info!("Frontend serving disabled via DISABLE_FRONTEND env var");
        return String::new();
    }

    if let Ok(dir) = env::var("FRONTEND_DIR") {
        if std::path::Path::new(&dir).exists() {
            return dir;
        }
        log::warn!("FRONTEND_DIR {} does not exist", dir);
    }

    if std::path::Path::new("./public").exists() {
        "./public".to_string()
    } else if std::path::Path::new("../public").exists() {
        "../public".to_string()
    } else {
        log::warn!("Frontend not found in ./public or ../public - static file serving disabled");
        String::new()
    }
}
