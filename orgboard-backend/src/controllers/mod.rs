pub mod health;
pub mod js_reports;
pub mod sql_reports;

use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct ErrorResponse {
    error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// `{ "data": rows }`, the shape every report answers with
pub(crate) fn report_data<T: Serialize>(rows: T) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "data": rows }))
}
