//! Reports answered by SQL over the mirrored tables

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use super::{report_data, ErrorResponse};
use crate::AppState;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/sql")
            .route("/no_account_plans", web::get().to(no_account_plans))
            .route("/mult_account_plans", web::get().to(mult_account_plans))
            .route("/one_account_plan", web::get().to(one_account_plan))
            .route("/passwordless", web::get().to(passwordless)),
    );
}

fn sql_error(report: &str, e: rusqlite::Error) -> HttpResponse {
    log::error!("[reports] {} query failed: {}", report, e);
    HttpResponse::InternalServerError().json(ErrorResponse::new(e.to_string()))
}

/// One object per name, keyed by the report's column label
fn name_rows(label: &str, names: Vec<Option<String>>) -> Vec<serde_json::Value> {
    names.into_iter().map(|name| json!({ label: name })).collect()
}

async fn no_account_plans(state: web::Data<AppState>) -> impl Responder {
    match state.db.count_orgs_without_accounts() {
        Ok(count) => report_data([json!({ "ORGANIZATIONS WITHOUT ANY ACCOUNT PLANS": count })]),
        Err(e) => sql_error("no_account_plans", e),
    }
}

async fn mult_account_plans(state: web::Data<AppState>) -> impl Responder {
    match state.db.count_orgs_with_multiple_accounts() {
        Ok(count) => {
            report_data([json!({ "ORGANIZATIONS WITH MORE THAN ONE ACCOUNT PLANS": count })])
        }
        Err(e) => sql_error("mult_account_plans", e),
    }
}

async fn one_account_plan(state: web::Data<AppState>) -> impl Responder {
    match state.db.orgs_with_single_account() {
        Ok(names) => report_data(name_rows("ORGANIZATIONS WITH ONLY ONE ACCOUNT PLAN", names)),
        Err(e) => sql_error("one_account_plan", e),
    }
}

async fn passwordless(state: web::Data<AppState>) -> impl Responder {
    match state.db.passwordless_orgs() {
        Ok(names) => report_data(name_rows("PASSWORDLESS ORGANIZATIONS", names)),
        Err(e) => sql_error("passwordless", e),
    }
}
