//! Reports computed over the in-memory datasets

use actix_web::{error::InternalError, web, HttpResponse, Responder};
use serde::Deserialize;
use std::sync::Arc;

use super::{report_data, ErrorResponse};
use crate::models::{Account, Organization};
use crate::reports::{self, ReportError};
use crate::source::Dataset;
use crate::AppState;

const MISSING_SELECTOR: &str =
    "Please specify the organization name or organization domain as per the usage and requirement.";

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/js")
            .app_data(query_config())
            .route("/orgs", web::get().to(get_orgs))
            .route("/oldToNew", web::get().to(old_to_new))
            .route("/cancelledOrgs", web::get().to(cancelled_orgs)),
    );
}

#[derive(Debug, Deserialize)]
pub struct OrgQuery {
    domain: Option<String>,
    #[serde(rename = "orgName")]
    org_name: Option<String>,
    /// Decode JSON blob columns in the name lookup
    #[serde(default)]
    expand: bool,
}

/// Malformed query strings answer 400 with a JSON error body
fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse::new(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

fn report_error(e: ReportError) -> HttpResponse {
    match e {
        ReportError::NotFound(_) | ReportError::MissingSetup(_) => {
            HttpResponse::NotFound().json(ErrorResponse::new(e.to_string()))
        }
        ReportError::NotLoaded(_) => {
            log::warn!("[reports] {}", e);
            HttpResponse::ServiceUnavailable().json(ErrorResponse::new(e.to_string()))
        }
    }
}

/// `?domain=` returns optimization settings, `?orgName=` the organization record.
/// Domain wins when both are given.
async fn get_orgs(state: web::Data<AppState>, query: web::Query<OrgQuery>) -> impl Responder {
    let domain = query.domain.as_deref().filter(|d| !d.is_empty());
    let org_name = query.org_name.as_deref().filter(|n| !n.is_empty());

    if domain.is_none() && org_name.is_none() {
        return HttpResponse::BadRequest().json(ErrorResponse::new(MISSING_SELECTOR));
    }

    let Some(organizations) = state.directory.organizations() else {
        return report_error(ReportError::NotLoaded(Dataset::Organization));
    };

    if let Some(domain) = domain {
        return match reports::optimization_by_domain(&organizations, domain) {
            Ok(settings) => report_data([settings]),
            Err(e) => report_error(e),
        };
    }

    let details = org_name
        .and_then(|name| reports::organization_by_name(&organizations, name))
        .map(|org| reports::organization_details(org, query.expand));

    HttpResponse::Ok().json(serde_json::json!({ "Organization Details": details }))
}

async fn old_to_new(state: web::Data<AppState>) -> impl Responder {
    let (organizations, accounts) = match loaded(&state) {
        Ok(both) => both,
        Err(e) => return report_error(e),
    };
    report_data(reports::chronological_roster(&organizations, &accounts))
}

async fn cancelled_orgs(state: web::Data<AppState>) -> impl Responder {
    let (organizations, accounts) = match loaded(&state) {
        Ok(both) => both,
        Err(e) => return report_error(e),
    };
    report_data(reports::cancelled_roster(&organizations, &accounts))
}

type Snapshot = (Arc<Vec<Organization>>, Arc<Vec<Account>>);

fn loaded(state: &AppState) -> Result<Snapshot, ReportError> {
    let organizations = state
        .directory
        .organizations()
        .ok_or(ReportError::NotLoaded(Dataset::Organization))?;
    let accounts = state
        .directory
        .accounts()
        .ok_or(ReportError::NotLoaded(Dataset::Account))?;
    Ok((organizations, accounts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::test_support::{empty_state, synced_state};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn test_domain_lookup() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/js/orgs?domain=acme.myshopify.com")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"data": [{"ENABLED": true}]}));
    }

    #[actix_web::test]
    async fn test_domain_lookup_not_found() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        for uri in [
            "/api/js/orgs?domain=missing.myshopify.com",
            "/api/js/orgs?domain=globex.myshopify.com",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].is_string());
        }
    }

    #[actix_web::test]
    async fn test_name_lookup() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/js/orgs?orgName=Acme").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let details = &body["Organization Details"];
        assert_eq!(details["id"], "1");
        assert_eq!(details["setup"], "{\"optimization\":{\"enabled\":true}}");

        let req = test::TestRequest::get()
            .uri("/api/js/orgs?orgName=Acme&expand=true")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body["Organization Details"]["setup"],
            json!({"optimization": {"enabled": true}})
        );

        let req = test::TestRequest::get().uri("/api/js/orgs?orgName=Nobody").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"Organization Details": null}));
    }

    #[actix_web::test]
    async fn test_missing_selector() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        for uri in ["/api/js/orgs", "/api/js/orgs?domain=&orgName="] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], MISSING_SELECTOR);
        }
    }

    #[actix_web::test]
    async fn test_malformed_query_is_json_bad_request() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        for uri in [
            "/api/js/orgs?orgName=Acme&expand=1",
            "/api/js/orgs?domain=a&domain=b",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: Value = test::read_body_json(resp).await;
            assert!(body["error"].as_str().unwrap().contains("Query deserialize error"));
        }
    }

    #[actix_web::test]
    async fn test_domain_wins_over_name() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        let req = test::TestRequest::get()
            .uri("/api/js/orgs?orgName=Globex&domain=acme.myshopify.com")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["ENABLED"], json!(true));
    }

    #[actix_web::test]
    async fn test_old_to_new() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/js/oldToNew").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({"data": [
                {"ORG NAME": "Globex", "CREATED DATE": "01/02/2022", "STATUS": "ACTIVE", "PLAN NAME": "Basic"},
                {"ORG NAME": "Acme", "CREATED DATE": "20/01/2023", "STATUS": "CANCELLED", "PLAN NAME": "Pro"},
                {"ORG NAME": "Initech", "CREATED DATE": "04/07/2024", "STATUS": "NULL", "PLAN NAME": "NULL"}
            ]})
        );
    }

    #[actix_web::test]
    async fn test_cancelled_orgs() {
        let app = test::init_service(App::new().app_data(synced_state().await).configure(config)).await;

        let req = test::TestRequest::get().uri("/api/js/cancelledOrgs").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"data": [{"ORGANIZATION NAME": "Acme"}]}));
    }

    #[actix_web::test]
    async fn test_unloaded_data_is_unavailable() {
        let app = test::init_service(App::new().app_data(empty_state()).configure(config)).await;

        for uri in ["/api/js/orgs?orgName=Acme", "/api/js/oldToNew", "/api/js/cancelledOrgs"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
    }
}
