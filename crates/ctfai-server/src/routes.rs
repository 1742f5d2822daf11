//! Rocket assembly
//!
//! Mounts the generation API under `/ai-multi`, the admin API under
//! `/ai-admin` and the health check at `/health`, with JSON catchers so that
//! every error body has the `{error, message}` shape.

use std::sync::Arc;

use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::Json;
use rocket::{Build, Rocket, State, catch, catchers, get, routes};

use ctfai_infrastructure::AppContext;
use ctfai_infrastructure::health::{HealthResponse, check_health};

use crate::admin::{self, AdminAuthConfig};
use crate::error::ErrorBody;
use crate::multi;

/// Health of the service; 503 when a check is down
#[get("/health")]
pub async fn health(ctx: &State<AppContext>) -> (Status, Json<HealthResponse>) {
    let report = check_health(ctx).await;
    let status = if report.status.is_operational() {
        Status::Ok
    } else {
        Status::ServiceUnavailable
    };
    (status, Json(report))
}

#[catch(404)]
fn not_found(request: &Request<'_>) -> Json<ErrorBody> {
    Json(ErrorBody::new(
        "NotFound",
        format!("no route for {} {}", request.method(), request.uri()),
    ))
}

#[catch(default)]
fn default_catcher(status: Status, _request: &Request<'_>) -> (Status, Json<ErrorBody>) {
    let error = if status.code < 500 {
        "InvalidRequest"
    } else {
        "Internal"
    };
    (
        status,
        Json(ErrorBody::new(error, status.reason_lossy().to_string())),
    )
}

/// Build the Rocket application over `context`
pub fn build_rocket(context: AppContext, auth: AdminAuthConfig) -> Rocket<Build> {
    rocket::build()
        .manage(context)
        .manage(Arc::new(auth))
        .mount("/", routes![health])
        .mount("/ai-multi", multi::routes())
        .mount("/ai-admin", admin::routes())
        .register("/", catchers![not_found, default_catcher])
}
