//! Admin API handlers

use rocket::http::Status;
use rocket::serde::json::{self, Json};
use rocket::{Route, State, delete, get, post, put, routes};

use ctfai_domain::value_objects::{
    ConnectivityReport, ProviderConfig, ProviderPatch, ProviderView, UsageReport,
};
use ctfai_infrastructure::AppContext;

use super::auth::AdminPrincipal;
use super::models::{
    CallLogResponse, DefaultProviderResponse, DeleteResponse, ProviderListResponse,
    SeedResponse,
};
use crate::error::{ApiResult, json_body};

/// Routes mounted under `/ai-admin`
pub fn routes() -> Vec<Route> {
    routes![
        list_providers,
        get_provider,
        create_provider,
        update_provider,
        delete_provider,
        test_provider,
        usage_stats,
        call_log,
        init_default_providers,
        set_default_provider
    ]
}

/// List provider configs without secrets
#[get("/providers?<enabled_only>")]
pub fn list_providers(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    enabled_only: Option<bool>,
) -> ApiResult<Json<ProviderListResponse>> {
    let providers = ctx
        .admin()
        .list_providers(caller.0, enabled_only.unwrap_or(false))?;
    Ok(Json(ProviderListResponse { providers }))
}

/// One provider config without its secret
#[get("/providers/<name>")]
pub fn get_provider(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    name: &str,
) -> ApiResult<Json<ProviderView>> {
    Ok(Json(ctx.admin().get_provider(caller.0, name)?))
}

/// Create a provider
#[post("/providers", format = "json", data = "<body>")]
pub async fn create_provider(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    body: Result<Json<ProviderConfig>, json::Error<'_>>,
) -> ApiResult<(Status, Json<ProviderView>)> {
    let config = json_body(body)?;
    let view = ctx.admin().create_provider(caller.0, config).await?;
    Ok((Status::Created, Json(view)))
}

/// Partially update a provider
#[put("/providers/<name>", format = "json", data = "<body>")]
pub async fn update_provider(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    name: &str,
    body: Result<Json<ProviderPatch>, json::Error<'_>>,
) -> ApiResult<Json<ProviderView>> {
    let patch = json_body(body)?;
    Ok(Json(ctx.admin().update_provider(caller.0, name, patch).await?))
}

/// Delete a provider
#[delete("/providers/<name>")]
pub async fn delete_provider(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    name: &str,
) -> ApiResult<Json<DeleteResponse>> {
    ctx.admin().delete_provider(caller.0, name).await?;
    Ok(Json(DeleteResponse {
        success: true,
        provider: name.to_string(),
    }))
}

/// Round-trip test against a provider; never touches usage statistics
#[post("/providers/<name>/test")]
pub async fn test_provider(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    name: &str,
) -> ApiResult<Json<ConnectivityReport>> {
    Ok(Json(ctx.admin().test_connectivity(caller.0, name).await?))
}

/// Usage statistics, optionally for one provider, with daily rows for the
/// last `days` days
#[get("/usage-stats?<provider>&<days>")]
pub fn usage_stats(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    provider: Option<&str>,
    days: Option<u32>,
) -> ApiResult<Json<UsageReport>> {
    Ok(Json(ctx.admin().usage_stats(caller.0, provider, days)?))
}

/// Most recent provider calls
#[get("/call-log?<provider>&<limit>")]
pub fn call_log(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    provider: Option<&str>,
    limit: Option<usize>,
) -> ApiResult<Json<CallLogResponse>> {
    let calls = ctx.admin().call_log(caller.0, provider, limit)?;
    Ok(Json(CallLogResponse { calls }))
}

/// Create the well-known provider catalogue
#[post("/init-default-providers")]
pub async fn init_default_providers(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
) -> ApiResult<Json<SeedResponse>> {
    let created = ctx.admin().seed_defaults(caller.0).await?;
    Ok(Json(SeedResponse { created }))
}

/// Change the default provider
#[put("/default-provider/<name>")]
pub async fn set_default_provider(
    caller: AdminPrincipal,
    ctx: &State<AppContext>,
    name: &str,
) -> ApiResult<Json<DefaultProviderResponse>> {
    ctx.admin().set_default_provider(caller.0, name).await?;
    Ok(Json(DefaultProviderResponse {
        default_provider: name.to_string(),
    }))
}
