//! Generation API handlers

use rocket::serde::json::{self, Json};
use rocket::{Route, State, get, post, routes};

use ctfai_application::ports::{ComparisonServiceInterface, GenerationServiceInterface};
use ctfai_domain::value_objects::{GenerationPayload, GenerationRequest, GenerationResult};
use ctfai_infrastructure::AppContext;

use super::models::{
    ChallengeResponse, CompareRequest, CompareResponse, FlagResponse, GenerateChallengeRequest,
    GenerateFlagRequest, GenerateTextRequest, GenerationReply, ProvidersResponse, TextResponse,
};
use crate::error::{ApiResult, json_body};

/// Routes mounted under `/ai-multi`
pub fn routes() -> Vec<Route> {
    routes![
        list_providers,
        generate_challenge,
        generate_flag,
        generate_text,
        compare
    ]
}

/// Enabled providers available for generation
#[get("/providers")]
pub fn list_providers(ctx: &State<AppContext>) -> Json<ProvidersResponse> {
    Json(ProvidersResponse {
        providers: ctx.registry().list_enabled(),
    })
}

async fn generate(ctx: &AppContext, request: GenerationRequest) -> ApiResult<GenerationResult> {
    Ok(ctx.router().generate(request).await?)
}

/// Generate a complete challenge
#[post("/generate-challenge", format = "json", data = "<body>")]
pub async fn generate_challenge(
    ctx: &State<AppContext>,
    body: Result<Json<GenerateChallengeRequest>, json::Error<'_>>,
) -> ApiResult<GenerationReply<ChallengeResponse>> {
    let request = GenerationRequest::from(json_body(body)?);
    let result = generate(ctx, request).await?;
    Ok(GenerationReply::from_result(result, |r, payload| match payload {
        GenerationPayload::Challenge(challenge) => Some(ChallengeResponse {
            provider_used: r.provider.clone(),
            generation_time_ms: r.duration_ms,
            challenge,
        }),
        _ => None,
    }))
}

/// Generate a flag for a described challenge
#[post("/generate-flag", format = "json", data = "<body>")]
pub async fn generate_flag(
    ctx: &State<AppContext>,
    body: Result<Json<GenerateFlagRequest>, json::Error<'_>>,
) -> ApiResult<GenerationReply<FlagResponse>> {
    let request = GenerationRequest::from(json_body(body)?);
    let result = generate(ctx, request).await?;
    Ok(GenerationReply::from_result(result, |r, payload| match payload {
        GenerationPayload::Flag { flag } => Some(FlagResponse {
            provider_used: r.provider.clone(),
            generation_time_ms: r.duration_ms,
            flag,
        }),
        _ => None,
    }))
}

/// Generate free text
#[post("/generate-text", format = "json", data = "<body>")]
pub async fn generate_text(
    ctx: &State<AppContext>,
    body: Result<Json<GenerateTextRequest>, json::Error<'_>>,
) -> ApiResult<GenerationReply<TextResponse>> {
    let request = GenerationRequest::from(json_body(body)?);
    let result = generate(ctx, request).await?;
    Ok(GenerationReply::from_result(result, |r, payload| match payload {
        GenerationPayload::Text { text, token_count } => Some(TextResponse {
            provider_used: r.provider.clone(),
            generation_time_ms: r.duration_ms,
            token_count,
            text,
        }),
        _ => None,
    }))
}

/// Run one task against several providers concurrently
#[post("/compare", format = "json", data = "<body>")]
pub async fn compare(
    ctx: &State<AppContext>,
    body: Result<Json<CompareRequest>, json::Error<'_>>,
) -> ApiResult<Json<CompareResponse>> {
    let body = json_body(body)?;
    let params = body.task_params()?;
    let report = ctx
        .comparison_engine()
        .compare(params, body.providers, body.timeout_ms)
        .await?;
    Ok(Json(CompareResponse::from(&report)))
}
