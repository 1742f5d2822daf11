//! Admin API Authentication
//!
//! Resolves the caller of an admin route to a [`Principal`]. When admin
//! authorization is enabled the `X-Admin-Key` header (name configurable)
//! must carry the configured key; any other caller becomes a non-admin and
//! the admin service answers `Forbidden`. When it is disabled every caller
//! is an admin, authentication having been applied upstream.

use std::convert::Infallible;
use std::sync::Arc;

use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};
use tracing::warn;

use ctfai_application::use_cases::Principal;
use ctfai_infrastructure::config::AdminConfig;
use ctfai_infrastructure::constants::DEFAULT_ADMIN_HEADER;

/// Admin authentication configuration for the request guard
#[derive(Clone)]
pub struct AdminAuthConfig {
    /// Whether authentication is enabled
    pub enabled: bool,
    /// The header name to check for the API key
    pub header_name: String,
    /// The expected API key value
    pub api_key: Option<String>,
}

impl AdminAuthConfig {
    /// Create a new admin auth config
    pub fn new(enabled: bool, header_name: String, api_key: Option<String>) -> Self {
        Self {
            enabled,
            header_name,
            api_key,
        }
    }

    /// Create from infrastructure config
    pub fn from_app_config(config: &AdminConfig) -> Self {
        Self::new(
            config.enabled,
            config.header_name.clone(),
            config.api_key.clone(),
        )
    }

    /// Check if the provided key matches the configured key
    pub fn validate_key(&self, provided_key: &str) -> bool {
        match &self.api_key {
            Some(expected) => !expected.is_empty() && expected == provided_key,
            // No configured key rejects every request
            None => false,
        }
    }

    /// Principal of a caller presenting `provided_key`
    pub fn principal_for(&self, provided_key: Option<&str>) -> Principal {
        if !self.enabled {
            return Principal::admin();
        }
        match provided_key {
            Some(key) if self.validate_key(key) => Principal::admin(),
            Some(_) => {
                warn!(header = %self.header_name, "Invalid admin API key");
                Principal::anonymous()
            }
            None => Principal::anonymous(),
        }
    }
}

impl Default for AdminAuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            header_name: DEFAULT_ADMIN_HEADER.to_string(),
            api_key: None,
        }
    }
}

/// Request guard resolving the caller of an admin route
///
/// ```rust,ignore
/// #[get("/providers")]
/// fn list(caller: AdminPrincipal, ctx: &State<AppContext>) -> ApiResult<...> {
///     ctx.admin().list_providers(caller.0, false)
/// }
/// ```
pub struct AdminPrincipal(pub Principal);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminPrincipal {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        // No auth config means auth is disabled
        let Some(auth_config) = request.rocket().state::<Arc<AdminAuthConfig>>() else {
            return Outcome::Success(AdminPrincipal(Principal::admin()));
        };
        let key = request.headers().get_one(&auth_config.header_name);
        Outcome::Success(AdminPrincipal(auth_config.principal_for(key)))
    }
}
