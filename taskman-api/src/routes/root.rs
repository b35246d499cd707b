/// Root endpoints
///
/// - `GET /` - welcome message
/// - `GET /openapi.json` - OpenAPI document

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const WELCOME_MESSAGE: &str = "Welcome to Task Management System API";

/// Welcome response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WelcomeResponse {
    pub message: String,
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = WelcomeResponse)),
    tag = "root"
)]
pub async fn welcome_message() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

/// Serves the OpenAPI document built at startup
pub async fn openapi_json(State(state): State<AppState>) -> Json<utoipa::openapi::OpenApi> {
    Json(state.openapi.as_ref().clone())
}
