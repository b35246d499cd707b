/// User endpoints
///
/// - `POST   /api/v1/users` - Register a user
/// - `GET    /api/v1/users/:id` - Read a user
/// - `PUT    /api/v1/users/:id` - Replace a user's username, email and password
/// - `DELETE /api/v1/users/:id` - Delete a user
///
/// Passwords are hashed by the store before they are written. Responses go
/// through [`UserResponse`], so the hash never leaves the server.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ErrorResponse},
    schemas::{EntityId, UserCreate, UserResponse, ValidatedJson},
};
use axum::{extract::State, http::StatusCode, Json};
use taskman_shared::models::{user::User, Entity};
use taskman_shared::store::Repository;
use tracing::info;

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: username or email already taken
/// - `422 Unprocessable Entity`: body failed validation
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = UserCreate,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<UserCreate>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let mut session = state.session().await?;

    let user = Repository::<User>::create(&state.store, &mut session, body.into()).await?;

    info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn read_user(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<Json<UserResponse>> {
    let mut session = state.session().await?;

    let user = Repository::<User>::get(&state.store, &mut session, id)
        .await?
        .ok_or_else(|| ApiError::not_found(User::NAME))?;

    Ok(Json(user.into()))
}

/// Replace a user's fields
///
/// All fields are required; the password is re-hashed.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserCreate,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Username or email already exists", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    ValidatedJson(body): ValidatedJson<UserCreate>,
) -> ApiResult<Json<UserResponse>> {
    let mut session = state.session().await?;

    let user = Repository::<User>::update(&state.store, &mut session, id, body.into())
        .await?
        .ok_or_else(|| ApiError::not_found(User::NAME))?;

    info!(user_id = user.id, "User updated");
    Ok(Json(user.into()))
}

/// Delete a user
///
/// Tasks that referenced the user keep existing with `user_id` cleared.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse),
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<StatusCode> {
    let mut session = state.session().await?;

    if !Repository::<User>::delete(&state.store, &mut session, id).await? {
        return Err(ApiError::not_found(User::NAME));
    }

    info!(user_id = id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
