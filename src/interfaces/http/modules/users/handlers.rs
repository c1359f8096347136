//! User API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{UserDto, UserRequest};
use crate::application::{CrudService, UserService};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct UserState {
    pub service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses((status = 200, description = "All users", body = ApiResponse<Vec<UserDto>>))
)]
pub async fn list_users(State(state): State<UserState>) -> ApiResult<Vec<UserDto>> {
    let users = state.service.get_all().await?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(UserDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(State(state): State<UserState>, Path(id): Path<i64>) -> ApiResult<UserDto> {
    let user = state.service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(UserDto::from_domain(user))))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<UserDto>),
        (status = 400, description = "Duplicate login name or e-mail"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<UserState>,
    ValidatedJson(body): ValidatedJson<UserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), ApiError> {
    let user = state.service.upsert(body.into_domain(None)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from_domain(user))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_user(
    State(state): State<UserState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<UserRequest>,
) -> ApiResult<UserDto> {
    let user = state.service.upsert(body.into_domain(Some(id))).await?;
    Ok(Json(ApiResponse::success(UserDto::from_domain(user))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 204, description = "Deleted together with their reviews"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
