//! Point-of-sale API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{PosDto, PosRequest};
use crate::application::{CrudService, PosService};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};

#[derive(Clone)]
pub struct PosState {
    pub service: Arc<PosService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/pos",
    tag = "Points of Sale",
    responses((status = 200, description = "All points of sale", body = ApiResponse<Vec<PosDto>>))
)]
pub async fn list_pos(State(state): State<PosState>) -> ApiResult<Vec<PosDto>> {
    let all = state.service.get_all().await?;
    Ok(Json(ApiResponse::success(
        all.into_iter().map(PosDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/pos/{id}",
    tag = "Points of Sale",
    params(("id" = i64, Path, description = "Point of sale ID")),
    responses(
        (status = 200, description = "Point of sale", body = ApiResponse<PosDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_pos(State(state): State<PosState>, Path(id): Path<i64>) -> ApiResult<PosDto> {
    let pos = state.service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(PosDto::from_domain(pos))))
}

#[utoipa::path(
    post,
    path = "/api/v1/pos",
    tag = "Points of Sale",
    request_body = PosRequest,
    responses(
        (status = 201, description = "Created", body = ApiResponse<PosDto>),
        (status = 400, description = "Duplicate name or unknown type/campus"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_pos(
    State(state): State<PosState>,
    ValidatedJson(body): ValidatedJson<PosRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PosDto>>), ApiError> {
    let pos = state.service.upsert(body.into_domain(None)?).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(PosDto::from_domain(pos))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/pos/{id}",
    tag = "Points of Sale",
    params(("id" = i64, Path, description = "Point of sale ID")),
    request_body = PosRequest,
    responses(
        (status = 200, description = "Updated", body = ApiResponse<PosDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_pos(
    State(state): State<PosState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<PosRequest>,
) -> ApiResult<PosDto> {
    let pos = state.service.upsert(body.into_domain(Some(id))?).await?;
    Ok(Json(ApiResponse::success(PosDto::from_domain(pos))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/pos/{id}",
    tag = "Points of Sale",
    params(("id" = i64, Path, description = "Point of sale ID")),
    responses(
        (status = 204, description = "Deleted together with its reviews"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_pos(
    State(state): State<PosState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
