//! Review API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{ApproveParams, FilterParams, ReviewDto, ReviewRequest};
use crate::application::{CrudService, ReviewService};
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};

/// Review handler state
#[derive(Clone)]
pub struct ReviewState {
    pub service: Arc<ReviewService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Reviews",
    responses(
        (status = 200, description = "All reviews", body = ApiResponse<Vec<ReviewDto>>)
    )
)]
pub async fn list_reviews(State(state): State<ReviewState>) -> ApiResult<Vec<ReviewDto>> {
    let reviews = state.service.get_all().await?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = ApiResponse<ReviewDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_review(
    State(state): State<ReviewState>,
    Path(id): Path<i64>,
) -> ApiResult<ReviewDto> {
    let review = state.service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(ReviewDto::from_domain(review))))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Reviews",
    request_body = ReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Duplicate review"),
        (status = 404, description = "Unknown point of sale or author"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_review(
    State(state): State<ReviewState>,
    ValidatedJson(body): ValidatedJson<ReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReviewDto>>), ApiError> {
    let review = state.service.upsert(body.into_domain(None)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(ReviewDto::from_domain(review))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = i64, Path, description = "Review ID")),
    request_body = ReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Duplicate review"),
        (status = 404, description = "Not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_review(
    State(state): State<ReviewState>,
    Path(id): Path<i64>,
    ValidatedJson(body): ValidatedJson<ReviewRequest>,
) -> ApiResult<ReviewDto> {
    let review = state.service.upsert(body.into_domain(Some(id))).await?;
    Ok(Json(ApiResponse::success(ReviewDto::from_domain(review))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    tag = "Reviews",
    params(("id" = i64, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_review(
    State(state): State<ReviewState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/filter",
    tag = "Reviews",
    params(FilterParams),
    responses(
        (status = 200, description = "Matching reviews", body = ApiResponse<Vec<ReviewDto>>),
        (status = 404, description = "Unknown point of sale")
    )
)]
pub async fn filter_reviews(
    State(state): State<ReviewState>,
    Query(params): Query<FilterParams>,
) -> ApiResult<Vec<ReviewDto>> {
    let reviews = state.service.filter(params.pos_id, params.approved).await?;
    Ok(Json(ApiResponse::success(
        reviews.into_iter().map(ReviewDto::from_domain).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/reviews/{id}/approve",
    tag = "Reviews",
    params(("id" = i64, Path, description = "Review ID"), ApproveParams),
    responses(
        (status = 200, description = "Approval recorded", body = ApiResponse<ReviewDto>),
        (status = 400, description = "Self-approval"),
        (status = 404, description = "Unknown review or user")
    )
)]
pub async fn approve_review(
    State(state): State<ReviewState>,
    Path(id): Path<i64>,
    Query(params): Query<ApproveParams>,
) -> ApiResult<ReviewDto> {
    let review = state.service.get_by_id(id).await?;
    let approved = state.service.approve(&review, params.user_id).await?;
    Ok(Json(ApiResponse::success(ReviewDto::from_domain(approved))))
}
