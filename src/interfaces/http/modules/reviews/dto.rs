//! Review DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::{PointOfSale, Review, User};

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Review API representation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReviewDto {
    pub id: i64,
    pub pos_id: i64,
    pub author_id: i64,
    pub review: String,
    /// Number of approvals by other users
    pub approval_count: u32,
    /// `true` once `approval_count` reaches the configured threshold
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewDto {
    pub fn from_domain(r: Review) -> Self {
        Self {
            id: r.id.unwrap_or_default(),
            pos_id: r.pos.id.unwrap_or_default(),
            author_id: r.author.id.unwrap_or_default(),
            review: r.review,
            approval_count: r.approval_count,
            approved: r.approved,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Body for creating or updating a review.
///
/// Approval state is read-only and cannot be set here.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReviewRequest {
    #[validate(range(min = 1))]
    pub pos_id: i64,
    #[validate(range(min = 1))]
    pub author_id: i64,
    #[validate(
        length(max = 2000, message = "must be at most 2000 characters"),
        custom(function = "not_blank")
    )]
    pub review: String,
}

impl ReviewRequest {
    /// Domain draft with unresolved point-of-sale and author references.
    pub fn into_domain(self, id: Option<i64>) -> Review {
        let mut review = Review::new(
            PointOfSale::reference(self.pos_id),
            User::reference(self.author_id),
            self.review,
        );
        review.id = id;
        review
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterParams {
    /// Point of sale to list reviews for
    pub pos_id: i64,
    /// Approval state to match
    pub approved: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ApproveParams {
    /// User casting the approval
    pub user_id: i64,
}
