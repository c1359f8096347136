//! Review business logic: uniqueness on upsert and the approval workflow

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::crud::CrudService;
use crate::domain::{
    ApprovalConfig, CrudRepository, DomainError, DomainResult, RepositoryProvider, Review,
    ReviewRepository, ReviewStore,
};

fn persisted_id(id: Option<i64>, entity: &'static str) -> DomainResult<i64> {
    id.ok_or_else(|| DomainError::Validation(format!("{} reference has no id", entity)))
}

/// Service for review operations
pub struct ReviewService {
    store: Arc<dyn ReviewStore>,
    approval: ApprovalConfig,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewStore>, approval: ApprovalConfig) -> Self {
        Self { store, approval }
    }

    /// Reviews of one point of sale whose approval flag equals `approved`.
    pub async fn filter(&self, pos_id: i64, approved: bool) -> DomainResult<Vec<Review>> {
        if self
            .store
            .points_of_sale()
            .find_by_id(pos_id)
            .await?
            .is_none()
        {
            return Err(DomainError::not_found("PointOfSale", pos_id));
        }
        self.store
            .reviews()
            .filter_by_pos_and_approved(pos_id, approved)
            .await
    }

    /// Record one approval of `review` by `user_id`.
    ///
    /// Only the identifier of `review` is used; counter and flag come from
    /// the persisted record. Nothing is written if any check fails.
    pub async fn approve(&self, review: &Review, user_id: i64) -> DomainResult<Review> {
        let review_id = persisted_id(review.id, "Review")?;
        let uow = self.store.begin().await?;

        let approver = uow
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        let mut persisted = uow
            .reviews()
            .find_by_id(review_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", review_id))?;

        if persisted.author.is_same_user(&approver) {
            metrics::counter!("reviews_approval_rejected_total").increment(1);
            warn!(review_id, user_id, "Self-approval rejected");
            return Err(DomainError::Validation(
                "self-approval forbidden: authors cannot approve their own review".into(),
            ));
        }

        persisted.approval_count = persisted.approval_count.saturating_add(1);
        persisted.recompute_approval(&self.approval);

        let saved = uow.reviews().upsert(persisted).await?;
        uow.commit().await?;

        metrics::counter!("reviews_approved_total", "approved" => saved.approved.to_string())
            .increment(1);
        info!(
            review_id,
            approver = user_id,
            approval_count = saved.approval_count,
            approved = saved.approved,
            "Review approved"
        );
        Ok(saved)
    }
}

#[async_trait]
impl CrudService<Review, i64> for ReviewService {
    async fn get_all(&self) -> DomainResult<Vec<Review>> {
        self.store.reviews().find_all().await
    }

    async fn get_by_id(&self, id: i64) -> DomainResult<Review> {
        self.store
            .reviews()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Review", id))
    }

    /// Create or update a review.
    ///
    /// A user holds at most one review per point of sale. On update the
    /// approval counter of the stored record is kept; callers cannot set it.
    async fn upsert(&self, mut review: Review) -> DomainResult<Review> {
        let pos_id = persisted_id(review.pos_id(), "PointOfSale")?;
        let author_id = persisted_id(review.author_id(), "User")?;
        let uow = self.store.begin().await?;

        review.pos = uow
            .points_of_sale()
            .find_by_id(pos_id)
            .await?
            .ok_or_else(|| DomainError::not_found("PointOfSale", pos_id))?;
        review.author = uow
            .users()
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", author_id))?;

        let existing = uow
            .reviews()
            .filter_by_pos_and_author(pos_id, author_id)
            .await?;
        if existing
            .iter()
            .any(|r| review.id.is_none() || r.id != review.id)
        {
            return Err(DomainError::Validation(format!(
                "duplicate review: user {} already reviewed point of sale {}",
                author_id, pos_id
            )));
        }

        match review.id {
            Some(id) => {
                let stored = uow
                    .reviews()
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Review", id))?;
                review.approval_count = stored.approval_count;
                review.created_at = stored.created_at;
            }
            None => review.approval_count = 0,
        }
        review.recompute_approval(&self.approval);

        let created = review.id.is_none();
        let saved = uow.reviews().upsert(review).await?;
        uow.commit().await?;

        if created {
            metrics::counter!("reviews_created_total").increment(1);
        }
        info!(
            review_id = saved.id,
            pos_id,
            author_id,
            created,
            "Review saved"
        );
        Ok(saved)
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let uow = self.store.begin().await?;
        uow.reviews().delete(id).await?;
        uow.commit().await?;
        info!(review_id = id, "Review deleted");
        Ok(())
    }
}
