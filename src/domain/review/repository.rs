//! Review repository interface

use async_trait::async_trait;

use super::model::Review;
use crate::domain::repositories::{CrudRepository, DomainResult};

#[async_trait]
pub trait ReviewRepository: CrudRepository<Review, i64> {
    async fn filter_by_pos_and_author(&self, pos_id: i64, author_id: i64)
        -> DomainResult<Vec<Review>>;
    async fn filter_by_pos_and_approved(&self, pos_id: i64, approved: bool)
        -> DomainResult<Vec<Review>>;
}
