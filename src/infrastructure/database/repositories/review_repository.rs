//! SeaORM implementation of ReviewRepository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Select, Set, SqlErr,
};
use tracing::debug;

use super::{pos_repository, user_repository};
use crate::domain::{CrudRepository, DomainError, DomainResult, Review, ReviewRepository};
use crate::infrastructure::database::entities::{point_of_sale, review, user};
use crate::infrastructure::database::migrator::REVIEWS_POS_AUTHOR_INDEX;

// ── Conversion helpers ──────────────────────────────────────────

/// Map a write failure, turning a violation of the (pos_id, author_id)
/// index into the same validation error the service raises.
fn write_err(e: DbErr) -> DomainError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        if msg.contains(REVIEWS_POS_AUTHOR_INDEX) || msg.contains("reviews.pos_id") {
            return DomainError::Validation(
                "duplicate review: user already created a review for this point of sale".into(),
            );
        }
    }
    DomainError::from(e)
}

fn require_id(id: Option<i64>, entity: &'static str) -> DomainResult<i64> {
    id.ok_or_else(|| DomainError::Validation(format!("{} reference has no id", entity)))
}

/// Join review rows with their point of sale and author.
async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    models: Vec<review::Model>,
) -> DomainResult<Vec<Review>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let pos_ids: Vec<i64> = models.iter().map(|m| m.pos_id).collect();
    let author_ids: Vec<i64> = models.iter().map(|m| m.author_id).collect();

    let points_of_sale: HashMap<i64, point_of_sale::Model> = point_of_sale::Entity::find()
        .filter(point_of_sale::Column::Id.is_in(pos_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let authors: HashMap<i64, user::Model> = user::Entity::find()
        .filter(user::Column::Id.is_in(author_ids))
        .all(conn)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    models
        .into_iter()
        .map(|m| {
            let pos = points_of_sale
                .get(&m.pos_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("PointOfSale", m.pos_id))?;
            let author = authors
                .get(&m.author_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("User", m.author_id))?;
            Ok(Review {
                id: Some(m.id),
                pos: pos_repository::entity_to_domain(pos),
                author: user_repository::entity_to_domain(author),
                review: m.review,
                approval_count: m.approval_count.max(0) as u32,
                approved: m.approved,
                created_at: m.created_at,
                updated_at: m.updated_at,
            })
        })
        .collect()
}

// ── SeaOrmReviewRepository ──────────────────────────────────────

pub struct SeaOrmReviewRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmReviewRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    async fn fetch(&self, query: Select<review::Entity>) -> DomainResult<Vec<Review>> {
        let models = query
            .order_by_asc(review::Column::Id)
            .all(self.conn)
            .await?;
        hydrate(self.conn, models).await
    }
}

#[async_trait]
impl<'c, C> CrudRepository<Review, i64> for SeaOrmReviewRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_id(&self, id: i64) -> DomainResult<Option<Review>> {
        let reviews = self.fetch(review::Entity::find_by_id(id)).await?;
        Ok(reviews.into_iter().next())
    }

    async fn find_all(&self) -> DomainResult<Vec<Review>> {
        self.fetch(review::Entity::find()).await
    }

    async fn upsert(&self, r: Review) -> DomainResult<Review> {
        let now = Utc::now();
        let pos_id = require_id(r.pos_id(), "PointOfSale")?;
        let author_id = require_id(r.author_id(), "User")?;
        let approval_count = i32::try_from(r.approval_count)
            .map_err(|_| DomainError::Validation("approval count out of range".into()))?;

        let mut model = review::ActiveModel {
            pos_id: Set(pos_id),
            author_id: Set(author_id),
            review: Set(r.review),
            approval_count: Set(approval_count),
            approved: Set(r.approved),
            updated_at: Set(now),
            ..Default::default()
        };

        let saved = match r.id {
            None => {
                model.created_at = Set(now);
                model.insert(self.conn).await.map_err(write_err)?
            }
            Some(id) => {
                let Some(existing) = review::Entity::find_by_id(id).one(self.conn).await? else {
                    return Err(DomainError::not_found("Review", id));
                };
                model.id = Set(id);
                model.created_at = Set(existing.created_at);
                model.update(self.conn).await.map_err(write_err)?
            }
        };
        debug!(review_id = saved.id, pos_id, author_id, "Review saved");

        hydrate(self.conn, vec![saved])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::Storage("saved review could not be reloaded".into()))
    }

    async fn delete(&self, id: i64) -> DomainResult<()> {
        let result = review::Entity::delete_by_id(id).exec(self.conn).await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Review", id));
        }
        Ok(())
    }
}

#[async_trait]
impl<'c, C> ReviewRepository for SeaOrmReviewRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn filter_by_pos_and_author(
        &self,
        pos_id: i64,
        author_id: i64,
    ) -> DomainResult<Vec<Review>> {
        self.fetch(
            review::Entity::find()
                .filter(review::Column::PosId.eq(pos_id))
                .filter(review::Column::AuthorId.eq(author_id)),
        )
        .await
    }

    async fn filter_by_pos_and_approved(
        &self,
        pos_id: i64,
        approved: bool,
    ) -> DomainResult<Vec<Review>> {
        self.fetch(
            review::Entity::find()
                .filter(review::Column::PosId.eq(pos_id))
                .filter(review::Column::Approved.eq(approved)),
        )
        .await
    }
}
