//! Review domain entity

use chrono::{DateTime, Utc};

use super::approval::ApprovalConfig;
use crate::domain::pos::PointOfSale;
use crate::domain::user::User;

/// A user's review of a point of sale.
///
/// `approved` is derived from `approval_count` and the configured threshold;
/// it is only ever written through [`Review::recompute_approval`].
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    /// `None` until persisted
    pub id: Option<i64>,
    pub pos: PointOfSale,
    pub author: User,
    pub review: String,
    pub approval_count: u32,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Review {
    pub fn new(pos: PointOfSale, author: User, review: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            pos,
            author,
            review: review.into(),
            approval_count: 0,
            approved: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Re-derive `approved` from the current count.
    pub fn recompute_approval(&mut self, config: &ApprovalConfig) {
        self.approved = config.is_approved(self.approval_count);
    }

    /// Identifier of the reviewed point of sale, if it has been persisted.
    pub fn pos_id(&self) -> Option<i64> {
        self.pos.id
    }

    /// Identifier of the author, if it has been persisted.
    pub fn author_id(&self) -> Option<i64> {
        self.author.id
    }
}
