//! Review entity

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Review model - one row per (point of sale, author)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// Reviewed point of sale
    pub pos_id: i64,

    /// Author of the review
    pub author_id: i64,

    /// Review text
    pub review: String,

    /// Number of approvals received from other users
    pub approval_count: i32,

    /// Cached `approval_count >= min_count` as of the last write
    pub approved: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::point_of_sale::Entity",
        from = "Column::PosId",
        to = "super::point_of_sale::Column::Id",
        on_delete = "Cascade"
    )]
    PointOfSale,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::point_of_sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointOfSale.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
